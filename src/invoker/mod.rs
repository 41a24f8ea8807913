//! Command invocation.
//!
//! Runs a resolved [`CommandFile`] as a child process with inherited stdio
//! and blocks until it exits. Scripts go through their interpreter with a
//! re-quoted command line; executables are spawned directly with an argv.

pub mod quoting;
pub mod signals;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::discovery::{CommandFile, CommandKind, ScriptLanguage};
use crate::error::{InvokeError, Result};

/// Interpreter programs used for scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpreters {
    #[serde(default = "default_powershell")]
    pub powershell: String,
    #[serde(default = "default_posix")]
    pub posix: String,
}

fn default_powershell() -> String {
    "pwsh".to_string()
}

fn default_posix() -> String {
    "sh".to_string()
}

impl Default for Interpreters {
    fn default() -> Self {
        Self {
            powershell: default_powershell(),
            posix: default_posix(),
        }
    }
}

/// Arguments forwarded to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardedArgs {
    /// The literal trailing text as the user typed it.
    Raw(String),
    /// Already-split tokens.
    Tokens(Vec<String>),
}

impl ForwardedArgs {
    /// No arguments at all.
    pub fn none() -> Self {
        Self::Tokens(Vec::new())
    }

    /// Tokens as an executable would receive them.
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Self::Raw(raw) => quoting::split_words(raw),
            Self::Tokens(tokens) => tokens.clone(),
        }
    }

    fn script_line(&self, quote: fn(&[String]) -> String) -> String {
        match self {
            Self::Raw(raw) => raw.trim().to_string(),
            Self::Tokens(tokens) => quote(tokens),
        }
    }
}

impl From<Vec<String>> for ForwardedArgs {
    fn from(tokens: Vec<String>) -> Self {
        Self::Tokens(tokens)
    }
}

/// The program and argv a command will be launched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl LaunchPlan {
    /// Build the launch for a command file.
    pub fn new(file: &CommandFile, args: &ForwardedArgs, interpreters: &Interpreters) -> Self {
        match file.kind {
            CommandKind::Script(ScriptLanguage::PowerShell) => {
                let line = args.script_line(quoting::powershell_line);
                Self {
                    program: PathBuf::from(&interpreters.powershell),
                    args: vec![
                        "-NoProfile".into(),
                        "-NonInteractive".into(),
                        "-Command".into(),
                        powershell_command(&file.path, &line).into(),
                    ],
                }
            }
            CommandKind::Script(ScriptLanguage::Posix) => {
                let line = args.script_line(quoting::posix_line);
                Self {
                    program: PathBuf::from(&interpreters.posix),
                    args: vec![
                        "-c".into(),
                        posix_command(&interpreters.posix, &file.path, &line).into(),
                    ],
                }
            }
            CommandKind::Executable => Self {
                program: file.path.clone(),
                args: args.tokens().into_iter().map(OsString::from).collect(),
            },
        }
    }
}

const POWERSHELL_EXIT_CLAUSE: &str =
    "$ok = $?; if ($ok) { exit 0 } elseif ($LASTEXITCODE) { exit $LASTEXITCODE } else { exit 1 }";

fn powershell_command(path: &Path, line: &str) -> String {
    let target = quoting::powershell_literal(&path.to_string_lossy());
    let call = if line.is_empty() {
        format!("& {}", target)
    } else {
        format!("& {} {}", target, line)
    };
    // A script ending without `exit` keeps the $LASTEXITCODE of its last
    // native call, so success is judged by $? alone.
    format!(
        "$global:LASTEXITCODE = 0; {}; {}",
        call, POWERSHELL_EXIT_CLAUSE
    )
}

fn posix_command(shell: &str, path: &Path, line: &str) -> String {
    let mut command = format!(
        "exec {} {}",
        quoting::posix_quote(shell),
        quoting::posix_quote(&path.to_string_lossy())
    );
    if !line.is_empty() {
        command.push(' ');
        command.push_str(line);
    }
    command
}

/// Extra process settings for an invocation.
#[derive(Debug, Clone, Default)]
pub struct InvokeOptions {
    /// Working directory; inherited when `None`.
    pub cwd: Option<PathBuf>,
    /// Environment variables merged over the inherited environment.
    pub env: HashMap<String, String>,
}

/// A command that ran and exited successfully.
#[derive(Debug, Clone)]
pub struct InvocationOutcome {
    pub exit_code: i32,
    pub duration: Duration,
}

/// Run a command with inherited stdio and wait for it.
///
/// A non-zero exit becomes [`InvokeError::CommandFailed`]; a process that
/// could not be started becomes [`InvokeError::LaunchFailed`].
pub fn invoke(
    file: &CommandFile,
    args: &ForwardedArgs,
    interpreters: &Interpreters,
    options: &InvokeOptions,
) -> Result<InvocationOutcome> {
    if !file.path.is_file() {
        return Err(InvokeError::LaunchFailed {
            command: file.name.clone(),
            message: format!("file not found: {}", file.path.display()),
        });
    }

    let plan = LaunchPlan::new(file, args, interpreters);
    debug!(
        "Launching {} via {} {:?}",
        file.name,
        plan.program.display(),
        plan.args
    );

    let mut cmd = Command::new(&plan.program);
    cmd.args(&plan.args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }
    for (key, value) in &options.env {
        cmd.env(key, value);
    }
    signals::reset_interrupt_in_child(&mut cmd);

    let start = Instant::now();
    let status = {
        let _guard = signals::InterruptGuard::install();
        cmd.status().map_err(|e| InvokeError::LaunchFailed {
            command: file.name.clone(),
            message: format!("{}: {}", plan.program.display(), e),
        })?
    };
    let duration = start.elapsed();
    let exit_code = exit_code(&status);
    debug!("{} exited with {} after {:?}", file.name, exit_code, duration);

    if status.success() {
        Ok(InvocationOutcome {
            exit_code,
            duration,
        })
    } else {
        Err(InvokeError::CommandFailed {
            command: file.name.clone(),
            code: exit_code,
        })
    }
}

/// Exit code of a finished process; signals map to `128 + signal`.
pub fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::Location;
    use std::fs;
    use tempfile::TempDir;

    fn command_file(dir: &Path, file_name: &str, content: &str) -> CommandFile {
        let path = dir.join(file_name);
        fs::write(&path, content).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        CommandFile::from_path(&path, Location::Direct).unwrap()
    }

    fn out_options(out: &Path) -> InvokeOptions {
        let mut options = InvokeOptions::default();
        options
            .env
            .insert("INVOKE_TEST_OUT".into(), out.display().to_string());
        options
    }

    fn tokens(list: &[&str]) -> ForwardedArgs {
        ForwardedArgs::Tokens(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn powershell_plan_quotes_tokens() {
        let temp = TempDir::new().unwrap();
        let file = command_file(temp.path(), "deploy.ps1", "param($Environment)");
        let plan = LaunchPlan::new(
            &file,
            &tokens(&["-Environment", "prod east"]),
            &Interpreters::default(),
        );

        assert_eq!(plan.program, PathBuf::from("pwsh"));
        assert_eq!(plan.args[..3], ["-NoProfile", "-NonInteractive", "-Command"]);
        let line = plan.args[3].to_string_lossy();
        assert!(line.contains(&format!(
            "& '{}' -Environment 'prod east';",
            file.path.display()
        )));
    }

    #[test]
    fn powershell_plan_ignores_stale_native_exit_codes() {
        let temp = TempDir::new().unwrap();
        let file = command_file(temp.path(), "sync.ps1", "");
        let plan = LaunchPlan::new(&file, &ForwardedArgs::none(), &Interpreters::default());
        let line = plan.args[3].to_string_lossy();

        assert!(line.starts_with("$global:LASTEXITCODE = 0; & '"));
        assert!(line.ends_with(
            "$ok = $?; if ($ok) { exit 0 } elseif ($LASTEXITCODE) { exit $LASTEXITCODE } else { exit 1 }"
        ));
    }

    fn pwsh_available() -> bool {
        Command::new("pwsh")
            .args(["-NoProfile", "-Command", "exit 0"])
            .output()
            .is_ok_and(|out| out.status.success())
    }

    #[cfg(unix)]
    #[test]
    fn powershell_success_after_failing_native_call() {
        if !pwsh_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let file = command_file(
            temp.path(),
            "diff.ps1",
            "sh -c 'exit 1'\nif ($LASTEXITCODE -eq 1) { 'changes found' }\n",
        );

        let outcome = invoke(
            &file,
            &ForwardedArgs::none(),
            &Interpreters::default(),
            &InvokeOptions::default(),
        )
        .unwrap();
        assert_eq!(outcome.exit_code, 0);
    }

    #[cfg(unix)]
    #[test]
    fn powershell_explicit_exit_code_propagates() {
        if !pwsh_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let file = command_file(temp.path(), "fail.ps1", "exit 4\n");

        let err = invoke(
            &file,
            &ForwardedArgs::none(),
            &Interpreters::default(),
            &InvokeOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn powershell_plan_forwards_raw_text_verbatim() {
        let temp = TempDir::new().unwrap();
        let file = command_file(temp.path(), "deploy.ps1", "");
        let plan = LaunchPlan::new(
            &file,
            &ForwardedArgs::Raw("-Environment $env:TARGET".into()),
            &Interpreters::default(),
        );
        let line = plan.args[3].to_string_lossy();
        assert!(line.contains("' -Environment $env:TARGET;"));
    }

    #[test]
    fn posix_plan_execs_interpreter() {
        let temp = TempDir::new().unwrap();
        let file = command_file(temp.path(), "build.sh", "");
        let interpreters = Interpreters {
            posix: "bash".into(),
            ..Default::default()
        };
        let plan = LaunchPlan::new(&file, &tokens(&["it's", "x"]), &interpreters);

        assert_eq!(plan.program, PathBuf::from("bash"));
        assert_eq!(plan.args[0], "-c");
        assert_eq!(
            plan.args[1].to_string_lossy(),
            format!(
                r"exec bash {} 'it'\''s' x",
                quoting::posix_quote(&file.path.to_string_lossy())
            )
        );
    }

    #[test]
    fn executable_plan_has_no_sentinel() {
        let temp = TempDir::new().unwrap();
        let file = command_file(temp.path(), "tool.exe", "");
        let plan = LaunchPlan::new(&file, &ForwardedArgs::none(), &Interpreters::default());
        assert_eq!(plan.program, file.path);
        assert!(plan.args.is_empty());
    }

    #[test]
    fn executable_plan_splits_raw_text() {
        let temp = TempDir::new().unwrap();
        let file = command_file(temp.path(), "tool.exe", "");
        let plan = LaunchPlan::new(
            &file,
            &ForwardedArgs::Raw(r#"--name "a b" c"#.into()),
            &Interpreters::default(),
        );
        assert_eq!(plan.args, ["--name", "a b", "c"]);
    }

    #[test]
    fn vanished_file_is_launch_failure() {
        let temp = TempDir::new().unwrap();
        let file = command_file(temp.path(), "gone.sh", "exit 0\n");
        fs::remove_file(&file.path).unwrap();

        let err = invoke(
            &file,
            &ForwardedArgs::none(),
            &Interpreters::default(),
            &InvokeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, InvokeError::LaunchFailed { ref command, .. } if command == "gone"));
    }

    #[test]
    fn missing_interpreter_is_launch_failure() {
        let temp = TempDir::new().unwrap();
        let file = command_file(temp.path(), "x.sh", "exit 0\n");
        let interpreters = Interpreters {
            posix: "definitely-not-a-shell-9f2c".into(),
            ..Default::default()
        };
        let err = invoke(
            &file,
            &ForwardedArgs::none(),
            &interpreters,
            &InvokeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, InvokeError::LaunchFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn executable_receives_zero_arguments() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out.txt");
        let file = command_file(
            temp.path(),
            "count",
            "#!/bin/sh\necho \"$#\" > \"$INVOKE_TEST_OUT\"\n",
        );

        invoke(
            &file,
            &ForwardedArgs::none(),
            &Interpreters::default(),
            &out_options(&out),
        )
        .unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap().trim(), "0");
    }

    #[cfg(unix)]
    #[test]
    fn script_receives_tokens_intact() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out.txt");
        let file = command_file(
            temp.path(),
            "args.sh",
            "for a in \"$@\"; do printf '[%s]\\n' \"$a\"; done > \"$INVOKE_TEST_OUT\"\n",
        );

        invoke(
            &file,
            &tokens(&["a b", "it's", "$HOME", ""]),
            &Interpreters::default(),
            &out_options(&out),
        )
        .unwrap();
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "[a b]\n[it's]\n[$HOME]\n[]\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn script_receives_raw_text_through_shell() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out.txt");
        let file = command_file(
            temp.path(),
            "args.sh",
            "for a in \"$@\"; do printf '[%s]\\n' \"$a\"; done > \"$INVOKE_TEST_OUT\"\n",
        );

        invoke(
            &file,
            &ForwardedArgs::Raw("one 'two three'".into()),
            &Interpreters::default(),
            &out_options(&out),
        )
        .unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "[one]\n[two three]\n");
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_command_failure() {
        let temp = TempDir::new().unwrap();
        let file = command_file(temp.path(), "beta.fail.sh", "exit 3\n");

        let err = invoke(
            &file,
            &ForwardedArgs::none(),
            &Interpreters::default(),
            &InvokeOptions::default(),
        )
        .unwrap_err();
        match err {
            InvokeError::CommandFailed { command, code } => {
                assert_eq!(command, "fail");
                assert_eq!(code, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn killed_child_reports_signal_code() {
        let temp = TempDir::new().unwrap();
        let file = command_file(temp.path(), "die.sh", "kill -TERM $$\n");

        let err = invoke(
            &file,
            &ForwardedArgs::none(),
            &Interpreters::default(),
            &InvokeOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 128 + libc::SIGTERM);
    }
}
