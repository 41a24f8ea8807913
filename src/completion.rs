//! Completion queries.
//!
//! A shell's completion hook calls these on every keystroke, with whatever
//! half-typed input the user has. None of them fail: unknown stubs,
//! unresolvable commands and unreadable files all produce empty results.

use crate::context::EngineContext;
use crate::discovery::{resolve, visible_commands};
use crate::params::{self, ParameterSchema};
use crate::stubs::RESERVED_NAMES;
use crate::verbs::VirtualVerb;

fn starts_with_ignore_case(candidate: &str, partial: &str) -> bool {
    candidate
        .get(..partial.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(partial))
}

/// Registered stub names starting with `partial` (case-insensitive).
pub fn list_stub_names(ctx: &EngineContext, partial: &str) -> Vec<String> {
    ctx.registry
        .names()
        .into_iter()
        .filter(|name| starts_with_ignore_case(name, partial))
        .map(str::to_string)
        .collect()
}

/// Visible command names of a stub starting with `partial`.
///
/// Names carry no lifecycle prefix and appear once however many variants
/// exist.
pub fn list_command_names(ctx: &EngineContext, stub: &str, partial: &str) -> Vec<String> {
    let Ok(entry) = ctx.stub(stub) else {
        return Vec::new();
    };
    visible_commands(&entry.root, &ctx.policy)
        .into_iter()
        .map(|file| file.name)
        .filter(|name| starts_with_ignore_case(name, partial))
        .collect()
}

/// Parameter schema of a command, or an empty schema when it cannot be resolved.
pub fn list_parameters(ctx: &EngineContext, stub: &str, command: &str) -> ParameterSchema {
    match resolve(ctx, stub, command) {
        Ok(file) => params::introspect(&file),
        Err(_) => ParameterSchema::default(),
    }
}

/// Top-level words offered before any stub: verbs that users type.
fn verb_names() -> impl Iterator<Item = &'static str> {
    RESERVED_NAMES
        .iter()
        .copied()
        .filter(|name| !name.starts_with("__"))
}

/// Candidates for the last of `words`, the words typed after `invoke`.
///
/// The last word is the one being completed and may be empty.
pub fn complete(ctx: &EngineContext, words: &[String]) -> Vec<String> {
    let Some((partial, before)) = words.split_last() else {
        return top_level(ctx, "");
    };

    match before {
        [] => top_level(ctx, partial),
        [first] => match VirtualVerb::parse(first) {
            Some(VirtualVerb::Help) | Some(VirtualVerb::Update) => {
                list_stub_names(ctx, partial)
            }
            Some(VirtualVerb::Search) => Vec::new(),
            None => list_command_names(ctx, first, partial),
        },
        [first, second] if VirtualVerb::parse(first) == Some(VirtualVerb::Help) => {
            list_command_names(ctx, second, partial)
        }
        [first, ..] if VirtualVerb::parse(first).is_some() => Vec::new(),
        [stub, command, args @ ..] => complete_arguments(ctx, stub, command, args, partial),
    }
}

fn top_level(ctx: &EngineContext, partial: &str) -> Vec<String> {
    let mut candidates = list_stub_names(ctx, partial);
    candidates.extend(
        verb_names()
            .filter(|verb| starts_with_ignore_case(verb, partial))
            .map(str::to_string),
    );
    candidates
}

fn complete_arguments(
    ctx: &EngineContext,
    stub: &str,
    command: &str,
    args: &[String],
    partial: &str,
) -> Vec<String> {
    let schema = list_parameters(ctx, stub, command);
    if schema.is_empty() {
        return Vec::new();
    }

    // Value position: the previous word is a flag that expects a value.
    if let Some(previous) = args.last() {
        if let Some((name, None)) = schema.parse_flag(previous) {
            if let Some(parameter) = schema.match_flag(name) {
                if parameter.takes_value() {
                    return parameter
                        .values
                        .iter()
                        .filter(|value| starts_with_ignore_case(value, partial))
                        .cloned()
                        .collect();
                }
            }
        }
    }

    let used: Vec<&str> = args
        .iter()
        .filter_map(|arg| schema.parse_flag(arg))
        .filter_map(|(name, _)| schema.match_flag(name))
        .map(|parameter| parameter.name.as_str())
        .collect();

    schema
        .iter()
        .filter(|parameter| !used.contains(&parameter.name.as_str()))
        .map(|parameter| schema.flag(parameter))
        .filter(|flag| starts_with_ignore_case(flag, partial))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::VisibilityPolicy;
    use crate::stubs::Stub;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const DEPLOY: &str = r#"param(
    [Parameter(Mandatory)]
    [ValidateSet('dev', 'staging', 'prod')]
    [string]$Environment,
    [switch]$Force,
    [string]$Version
)
"#;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn fixture() -> (TempDir, EngineContext) {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "Commands/deploy.ps1", DEPLOY);
        write(temp.path(), "Commands/beta.deploy.ps1", DEPLOY);
        write(temp.path(), "Commands/alpha.destroy.ps1", "");
        write(temp.path(), "Commands/build/build.sh", "");
        write(temp.path(), "Commands/build/bundle.sh", "");

        let mut ctx = EngineContext::default();
        ctx.registry.register(Stub::new("Demo", temp.path())).unwrap();
        ctx.registry
            .register(Stub::new("Deploybot", temp.path().join("missing")))
            .unwrap();
        (temp, ctx)
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn stub_names_filter_by_prefix() {
        let (_temp, ctx) = fixture();
        assert_eq!(list_stub_names(&ctx, "de"), vec!["Demo", "Deploybot"]);
        assert_eq!(list_stub_names(&ctx, "DEP"), vec!["Deploybot"]);
        assert!(list_stub_names(&ctx, "x").is_empty());
    }

    #[test]
    fn command_names_are_deduplicated_and_prefix_free() {
        let (_temp, mut ctx) = fixture();
        ctx.policy = VisibilityPolicy {
            alpha: true,
            beta: true,
        };
        assert_eq!(
            list_command_names(&ctx, "Demo", "d"),
            vec!["deploy", "destroy"]
        );
        assert_eq!(list_command_names(&ctx, "Demo", "b"), vec!["build"]);
    }

    #[test]
    fn unknown_stub_completes_to_nothing() {
        let (_temp, ctx) = fixture();
        assert!(list_command_names(&ctx, "Nope", "").is_empty());
        assert!(list_command_names(&ctx, "Deploybot", "").is_empty());
        assert!(list_parameters(&ctx, "Nope", "deploy").is_empty());
        assert!(list_parameters(&ctx, "Demo", "").is_empty());
        assert!(list_parameters(&ctx, "Demo", "beta.deploy").is_empty());
    }

    #[test]
    fn parameters_follow_declaration_order() {
        let (_temp, ctx) = fixture();
        let schema = list_parameters(&ctx, "Demo", "deploy");
        let names: Vec<_> = schema.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Environment", "Force", "Version"]);
    }

    #[test]
    fn complete_top_level_offers_stubs_and_verbs() {
        let (_temp, ctx) = fixture();
        let all = complete(&ctx, &[]);
        assert!(all.contains(&"Demo".to_string()));
        assert!(all.contains(&"search".to_string()));
        assert!(!all.iter().any(|c| c.starts_with("__")));

        assert_eq!(complete(&ctx, &words(&["s"])), vec!["search", "stubs"]);
    }

    #[test]
    fn complete_commands_after_stub() {
        let (_temp, ctx) = fixture();
        assert_eq!(complete(&ctx, &words(&["Demo", ""])), vec!["build", "deploy"]);
    }

    #[test]
    fn complete_stub_after_help_and_update() {
        let (_temp, ctx) = fixture();
        assert_eq!(complete(&ctx, &words(&["help", "Dem"])), vec!["Demo"]);
        assert_eq!(complete(&ctx, &words(&["update", "Dem"])), vec!["Demo"]);
        assert_eq!(
            complete(&ctx, &words(&["help", "Demo", "de"])),
            vec!["deploy"]
        );
        assert!(complete(&ctx, &words(&["search", ""])).is_empty());
    }

    #[test]
    fn complete_flags_skip_used_parameters() {
        let (_temp, ctx) = fixture();
        assert_eq!(
            complete(&ctx, &words(&["Demo", "deploy", "-"])),
            vec!["-Environment", "-Force", "-Version"]
        );
        assert_eq!(
            complete(&ctx, &words(&["Demo", "deploy", "-Force", "-"])),
            vec!["-Environment", "-Version"]
        );
    }

    #[test]
    fn complete_values_from_validate_set() {
        let (_temp, ctx) = fixture();
        assert_eq!(
            complete(&ctx, &words(&["Demo", "deploy", "-Environment", "p"])),
            vec!["prod"]
        );
        assert_eq!(
            complete(&ctx, &words(&["Demo", "deploy", "-env", ""])),
            vec!["dev", "staging", "prod"]
        );
        assert!(complete(&ctx, &words(&["Demo", "deploy", "-Version", ""])).is_empty());
    }
}
