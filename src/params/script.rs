//! Parameter and help extraction from script source.
//!
//! PowerShell scripts declare parameters in a `param(...)` block; POSIX shell
//! scripts declare them with `#@param name[:type][!]` comment lines. Both
//! document themselves with dotted help sections in a comment block.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::sync::LazyLock;

use super::help::{parse_sections, CommandHelp};
use super::schema::{FlagStyle, Parameter, ParameterSchema};
use super::{CommandDescription, SchemaSource};
use crate::discovery::{CommandFile, CommandKind, ScriptLanguage};

/// Host-shell parameters every advanced PowerShell script inherits.
///
/// They are not part of any script's own contract and are never surfaced.
pub const COMMON_PARAMETERS: &[&str] = &[
    "Verbose",
    "Debug",
    "ErrorAction",
    "WarningAction",
    "InformationAction",
    "ProgressAction",
    "ErrorVariable",
    "WarningVariable",
    "InformationVariable",
    "OutVariable",
    "OutBuffer",
    "PipelineVariable",
    "WhatIf",
    "Confirm",
];

/// Whether a name is one of the host shell's common parameters.
pub fn is_common_parameter(name: &str) -> bool {
    COMMON_PARAMETERS
        .iter()
        .any(|common| common.eq_ignore_ascii_case(name))
}

/// Schema source that reads the script file itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptSource;

impl SchemaSource for ScriptSource {
    fn describe(&self, file: &CommandFile) -> Result<CommandDescription> {
        let source = fs::read_to_string(&file.path)
            .with_context(|| format!("failed reading {}", file.path.display()))?;
        Ok(match file.kind {
            CommandKind::Script(ScriptLanguage::PowerShell) => describe_powershell(&source),
            CommandKind::Script(ScriptLanguage::Posix) => describe_posix(&source),
            CommandKind::Executable => CommandDescription::default(),
        })
    }
}

// --- PowerShell ---

static PARAM_KEYWORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bparam\s*\(").unwrap());
static PARAMETER_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*parameter\s*\((.*)\)\s*$").unwrap());
static MANDATORY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmandatory\b(?:\s*=\s*\$?(\w+))?").unwrap());
static VALIDATE_SET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*validateset\s*\((.*)\)\s*$").unwrap());
static QUOTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"'([^']*)'|"([^"]*)""#).unwrap());

/// Parse a PowerShell script's parameters and comment-based help.
pub fn describe_powershell(source: &str) -> CommandDescription {
    let help = powershell_help(source);
    let code = strip_powershell_comments(source);

    let mut parameters = Vec::new();
    if let Some(block) = param_block(&code) {
        for entry in split_top_level(block, ',') {
            if let Some(parameter) = parse_param_entry(entry) {
                if !is_common_parameter(&parameter.name) {
                    parameters.push(parameter);
                }
            }
        }
    }

    let mut schema = ParameterSchema::new(FlagStyle::SingleDash, parameters);
    if let Some(help) = &help {
        attach_parameter_help(&mut schema, help);
    }
    CommandDescription { schema, help }
}

fn powershell_help(source: &str) -> Option<CommandHelp> {
    if let Some(start) = source.find("<#") {
        let rest = &source[start + 2..];
        let end = rest.find("#>").unwrap_or(rest.len());
        if let Some(help) = parse_sections(rest[..end].lines()) {
            return Some(help);
        }
    }
    parse_sections(leading_line_comments(source))
}

/// Remove `<# #>` and `#` comments, respecting quoted strings.
fn strip_powershell_comments(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut i = 0;
    let mut quote: Option<char> = None;

    while i < chars.len() {
        let c = chars[i];
        if let Some(q) = quote {
            out.push(c);
            if c == '`' && q == '"' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match c {
            '\'' | '"' => {
                quote = Some(c);
                out.push(c);
                i += 1;
            }
            '<' if chars.get(i + 1) == Some(&'#') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '#' && chars.get(i + 1) == Some(&'>')) {
                    if chars[i] == '\n' {
                        out.push('\n');
                    }
                    i += 1;
                }
                i += 2;
                out.push(' ');
            }
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// The text inside the script-level `param(...)`.
///
/// Only attributes such as `[CmdletBinding()]` and `using` statements may
/// precede it; a `param` further down belongs to a function.
fn param_block(code: &str) -> Option<&str> {
    let mut pos = 0;
    loop {
        let rest = &code[pos..];
        let trimmed = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ';');
        pos += rest.len() - trimmed.len();

        if trimmed.starts_with('[') {
            pos = matching_close(code, pos)? + 1;
        } else if is_using_statement(trimmed) {
            pos += trimmed.find('\n').unwrap_or(trimmed.len());
        } else {
            break;
        }
    }

    let keyword = PARAM_KEYWORD.find(&code[pos..])?;
    if keyword.start() != 0 {
        return None;
    }
    let open = pos + keyword.end() - 1;
    let close = matching_close(code, open)?;
    Some(&code[open + 1..close])
}

fn is_using_statement(text: &str) -> bool {
    text.get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("using ") || head.eq_ignore_ascii_case("using\t"))
}

/// Byte index of the bracket closing the one at `open`.
fn matching_close(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (index, c) in text[open..].char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on `separator` where it is not nested in brackets or quotes.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (index, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            c if c == separator && depth == 0 => {
                parts.push(&text[start..index]);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Parse one `[attr()][type]$Name = default` entry.
fn parse_param_entry(entry: &str) -> Option<Parameter> {
    let mut type_name: Option<String> = None;
    let mut required = false;
    let mut values = Vec::new();
    let mut name: Option<String> = None;

    let mut rest = entry.trim_start();
    while !rest.is_empty() {
        if rest.starts_with('[') {
            let close = matching_close(rest, 0)?;
            let attribute = &rest[1..close];
            classify_attribute(attribute, &mut type_name, &mut required, &mut values);
            rest = rest[close + 1..].trim_start();
        } else if let Some(after) = rest.strip_prefix('$') {
            let ident: String = after
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            if !ident.is_empty() {
                name = Some(ident);
            }
            break;
        } else {
            let skip = rest.chars().next().map(char::len_utf8).unwrap_or(1);
            rest = rest[skip..].trim_start();
        }
    }

    let mut parameter = Parameter::new(
        name?,
        type_name.unwrap_or_else(|| "object".to_string()),
        required,
    );
    parameter.values = values;
    Some(parameter)
}

fn classify_attribute(
    attribute: &str,
    type_name: &mut Option<String>,
    required: &mut bool,
    values: &mut Vec<String>,
) {
    if let Some(caps) = PARAMETER_ATTRIBUTE.captures(attribute) {
        for argument in split_top_level(&caps[1], ',') {
            if let Some(m) = MANDATORY.captures(argument) {
                *required = match m.get(1).map(|v| v.as_str().to_ascii_lowercase()) {
                    None => true,
                    Some(v) => v == "true" || v == "1",
                };
            }
        }
    } else if let Some(caps) = VALIDATE_SET.captures(attribute) {
        *values = QUOTED
            .captures_iter(&caps[1])
            .filter_map(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().to_string())
            .collect();
    } else if !attribute.contains('(') {
        let literal = attribute.trim();
        if !literal.is_empty() {
            *type_name = Some(literal.to_string());
        }
    }
}

// --- POSIX shell ---

static POSIX_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#@param\s+([A-Za-z_][A-Za-z0-9_-]*)(?::([A-Za-z0-9_\[\]]+))?(!)?(?:\s+(.*))?$")
        .unwrap()
});

/// Parse a POSIX shell script's `#@param` declarations and leading help block.
pub fn describe_posix(source: &str) -> CommandDescription {
    let parameters = source
        .lines()
        .filter_map(|line| POSIX_PARAM.captures(line))
        .map(|caps| {
            let mut parameter = Parameter::new(
                &caps[1],
                caps.get(2).map(|m| m.as_str()).unwrap_or("string"),
                caps.get(3).is_some(),
            );
            parameter.help = caps
                .get(4)
                .map(|m| m.as_str().trim().to_string())
                .filter(|h| !h.is_empty());
            parameter
        })
        .collect();

    let help = parse_sections(
        leading_line_comments(source).filter(|line| !line.trim_start().starts_with("@param")),
    );

    let mut schema = ParameterSchema::new(FlagStyle::DoubleDash, parameters);
    if let Some(help) = &help {
        attach_parameter_help(&mut schema, help);
    }
    CommandDescription { schema, help }
}

/// Leading `#` comment lines with the marker stripped; skips a shebang.
fn leading_line_comments(source: &str) -> impl Iterator<Item = &str> {
    source
        .lines()
        .skip_while(|line| line.starts_with("#!") || line.trim().is_empty())
        .take_while(|line| line.trim_start().starts_with('#'))
        .filter(|line| !line.trim_start().to_ascii_lowercase().starts_with("#requires"))
        .map(|line| {
            let body = line.trim_start().trim_start_matches('#');
            body.strip_prefix(' ').unwrap_or(body)
        })
}

fn attach_parameter_help(schema: &mut ParameterSchema, help: &CommandHelp) {
    for (name, text) in &help.parameters {
        if let Some(parameter) = schema.get_mut(name) {
            if parameter.help.is_none() {
                parameter.help = Some(text.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPLOY_PS1: &str = r#"<#
.SYNOPSIS
    Deploy the service.

.PARAMETER Environment
    Target environment.
#>
[CmdletBinding()]
param(
    # Where to deploy
    [Parameter(Mandatory = $true, Position = 0)]
    [ValidateSet('dev', "prod")]
    [string]$Environment,

    [Parameter()]
    [int[]]$Ports = @(80, 443),

    [switch]$Force,

    [Parameter(Mandatory)]
    [Alias('t')]
    $Tag,

    [Parameter(Mandatory=$false)][string]$Note = "a, b",

    [switch]$Verbose
)

Write-Host "param(ignored)"
"#;

    #[test]
    fn parses_param_block_in_order() {
        let desc = describe_powershell(DEPLOY_PS1);
        let names: Vec<_> = desc.schema.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Environment", "Ports", "Force", "Tag", "Note"]);
        assert_eq!(desc.schema.style, FlagStyle::SingleDash);
    }

    #[test]
    fn reads_types_and_required_flags() {
        let desc = describe_powershell(DEPLOY_PS1);
        let schema = &desc.schema;

        let env = schema.get("Environment").unwrap();
        assert_eq!(env.type_name, "string");
        assert!(env.required);
        assert_eq!(env.values, vec!["dev", "prod"]);

        assert_eq!(schema.get("Ports").unwrap().type_name, "int[]");
        assert!(!schema.get("Ports").unwrap().required);
        assert_eq!(schema.get("Force").unwrap().type_name, "switch");

        let tag = schema.get("Tag").unwrap();
        assert!(tag.required);
        assert_eq!(tag.type_name, "object");

        assert!(!schema.get("Note").unwrap().required);
    }

    #[test]
    fn common_parameters_never_surface() {
        let desc = describe_powershell(DEPLOY_PS1);
        assert!(desc.schema.get("Verbose").is_none());
        assert!(is_common_parameter("erroraction"));
        assert!(!is_common_parameter("Environment"));
    }

    #[test]
    fn comment_based_help_is_attached() {
        let desc = describe_powershell(DEPLOY_PS1);
        let help = desc.help.unwrap();
        assert_eq!(help.synopsis.as_deref(), Some("Deploy the service."));
        assert_eq!(
            desc.schema.get("Environment").unwrap().help.as_deref(),
            Some("Target environment.")
        );
    }

    #[test]
    fn script_without_param_block_has_empty_schema() {
        let desc = describe_powershell("Write-Host 'hello'\n");
        assert!(desc.schema.is_empty());
        assert!(desc.help.is_none());
    }

    #[test]
    fn function_params_are_not_script_params() {
        let source = "function Get-Thing {\n    param([string]$Inner)\n}\nGet-Thing -Inner x\n";
        assert!(describe_powershell(source).schema.is_empty());

        let source = "Write-Host 'start'\nparam([string]$Late)\n";
        assert!(describe_powershell(source).schema.is_empty());
    }

    #[test]
    fn using_and_attributes_may_precede_param_block() {
        let source = "#requires -Version 7\nusing namespace System.IO\n[CmdletBinding()]\n[OutputType([string])]\nparam([string]$Path)\nfunction f { param($Other) }\n";
        let desc = describe_powershell(source);
        let names: Vec<_> = desc.schema.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Path"]);
    }

    #[test]
    fn line_comment_help_is_recognised() {
        let source = "# .SYNOPSIS\n# Say hello.\nparam([string]$Name)\n";
        let desc = describe_powershell(source);
        assert_eq!(
            desc.help.unwrap().synopsis.as_deref(),
            Some("Say hello.")
        );
        assert_eq!(desc.schema.len(), 1);
    }

    #[test]
    fn comments_inside_strings_are_kept() {
        let stripped = strip_powershell_comments("$a = 'x # y' # gone\n");
        assert!(stripped.contains("'x # y'"));
        assert!(!stripped.contains("gone"));
    }

    #[test]
    fn split_ignores_nested_commas() {
        let parts = split_top_level("[ValidateSet('a','b')]$X, $Y = @(1,2)", ',');
        assert_eq!(parts.len(), 2);
    }

    const BUILD_SH: &str = "#!/bin/sh
# .SYNOPSIS
# Build the project.
#
# .DESCRIPTION
# Compiles sources into ./out.
#@param target:string! Build target
#@param jobs:int
#@param clean:flag

set -e
echo building
";

    #[test]
    fn posix_params_and_help() {
        let desc = describe_posix(BUILD_SH);
        let schema = &desc.schema;
        assert_eq!(schema.style, FlagStyle::DoubleDash);
        assert_eq!(schema.len(), 3);

        let target = schema.get("target").unwrap();
        assert!(target.required);
        assert_eq!(target.help.as_deref(), Some("Build target"));
        assert_eq!(schema.get("jobs").unwrap().type_name, "int");
        assert!(!schema.get("clean").unwrap().takes_value());

        let help = desc.help.unwrap();
        assert_eq!(help.synopsis.as_deref(), Some("Build the project."));
        assert_eq!(
            help.description.as_deref(),
            Some("Compiles sources into ./out.")
        );
    }

    #[test]
    fn posix_default_type_is_string() {
        let desc = describe_posix("#@param name\n");
        let name = desc.schema.get("name").unwrap();
        assert_eq!(name.type_name, "string");
        assert!(!name.required);
    }
}
