//! Structured help text.
//!
//! Help is written as dotted sections (`.SYNOPSIS`, `.DESCRIPTION`,
//! `.PARAMETER <name>`, `.EXAMPLE`) inside a comment block. The same section
//! grammar is used for PowerShell comment-based help and for the leading
//! comment block of POSIX shell scripts.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Help for one command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandHelp {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    /// Per-parameter text keyed by parameter name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
}

impl CommandHelp {
    /// Whether nothing was documented.
    pub fn is_empty(&self) -> bool {
        self.synopsis.is_none()
            && self.description.is_none()
            && self.examples.is_empty()
            && self.parameters.is_empty()
    }

    /// One-line summary: the synopsis, else the first description line.
    pub fn summary(&self) -> Option<&str> {
        self.synopsis
            .as_deref()
            .or_else(|| self.description.as_deref().and_then(|d| d.lines().next()))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Case-insensitive substring match over synopsis and description.
    pub fn mentions(&self, needle_lower: &str) -> bool {
        [self.synopsis.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(needle_lower))
    }
}

static SECTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\.([A-Za-z]+)\b[ \t]*(\S*)\s*$").unwrap());

/// Parse dotted help sections from already-uncommented lines.
///
/// Returns `None` when no recognised section is present.
pub fn parse_sections<'a>(lines: impl IntoIterator<Item = &'a str>) -> Option<CommandHelp> {
    let mut help = CommandHelp::default();
    let mut current: Option<(String, String)> = None;
    let mut body: Vec<&str> = Vec::new();
    let mut saw_section = false;

    for line in lines {
        if let Some(caps) = SECTION_REGEX.captures(line) {
            let keyword = caps[1].to_ascii_uppercase();
            if is_known_section(&keyword) {
                if let Some((kw, arg)) = current.take() {
                    store_section(&mut help, &kw, &arg, &body);
                }
                body.clear();
                current = Some((keyword, caps[2].to_string()));
                saw_section = true;
                continue;
            }
        }
        if current.is_some() {
            body.push(line);
        }
    }
    if let Some((kw, arg)) = current.take() {
        store_section(&mut help, &kw, &arg, &body);
    }

    if saw_section {
        Some(help)
    } else {
        None
    }
}

fn is_known_section(keyword: &str) -> bool {
    matches!(
        keyword,
        "SYNOPSIS"
            | "DESCRIPTION"
            | "PARAMETER"
            | "EXAMPLE"
            | "NOTES"
            | "INPUTS"
            | "OUTPUTS"
            | "LINK"
            | "COMPONENT"
            | "ROLE"
            | "FUNCTIONALITY"
    )
}

fn store_section(help: &mut CommandHelp, keyword: &str, arg: &str, body: &[&str]) {
    let text = join_body(body);
    if text.is_empty() {
        return;
    }
    match keyword {
        "SYNOPSIS" => help.synopsis = Some(text),
        "DESCRIPTION" => help.description = Some(text),
        "EXAMPLE" => help.examples.push(text),
        "PARAMETER" if !arg.is_empty() => {
            help.parameters.insert(arg.to_string(), text);
        }
        _ => {}
    }
}

fn join_body(body: &[&str]) -> String {
    let lines: Vec<&str> = body.iter().map(|l| l.trim()).collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map(|i| i + 1)
        .unwrap_or(start);
    lines[start..end.max(start)].join("\n")
}
