//! Parameter schemas and argument validation.

use serde::Serialize;
use std::fmt;

/// How named arguments are spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagStyle {
    /// `-Name`, `-Name:value` (PowerShell).
    SingleDash,
    /// `--name`, `--name=value`.
    #[default]
    DoubleDash,
}

impl FlagStyle {
    fn prefix(self) -> &'static str {
        match self {
            Self::SingleDash => "-",
            Self::DoubleDash => "--",
        }
    }

    fn separator(self) -> char {
        match self {
            Self::SingleDash => ':',
            Self::DoubleDash => '=',
        }
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    /// Allowed values, when the declaration restricts them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required,
            values: Vec::new(),
            help: None,
        }
    }

    /// Whether a value follows the flag (switches stand alone).
    pub fn takes_value(&self) -> bool {
        !matches!(
            self.type_name.to_ascii_lowercase().as_str(),
            "switch" | "flag"
        )
    }
}

/// Ordered parameter declarations of one command.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParameterSchema {
    pub style: FlagStyle,
    parameters: Vec<Parameter>,
}

/// A problem found when checking arguments against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    UnknownParameter(String),
    MissingRequired(String),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownParameter(name) => write!(f, "unknown parameter '{}'", name),
            Self::MissingRequired(name) => write!(f, "missing required parameter '{}'", name),
        }
    }
}

impl ParameterSchema {
    /// A schema with no parameters.
    pub fn empty(style: FlagStyle) -> Self {
        Self {
            style,
            parameters: Vec::new(),
        }
    }

    /// Build from declarations; later duplicates of a name are dropped.
    pub fn new(style: FlagStyle, parameters: Vec<Parameter>) -> Self {
        let mut schema = Self::empty(style);
        for parameter in parameters {
            if schema.get(&parameter.name).is_none() {
                schema.parameters.push(parameter);
            }
        }
        schema
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Mutable case-insensitive lookup.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.parameters
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Flag spelling of a parameter, e.g. `-Target` or `--target`.
    pub fn flag(&self, parameter: &Parameter) -> String {
        format!("{}{}", self.style.prefix(), parameter.name)
    }

    /// Split a token into flag name and inline value, if it is a named argument.
    pub fn parse_flag<'t>(&self, token: &'t str) -> Option<(&'t str, Option<&'t str>)> {
        let body = token.strip_prefix(self.style.prefix())?;
        if self.style == FlagStyle::SingleDash && body.starts_with('-') {
            return None;
        }
        if !body.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_') {
            return None;
        }
        match body.split_once(self.style.separator()) {
            Some((name, value)) => Some((name, Some(value))),
            None => Some((body, None)),
        }
    }

    /// Match a typed flag name to a declaration.
    ///
    /// PowerShell accepts any unambiguous prefix; double-dash style needs the
    /// full name.
    pub fn match_flag(&self, name: &str) -> Option<&Parameter> {
        if let Some(exact) = self.get(name) {
            return Some(exact);
        }
        if self.style != FlagStyle::SingleDash || name.is_empty() {
            return None;
        }
        let lowered = name.to_ascii_lowercase();
        let mut matches = self
            .parameters
            .iter()
            .filter(|p| p.name.to_ascii_lowercase().starts_with(&lowered));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    /// Check argument tokens against the declarations.
    ///
    /// Named tokens bind by name; the remaining positional tokens bind to the
    /// unbound value-taking parameters in declaration order. Unknown names are
    /// only reported when the schema declares something.
    pub fn validate(&self, tokens: &[String]) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut bound = vec![false; self.parameters.len()];
        let mut positional = 0usize;

        let mut iter = tokens.iter();
        while let Some(token) = iter.next() {
            if token == "--" {
                positional += iter.by_ref().count();
                break;
            }
            let Some((name, inline)) = self.parse_flag(token) else {
                positional += 1;
                continue;
            };
            match self.match_flag(name) {
                Some(parameter) => {
                    if let Some(index) = self.parameters.iter().position(|p| p == parameter) {
                        bound[index] = true;
                    }
                    if parameter.takes_value() && inline.is_none() {
                        iter.next();
                    }
                }
                None if !self.is_empty() => {
                    issues.push(ValidationIssue::UnknownParameter(name.to_string()));
                }
                None => positional += 1,
            }
        }

        for (index, parameter) in self.parameters.iter().enumerate() {
            if bound[index] || !parameter.takes_value() {
                if parameter.required && !bound[index] {
                    issues.push(ValidationIssue::MissingRequired(parameter.name.clone()));
                }
                continue;
            }
            if positional > 0 {
                positional -= 1;
            } else if parameter.required {
                issues.push(ValidationIssue::MissingRequired(parameter.name.clone()));
            }
        }

        issues
    }
}
