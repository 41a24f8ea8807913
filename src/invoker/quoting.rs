//! Argument quoting for script interpreters and word splitting for executables.
//!
//! Script targets receive one command line that their interpreter parses
//! again. Tokens are therefore re-quoted so each survives that parse as a
//! single literal word. Executables receive an argv directly and need no
//! quoting at all.

/// Characters PowerShell treats as single quotes.
const PS_SINGLE_QUOTES: &[char] = &['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

/// Quote a string as a PowerShell verbatim literal.
pub fn powershell_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if PS_SINGLE_QUOTES.contains(&c) {
            out.push(c);
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Split `-Name` or `-Name:` off a token, if it has that shape.
fn powershell_parameter_name(token: &str) -> Option<(&str, &str)> {
    let body = token.strip_prefix('-')?;
    let mut chars = body.char_indices();
    let (_, first) = chars.next()?;
    if !(first.is_alphabetic() || first == '_') {
        return None;
    }
    for (index, c) in chars {
        if c == ':' {
            let split = index + 2;
            return Some((&token[..split], &token[split..]));
        }
        if !(c.is_alphanumeric() || c == '_' || c == '-') {
            return None;
        }
    }
    Some((token, ""))
}

/// Quote one token for a PowerShell command line.
///
/// Parameter names stay bare so they still bind by name; `-Name:value`
/// keeps its name bare and quotes the value; everything else becomes a
/// verbatim string.
pub fn powershell_token(token: &str) -> String {
    match powershell_parameter_name(token) {
        Some((name, "")) => name.to_string(),
        Some((name, value)) => format!("{}{}", name, powershell_literal(value)),
        None => powershell_literal(token),
    }
}

/// Join tokens into a PowerShell argument line.
pub fn powershell_line(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| powershell_token(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote a string for a POSIX shell.
pub fn posix_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

/// Join tokens into a POSIX shell argument line.
pub fn posix_line(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| posix_quote(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a raw argument string into words without any expansion.
///
/// Single quotes are literal, double quotes allow `\"` and `\\`, and a
/// backslash outside quotes escapes the next character.
pub fn split_words(raw: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    current.push(q);
                }
            }
            '"' => {
                in_word = true;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' if matches!(chars.peek(), Some('"') | Some('\\')) => {
                            if let Some(escaped) = chars.next() {
                                current.push(escaped);
                            }
                        }
                        _ => current.push(q),
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            _ => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn powershell_literal_doubles_quotes() {
        insta::assert_snapshot!(powershell_literal("it's"), @"'it''s'");
        insta::assert_snapshot!(powershell_literal("a\u{2019}b"), @"'a’’b'");
    }

    #[test]
    fn powershell_keeps_parameter_names_bare() {
        assert_eq!(powershell_token("-Environment"), "-Environment");
        assert_eq!(powershell_token("-Force:"), "-Force:");
        assert_eq!(powershell_token("-Env:prod x"), "-Env:'prod x'");
    }

    #[test]
    fn powershell_quotes_everything_else() {
        assert_eq!(powershell_token("$HOME"), "'$HOME'");
        assert_eq!(powershell_token("-5"), "'-5'");
        assert_eq!(powershell_token("--double"), "'--double'");
        assert_eq!(powershell_token("a;b"), "'a;b'");
        assert_eq!(powershell_token(""), "''");
    }

    #[test]
    fn powershell_line_preserves_internal_whitespace() {
        let line = powershell_line(&owned(&["-Message", "hello  world", "x"]));
        insta::assert_snapshot!(line, @"-Message 'hello  world' 'x'");
    }

    #[test]
    fn posix_quote_leaves_safe_words_alone() {
        assert_eq!(posix_quote("deploy"), "deploy");
        assert_eq!(posix_quote("--target=prod"), "--target=prod");
        assert_eq!(posix_quote("/tmp/a.txt"), "/tmp/a.txt");
    }

    #[test]
    fn posix_quote_escapes_single_quotes() {
        insta::assert_snapshot!(posix_quote("it's"), @r"'it'\''s'");
        assert_eq!(posix_quote(""), "''");
        assert_eq!(posix_quote("$HOME"), "'$HOME'");
        assert_eq!(posix_quote("a b"), "'a b'");
    }

    #[test]
    fn posix_line_joins_with_spaces() {
        assert_eq!(posix_line(&owned(&["a b", "c"])), "'a b' c");
        assert_eq!(posix_line(&[]), "");
    }

    #[test]
    fn split_words_honours_quotes() {
        assert_eq!(
            split_words(r#"one "two three" 'four five' six\ seven"#),
            owned(&["one", "two three", "four five", "six seven"])
        );
    }

    #[test]
    fn split_words_keeps_empty_quoted_words() {
        assert_eq!(split_words(r#"a "" b"#), owned(&["a", "", "b"]));
    }

    #[test]
    fn split_words_does_not_expand() {
        assert_eq!(split_words("$HOME *"), owned(&["$HOME", "*"]));
    }

    #[test]
    fn split_words_handles_escaped_double_quotes() {
        assert_eq!(split_words(r#""say \"hi\"""#), owned(&[r#"say "hi""#]));
    }

    #[test]
    fn split_words_of_blank_is_empty() {
        assert!(split_words("   ").is_empty());
        assert!(split_words("").is_empty());
    }
}
