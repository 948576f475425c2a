//! `{variable}` substitution for prompt layouts.
//!
//! # Syntax
//!
//! - `{name}` - Substitutes the value of variable `name` (surrounding
//!   whitespace inside the braces is ignored)
//! - `{{` - Renders as literal `{`
//! - `}}` - Renders as literal `}`
//!
//! Substituted values are inserted verbatim and never re-scanned, so agent
//! fields and input documents may contain braces freely. Undefined variables
//! are an error rather than an empty substitution.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

/// Error type for template rendering failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A variable was referenced but not provided.
    #[error("undefined variable '{name}' at position {position} in template")]
    UndefinedVariable { name: String, position: usize },

    /// A `{` was found without a matching `}`.
    #[error("unmatched '{{' at position {position} in template")]
    UnmatchedBrace { position: usize },

    /// An empty variable name was found (e.g., `{}`).
    #[error("empty variable name '{{}}' at position {position} in template")]
    EmptyVariableName { position: usize },
}

/// Render `template`, replacing each `{name}` with `variables[name]`.
pub fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' if next_is(&mut chars, '{') => out.push('{'),
            '{' => {
                let name = read_placeholder(&mut chars, pos)?;
                let value = variables
                    .get(name.as_str())
                    .ok_or(TemplateError::UndefinedVariable {
                        name: name.clone(),
                        position: pos,
                    })?;
                out.push_str(value);
            }
            // A lone `}` is literal; `}}` collapses to one.
            '}' => {
                next_is(&mut chars, '}');
                out.push('}');
            }
            _ => out.push(ch),
        }
    }

    Ok(out)
}

/// Consume the next char if it equals `expected`.
fn next_is(chars: &mut Peekable<CharIndices<'_>>, expected: char) -> bool {
    chars.next_if(|&(_, c)| c == expected).is_some()
}

fn read_placeholder(
    chars: &mut Peekable<CharIndices<'_>>,
    start: usize,
) -> Result<String, TemplateError> {
    let mut name = String::new();
    loop {
        match chars.next() {
            Some((_, '}')) => break,
            Some((_, c)) => name.push(c),
            None => return Err(TemplateError::UnmatchedBrace { position: start }),
        }
    }

    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(TemplateError::EmptyVariableName { position: start });
    }
    Ok(trimmed.to_string())
}

/// Build a variables map from key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_agent_fields() {
        let v = vars([("name", "Summarizer"), ("objective", "Summarize code")]);
        let out = render_template("- Name: {name}\n{objective}", &v).unwrap();
        assert_eq!(out, "- Name: Summarizer\nSummarize code");
    }

    #[test]
    fn test_values_with_braces_are_not_rescanned() {
        let v = vars([("input", "fn main() { let x = {y}; }")]);
        let out = render_template("--- INPUT ---\n{input}", &v).unwrap();
        assert_eq!(out, "--- INPUT ---\nfn main() { let x = {y}; }");
    }

    #[test]
    fn test_escapes() {
        let out = render_template("Return {{\"key\": 1}} only", &HashMap::new()).unwrap();
        assert_eq!(out, "Return {\"key\": 1} only");
    }

    #[test]
    fn test_lone_closing_brace_is_literal() {
        assert_eq!(render_template("a } b", &HashMap::new()).unwrap(), "a } b");
    }

    #[test]
    fn test_whitespace_inside_braces() {
        let v = vars([("name", "Reviewer")]);
        assert_eq!(render_template("{ name }", &v).unwrap(), "Reviewer");
    }

    #[test]
    fn test_undefined_variable() {
        let err = render_template("Hello {agent}", &HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UndefinedVariable {
                name: "agent".to_string(),
                position: 6
            }
        );
        assert_eq!(
            err.to_string(),
            "undefined variable 'agent' at position 6 in template"
        );
    }

    #[test]
    fn test_unmatched_and_empty() {
        assert_eq!(
            render_template("x {open", &HashMap::new()).unwrap_err(),
            TemplateError::UnmatchedBrace { position: 2 }
        );
        assert_eq!(
            render_template("x { }", &HashMap::new()).unwrap_err(),
            TemplateError::EmptyVariableName { position: 2 }
        );
        assert_eq!(
            TemplateError::UnmatchedBrace { position: 2 }.to_string(),
            "unmatched '{' at position 2 in template"
        );
    }

    #[test]
    fn test_unicode_values() {
        let v = vars([("traits", "précis, 簡潔")]);
        assert_eq!(render_template("[{traits}]", &v).unwrap(), "[précis, 簡潔]");
    }
}
