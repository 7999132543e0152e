//! Segment scanner
//!
//! Splits a document into the pieces the render loop walks in order:
//! literal text, `.( ... .)` script blocks, `{name}` substitutions,
//! `.inc("name")` includes, and `.sub("pattern", "replacement")`
//! rewrite directives. Brace escapes (`{{`, `}}`) collapse to single
//! braces here, so render-time code never sees them.

use super::super::error::TemplateError;
use super::super::script::{tokenize, Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Literal output, escapes already collapsed
    Text(String),
    /// `.(` body `.)`, line is where the block opens
    Script { body: String, line: usize },
    /// `{name}`
    Subst { name: String, line: usize },
    /// `.inc("name")`
    Include { name: String, line: usize },
    /// `.sub("pattern", "replacement")`
    Rewrite {
        pattern: String,
        replacement: String,
        line: usize,
    },
}

pub(crate) fn parse(source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut line = 1usize;
    let mut i = 0usize;

    while i < source.len() {
        let rest = &source[i..];

        if rest.starts_with("{{") {
            text.push('{');
            i += 2;
        } else if rest.starts_with("}}") {
            text.push('}');
            i += 2;
        } else if rest.starts_with('{') {
            let name = scan_subst_name(&source[i + 1..], line)?;
            flush_text(&mut segments, &mut text);
            i += 1 + name.len() + 1;
            segments.push(Segment::Subst { name, line });
        } else if rest.starts_with(".inc(") {
            let open_line = line;
            let args_start = i + ".inc(".len();
            let (close, newlines) = scan_parens(source, args_start, open_line, "'.inc('")?;
            let name = parse_include_args(&source[args_start..close], open_line)?;
            flush_text(&mut segments, &mut text);
            segments.push(Segment::Include {
                name,
                line: open_line,
            });
            line += newlines;
            i = close + 1;
        } else if rest.starts_with(".sub(") {
            let open_line = line;
            let args_start = i + ".sub(".len();
            let (close, newlines) = scan_parens(source, args_start, open_line, "'.sub('")?;
            let (pattern, replacement) =
                parse_rewrite_args(&source[args_start..close], open_line)?;
            flush_text(&mut segments, &mut text);
            segments.push(Segment::Rewrite {
                pattern,
                replacement,
                line: open_line,
            });
            line += newlines;
            i = close + 1;
            (i, line) = swallow_newline(source, i, line);
        } else if rest.starts_with(".(") {
            let open_line = line;
            let body_start = i + 2;
            let (end, newlines) = scan_block_end(source, body_start, open_line)?;
            flush_text(&mut segments, &mut text);
            segments.push(Segment::Script {
                body: source[body_start..end].to_string(),
                line: open_line,
            });
            line += newlines;
            i = end + 2;
            (i, line) = swallow_newline(source, i, line);
        } else {
            let Some(c) = rest.chars().next() else { break };
            if c == '\n' {
                line += 1;
            }
            text.push(c);
            i += c.len_utf8();
        }
    }

    flush_text(&mut segments, &mut text);
    Ok(segments)
}

fn flush_text(segments: &mut Vec<Segment>, text: &mut String) {
    if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(text)));
    }
}

/// One newline directly after `.)` or `.sub(...)` belongs to the markup
fn swallow_newline(source: &str, i: usize, line: usize) -> (usize, usize) {
    if source[i..].starts_with("\r\n") {
        (i + 2, line + 1)
    } else if source[i..].starts_with('\n') {
        (i + 1, line + 1)
    } else {
        (i, line)
    }
}

fn is_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Scan the name of a `{name}` substitution; `after` starts past the `{`
fn scan_subst_name(after: &str, line: usize) -> Result<String, TemplateError> {
    let name_len = after
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(after.len());
    let name = &after[..name_len];
    if is_ident(name) && after[name_len..].starts_with('}') {
        Ok(name.to_string())
    } else {
        Err(TemplateError::Malformed {
            message: "expected '{name}' substitution after '{' (use '{{' for a literal brace)"
                .to_string(),
            line,
        })
    }
}

/// Find the `)` closing a directive, skipping over string literals
///
/// `start` is the byte just past the `(`. Returns the index of the
/// closing paren and the number of newlines crossed.
fn scan_parens(
    source: &str,
    start: usize,
    line: usize,
    what: &str,
) -> Result<(usize, usize), TemplateError> {
    let mut in_string = false;
    let mut escaped = false;
    let mut newlines = 0usize;

    for (off, c) in source[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else {
                match c {
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
            }
            if c == '\n' {
                newlines += 1;
            }
        } else {
            match c {
                '"' => in_string = true,
                '\n' => newlines += 1,
                ')' => return Ok((start + off, newlines)),
                _ => {}
            }
        }
    }

    Err(TemplateError::Malformed {
        message: format!("unclosed {} directive", what),
        line,
    })
}

/// Find the `.)` closing a script block, skipping string literals and
/// `#` comments in the body
fn scan_block_end(
    source: &str,
    start: usize,
    open_line: usize,
) -> Result<(usize, usize), TemplateError> {
    let bytes = source.as_bytes();
    let mut in_string = false;
    let mut in_comment = false;
    let mut escaped = false;
    let mut newlines = 0usize;

    for (off, c) in source[start..].char_indices() {
        let at = start + off;
        if c == '\n' {
            newlines += 1;
            in_comment = false;
            if in_string {
                // The script lexer rejects this; just keep scanning.
                in_string = false;
            }
            escaped = false;
            continue;
        }
        if in_comment {
            continue;
        }
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '#' => in_comment = true,
            '.' if bytes.get(at + 1) == Some(&b')') => return Ok((at, newlines)),
            _ => {}
        }
    }

    Err(TemplateError::Malformed {
        message: "unclosed script block".to_string(),
        line: open_line,
    })
}

fn parse_include_args(args: &str, line: usize) -> Result<String, TemplateError> {
    let tokens = lex_args(args, line)?;
    match tokens.as_slice() {
        [Token {
            kind: TokenKind::Str(name),
            ..
        }] if !name.is_empty() => Ok(name.clone()),
        _ => Err(TemplateError::Malformed {
            message: "expected .inc(\"name\") with a non-empty name".to_string(),
            line,
        }),
    }
}

fn parse_rewrite_args(args: &str, line: usize) -> Result<(String, String), TemplateError> {
    let tokens = lex_args(args, line)?;
    match tokens.as_slice() {
        [Token {
            kind: TokenKind::Str(pattern),
            ..
        }, Token {
            kind: TokenKind::Comma,
            ..
        }, Token {
            kind: TokenKind::Str(replacement),
            ..
        }] if !pattern.is_empty() => Ok((pattern.clone(), replacement.clone())),
        _ => Err(TemplateError::Malformed {
            message: "expected .sub(\"pattern\", \"replacement\") with a non-empty pattern"
                .to_string(),
            line,
        }),
    }
}

fn lex_args(args: &str, line: usize) -> Result<Vec<Token>, TemplateError> {
    tokenize(args).map_err(|e| TemplateError::Malformed {
        message: e.message,
        line,
    })
}
