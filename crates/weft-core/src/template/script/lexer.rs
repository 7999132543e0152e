//! Token scanner for script source
//!
//! Also used by the segment parser to pick apart directive arguments,
//! so string literal syntax is identical in `.( ... .)` bodies and in
//! `.inc(...)` / `.sub(...)`.

use std::iter::Peekable;
use std::str::Chars;

use super::ScriptError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Int(i64),
    Str(String),
    Plus,
    Minus,
    Star,
    Slash,
    Assign,
    LParen,
    RParen,
    Comma,
    /// Newline or `;`
    Separator,
}

impl TokenKind {
    /// Short description for parse error messages
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::Int(_) => "integer",
            TokenKind::Str(_) => "string",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Assign => "'='",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Separator => "end of statement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based line within the scanned source
    pub line: usize,
}

/// Scan script source into tokens
///
/// Lines are counted from 1 relative to the start of `source`; callers
/// embedding scripts in a larger document offset them afterwards.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ScriptError> {
    let mut tokens = Vec::new();
    let mut chars = source.chars().peekable();
    let mut line = 1usize;

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\r' => {
                chars.next();
            }
            '\n' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::Separator,
                    line,
                });
                line += 1;
            }
            ';' => {
                chars.next();
                tokens.push(Token {
                    kind: TokenKind::Separator,
                    line,
                });
            }
            '#' => {
                while chars.peek().is_some_and(|&c| c != '\n') {
                    chars.next();
                }
            }
            '"' => {
                let text = scan_string(&mut chars, line)?;
                tokens.push(Token {
                    kind: TokenKind::Str(text),
                    line,
                });
            }
            c if c.is_ascii_digit() => {
                let value = scan_int(&mut chars, line)?;
                tokens.push(Token {
                    kind: TokenKind::Int(value),
                    line,
                });
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let name = scan_ident(&mut chars);
                tokens.push(Token {
                    kind: TokenKind::Ident(name),
                    line,
                });
            }
            c => {
                let kind = match c {
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '*' => TokenKind::Star,
                    '/' => TokenKind::Slash,
                    '=' => TokenKind::Assign,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    ',' => TokenKind::Comma,
                    other => {
                        return Err(ScriptError::new(
                            format!("unexpected character '{}'", other),
                            line,
                        ));
                    }
                };
                chars.next();
                tokens.push(Token { kind, line });
            }
        }
    }

    Ok(tokens)
}

fn scan_string(chars: &mut Peekable<Chars<'_>>, line: usize) -> Result<String, ScriptError> {
    chars.next(); // opening quote
    let mut text = String::new();
    loop {
        match chars.next() {
            None | Some('\n') => {
                return Err(ScriptError::new("unterminated string literal", line));
            }
            Some('"') => return Ok(text),
            Some('\\') => match chars.next() {
                Some('\\') => text.push('\\'),
                Some('"') => text.push('"'),
                Some('n') => text.push('\n'),
                Some('t') => text.push('\t'),
                Some(other) => {
                    return Err(ScriptError::new(
                        format!("unknown escape '\\{}'", other),
                        line,
                    ));
                }
                None => {
                    return Err(ScriptError::new("unterminated string literal", line));
                }
            },
            Some(c) => text.push(c),
        }
    }
}

fn scan_int(chars: &mut Peekable<Chars<'_>>, line: usize) -> Result<i64, ScriptError> {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
        .parse()
        .map_err(|_| ScriptError::new(format!("integer literal '{}' too large", digits), line))
}

fn scan_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_alphanumeric() && c != '_' {
            break;
        }
        name.push(c);
        chars.next();
    }
    name
}
