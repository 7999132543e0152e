//! Recursive-descent parser for script statements
//!
//! ```text
//! program   := { sep } [ statement { sep { sep } statement } ] { sep }
//! statement := IDENT '=' expr
//!            | expr
//! expr      := term { ('+' | '-') term }
//! term      := factor { ('*' | '/') factor }
//! factor    := '-' factor
//!            | INT | STR | IDENT
//!            | IDENT '(' [ expr { ',' expr } ] ')'
//!            | '(' expr ')'
//! ```

use super::ast::{BinOp, Expr, ExprKind, Stmt};
use super::lexer::{Token, TokenKind};
use super::ScriptError;

pub fn parse(tokens: &[Token]) -> Result<Vec<Stmt>, ScriptError> {
    Parser { tokens, pos: 0 }.program()
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn program(&mut self) -> Result<Vec<Stmt>, ScriptError> {
        let mut stmts = Vec::new();
        loop {
            self.skip_separators();
            if self.at_end() {
                return Ok(stmts);
            }
            stmts.push(self.statement()?);
            match self.peek() {
                None => {}
                Some(tok) if tok.kind == TokenKind::Separator => {}
                Some(tok) => {
                    return Err(ScriptError::new(
                        format!(
                            "expected newline or ';' after statement, found {}",
                            tok.kind.describe()
                        ),
                        tok.line,
                    ));
                }
            }
        }
    }

    fn statement(&mut self) -> Result<Stmt, ScriptError> {
        if let (Some(first), Some(second)) = (self.peek(), self.peek_at(1)) {
            if let TokenKind::Ident(name) = &first.kind {
                if second.kind == TokenKind::Assign {
                    let name = name.clone();
                    let line = first.line;
                    self.pos += 2;
                    let expr = self.expr()?;
                    return Ok(Stmt::Assign { name, expr, line });
                }
            }
        }
        Ok(Stmt::Expr(self.expr()?))
    }

    fn expr(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.term()?;
        while let Some(tok) = self.peek() {
            let op = match tok.kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let line = tok.line;
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr {
                kind: ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                line,
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, ScriptError> {
        let mut lhs = self.factor()?;
        while let Some(tok) = self.peek() {
            let op = match tok.kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            let line = tok.line;
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = Expr {
                kind: ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                line,
            };
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr, ScriptError> {
        let Some(tok) = self.peek() else {
            return Err(ScriptError::new(
                "unexpected end of script",
                self.last_line(),
            ));
        };
        let line = tok.line;

        match &tok.kind {
            TokenKind::Minus => {
                self.pos += 1;
                let operand = self.factor()?;
                Ok(Expr {
                    kind: ExprKind::Neg(Box::new(operand)),
                    line,
                })
            }
            TokenKind::Int(value) => {
                let value = *value;
                self.pos += 1;
                Ok(Expr {
                    kind: ExprKind::Int(value),
                    line,
                })
            }
            TokenKind::Str(text) => {
                let text = text.clone();
                self.pos += 1;
                Ok(Expr {
                    kind: ExprKind::Str(text),
                    line,
                })
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.pos += 1;
                if self.peek_kind() == Some(&TokenKind::LParen) {
                    self.pos += 1;
                    let args = self.call_args()?;
                    Ok(Expr {
                        kind: ExprKind::Call { name, args },
                        line,
                    })
                } else {
                    Ok(Expr {
                        kind: ExprKind::Var(name),
                        line,
                    })
                }
            }
            TokenKind::LParen => {
                self.pos += 1;
                let inner = self.expr()?;
                self.expect_rparen()?;
                Ok(inner)
            }
            other => Err(ScriptError::new(
                format!("expected expression, found {}", other.describe()),
                line,
            )),
        }
    }

    fn call_args(&mut self) -> Result<Vec<Expr>, ScriptError> {
        let mut args = Vec::new();
        if self.peek_kind() == Some(&TokenKind::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.peek_kind() {
                Some(TokenKind::Comma) => {
                    self.pos += 1;
                }
                _ => {
                    self.expect_rparen()?;
                    return Ok(args);
                }
            }
        }
    }

    fn expect_rparen(&mut self) -> Result<(), ScriptError> {
        match self.peek() {
            Some(tok) if tok.kind == TokenKind::RParen => {
                self.pos += 1;
                Ok(())
            }
            Some(tok) => Err(ScriptError::new(
                format!("expected ')', found {}", tok.kind.describe()),
                tok.line,
            )),
            None => Err(ScriptError::new("expected ')'", self.last_line())),
        }
    }

    fn skip_separators(&mut self) {
        while self.peek_kind() == Some(&TokenKind::Separator) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn last_line(&self) -> usize {
        self.tokens.last().map_or(1, |t| t.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::script::tokenize;

    fn parse_source(source: &str) -> Result<Vec<Stmt>, ScriptError> {
        parse(&tokenize(source)?)
    }

    #[test]
    fn test_parse_assignment() {
        let stmts = parse_source("x = 1").unwrap();
        assert_eq!(stmts.len(), 1);
        match &stmts[0] {
            Stmt::Assign { name, line, .. } => {
                assert_eq!(name, "x");
                assert_eq!(*line, 1);
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_precedence() {
        let stmts = parse_source("1 + 2 * 3").unwrap();
        let Stmt::Expr(expr) = &stmts[0] else {
            panic!("Expected bare expression");
        };
        // The multiplication must nest under the addition.
        match &expr.kind {
            ExprKind::Binary { op: BinOp::Add, rhs, .. } => match &rhs.kind {
                ExprKind::Binary { op: BinOp::Mul, .. } => {}
                other => panic!("Expected multiplication on the right, got {:?}", other),
            },
            other => panic!("Expected addition at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_parenthesized_expression() {
        let stmts = parse_source("(1 + 2) * 3").unwrap();
        let Stmt::Expr(expr) = &stmts[0] else {
            panic!("Expected bare expression");
        };
        match &expr.kind {
            ExprKind::Binary { op: BinOp::Mul, lhs, .. } => match &lhs.kind {
                ExprKind::Binary { op: BinOp::Add, .. } => {}
                other => panic!("Expected addition on the left, got {:?}", other),
            },
            other => panic!("Expected multiplication at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_call_with_nested_expression() {
        let stmts = parse_source(r#"repeat("a", 1 + 2)"#).unwrap();
        let Stmt::Expr(expr) = &stmts[0] else {
            panic!("Expected bare expression");
        };
        match &expr.kind {
            ExprKind::Call { name, args } => {
                assert_eq!(name, "repeat");
                assert_eq!(args.len(), 2);
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_statements_split_on_newline_and_semicolon() {
        let stmts = parse_source("a = 1; b = 2\nc = 3").unwrap();
        assert_eq!(stmts.len(), 3);
    }

    #[test]
    fn test_parse_missing_close_paren() {
        let err = parse_source("x = (1 + 2").unwrap_err();
        assert!(err.message.contains("')'"));
    }

    #[test]
    fn test_parse_two_statements_on_one_line_without_separator() {
        let err = parse_source("a = 1 b = 2").unwrap_err();
        assert!(err.message.contains("expected newline or ';'"));
    }

    #[test]
    fn test_parse_dangling_operator() {
        let err = parse_source("x = 1 +").unwrap_err();
        assert!(err.message.contains("unexpected end"));
    }
}
