//! Tree-walk evaluation against the shared render scope

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};

use super::ast::{BinOp, Expr, ExprKind, Stmt};
use super::{lexer, parser, ScriptError};
use crate::template::scope::{Scope, Value};

/// Largest string a repetition may produce, in bytes
const MAX_REPEAT_BYTES: usize = 1 << 20;

/// Everything a script can see while it runs
pub struct EvalCtx<'a> {
    pub scope: &'a mut Scope,
    pub clock: &'a (dyn Fn() -> DateTime<Local> + Send + Sync),
}

/// Lex, parse, and execute a script body
///
/// Assignments write through to the scope immediately, so later
/// statements in the same body observe earlier ones. Error lines are
/// relative to the body (1-based).
pub fn run(source: &str, ctx: &mut EvalCtx<'_>) -> Result<(), ScriptError> {
    let tokens = lexer::tokenize(source)?;
    let stmts = parser::parse(&tokens)?;
    for stmt in stmts {
        match stmt {
            Stmt::Assign { name, expr, .. } => {
                let value = eval_expr(&expr, ctx)?;
                ctx.scope.set(name, value);
            }
            Stmt::Expr(expr) => {
                eval_expr(&expr, ctx)?;
            }
        }
    }
    Ok(())
}

fn eval_expr(expr: &Expr, ctx: &mut EvalCtx<'_>) -> Result<Value, ScriptError> {
    match &expr.kind {
        ExprKind::Int(value) => Ok(Value::Int(*value)),
        ExprKind::Str(text) => Ok(Value::Str(text.clone())),
        ExprKind::Var(name) => ctx.scope.get(name).cloned().ok_or_else(|| {
            ScriptError::new(format!("undefined variable '{}'", name), expr.line)
        }),
        ExprKind::Neg(operand) => match eval_expr(operand, ctx)? {
            Value::Int(v) => v
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| ScriptError::new("integer overflow", expr.line)),
            Value::Str(_) => Err(ScriptError::new("cannot negate a string", expr.line)),
        },
        ExprKind::Binary { op, lhs, rhs } => {
            let lhs = eval_expr(lhs, ctx)?;
            let rhs = eval_expr(rhs, ctx)?;
            apply_binary(*op, lhs, rhs, expr.line)
        }
        ExprKind::Call { name, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_expr(arg, ctx)?);
            }
            eval_call(name, values, expr.line, ctx)
        }
    }
}

fn apply_binary(op: BinOp, lhs: Value, rhs: Value, line: usize) -> Result<Value, ScriptError> {
    match (op, lhs, rhs) {
        (BinOp::Add, Value::Int(a), Value::Int(b)) => a
            .checked_add(b)
            .map(Value::Int)
            .ok_or_else(|| ScriptError::new("integer overflow", line)),
        (BinOp::Sub, Value::Int(a), Value::Int(b)) => a
            .checked_sub(b)
            .map(Value::Int)
            .ok_or_else(|| ScriptError::new("integer overflow", line)),
        (BinOp::Mul, Value::Int(a), Value::Int(b)) => a
            .checked_mul(b)
            .map(Value::Int)
            .ok_or_else(|| ScriptError::new("integer overflow", line)),
        (BinOp::Div, Value::Int(a), Value::Int(b)) => {
            if b == 0 {
                return Err(ScriptError::new("division by zero", line));
            }
            a.checked_div(b)
                .map(Value::Int)
                .ok_or_else(|| ScriptError::new("integer overflow", line))
        }
        (BinOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
        (BinOp::Mul, Value::Str(s), Value::Int(n))
        | (BinOp::Mul, Value::Int(n), Value::Str(s)) => repeat_str(&s, n, line).map(Value::Str),
        (op, lhs, rhs) => Err(ScriptError::new(
            format!(
                "cannot apply '{}' to {} and {}",
                op.symbol(),
                lhs.type_name(),
                rhs.type_name()
            ),
            line,
        )),
    }
}

/// Repeat a string `count` times; a count of zero or less yields ""
fn repeat_str(s: &str, count: i64, line: usize) -> Result<String, ScriptError> {
    if count <= 0 {
        return Ok(String::new());
    }
    let count = count as usize;
    let total = s.len().checked_mul(count);
    if total.is_none_or(|bytes| bytes > MAX_REPEAT_BYTES) {
        return Err(ScriptError::new(
            format!("repetition result exceeds {} bytes", MAX_REPEAT_BYTES),
            line,
        ));
    }
    Ok(s.repeat(count))
}

fn eval_call(
    name: &str,
    args: Vec<Value>,
    line: usize,
    ctx: &EvalCtx<'_>,
) -> Result<Value, ScriptError> {
    match name {
        "now" => match args.as_slice() {
            [Value::Str(fmt)] => format_now(fmt, ctx, line),
            [_] => Err(ScriptError::new("now() expects a string format", line)),
            _ => Err(ScriptError::new("now() expects 1 argument", line)),
        },
        "repeat" => match args.as_slice() {
            [Value::Str(s), Value::Int(n)] => repeat_str(s, *n, line).map(Value::Str),
            [_, _] => Err(ScriptError::new(
                "repeat() expects a string and an integer",
                line,
            )),
            _ => Err(ScriptError::new("repeat() expects 2 arguments", line)),
        },
        other => Err(ScriptError::new(
            format!("unknown function '{}'", other),
            line,
        )),
    }
}

/// Format the current time with a strftime pattern
///
/// The pattern is validated item by item first because chrono's
/// `DelayedFormat` reports bad specifiers only at write time.
fn format_now(fmt: &str, ctx: &EvalCtx<'_>, line: usize) -> Result<Value, ScriptError> {
    let items: Vec<Item<'_>> = StrftimeItems::new(fmt).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(ScriptError::new(
            format!("invalid time format '{}'", fmt),
            line,
        ));
    }
    let stamp = (ctx.clock)();
    Ok(Value::Str(
        stamp.format_with_items(items.into_iter()).to_string(),
    ))
}
