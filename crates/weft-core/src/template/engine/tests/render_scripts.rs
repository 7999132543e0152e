//! Script blocks observed through rendered output

use super::helpers::{fixed_engine, render_str};
use crate::template::resolve::MemoryResolver;

#[test]
fn test_heading_rule_sized_by_variable() {
    let source = ".( m = 4\nbar = \"=\" * m .)\n{bar}";
    assert_eq!(render_str(source).unwrap(), "====");
}

#[test]
fn test_repeat_builtin_through_render() {
    assert_eq!(
        render_str(".( pad = repeat(\"ab\", 3) .)\n[{pad}]").unwrap(),
        "[ababab]"
    );
}

#[test]
fn test_bare_expression_statement_renders_nothing() {
    assert_eq!(render_str(".( 1 + 2 .)ok").unwrap(), "ok");
}

#[test]
fn test_string_concat_with_variables() {
    let source = ".( who = \"world\"\ngreeting = \"hello \" + who .)\n{greeting}";
    assert_eq!(render_str(source).unwrap(), "hello world");
}

#[test]
fn test_now_renders_fixed_clock_date() {
    let engine = fixed_engine();
    let out = engine
        .render(
            ".( stamp = now(\"%Y-%m-%d %H:%M\") .)\nat {stamp}",
            &MemoryResolver::new(),
        )
        .unwrap();
    assert_eq!(out, "at 2024-05-04 12:30");
}

#[test]
fn test_comments_inside_blocks_are_ignored() {
    let source = ".( # width of the rule\nw = 3 .)\n{w}";
    assert_eq!(render_str(source).unwrap(), "3");
}

#[test]
fn test_block_with_only_whitespace_renders_nothing() {
    assert_eq!(render_str(".(  .)done").unwrap(), "done");
}
