//! `.sub` rewrite directives

use super::helpers::render_str;
use crate::template::engine::render;
use crate::template::resolve::MemoryResolver;

#[test]
fn test_rewrite_applies_to_output_after_directive() {
    let out = render_str("before\n.sub(\"cat\", \"dog\")\ncat and cat").unwrap();
    assert_eq!(out, "before\ndog and dog");
}

#[test]
fn test_output_before_directive_is_untouched() {
    let out = render_str("cat\n.sub(\"cat\", \"dog\")\ncat").unwrap();
    assert_eq!(out, "cat\ndog");
}

#[test]
fn test_rewrite_applies_to_substituted_values() {
    let out = render_str(".sub(\"top\", \"TOP\")\n.( t = \"on top\" .)\n{t}").unwrap();
    assert_eq!(out, "on TOP");
}

#[test]
fn test_rewrites_stack_in_registration_order() {
    let out = render_str(".sub(\"a\", \"b\")\n.sub(\"b\", \"c\")\naba").unwrap();
    // First a->b turns "aba" into "bbb", then b->c turns it into "ccc".
    assert_eq!(out, "ccc");
}

#[test]
fn test_rewrite_reaches_into_includes() {
    let mut r = MemoryResolver::new();
    r.insert("part", "cat section");
    let out = render(".sub(\"cat\", \"dog\")\n.inc(\"part\")", &r).unwrap();
    assert_eq!(out, "dog section");
}

#[test]
fn test_rewrite_registered_inside_include_persists() {
    let mut r = MemoryResolver::new();
    r.insert("rules", ".sub(\"x\", \"y\")");
    let out = render(".inc(\"rules\")x marks", &r).unwrap();
    assert_eq!(out, "y marks");
}

#[test]
fn test_rewrite_with_empty_replacement_deletes() {
    let out = render_str(".sub(\"~\", \"\")\na~b~c").unwrap();
    assert_eq!(out, "abc");
}

#[test]
fn test_rewrite_swallows_its_trailing_newline_only() {
    let out = render_str(".sub(\"q\", \"Q\")\n\nqq").unwrap();
    assert_eq!(out, "\nQQ");
}
