//! Error taxonomy and line reporting

use super::helpers::render_str;
use crate::template::engine::render;
use crate::template::error::TemplateError;
use crate::template::resolve::MemoryResolver;

#[test]
fn test_undefined_variable_names_the_variable_and_line() {
    match render_str("line one\n{missing}") {
        Err(TemplateError::UndefinedVariable { name, line }) => {
            assert_eq!(name, "missing");
            assert_eq!(line, 2);
        }
        other => panic!("Expected UndefinedVariable, got {:?}", other),
    }
}

#[test]
fn test_script_error_maps_to_document_line() {
    // The failing statement is the second line of a block opening on
    // document line 2.
    match render_str("title\n.( a = 1\nb = nope .)") {
        Err(TemplateError::Script { message, line }) => {
            assert!(message.contains("'nope'"));
            assert_eq!(line, 3);
        }
        other => panic!("Expected Script, got {:?}", other),
    }
}

#[test]
fn test_division_by_zero_reports_block_line() {
    match render_str("\n.( 1 / 0 .)") {
        Err(TemplateError::Script { message, line }) => {
            assert!(message.contains("division by zero"));
            assert_eq!(line, 2);
        }
        other => panic!("Expected Script, got {:?}", other),
    }
}

#[test]
fn test_unresolved_include_carries_resolver_reason() {
    match render_str(".inc(\"ghost\")") {
        Err(TemplateError::UnresolvedInclude { name, line, reason }) => {
            assert_eq!(name, "ghost");
            assert_eq!(line, 1);
            assert!(reason.contains("no document"));
        }
        other => panic!("Expected UnresolvedInclude, got {:?}", other),
    }
}

#[test]
fn test_direct_include_cycle_is_detected() {
    let mut r = MemoryResolver::new();
    r.insert("a", ".inc(\"a\")");
    match render(".inc(\"a\")", &r) {
        Err(TemplateError::CircularInclude { name, chain, .. }) => {
            assert_eq!(name, "a");
            assert_eq!(chain, "a -> a");
        }
        other => panic!("Expected CircularInclude, got {:?}", other),
    }
}

#[test]
fn test_indirect_include_cycle_reports_chain() {
    let mut r = MemoryResolver::new();
    r.insert("a", ".inc(\"b\")");
    r.insert("b", ".inc(\"a\")");
    match render(".inc(\"a\")", &r) {
        Err(TemplateError::CircularInclude { name, chain, .. }) => {
            assert_eq!(name, "a");
            assert_eq!(chain, "a -> b -> a");
        }
        other => panic!("Expected CircularInclude, got {:?}", other),
    }
}

#[test]
fn test_failure_inside_include_is_wrapped_with_its_location() {
    let mut r = MemoryResolver::new();
    r.insert("part", "ok\n{absent}");
    match render("intro\n.inc(\"part\")", &r) {
        Err(TemplateError::IncludeRender { name, line, source }) => {
            assert_eq!(name, "part");
            assert_eq!(line, 2);
            match *source {
                TemplateError::UndefinedVariable { ref name, line } => {
                    assert_eq!(name, "absent");
                    assert_eq!(line, 2);
                }
                ref other => panic!("Expected inner UndefinedVariable, got {:?}", other),
            }
        }
        other => panic!("Expected IncludeRender, got {:?}", other),
    }
}

#[test]
fn test_include_depth_is_capped() {
    // A 100-link chain with distinct names trips the depth guard
    // rather than the cycle detector.
    let mut r = MemoryResolver::new();
    for i in 0..100 {
        r.insert(format!("d{}", i), format!(".inc(\"d{}\")", i + 1));
    }
    let err = render(".inc(\"d0\")", &r).unwrap_err();
    assert!(err.to_string().contains("include depth exceeds"));
}

#[test]
fn test_unclosed_substitution_is_malformed() {
    match render_str("a\nb{oops") {
        Err(TemplateError::Malformed { line, .. }) => assert_eq!(line, 2),
        other => panic!("Expected Malformed, got {:?}", other),
    }
}

#[test]
fn test_error_display_includes_line() {
    let err = render_str("{gone}").unwrap_err();
    let text = err.to_string();
    assert!(text.contains("gone"));
    assert!(text.contains("line 1"));
}

#[test]
fn test_line_accessor_matches_variant_line() {
    let err = render_str("\n\n{gone}").unwrap_err();
    assert_eq!(err.line(), 3);
}
