//! Integration tests for schema template loading and rendering.

use std::fs;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;
use theme_blocks::template::{SchemaTemplate, TIMESTAMP_MASK, mask_timestamps, render};
use theme_blocks::{Error, MatchKind, find_injected_blocks};
use theme_fs::NormalizedPath;

#[test]
fn test_render_strips_brackets_and_adds_trailing_comma() {
    let rendered = render("demo", "[\"a\",\"b\"]\n").unwrap();
    assert!(rendered.contains("TEMPLATE START: demo.json"));
    assert!(rendered.contains("\n\"a\",\"b\",\n"));
    assert!(rendered.contains("TEMPLATE END"));
}

#[test]
fn test_rendered_block_is_found_again() {
    let rendered = render("demo.json", r#"["size","color"]"#).unwrap();
    let found = find_injected_blocks(&rendered, Some("demo"));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].span, 0..rendered.len());
}

#[test]
fn test_renders_differ_only_in_timestamp() {
    let template = SchemaTemplate::parse("demo", r#"["a"]"#, true).unwrap();
    let first = template.render_block("2024-01-01 00:00:00");
    let second = template.render_block("2025-06-30 12:34:56");
    assert_ne!(first, second);
    assert_eq!(mask_timestamps(&first), mask_timestamps(&second));
    assert!(mask_timestamps(&first).contains(TIMESTAMP_MASK));
}

#[test]
fn test_declaration_replacement_is_on_its_own_lines() {
    let template = SchemaTemplate::parse("demo", r#"["a"]"#, true).unwrap();
    let decl = template.render_replacement(MatchKind::Declaration, "T");
    let block = template.render_replacement(MatchKind::InjectedBlock, "T");
    assert_eq!(decl, format!("\n{block}\n"));
}

#[rstest]
#[case("", "empty")]
#[case("   \n", "empty")]
#[case(r#"{"a":1}"#, "malformed")]
#[case(r#""just a string""#, "malformed")]
#[case(r#"["a", ]"#, "invalid")]
fn test_parse_rejects(#[case] contents: &str, #[case] expected: &str) {
    let err = SchemaTemplate::parse("demo", contents, true).unwrap_err();
    let kind = match err {
        Error::EmptyTemplate { .. } => "empty",
        Error::MalformedTemplate { .. } => "malformed",
        Error::InvalidTemplateJson { .. } => "invalid",
        other => panic!("unexpected error: {other}"),
    };
    assert_eq!(kind, expected);
}

#[test]
fn test_lenient_parse_accepts_array_shaped_text() {
    let template = SchemaTemplate::parse("demo", "[a b]", false).unwrap();
    assert!(template.render_block("T").contains("\na b,\n/**"));
}

#[test]
fn test_load_reads_template_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("demo.json"), "[\n    \"x\"\n]\n").unwrap();

    let dir = NormalizedPath::new(temp.path());
    let template = SchemaTemplate::load(&dir, "demo", true).unwrap();
    assert_eq!(template.name(), "demo.json");
    assert!(template.render_block("T").contains("\n\"x\",\n/**"));
}

#[test]
fn test_load_missing_template() {
    let temp = TempDir::new().unwrap();
    let dir = NormalizedPath::new(temp.path());

    let err = SchemaTemplate::load(&dir, "ghost", true).unwrap_err();
    assert!(matches!(err, Error::MissingTemplate { ref name, .. } if name == "ghost.json"));
}

#[rstest]
#[case("../outside")]
#[case("../../etc/settings.json")]
#[case("nested/demo")]
#[case("..\\outside")]
fn test_load_rejects_names_with_separators(#[case] name: &str) {
    let temp = TempDir::new().unwrap();
    let schema = temp.path().join("schema");
    fs::create_dir(&schema).unwrap();
    fs::create_dir(schema.join("nested")).unwrap();
    fs::write(temp.path().join("outside.json"), "[\"leak\"]").unwrap();
    fs::write(schema.join("nested/demo.json"), "[\"a\"]").unwrap();

    let err = SchemaTemplate::load(&NormalizedPath::new(&schema), name, true).unwrap_err();
    assert!(matches!(err, Error::InvalidTemplateName { .. }));
}
