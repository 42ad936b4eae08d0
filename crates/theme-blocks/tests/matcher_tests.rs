//! Integration tests for declaration and injected-block matching.

use pretty_assertions::assert_eq;
use rstest::rstest;
use theme_blocks::matcher::{
    DeclarationSyntax, MatchKind, find_all, find_declarations, find_injected_blocks,
    references_template, replace_matches,
};

const SECTION: &str = r#"<div>{{ section.settings.title }}</div>
{% schema %}
{
    "name": "Hero",
    "settings": [
        {"@": "colors"},
        { "schema": "typography" },
        {"type": "text", "id": "title"}
    ]
}
{% endschema %}"#;

fn block(name: &str, body: &str) -> String {
    format!("/**\n * TEMPLATE START: {name}\n * Last imported T\n */\n{body}\n/**\n * TEMPLATE END\n */")
}

#[rstest]
#[case(r#"{"@": "demo"}"#)]
#[case(r#"{"@":"demo"}"#)]
#[case(r#"{ "@" : "demo" }"#)]
#[case(r#"{ "schema": "demo" }"#)]
#[case(r#"{"schema":"demo"}"#)]
#[case("{\n    \"schema\": \"demo\"\n}")]
fn test_whitespace_tolerant_declarations(#[case] text: &str) {
    let found = find_declarations(text, &DeclarationSyntax::DEFAULT);
    assert_eq!(found.len(), 1, "no declaration found in {text:?}");
    assert_eq!(found[0].name, "demo");
    assert_eq!(found[0].kind, MatchKind::Declaration);
}

#[test]
fn test_declarations_preserve_document_order_across_syntaxes() {
    let found = find_declarations(SECTION, &DeclarationSyntax::DEFAULT);
    let names: Vec<&str> = found.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["colors", "typography"]);
}

#[test]
fn test_only_configured_syntaxes_match() {
    let found = find_declarations(SECTION, &[DeclarationSyntax::Schema]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "typography");
}

#[test]
fn test_matching_is_case_sensitive() {
    let text = r#"{"SCHEMA": "demo"}"#;
    assert!(find_declarations(text, &DeclarationSyntax::DEFAULT).is_empty());
}

#[test]
fn test_injected_blocks_filtered_by_name() {
    let text = format!("[\n{},\n{}\n]", block("a.json", "1,"), block("b.json", "2,"));

    assert_eq!(find_injected_blocks(&text, None).len(), 2);

    let only_b = find_injected_blocks(&text, Some("b"));
    assert_eq!(only_b.len(), 1);
    assert_eq!(only_b[0].name, "b.json");
    assert!(only_b[0].text(&text).contains("2,"));
    assert!(!only_b[0].text(&text).contains("1,"));
}

#[test]
fn test_legacy_block_header_is_recognized() {
    let text = "/** TEMPLATE START: old.json\n        * Last updated Mon\n        */\n        \"x\",\n        /** TEMPLATE END */\n";
    let found = find_injected_blocks(text, None);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "old.json");
    assert!(found[0].text(text).ends_with("/** TEMPLATE END */"));
}

#[test]
fn test_find_all_merges_in_order() {
    let text = format!(
        "[{}, {{\"@\": \"second\"}}, {}]",
        block("first.json", "1,"),
        block("third.json", "3,")
    );
    let found = find_all(&text, &DeclarationSyntax::DEFAULT);
    let summary: Vec<(MatchKind, &str)> = found.iter().map(|m| (m.kind, m.name.as_str())).collect();
    assert_eq!(
        summary,
        vec![
            (MatchKind::InjectedBlock, "first.json"),
            (MatchKind::Declaration, "second"),
            (MatchKind::InjectedBlock, "third.json"),
        ]
    );
}

#[test]
fn test_references_template_by_declaration_or_block() {
    let text = format!("[{{\"@\": \"pending\"}}, {}]", block("done.json", "1,"));
    assert!(references_template(&text, "pending", &DeclarationSyntax::DEFAULT));
    assert!(references_template(&text, "done.json", &DeclarationSyntax::DEFAULT));
    assert!(!references_template(&text, "other", &DeclarationSyntax::DEFAULT));
}

#[test]
fn test_replace_matches_splices_every_resolved_match() {
    let found = find_all(SECTION, &DeclarationSyntax::DEFAULT);
    let out = replace_matches(SECTION, &found, |m| Some(format!("<{}>", m.file_name())));

    assert!(out.contains("<colors.json>"));
    assert!(out.contains("<typography.json>"));
    assert!(out.contains(r#"{"type": "text", "id": "title"}"#));
    assert!(out.starts_with("<div>"));
    assert!(out.ends_with("{% endschema %}"));
}
