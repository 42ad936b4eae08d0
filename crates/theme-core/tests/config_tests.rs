//! Tests for configuration loading and resolution

use std::time::Duration;

use theme_blocks::DeclarationSyntax;
use theme_core::{CONFIG_FILE, Config, Error};
use theme_fs::NormalizedPath;
use theme_test_utils::ThemeFixture;

fn root(theme: &ThemeFixture) -> NormalizedPath {
    NormalizedPath::new(theme.root())
}

#[test]
fn test_load_without_file_uses_defaults() {
    let theme = ThemeFixture::new();
    let config = Config::load(&root(&theme)).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_reads_config_file() {
    let theme = ThemeFixture::new();
    theme.write_config(
        r#"
json_tab_width = 2
cooldown_ms = 250
declaration_syntaxes = ["at", "percent"]
section_extensions = ["liquid", "html"]
"#,
    );

    let resolved = Config::load(&root(&theme)).unwrap().resolve(&root(&theme)).unwrap();

    assert_eq!(resolved.json_tab_width, 2);
    assert_eq!(resolved.cooldown, Duration::from_millis(250));
    assert_eq!(
        resolved.declaration_syntaxes,
        vec![DeclarationSyntax::At, DeclarationSyntax::Percent]
    );
    assert_eq!(resolved.section_extensions, vec!["liquid", "html"]);
    assert!(resolved.schema_dir.as_str().ends_with("/schema"));
    assert!(resolved.sections_dir.as_str().ends_with("/sections"));
}

#[test]
fn test_invalid_config_reports_path() {
    let theme = ThemeFixture::new();
    theme.write_config("json_tab_width = \"four\"");

    let err = Config::load(&root(&theme)).unwrap_err();
    match err {
        Error::ConfigParse { path, .. } => assert!(path.ends_with(CONFIG_FILE)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_resolve_missing_sections_dir() {
    let theme = ThemeFixture::empty();
    theme.write("schema/demo.json", "[]");

    let err = Config::default().resolve(&root(&theme)).unwrap_err();
    assert!(matches!(err, Error::MissingDirectory { kind: "sections", .. }));
}

#[test]
fn test_absolute_directories_are_kept() {
    let theme = ThemeFixture::new();
    let elsewhere = ThemeFixture::new();
    let config = Config {
        schema_dir: elsewhere.root().join("schema").to_string_lossy().into_owned(),
        ..Config::default()
    };

    let resolved = config.resolve(&root(&theme)).unwrap();
    let expected = NormalizedPath::canonicalize(elsewhere.root().join("schema")).unwrap();
    assert_eq!(resolved.schema_dir, expected);
}
