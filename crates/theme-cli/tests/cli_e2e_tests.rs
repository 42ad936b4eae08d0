//! Integration tests for the theme-schema CLI binary.
//!
//! These tests exercise the compiled binary using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use theme_test_utils::ThemeFixture;

const DECLARED: &str = "<h1>{{ section.settings.title }}</h1>\n{% schema %}\n{\"name\": \"Hero\", \"settings\": [{\"@\": \"demo\"}]}\n{% endschema %}\n";

/// Get a Command for the theme-schema binary
fn theme_cmd(theme: &ThemeFixture) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("theme-schema"));
    cmd.current_dir(theme.root()).env_remove("RUST_LOG").env_remove("THEME_SCHEMA_ROOT");
    cmd
}

fn declared_theme() -> ThemeFixture {
    let theme = ThemeFixture::new();
    theme.write_schema("demo.json", r#"[{"type": "text", "id": "title"}]"#);
    theme.write_section("hero.liquid", DECLARED);
    theme
}

// ============================================================================
// Help and Version
// ============================================================================

#[test]
fn test_help_output() {
    let theme = ThemeFixture::empty();
    theme_cmd(&theme)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("schema templates"));
}

#[test]
fn test_version_output() {
    let theme = ThemeFixture::empty();
    theme_cmd(&theme)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("theme-schema"));
}

// ============================================================================
// Init
// ============================================================================

#[test]
fn test_init_creates_theme_layout() {
    let theme = ThemeFixture::empty();
    theme_cmd(&theme).arg("init").assert().success();

    theme.assert_file_exists("schema");
    theme.assert_file_exists("sections");
    theme.assert_file_contains("theme-schema.toml", "schema_dir = \"./schema\"");
}

// ============================================================================
// Sync
// ============================================================================

#[test]
fn test_sync_injects_templates() {
    let theme = declared_theme();

    theme_cmd(&theme)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("UPDATED"))
        .stdout(predicate::str::contains("sections/hero.liquid"));

    let text = theme.read_section("hero.liquid");
    assert!(text.contains("TEMPLATE START: demo.json"));
    assert!(text.contains("\"id\": \"title\""));
    assert!(text.starts_with("<h1>{{ section.settings.title }}</h1>\n{% schema %}\n{\n    \"name\": \"Hero\""));
}

#[test]
fn test_sync_twice_reports_no_changes() {
    let theme = declared_theme();
    theme_cmd(&theme).arg("sync").assert().success();
    let first = theme.read_section("hero.liquid");

    theme_cmd(&theme)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 changed"));
    assert_eq!(theme.read_section("hero.liquid"), first);
}

#[test]
fn test_sync_dry_run_does_not_write() {
    let theme = declared_theme();

    theme_cmd(&theme)
        .args(["sync", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OUTDATED"));

    assert_eq!(theme.read_section("hero.liquid"), DECLARED);
}

#[test]
fn test_sync_json_output() {
    let theme = declared_theme();

    let output = theme_cmd(&theme).args(["sync", "--json"]).output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["trigger"]["kind"], "full");
    assert_eq!(report["throttled"], false);
    assert_eq!(report["sections"][0]["status"], "updated");
}

#[test]
fn test_sync_single_schema_file() {
    let theme = declared_theme();
    let footer = "{% schema %}[{\"@\": \"other\"}]{% endschema %}";
    theme.write_schema("other.json", "[1]");
    theme.write_section("footer.liquid", footer);

    theme_cmd(&theme)
        .args(["sync", "schema/demo.json"])
        .assert()
        .success();

    theme.assert_file_contains("sections/hero.liquid", "TEMPLATE START: demo.json");
    assert_eq!(theme.read_section("footer.liquid"), footer);
}

#[test]
fn test_sync_warns_about_missing_template() {
    let theme = ThemeFixture::new();
    theme.write_section("hero.liquid", DECLARED);

    theme_cmd(&theme)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("WARN"))
        .stdout(predicate::str::contains("demo.json"));

    assert_eq!(theme.read_section("hero.liquid"), DECLARED);
}

#[test]
fn test_tab_width_override() {
    let theme = declared_theme();

    theme_cmd(&theme)
        .args(["sync", "--tab-width", "2"])
        .assert()
        .success();

    theme.assert_file_contains("sections/hero.liquid", "{\n  \"name\": \"Hero\"");
}

#[test]
fn test_sync_without_sections_dir_fails() {
    let theme = ThemeFixture::empty();
    theme.write("schema/demo.json", "[]");

    theme_cmd(&theme)
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("sections directory not found"));
}

#[test]
fn test_sync_from_nested_directory_finds_root() {
    let theme = declared_theme();
    theme.write_config("");

    theme_cmd(&theme)
        .current_dir(theme.root().join("sections"))
        .arg("sync")
        .assert()
        .success();

    theme.assert_file_contains("sections/hero.liquid", "TEMPLATE START: demo.json");
}

// ============================================================================
// Check
// ============================================================================

#[test]
fn test_check_fails_on_outdated_sections() {
    let theme = declared_theme();

    theme_cmd(&theme)
        .arg("check")
        .assert()
        .failure()
        .stdout(predicate::str::contains("OUTDATED"))
        .stderr(predicate::str::contains("out of date"));

    assert_eq!(theme.read_section("hero.liquid"), DECLARED);
}

#[test]
fn test_check_passes_after_sync() {
    let theme = declared_theme();
    theme_cmd(&theme).arg("sync").assert().success();

    theme_cmd(&theme)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}
