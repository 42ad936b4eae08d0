//! Sync and check command implementations

use std::path::Path;

use colored::Colorize;
use theme_core::SyncOptions;

use crate::commands::report::{print_json, print_report, summary};
use crate::context::ThemeContext;
use crate::error::{CliError, Result};

/// Run the sync command
///
/// Without `path`, runs the build-start full sync. With `path`, syncs that
/// section, or every section referencing that schema template.
pub fn run_sync(context: &ThemeContext, path: Option<&Path>, dry_run: bool, json: bool) -> Result<()> {
    if !json {
        println!(
            "{} {}Synchronizing schema templates...",
            "=>".blue().bold(),
            if dry_run { "[dry-run] " } else { "" }
        );
    }

    let mut engine = context.engine(SyncOptions { dry_run })?;
    let report = match path {
        Some(path) => engine.sync_file(path),
        None => engine.build_start(),
    };

    if json {
        print_json(&report)?;
    } else {
        print_report(&report, context);
    }

    if let Some(path) = path
        && report.sections.is_empty()
        && !report.ignored.is_empty()
    {
        return Err(CliError::user(format!(
            "{} is neither a schema template nor a section document",
            path.display()
        )));
    }

    if report.failed().next().is_some() || !report.errors.is_empty() {
        return Err(CliError::user(format!(
            "Synchronization failed: {}",
            summary(&report)
        )));
    }

    if !json {
        println!("{} {}", "OK".green().bold(), summary(&report));
    }
    Ok(())
}

/// Run the check command
///
/// A dry-run full sync. Fails if any section is out of date or cannot be
/// processed.
pub fn run_check(context: &ThemeContext, json: bool) -> Result<()> {
    if !json {
        println!("{} Checking sections...", "=>".blue().bold());
    }

    let mut engine = context.engine(SyncOptions { dry_run: true })?;
    let report = engine.sync_all();

    if json {
        print_json(&report)?;
    } else {
        print_report(&report, context);
    }

    if report.is_clean() {
        if !json {
            println!("{} All sections are up to date.", "OK".green().bold());
        }
        return Ok(());
    }

    if !json {
        println!();
        println!("Run {} to update.", "theme-schema sync".cyan());
    }
    Err(CliError::user(format!(
        "Sections are out of date: {}",
        summary(&report)
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Overrides;
    use theme_fs::NormalizedPath;
    use theme_test_utils::ThemeFixture;

    fn context(theme: &ThemeFixture) -> ThemeContext {
        ThemeContext {
            root: NormalizedPath::new(theme.root()),
            overrides: Overrides::default(),
        }
    }

    #[test]
    fn test_check_fails_until_synced() {
        let theme = ThemeFixture::new();
        theme.write_schema("demo.json", r#"["a"]"#);
        theme.write_section("hero.liquid", r#"{% schema %}[{"@": "demo"}]{% endschema %}"#);
        let context = context(&theme);

        assert!(run_check(&context, false).is_err());
        run_sync(&context, None, false, false).unwrap();
        assert!(run_check(&context, false).is_ok());
    }

    #[test]
    fn test_sync_rejects_unrelated_path() {
        let theme = ThemeFixture::new();
        let readme = theme.write("README.md", "# theme");

        let err = run_sync(&context(&theme), Some(&readme), false, false).unwrap_err();
        assert!(err.to_string().contains("neither a schema template nor a section"));
    }

    #[test]
    fn test_sync_missing_sections_dir_is_an_error() {
        let theme = ThemeFixture::empty();
        theme.write("schema/demo.json", "[]");

        let err = run_sync(&context(&theme), None, false, false).unwrap_err();
        assert!(matches!(err, CliError::Core(_)));
    }
}
