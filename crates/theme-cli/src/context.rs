//! Theme context detection
//!
//! Commands work from anywhere inside a theme: the root is the nearest
//! ancestor holding `theme-schema.toml`, or the working directory.

use std::path::{Path, PathBuf};

use theme_core::{CONFIG_FILE, Config, SyncEngine, SyncOptions};
use theme_fs::NormalizedPath;

use crate::cli::Cli;
use crate::error::Result;

/// Command-line values that take precedence over `theme-schema.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub schema_dir: Option<String>,
    pub sections_dir: Option<String>,
    pub tab_width: Option<usize>,
}

impl Overrides {
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.schema_dir {
            config.schema_dir = dir.clone();
        }
        if let Some(dir) = &self.sections_dir {
            config.sections_dir = dir.clone();
        }
        if let Some(width) = self.tab_width {
            config.json_tab_width = width;
        }
    }
}

/// The theme a command operates on
#[derive(Debug, Clone)]
pub struct ThemeContext {
    pub root: NormalizedPath,
    pub overrides: Overrides,
}

impl ThemeContext {
    /// Build the context from parsed arguments and the working directory
    pub fn from_cli(cli: &Cli, cwd: &Path) -> Self {
        let root = match &cli.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => cwd.join(root),
            None => find_theme_root(cwd),
        };

        Self {
            root: NormalizedPath::canonicalize(&root).unwrap_or_else(|_| NormalizedPath::new(&root)),
            overrides: Overrides {
                schema_dir: cli.schema_dir.clone(),
                sections_dir: cli.sections_dir.clone(),
                tab_width: cli.tab_width,
            },
        }
    }

    /// Load `theme-schema.toml` and apply command-line overrides
    pub fn config(&self) -> Result<Config> {
        let mut config = Config::load(&self.root)?;
        self.overrides.apply(&mut config);
        Ok(config)
    }

    /// Create a sync engine for this theme
    pub fn engine(&self, options: SyncOptions) -> Result<SyncEngine> {
        let resolved = self.config()?.resolve(&self.root)?;
        Ok(SyncEngine::new(resolved)?.with_options(options))
    }

    /// Show `path` relative to the theme root when it lies inside it
    pub fn display_path<'a>(&self, path: &'a str) -> &'a str {
        path.strip_prefix(self.root.as_str())
            .and_then(|p| p.strip_prefix('/'))
            .filter(|p| !p.is_empty())
            .unwrap_or(path)
    }
}

/// Walk up from `cwd` to the nearest directory containing `theme-schema.toml`.
///
/// Falls back to `cwd` itself.
pub fn find_theme_root(cwd: &Path) -> PathBuf {
    cwd.ancestors()
        .find(|dir| dir.join(CONFIG_FILE).is_file())
        .unwrap_or(cwd)
        .to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_root_from_nested_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "").unwrap();
        let nested = temp.path().join("sections/nested");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_theme_root(&nested), temp.path());
    }

    #[test]
    fn test_find_root_falls_back_to_cwd() {
        let temp = TempDir::new().unwrap();
        assert_eq!(find_theme_root(temp.path()), temp.path());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "json_tab_width = 8\nschema_dir = \"a\"").unwrap();

        let context = ThemeContext {
            root: NormalizedPath::new(temp.path()),
            overrides: Overrides {
                schema_dir: Some("templates".into()),
                tab_width: Some(2),
                ..Overrides::default()
            },
        };
        let config = context.config().unwrap();

        assert_eq!(config.schema_dir, "templates");
        assert_eq!(config.sections_dir, "./sections");
        assert_eq!(config.json_tab_width, 2);
    }

    #[test]
    fn test_display_path_is_root_relative() {
        let context = ThemeContext {
            root: NormalizedPath::new("/themes/dawn"),
            overrides: Overrides::default(),
        };
        assert_eq!(context.display_path("/themes/dawn/sections/hero.liquid"), "sections/hero.liquid");
        assert_eq!(context.display_path("/elsewhere/hero.liquid"), "/elsewhere/hero.liquid");
    }
}
