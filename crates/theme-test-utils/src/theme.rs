//! [`ThemeFixture`] builder for sync scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary theme directory with helper methods for test setup and
/// assertion.
///
/// # Example
///
/// ```rust,no_run
/// use theme_test_utils::ThemeFixture;
///
/// let theme = ThemeFixture::new();
/// theme.write_schema("demo.json", r#"["a","b"]"#);
/// theme.write_section("hero.liquid", r#"{% schema %}[{"@": "demo"}]{% endschema %}"#);
/// theme.assert_file_exists("sections/hero.liquid");
/// ```
pub struct ThemeFixture {
    temp_dir: TempDir,
}

impl Default for ThemeFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeFixture {
    /// Create a theme with empty `schema/` and `sections/` directories.
    pub fn new() -> Self {
        let theme = Self::empty();
        fs::create_dir_all(theme.root().join("schema")).unwrap();
        fs::create_dir_all(theme.root().join("sections")).unwrap();
        theme
    }

    /// Create an empty temporary directory.
    pub fn empty() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the theme.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn schema_path(&self, file_name: &str) -> PathBuf {
        self.root().join("schema").join(file_name)
    }

    pub fn section_path(&self, file_name: &str) -> PathBuf {
        self.root().join("sections").join(file_name)
    }

    /// Write a template into `schema/`, returning its path.
    pub fn write_schema(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.schema_path(file_name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a section document into `sections/`, returning its path.
    pub fn write_section(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.section_path(file_name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Write `theme-schema.toml` at the root.
    pub fn write_config(&self, content: &str) {
        fs::write(self.root().join("theme-schema.toml"), content).unwrap();
    }

    /// Write any file relative to the root, creating parent directories.
    pub fn write(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        full_path
    }

    /// Read a file relative to the root.
    pub fn read(&self, path: &str) -> String {
        let full_path = self.root().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    pub fn read_section(&self, file_name: &str) -> String {
        self.read(&format!("sections/{file_name}"))
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to the root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}
