//! Configuration parsing for theme-schema.toml files
//!
//! Every key is optional. A theme without a config file behaves as if it
//! had an empty one: templates in `./schema`, sections in `./sections`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use theme_blocks::DeclarationSyntax;
use theme_fs::{NormalizedPath, io};

use crate::{Error, Result};

/// Name of the optional config file at the theme root.
pub const CONFIG_FILE: &str = "theme-schema.toml";

fn default_schema_dir() -> String {
    "./schema".to_string()
}

fn default_sections_dir() -> String {
    "./sections".to_string()
}

fn default_section_extensions() -> Vec<String> {
    vec!["liquid".to_string()]
}

/// Configuration as written in `theme-schema.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the schema template JSON files
    pub schema_dir: String,

    /// Directory holding the section documents
    pub sections_dir: String,

    /// Indent width used when re-formatting the embedded schema JSON
    pub json_tab_width: usize,

    /// Re-format the `{% schema %}` payload after injecting templates
    pub format_json: bool,

    /// Require templates to parse as a JSON array, not just look like one
    pub strict_json: bool,

    /// Declaration syntaxes recognized in section documents
    pub declaration_syntaxes: Vec<DeclarationSyntax>,

    /// File extensions treated as section documents
    pub section_extensions: Vec<String>,

    /// Milliseconds during which change events are ignored after a targeted sync
    pub cooldown_ms: u64,

    /// Whether full syncs also honour and start the cooldown
    pub gate_full_sync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_dir: default_schema_dir(),
            sections_dir: default_sections_dir(),
            json_tab_width: 4,
            format_json: true,
            strict_json: true,
            declaration_syntaxes: DeclarationSyntax::DEFAULT.to_vec(),
            section_extensions: default_section_extensions(),
            cooldown_ms: 500,
            gate_full_sync: false,
        }
    }
}

impl Config {
    /// Parse a config from TOML content
    ///
    /// # Example
    ///
    /// ```
    /// use theme_core::config::Config;
    ///
    /// let config = Config::parse(r#"
    /// schema_dir = "templates"
    /// json_tab_width = 2
    /// "#).unwrap();
    ///
    /// assert_eq!(config.schema_dir, "templates");
    /// assert_eq!(config.sections_dir, "./sections");
    /// assert_eq!(config.json_tab_width, 2);
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_at(content, Path::new("<content>"))
    }

    fn parse_at(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `theme-schema.toml` from `root`, falling back to defaults when absent
    pub fn load(root: &NormalizedPath) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.is_file() {
            tracing::debug!(%path, "No config file found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(%path, "Loading config");
        let content = io::read_text(&path)?;
        Self::parse_at(&content, &path.to_native())
    }

    /// Serialize to TOML, as written by `init`
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolve directories against `root` and check that they exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingDirectory` if the root, schema or sections
    /// directory does not exist. This is the only fatal startup condition.
    pub fn resolve(&self, root: &NormalizedPath) -> Result<ResolvedConfig> {
        let root = resolve_dir("theme root", root, None)?;
        let schema_dir = resolve_dir("schema", &NormalizedPath::new(&self.schema_dir), Some(&root))?;
        let sections_dir = resolve_dir(
            "sections",
            &NormalizedPath::new(&self.sections_dir),
            Some(&root),
        )?;

        Ok(ResolvedConfig {
            root,
            schema_dir,
            sections_dir,
            json_tab_width: self.json_tab_width,
            format_json: self.format_json,
            strict_json: self.strict_json,
            declaration_syntaxes: self.declaration_syntaxes.clone(),
            section_extensions: self.section_extensions.clone(),
            cooldown: Duration::from_millis(self.cooldown_ms),
            gate_full_sync: self.gate_full_sync,
        })
    }
}

fn resolve_dir(
    kind: &'static str,
    dir: &NormalizedPath,
    base: Option<&NormalizedPath>,
) -> Result<NormalizedPath> {
    let joined = match base {
        Some(base) if !dir.to_native().is_absolute() => {
            base.join(dir.as_str().trim_start_matches("./"))
        }
        _ => dir.clone(),
    };

    if !joined.is_dir() {
        return Err(Error::MissingDirectory {
            kind,
            path: joined.to_native(),
        });
    }

    Ok(NormalizedPath::canonicalize(joined.to_native())?)
}

/// Configuration with absolute, existing directories
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub root: NormalizedPath,
    pub schema_dir: NormalizedPath,
    pub sections_dir: NormalizedPath,
    pub json_tab_width: usize,
    pub format_json: bool,
    pub strict_json: bool,
    pub declaration_syntaxes: Vec<DeclarationSyntax>,
    pub section_extensions: Vec<String>,
    pub cooldown: Duration,
    pub gate_full_sync: bool,
}
