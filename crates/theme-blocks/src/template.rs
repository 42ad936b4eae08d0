//! Schema template loading, validation and rendering.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use theme_fs::{NormalizedPath, io};

use crate::error::{Error, Result};
use crate::matcher::MatchKind;

/// Extension of schema template files.
pub const TEMPLATE_EXTENSION: &str = ".json";

/// Placeholder written over timestamps by [`mask_timestamps`].
pub const TIMESTAMP_MASK: &str = "<timestamp>";

/// Matches the import timestamp line of current and legacy block headers.
static TIMESTAMP_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([ \t]*\*?[ \t]*Last (?:imported|updated)) .*$")
        .expect("Invalid timestamp line regex")
});

/// Append `.json` to a template name unless it already ends with it.
pub fn template_file_name(name: &str) -> String {
    if name.ends_with(TEMPLATE_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{TEMPLATE_EXTENSION}")
    }
}

/// The current local time as written into block headers.
pub fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Replace every import timestamp with [`TIMESTAMP_MASK`].
///
/// Two renderings of the same template differ only in this line, so
/// comparing masked text tells whether a document really changed.
pub fn mask_timestamps(text: &str) -> Cow<'_, str> {
    TIMESTAMP_LINE_REGEX.replace_all(text, format!("${{1}} {TIMESTAMP_MASK}"))
}

/// A validated schema template: a named JSON array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaTemplate {
    name: String,
    elements: String,
}

impl SchemaTemplate {
    /// Validate raw template contents.
    ///
    /// The trimmed contents must start with `[` and end with `]`. With
    /// `strict`, they must also parse as a JSON array.
    ///
    /// # Errors
    /// - `Error::EmptyTemplate` if the contents are blank
    /// - `Error::MalformedTemplate` if they are not array-shaped
    /// - `Error::InvalidTemplateJson` if `strict` and the JSON does not parse
    pub fn parse(name: &str, contents: &str, strict: bool) -> Result<Self> {
        let name = template_file_name(name);
        let trimmed = contents.trim();

        if trimmed.is_empty() {
            return Err(Error::EmptyTemplate { name });
        }

        if !trimmed.starts_with('[') || !trimmed.ends_with(']') {
            return Err(Error::MalformedTemplate { name });
        }

        if strict {
            match serde_json::from_str::<serde_json::Value>(trimmed) {
                Ok(value) if value.is_array() => {}
                Ok(_) => return Err(Error::MalformedTemplate { name }),
                Err(e) => {
                    return Err(Error::InvalidTemplateJson {
                        name,
                        message: e.to_string(),
                    });
                }
            }
        }

        let elements = trimmed[1..trimmed.len() - 1].trim().to_string();
        Ok(Self { name, elements })
    }

    /// Read and validate `<name>.json` from `schema_dir`.
    ///
    /// The file is read fresh on every call. Names containing a path
    /// separator are rejected so a declaration cannot reach outside
    /// `schema_dir`.
    pub fn load(schema_dir: &NormalizedPath, name: &str, strict: bool) -> Result<Self> {
        let file_name = template_file_name(name);
        if file_name.contains(['/', '\\']) {
            return Err(Error::InvalidTemplateName { name: file_name });
        }
        let path = schema_dir.join(&file_name);

        if !path.is_file() {
            return Err(Error::MissingTemplate {
                name: file_name,
                path: path.to_native(),
            });
        }

        let contents = io::read_text(&path)?;
        Self::parse(&file_name, &contents, strict)
    }

    /// Template file name, always ending in `.json`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the commented, timestamped block.
    ///
    /// An empty array renders no element line, so no stray comma is left
    /// behind for the JSON formatter to reject.
    pub fn render_block(&self, imported_at: &str) -> String {
        let body = if self.elements.is_empty() {
            String::new()
        } else {
            format!("{},\n", self.elements)
        };

        format!(
            "/**\n \
             * TEMPLATE START: {name}\n \
             * Last imported {imported_at}\n \
             * The following settings were auto-imported from a schema template.\n \
             * Please do not remove this comment or modify the following settings.\n \
             */\n\
             {body}\
             /**\n \
             * TEMPLATE END\n \
             */",
            name = self.name,
        )
    }

    /// Render the text that replaces a match of the given kind.
    ///
    /// A declaration sits inline, so the block goes on its own lines. An
    /// existing block is replaced exactly, which keeps repeated imports from
    /// accumulating blank lines.
    pub fn render_replacement(&self, kind: MatchKind, imported_at: &str) -> String {
        let block = self.render_block(imported_at);
        match kind {
            MatchKind::Declaration => format!("\n{block}\n"),
            MatchKind::InjectedBlock => block,
        }
    }
}

/// Render raw template contents into an injectable block stamped with the
/// current time.
///
/// Only the array shape is checked here; callers wanting full JSON
/// validation use [`SchemaTemplate::parse`] with `strict`.
pub fn render(name: &str, contents: &str) -> Result<String> {
    let template = SchemaTemplate::parse(name, contents, false)?;
    Ok(template.render_block(&timestamp()))
}
