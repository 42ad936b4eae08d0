//! Declaration and injected-block matching for section documents.
//!
//! Matches are plain records (kind, template name, byte span) taken from a
//! single scan of the document. Replacement is a fold over those records, so
//! splicing one match never invalidates the offsets of another.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::template::template_file_name;

/// `{"@": "<name>"}`, optionally followed by a comma.
static AT_DECLARATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\s*"@"\s*:\s*"([^"\s]+)"\s*\},?"#).expect("Invalid @ declaration regex")
});

/// `{ "schema": "<name>" }`, optionally followed by a comma.
static SCHEMA_DECLARATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\s*"schema"\s*:\s*"([^"\s]+)"\s*\},?"#)
        .expect("Invalid schema declaration regex")
});

/// `{"%schema%": "<name>"}`, optionally followed by a comma.
static PERCENT_DECLARATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\s*"%schema%"\s*:\s*"([^"\s]+)"\s*\},?"#)
        .expect("Invalid %schema% declaration regex")
});

/// A `TEMPLATE START: <name>` comment through the nearest `TEMPLATE END` comment.
///
/// The leading `*` continuation is optional so that single-line legacy
/// headers (`/** TEMPLATE START: x`) are matched too.
static INJECTED_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)/\*\*\s*(?:\*\s*)?TEMPLATE START:\s*([^\s*]+).*?/\*\*\s*(?:\*\s*)?TEMPLATE END\s*\*/",
    )
    .expect("Invalid injected block regex")
});

/// Surface syntaxes accepted for a declaration marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationSyntax {
    /// `{"@": "<name>"}`
    At,
    /// `{ "schema": "<name>" }`
    Schema,
    /// `{"%schema%": "<name>"}` (legacy)
    Percent,
}

impl DeclarationSyntax {
    /// Syntaxes accepted when nothing else is configured.
    pub const DEFAULT: [DeclarationSyntax; 2] = [DeclarationSyntax::At, DeclarationSyntax::Schema];

    fn regex(self) -> &'static Regex {
        match self {
            Self::At => &AT_DECLARATION_REGEX,
            Self::Schema => &SCHEMA_DECLARATION_REGEX,
            Self::Percent => &PERCENT_DECLARATION_REGEX,
        }
    }
}

/// What kind of reference a match is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// A placeholder that has not been expanded yet.
    Declaration,
    /// A previously generated block that can be refreshed.
    InjectedBlock,
}

/// One template reference found in a section document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMatch {
    pub kind: MatchKind,
    /// The template name exactly as written in the document.
    pub name: String,
    /// Byte range of the full matched text.
    pub span: Range<usize>,
}

impl TemplateMatch {
    /// The full matched text within `document`.
    pub fn text<'a>(&self, document: &'a str) -> &'a str {
        &document[self.span.clone()]
    }

    /// The template file name, with `.json` appended if absent.
    pub fn file_name(&self) -> String {
        template_file_name(&self.name)
    }

    fn overlaps(&self, other: &Range<usize>) -> bool {
        self.span.start < other.end && other.start < self.span.end
    }
}

/// Find every declaration marker written in one of `syntaxes`.
///
/// Results are in document order. An empty `syntaxes` slice matches nothing.
///
/// # Example
/// ```
/// use theme_blocks::matcher::{DeclarationSyntax, find_declarations};
///
/// let text = r#"[{"@": "colors"}, { "schema": "sizes" }]"#;
/// let found = find_declarations(text, &DeclarationSyntax::DEFAULT);
///
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].name, "colors");
/// assert_eq!(found[1].name, "sizes");
/// ```
pub fn find_declarations(text: &str, syntaxes: &[DeclarationSyntax]) -> Vec<TemplateMatch> {
    let unique: HashSet<DeclarationSyntax> = syntaxes.iter().copied().collect();

    let mut matches: Vec<TemplateMatch> = unique
        .into_iter()
        .flat_map(|syntax| {
            syntax.regex().captures_iter(text).filter_map(|caps| {
                let full = caps.get(0)?;
                let name = caps.get(1)?;
                Some(TemplateMatch {
                    kind: MatchKind::Declaration,
                    name: name.as_str().to_string(),
                    span: full.range(),
                })
            })
        })
        .collect();

    matches.sort_by_key(|m| m.span.start);
    matches
}

/// Find injected blocks, optionally restricted to one template.
///
/// `name` is compared after normalizing both sides to a `.json` file name,
/// so `"demo"` and `"demo.json"` select the same blocks.
///
/// # Example
/// ```
/// use theme_blocks::matcher::find_injected_blocks;
///
/// let text = "/**\n * TEMPLATE START: demo.json\n */\n\"a\",\n/**\n * TEMPLATE END\n */";
///
/// assert_eq!(find_injected_blocks(text, None).len(), 1);
/// assert_eq!(find_injected_blocks(text, Some("demo")).len(), 1);
/// assert!(find_injected_blocks(text, Some("other")).is_empty());
/// ```
pub fn find_injected_blocks(text: &str, name: Option<&str>) -> Vec<TemplateMatch> {
    let wanted = name.map(template_file_name);

    INJECTED_BLOCK_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let full = caps.get(0)?;
            let found = caps.get(1)?.as_str();
            if let Some(wanted) = &wanted
                && template_file_name(found) != *wanted
            {
                return None;
            }
            Some(TemplateMatch {
                kind: MatchKind::InjectedBlock,
                name: found.to_string(),
                span: full.range(),
            })
        })
        .collect()
}

/// Find declarations and injected blocks together, in document order.
///
/// Declarations that sit inside an injected block belong to the imported
/// template text and are not reported, so the returned spans never overlap.
pub fn find_all(text: &str, syntaxes: &[DeclarationSyntax]) -> Vec<TemplateMatch> {
    let blocks = find_injected_blocks(text, None);

    let mut matches: Vec<TemplateMatch> = find_declarations(text, syntaxes)
        .into_iter()
        .filter(|decl| !blocks.iter().any(|block| decl.overlaps(&block.span)))
        .collect();
    matches.extend(blocks);
    matches.sort_by_key(|m| m.span.start);
    matches
}

/// Check whether `text` references template `name` by declaration or block.
pub fn references_template(text: &str, name: &str, syntaxes: &[DeclarationSyntax]) -> bool {
    let wanted = template_file_name(name);
    find_all(text, syntaxes)
        .iter()
        .any(|m| m.file_name() == wanted)
}

/// Rebuild `text`, replacing each match for which `replacement` returns `Some`.
///
/// Matches for which `replacement` returns `None` keep their original text.
/// `matches` must be sorted by start offset; a match overlapping an earlier
/// one is left untouched.
///
/// # Example
/// ```
/// use theme_blocks::matcher::{DeclarationSyntax, find_declarations, replace_matches};
///
/// let text = r#"[{"@": "a"}, {"@": "b"}]"#;
/// let found = find_declarations(text, &DeclarationSyntax::DEFAULT);
/// let out = replace_matches(text, &found, |m| (m.name == "a").then(|| "X,".to_string()));
///
/// assert_eq!(out, r#"[X, {"@": "b"}]"#);
/// ```
pub fn replace_matches<F>(text: &str, matches: &[TemplateMatch], mut replacement: F) -> String
where
    F: FnMut(&TemplateMatch) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for m in matches {
        if m.span.start < cursor || m.span.end > text.len() {
            continue;
        }
        out.push_str(&text[cursor..m.span.start]);
        match replacement(m) {
            Some(new_text) => out.push_str(&new_text),
            None => out.push_str(m.text(text)),
        }
        cursor = m.span.end;
    }

    out.push_str(&text[cursor..]);
    out
}
