//! Schema template matching and rendering.
//!
//! Section documents reference reusable schema templates in two ways:
//!
//! ## 1. Declarations
//!
//! A short placeholder naming the template to import:
//!
//! ```text
//! {"@": "product-settings"},
//! { "schema": "product-settings" }
//! ```
//!
//! ## 2. Injected blocks
//!
//! The delimited, timestamped region produced when a declaration is
//! expanded. Re-running the import refreshes the region in place:
//!
//! ```text
//! /**
//!  * TEMPLATE START: product-settings.json
//!  * Last imported 2024-05-01 10:00:00
//!  * ...
//!  */
//! {"type": "text", "id": "title"},
//! /**
//!  * TEMPLATE END
//!  */
//! ```
//!
//! The [`matcher`] module finds both kinds of reference and splices
//! replacements; the [`template`] module loads, validates and renders
//! templates. Nothing in [`matcher`] touches the filesystem.

pub mod error;
pub mod matcher;
pub mod template;

pub use error::{Error, Result};
pub use matcher::{
    DeclarationSyntax, MatchKind, TemplateMatch, find_all, find_declarations,
    find_injected_blocks, references_template, replace_matches,
};
pub use template::{SchemaTemplate, mask_timestamps, render, template_file_name, timestamp};
