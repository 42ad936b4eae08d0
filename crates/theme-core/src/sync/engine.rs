//! SyncEngine implementation
//!
//! The SyncEngine keeps section documents in step with the schema templates
//! they reference. Per section, a sync:
//!
//! 1. reads the current text
//! 2. expands declarations and refreshes injected blocks in one splice
//! 3. re-formats the `{% schema %}` JSON when anything was spliced
//! 4. writes only if more than the import timestamps changed
//!
//! Per-template and per-file problems are logged and recorded in the
//! report; they never abort sibling templates or sibling files.

use std::path::Path;
use std::time::Instant;

use theme_blocks::{SchemaTemplate, find_all, mask_timestamps, references_template, replace_matches};
use theme_fs::{NormalizedPath, io};

use crate::config::{Config, ResolvedConfig};
use crate::format::{JsonFormatter, PrettyJson, try_format_embedded_json};
use crate::{Error, Result};

use super::report::{SectionReport, SectionStatus, SyncReport, Trigger};
use super::state::{SyncPhase, SyncState};

/// Options for sync operations
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, run the whole pipeline but never write.
    /// Sections that would change are reported as `WouldUpdate`.
    pub dry_run: bool,
}

/// A changed file the engine knows how to handle
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChangeTarget {
    Schema(NormalizedPath),
    Section(NormalizedPath),
}

/// Engine for synchronizing schema templates into section documents
///
/// Host hooks:
/// - **build_start**: full sync of every section
/// - **on_file_changed** / **on_files_changed**: targeted sync, gated by the cooldown
pub struct SyncEngine {
    config: ResolvedConfig,
    formatter: Box<dyn JsonFormatter>,
    options: SyncOptions,
    state: SyncState,
}

impl SyncEngine {
    /// Create a new SyncEngine
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingDirectory` if the schema or sections directory
    /// does not exist.
    pub fn new(config: ResolvedConfig) -> Result<Self> {
        for (kind, dir) in [
            ("schema", &config.schema_dir),
            ("sections", &config.sections_dir),
        ] {
            if !dir.is_dir() {
                return Err(Error::MissingDirectory {
                    kind,
                    path: dir.to_native(),
                });
            }
        }

        Ok(Self {
            formatter: Box::new(PrettyJson::new(config.json_tab_width)),
            state: SyncState::new(config.cooldown),
            options: SyncOptions::default(),
            config,
        })
    }

    /// Load `theme-schema.toml` from `root` (if present) and create an engine
    pub fn from_root(root: &NormalizedPath) -> Result<Self> {
        let config = Config::load(root)?.resolve(root)?;
        Self::new(config)
    }

    /// Replace the JSON formatter
    pub fn with_formatter(mut self, formatter: impl JsonFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Set sync options
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Current phase of the cooldown state machine
    pub fn phase(&self) -> SyncPhase {
        self.state.phase(Instant::now())
    }

    /// Build-start hook: a full sync
    pub fn build_start(&mut self) -> SyncReport {
        tracing::info!(sections = %self.config.sections_dir, "Running initial schema sync");
        self.sync_all()
    }

    /// Sync every section document.
    ///
    /// Full syncs bypass the cooldown unless `gate_full_sync` is set.
    pub fn sync_all(&mut self) -> SyncReport {
        let gated = self.config.gate_full_sync;
        if gated && !self.state.try_begin(Instant::now()) {
            tracing::debug!("Full sync ignored during cooldown");
            return SyncReport::throttled(Trigger::Full);
        }

        let mut report = SyncReport::new(Trigger::Full);
        match self.list_sections() {
            Ok(sections) => {
                for section in sections {
                    report.sections.push(self.sync_section(&section));
                }
            }
            Err(e) => {
                tracing::error!("Unable to list sections: {}", e);
                report.errors.push(e.to_string());
            }
        }

        if gated {
            self.state.finish(Instant::now());
        }
        report
    }

    /// Hot-update hook for a single changed file
    pub fn on_file_changed(&mut self, path: impl AsRef<Path>) -> SyncReport {
        self.on_files_changed(&[path])
    }

    /// Hot-update hook for a batch of changed files.
    ///
    /// Paths outside both roots are reported as ignored. If any path is
    /// relevant the cooldown gate is checked once for the whole batch.
    pub fn on_files_changed<P: AsRef<Path>>(&mut self, paths: &[P]) -> SyncReport {
        let mut targets = Vec::new();
        let mut ignored = Vec::new();

        for path in paths {
            let path = normalize_event_path(path.as_ref());
            match self.classify(&path) {
                Some(target) if !targets.contains(&target) => targets.push(target),
                Some(_) => {}
                None => ignored.push(path.to_string()),
            }
        }

        let trigger = Trigger::Changed {
            paths: targets
                .iter()
                .map(|t| match t {
                    ChangeTarget::Schema(p) | ChangeTarget::Section(p) => p.to_string(),
                })
                .collect(),
        };

        if targets.is_empty() {
            tracing::debug!(?ignored, "Ignoring unrelated file changes");
            return SyncReport {
                ignored,
                ..SyncReport::new(trigger)
            };
        }

        if !self.state.try_begin(Instant::now()) {
            tracing::debug!("Change ignored during cooldown");
            return SyncReport {
                ignored,
                ..SyncReport::throttled(trigger)
            };
        }

        let mut report = SyncReport {
            ignored,
            ..SyncReport::new(trigger)
        };
        for target in &targets {
            let partial = self.sync_target(target);
            report.sections.extend(partial.sections);
            report.errors.extend(partial.errors);
        }

        self.state.finish(Instant::now());
        report
    }

    /// Sync one schema or section file without consulting the cooldown.
    ///
    /// A path that is neither is reported as ignored.
    pub fn sync_file(&self, path: impl AsRef<Path>) -> SyncReport {
        let path = normalize_event_path(path.as_ref());
        match self.classify(&path) {
            Some(target) => self.sync_target(&target),
            None => SyncReport {
                ignored: vec![path.to_string()],
                ..SyncReport::new(Trigger::Changed {
                    paths: Vec::new(),
                })
            },
        }
    }

    /// Re-sync every section that references the changed template.
    ///
    /// A section qualifies through an injected block or a pending
    /// declaration naming the template.
    pub fn sync_from_schema_change(&self, schema_file: &NormalizedPath) -> SyncReport {
        let mut report = SyncReport::new(Trigger::Changed {
            paths: vec![schema_file.to_string()],
        });

        let Some(name) = schema_file.file_name() else {
            report.errors.push(format!("Not a file: {}", schema_file));
            return report;
        };
        tracing::info!(template = %name, "Schema file changed");

        let sections = match self.list_sections() {
            Ok(sections) => sections,
            Err(e) => {
                tracing::error!("Unable to list sections: {}", e);
                report.errors.push(e.to_string());
                return report;
            }
        };

        for section in sections {
            match io::read_text(&section) {
                Ok(text) => {
                    if references_template(&text, name, &self.config.declaration_syntaxes) {
                        report.sections.push(self.sync_section(&section));
                    }
                }
                Err(e) => {
                    tracing::error!(section = %section, "Unable to read section: {}", e);
                    report
                        .sections
                        .push(SectionReport::failed(section.to_string(), e.to_string()));
                }
            }
        }

        report
    }

    /// Inject and refresh schema templates in one section document.
    pub fn sync_section(&self, path: &NormalizedPath) -> SectionReport {
        let display = path.to_string();
        let file_name = path.file_name().unwrap_or(display.as_str()).to_string();

        let original = match io::read_text(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(section = %file_name, "Unable to read section: {}", e);
                return SectionReport::failed(display, e.to_string());
            }
        };

        let mut warnings = Vec::new();
        let (injected, replaced) = self.inject_templates(&original, &mut warnings);

        let updated = if replaced > 0 && self.config.format_json {
            match try_format_embedded_json(&injected, self.formatter.as_ref()) {
                Ok(formatted) => formatted,
                Err(e) => {
                    tracing::warn!(section = %file_name, "Unable to format schema output: {}", e);
                    warnings.push(e.to_string());
                    injected
                }
            }
        } else {
            injected
        };

        if mask_timestamps(&updated) == mask_timestamps(&original) {
            tracing::debug!(section = %file_name, "Section already up to date");
            return SectionReport::new(display, SectionStatus::Unchanged, warnings);
        }

        if self.options.dry_run {
            tracing::info!(section = %file_name, "[dry-run] Would inject schema");
            return SectionReport::new(display, SectionStatus::WouldUpdate, warnings);
        }

        match io::write_text(path, &updated) {
            Ok(()) => {
                tracing::info!(section = %file_name, "schema injected");
                SectionReport::new(display, SectionStatus::Updated, warnings)
            }
            Err(e) => {
                tracing::error!(section = %file_name, "Unable to write to file: {}", e);
                SectionReport::new(
                    display,
                    SectionStatus::Failed {
                        reason: e.to_string(),
                    },
                    warnings,
                )
            }
        }
    }

    /// Splice rendered templates over every resolvable match.
    ///
    /// Returns the new text and the number of matches replaced.
    fn inject_templates(&self, text: &str, warnings: &mut Vec<String>) -> (String, usize) {
        let matches = find_all(text, &self.config.declaration_syntaxes);
        if matches.is_empty() {
            return (text.to_string(), 0);
        }

        let imported_at = theme_blocks::timestamp();
        let mut replaced = 0;

        let out = replace_matches(text, &matches, |m| {
            match SchemaTemplate::load(&self.config.schema_dir, &m.name, self.config.strict_json) {
                Ok(template) => {
                    replaced += 1;
                    Some(template.render_replacement(m.kind, &imported_at))
                }
                Err(e) => {
                    tracing::warn!(template = %m.file_name(), "Skipping template: {}", e);
                    warnings.push(e.to_string());
                    None
                }
            }
        });

        (out, replaced)
    }

    fn sync_target(&self, target: &ChangeTarget) -> SyncReport {
        match target {
            ChangeTarget::Schema(path) => self.sync_from_schema_change(path),
            ChangeTarget::Section(path) => {
                tracing::info!(section = %path, "Section file changed");
                let mut report = SyncReport::new(Trigger::Changed {
                    paths: vec![path.to_string()],
                });
                report.sections.push(self.sync_section(path));
                report
            }
        }
    }

    fn classify(&self, path: &NormalizedPath) -> Option<ChangeTarget> {
        if path.is_within(&self.config.schema_dir) && path.extension() == Some("json") {
            return Some(ChangeTarget::Schema(path.clone()));
        }
        if path.is_within(&self.config.sections_dir)
            && path.has_extension(&self.config.section_extensions)
        {
            return Some(ChangeTarget::Section(path.clone()));
        }
        None
    }

    fn list_sections(&self) -> Result<Vec<NormalizedPath>> {
        Ok(io::list_files(
            &self.config.sections_dir,
            &self.config.section_extensions,
        )?)
    }
}

/// Watchers may report paths through symlinks or relative to the cwd;
/// compare them in canonical form when the file still exists.
fn normalize_event_path(path: &Path) -> NormalizedPath {
    NormalizedPath::canonicalize(path).unwrap_or_else(|_| NormalizedPath::new(path))
}
