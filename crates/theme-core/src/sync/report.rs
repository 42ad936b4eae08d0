//! Sync reports

use serde::Serialize;

/// What started a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// Every section document (build start, `sync` without a path)
    Full,
    /// Change events for specific files
    Changed { paths: Vec<String> },
}

/// Outcome for one section document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    /// New content was written
    Updated,
    /// Content would change, but this was a dry run
    WouldUpdate,
    /// Nothing but timestamps would change, so nothing was written
    Unchanged,
    /// The section could not be read or written
    Failed { reason: String },
}

/// Result of syncing one section document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionReport {
    pub path: String,
    pub status: SectionStatus,
    /// Templates that were skipped and formatter fallbacks
    pub warnings: Vec<String>,
}

impl SectionReport {
    pub fn new(path: impl Into<String>, status: SectionStatus, warnings: Vec<String>) -> Self {
        Self {
            path: path.into(),
            status,
            warnings,
        }
    }

    pub fn failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            path,
            SectionStatus::Failed {
                reason: reason.into(),
            },
            Vec::new(),
        )
    }

    /// Whether the section content differs (or would differ) after the sync
    pub fn is_changed(&self) -> bool {
        matches!(self.status, SectionStatus::Updated | SectionStatus::WouldUpdate)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, SectionStatus::Failed { .. })
    }
}

/// Report from a full or change-triggered sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub trigger: Trigger,
    /// The trigger arrived during the cooldown and was ignored
    pub throttled: bool,
    /// Changed paths that are neither schema templates nor sections
    pub ignored: Vec<String>,
    pub sections: Vec<SectionReport>,
    /// Errors that prevented whole steps, such as listing the sections directory
    pub errors: Vec<String>,
}

impl SyncReport {
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            throttled: false,
            ignored: Vec::new(),
            sections: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// A report for a trigger that was ignored by the cooldown gate
    pub fn throttled(trigger: Trigger) -> Self {
        Self {
            throttled: true,
            ..Self::new(trigger)
        }
    }

    /// Sections whose content changed (or would change)
    pub fn changed(&self) -> impl Iterator<Item = &SectionReport> {
        self.sections.iter().filter(|s| s.is_changed())
    }

    /// Sections that failed
    pub fn failed(&self) -> impl Iterator<Item = &SectionReport> {
        self.sections.iter().filter(|s| s.is_failed())
    }

    /// All warnings across sections
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|s| s.warnings.iter().map(String::as_str))
    }

    /// Find the report for a section by file name
    pub fn section(&self, file_name: &str) -> Option<&SectionReport> {
        self.sections
            .iter()
            .find(|s| s.path.rsplit('/').next() == Some(file_name))
    }

    /// Whether nothing changed, failed or errored
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.changed().next().is_none() && self.failed().next().is_none()
    }

    /// Serialize the report for `--json` output
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
