//! Plan data model.

use super::config::NamingConfig;
use super::media::{FileRole, MetadataCandidate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Planned destination for a single source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    /// Source file path.
    pub source: PathBuf,
    /// Role of the source file.
    pub role: FileRole,
    /// Assigned episode number (within the subtitle group for subtitles).
    pub episode: u32,
    /// Assigned season number.
    pub season: u32,
    /// Release group, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Subtitle grouping key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix_group: Option<String>,
    /// Computed file name.
    pub preview_name: String,
    /// Computed destination relative to the output root.
    pub destination: PathBuf,
    /// Manual file name that replaces the computed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_override: Option<String>,
}

impl PlanEntry {
    /// The file name that will be used: the override if set, else the preview.
    pub fn effective_name(&self) -> &str {
        self.name_override.as_deref().unwrap_or(&self.preview_name)
    }

    /// The destination that will be used, with any override applied to the
    /// final path segment.
    pub fn effective_destination(&self) -> PathBuf {
        match &self.name_override {
            Some(name) => self.destination.with_file_name(name),
            None => self.destination.clone(),
        }
    }
}

/// A file that could not be planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    /// Source path.
    pub source: PathBuf,
    /// Reason it was skipped.
    pub reason: String,
}

/// Result of planning: destination for every resolvable source file.
///
/// Holds no timestamps or random IDs, so planning the same inputs twice
/// yields equal plans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationPlan {
    /// Planned entries, ordered by source path.
    pub entries: Vec<PlanEntry>,
    /// Files left out of the plan.
    pub skipped: Vec<SkippedFile>,
}

impl OrganizationPlan {
    /// Look up the entry for a source path.
    pub fn entry(&self, source: &Path) -> Option<&PlanEntry> {
        self.entries.iter().find(|e| e.source == source)
    }

    fn entry_mut(&mut self, source: &Path) -> Option<&mut PlanEntry> {
        self.entries.iter_mut().find(|e| e.source == source)
    }

    /// Set a manual name for a file. Returns false if the file is not planned.
    pub fn set_override(&mut self, source: &Path, name: impl Into<String>) -> bool {
        match self.entry_mut(source) {
            Some(entry) => {
                entry.name_override = Some(name.into());
                true
            }
            None => false,
        }
    }

    /// Clear a manual name. Returns the cleared value.
    pub fn clear_override(&mut self, source: &Path) -> Option<String> {
        self.entry_mut(source).and_then(|e| e.name_override.take())
    }

    /// All manual overrides keyed by source path.
    pub fn overrides(&self) -> BTreeMap<PathBuf, String> {
        self.entries
            .iter()
            .filter_map(|e| e.name_override.clone().map(|n| (e.source.clone(), n)))
            .collect()
    }

    /// Effective destination for every planned file.
    pub fn destination_map(&self) -> BTreeMap<PathBuf, PathBuf> {
        self.entries
            .iter()
            .map(|e| (e.source.clone(), e.effective_destination()))
            .collect()
    }

    /// Destinations claimed by more than one source file.
    pub fn duplicate_destinations(&self) -> BTreeMap<PathBuf, Vec<PathBuf>> {
        let mut by_target: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for entry in &self.entries {
            by_target
                .entry(entry.effective_destination())
                .or_default()
                .push(entry.source.clone());
        }
        by_target.retain(|_, sources| sources.len() > 1);
        by_target
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Plan file structure written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDocument {
    /// Plan version.
    pub version: String,
    /// Unique plan ID.
    pub id: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Library root the destinations are relative to.
    pub output_root: PathBuf,
    /// Metadata candidate the plan was built with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<MetadataCandidate>,
    /// Naming configuration the plan was built with.
    pub naming: NamingConfig,
    /// The plan itself.
    pub plan: OrganizationPlan,
}
