//! Planning session state.
//!
//! A session owns the working file set, the selected metadata candidate and
//! the naming configuration. Callers mutate these between plans; every
//! mutation that affects naming triggers a full replan.

use crate::core::planner;
use crate::models::config::{NamingConfig, OverridePolicy};
use crate::models::media::{MetadataCandidate, SourceFile};
use crate::models::plan::OrganizationPlan;
use crate::Result;
use std::path::Path;

/// Working state for one organization batch.
#[derive(Debug, Clone, Default)]
pub struct Session {
    files: Vec<SourceFile>,
    candidate: Option<MetadataCandidate>,
    naming: NamingConfig,
    override_policy: OverridePolicy,
    plan: OrganizationPlan,
}

impl Session {
    /// Create a session and compute its initial plan.
    pub fn new(files: Vec<SourceFile>, naming: NamingConfig) -> Self {
        Self::with_candidate(files, None, naming)
    }

    /// Create a session with a candidate already selected. Plans once.
    pub fn with_candidate(
        files: Vec<SourceFile>,
        candidate: Option<MetadataCandidate>,
        naming: NamingConfig,
    ) -> Self {
        let mut session = Self {
            files,
            candidate,
            naming,
            ..Default::default()
        };
        session.replan();
        session
    }

    /// Set how manual overrides are treated on replan.
    pub fn with_override_policy(mut self, policy: OverridePolicy) -> Self {
        self.override_policy = policy;
        self
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn candidate(&self) -> Option<&MetadataCandidate> {
        self.candidate.as_ref()
    }

    pub fn naming(&self) -> &NamingConfig {
        &self.naming
    }

    pub fn plan(&self) -> &OrganizationPlan {
        &self.plan
    }

    /// Recompute the plan from the current inputs.
    ///
    /// With [`OverridePolicy::Discard`] all manual names are dropped; with
    /// [`OverridePolicy::Preserve`] they are reapplied to files still planned.
    pub fn replan(&mut self) -> &OrganizationPlan {
        let overrides = self.plan.overrides();
        let mut plan = planner::plan(&self.files, self.candidate.as_ref(), &self.naming);

        match self.override_policy {
            OverridePolicy::Discard => {
                if !overrides.is_empty() {
                    tracing::info!("Replan discarded {} manual name(s)", overrides.len());
                }
            }
            OverridePolicy::Preserve => {
                for (source, name) in overrides {
                    if !plan.set_override(&source, name) {
                        tracing::debug!("Override dropped for removed file {}", source.display());
                    }
                }
            }
        }

        self.plan = plan;
        &self.plan
    }

    /// Select (or clear) the metadata candidate and replan.
    pub fn select_candidate(
        &mut self,
        candidate: Option<MetadataCandidate>,
    ) -> &OrganizationPlan {
        self.candidate = candidate;
        self.replan()
    }

    /// Replace the naming configuration and replan.
    pub fn set_naming(&mut self, naming: NamingConfig) -> &OrganizationPlan {
        self.naming = naming;
        self.replan()
    }

    /// Add files to the working set and replan. Paths already present are
    /// replaced by the new description.
    pub fn add_files(&mut self, files: Vec<SourceFile>) -> &OrganizationPlan {
        for file in files {
            match self.files.iter_mut().find(|f| f.path == file.path) {
                Some(existing) => *existing = file,
                None => self.files.push(file),
            }
        }
        self.replan()
    }

    /// Remove a file from the working set and replan.
    pub fn remove_file(&mut self, path: &Path) -> Result<&OrganizationPlan> {
        let before = self.files.len();
        self.files.retain(|f| f.path != path);
        if self.files.len() == before {
            return Err(crate::Error::NotInPlan(path.display().to_string()));
        }
        Ok(self.replan())
    }

    /// Set a manual file name for a planned file.
    pub fn set_override(&mut self, path: &Path, name: impl Into<String>) -> Result<()> {
        if self.plan.set_override(path, name) {
            Ok(())
        } else {
            Err(crate::Error::NotInPlan(path.display().to_string()))
        }
    }

    /// Clear a manual file name.
    pub fn clear_override(&mut self, path: &Path) -> Option<String> {
        self.plan.clear_override(path)
    }
}
