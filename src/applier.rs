//! The review-and-apply engine.
//!
//! For one file: open the tag container, run every generator in pipeline
//! order, and for each generated action snapshot / apply / diff. An empty
//! diff means the action did nothing and nobody is asked. A non-empty diff
//! goes through the rule cache (which may in turn ask the operator); an
//! accepted change stays and marks the document dirty, a rejected one is
//! rolled back by restoring the snapshot. The file is written back only if
//! at least one change was committed.

use std::path::Path;

use tracing::{debug, info};

use crate::action::ActionGenerator;
use crate::config::SweepConfig;
use crate::document::TagDocument;
use crate::error::Result;
use crate::prompt::Prompt;
use crate::rules::RuleCache;

/// Terminal state of one file after review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Unsupported extension; the file was not even opened.
    Skipped,
    /// Opened and reviewed, no change committed, nothing written.
    Clean,
    /// At least one change committed and written back.
    Persisted,
}

/// Review-and-apply engine. Owns the run-wide rule cache, the pipeline, and
/// the operator console.
pub struct Applier {
    config: SweepConfig,
    pipeline: Vec<Box<dyn ActionGenerator>>,
    rules: RuleCache,
    prompt: Box<dyn Prompt>,
}

impl Applier {
    pub fn new(
        config: SweepConfig,
        pipeline: Vec<Box<dyn ActionGenerator>>,
        prompt: Box<dyn Prompt>,
    ) -> Self {
        Self {
            config,
            pipeline,
            rules: RuleCache::new(),
            prompt,
        }
    }

    /// Rules learned so far in this run, for diagnostics.
    pub fn rules(&self) -> &RuleCache {
        &self.rules
    }

    /// Review one file through the whole pipeline.
    pub fn process_file(&mut self, path: &Path) -> Result<FileOutcome> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_default();
        if !self.config.is_supported_extension(&extension) {
            info!(file = %path.display(), "skipping: unsupported extension");
            return Ok(FileOutcome::Skipped);
        }

        let mut doc = TagDocument::open(path)?;
        let mut dirty = false;

        for generator in &self.pipeline {
            for action in generator.generate(&doc) {
                let prev = doc.snapshot();
                action.apply(&mut doc)?;
                let diff = doc.diff_against(&prev);
                if diff.is_empty() {
                    continue;
                }
                if self
                    .rules
                    .resolve(path, &action.key(), &diff, self.prompt.as_mut())?
                {
                    debug!(file = %path.display(), action = %action.key(), "committed");
                    dirty = true;
                } else {
                    debug!(file = %path.display(), action = %action.key(), "rolled back");
                    doc.restore(&prev);
                }
            }
        }

        if dirty {
            doc.persist()?;
            info!(file = %doc.path().display(), "persisted");
            Ok(FileOutcome::Persisted)
        } else {
            Ok(FileOutcome::Clean)
        }
    }
}
