//! Directory tree traversal.
//!
//! An explicit work stack instead of recursion, so arbitrarily deep trees
//! cannot exhaust the call stack. Directories whose base name is in the
//! excluded set are skipped silently, empty directories are reported, and
//! every file is handed to the engine. Symlinks are not followed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::applier::{Applier, FileOutcome};
use crate::config::{ErrorPolicy, SweepConfig};
use crate::error::Result;

/// Counters accumulated over one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Files opened and reviewed.
    pub processed: usize,
    /// Files with at least one committed change.
    pub changed: usize,
    /// Files skipped for their extension.
    pub skipped: usize,
    /// Files that failed under the `skip` error policy.
    pub failed: usize,
}

/// Recursive-descent replacement over an explicit stack.
pub struct TreeWalker {
    config: SweepConfig,
}

impl TreeWalker {
    pub fn new(config: &SweepConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Walk all roots in order, delegating each file to the engine.
    ///
    /// Under `ErrorPolicy::Abort` the first per-file failure ends the whole
    /// walk with that error; under `ErrorPolicy::Skip` it is logged and
    /// counted. Traversal errors (an unreadable directory) always end the
    /// walk.
    pub fn walk(&self, roots: &[PathBuf], applier: &mut Applier) -> Result<WalkStats> {
        let mut stats = WalkStats::default();
        let mut stack: Vec<PathBuf> = roots.iter().rev().cloned().collect();

        while let Some(path) = stack.pop() {
            let meta = fs::symlink_metadata(&path)?;
            if meta.file_type().is_symlink() {
                debug!(path = %path.display(), "not following symlink");
                continue;
            }
            if meta.is_dir() {
                self.enter_directory(&path, &mut stack)?;
            } else {
                self.visit_file(&path, applier, &mut stats)?;
            }
        }
        Ok(stats)
    }

    fn enter_directory(&self, path: &Path, stack: &mut Vec<PathBuf>) -> Result<()> {
        if let Some(name) = path.file_name() {
            if self.config.is_excluded_dir(&name.to_string_lossy()) {
                debug!(dir = %path.display(), "excluded directory");
                return Ok(());
            }
        }

        let mut children: Vec<PathBuf> = fs::read_dir(path)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .collect();
        if children.is_empty() {
            info!("{} is empty", path.display());
            return Ok(());
        }
        children.sort();
        for child in children.into_iter().rev() {
            stack.push(child);
        }
        Ok(())
    }

    fn visit_file(
        &self,
        path: &Path,
        applier: &mut Applier,
        stats: &mut WalkStats,
    ) -> Result<()> {
        match applier.process_file(path) {
            Ok(FileOutcome::Skipped) => stats.skipped += 1,
            Ok(FileOutcome::Clean) => stats.processed += 1,
            Ok(FileOutcome::Persisted) => {
                stats.processed += 1;
                stats.changed += 1;
            }
            Err(err) => {
                error!(file = %path.display(), "error while processing: {err}");
                match self.config.on_error {
                    ErrorPolicy::Abort => return Err(err),
                    ErrorPolicy::Skip => stats.failed += 1,
                }
            }
        }
        Ok(())
    }
}
