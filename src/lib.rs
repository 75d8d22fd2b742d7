//! tagsweep library interface
//!
//! Interactive batch editor for ID3 tags: walk directory trees, run a
//! pipeline of reviewable tag transformations per file, and let the
//! operator accept, reject, or generalize each effective change.

pub mod action;
pub mod actions;
pub mod applier;
pub mod config;
pub mod document;
pub mod error;
pub mod probe;
pub mod prompt;
pub mod rules;
pub mod snapshot;
pub mod walker;

pub use crate::action::{Action, ActionGenerator};
pub use crate::applier::{Applier, FileOutcome};
pub use crate::config::{ErrorPolicy, SweepConfig};
pub use crate::document::{TagDocument, TagSnapshot};
pub use crate::error::{Error, Result};
pub use crate::rules::RuleCache;
pub use crate::walker::{TreeWalker, WalkStats};
