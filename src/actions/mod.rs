//! Concrete tag transformations.
//!
//! These are the policy layer: each file in this module expresses one kind
//! of cleanup the sweep knows how to review. The engine treats them all
//! uniformly through the `Action`/`ActionGenerator` seam.

mod cover;
mod delete;
mod lyrics;
mod rename;

pub use cover::CheckCoverArt;
pub use delete::{DeleteTag, DeleteUnacceptableTags, DoNothing};
pub use lyrics::FixLyrics;
pub use rename::{NormalizeExtendedTags, RenameExtendedTag};

use crate::action::ActionGenerator;
use crate::config::SweepConfig;

/// The fixed pipeline order applied to every document: consolidate lyrics,
/// canonicalize extended-tag descriptions, drop unacceptable frames, then
/// validate cover art.
pub fn default_pipeline(config: &SweepConfig) -> Vec<Box<dyn ActionGenerator>> {
    vec![
        Box::new(FixLyrics),
        Box::new(NormalizeExtendedTags),
        Box::new(DeleteUnacceptableTags::new(config.acceptable_tags.clone())),
        Box::new(CheckCoverArt::new(config.min_cover_edge)),
    ]
}
