//! The action and generator seam of the review pipeline.
//!
//! An [`Action`] is one atomic, named, reviewable mutation of a document.
//! An [`ActionGenerator`] produces zero or more actions for the document's
//! current state; field-enumerating generators see only the fields present
//! at the moment they run. Every clonable action is itself a generator of
//! exactly one action.

use crate::document::TagDocument;
use crate::error::Result;

/// One atomic transformation with a stable identity.
pub trait Action {
    /// Stable, descriptive identity, e.g. `"DeleteTag TXXX:FOO"`. Used both
    /// for display and for wildcard rule matching, so it must not change
    /// across runs for the same logical change.
    fn key(&self) -> String;

    /// Apply the mutation. Called at most once per snapshot pair; a rejected
    /// effect is undone by snapshot restore, never by a compensating action.
    fn apply(&self, doc: &mut TagDocument) -> Result<()>;
}

/// Producer of actions against the current document state.
pub trait ActionGenerator {
    fn generate(&self, doc: &TagDocument) -> Vec<Box<dyn Action>>;
}

impl<A> ActionGenerator for A
where
    A: Action + Clone + 'static,
{
    fn generate(&self, _doc: &TagDocument) -> Vec<Box<dyn Action>> {
        vec![Box::new(self.clone())]
    }
}
