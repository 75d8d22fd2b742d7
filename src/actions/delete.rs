//! Frame deletion policies.

use crate::action::{Action, ActionGenerator};
use crate::document::TagDocument;
use crate::error::Result;

/// Action with no effect. Its diff is always empty, so it never prompts;
/// useful as a pipeline placeholder and in tests.
#[derive(Debug, Clone)]
pub struct DoNothing;

impl Action for DoNothing {
    fn key(&self) -> String {
        "DoNothing".to_string()
    }

    fn apply(&self, _doc: &mut TagDocument) -> Result<()> {
        Ok(())
    }
}

/// Delete every frame with one canonical key.
#[derive(Debug, Clone)]
pub struct DeleteTag {
    key: String,
}

impl DeleteTag {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Action for DeleteTag {
    fn key(&self) -> String {
        format!("DeleteTag {}", self.key)
    }

    fn apply(&self, doc: &mut TagDocument) -> Result<()> {
        doc.remove_by_key(&self.key);
        Ok(())
    }
}

/// One `DeleteTag` per present frame whose key is not in the acceptable set.
#[derive(Debug, Clone)]
pub struct DeleteUnacceptableTags {
    acceptable: Vec<String>,
}

impl DeleteUnacceptableTags {
    pub fn new(acceptable: Vec<String>) -> Self {
        Self { acceptable }
    }
}

impl ActionGenerator for DeleteUnacceptableTags {
    fn generate(&self, doc: &TagDocument) -> Vec<Box<dyn Action>> {
        doc.keys()
            .into_iter()
            .filter(|key| !self.acceptable.contains(key))
            .map(|key| Box::new(DeleteTag::new(key)) as Box<dyn Action>)
            .collect()
    }
}
