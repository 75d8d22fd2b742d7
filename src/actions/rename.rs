//! Extended-tag (TXXX) rename policies.

use id3::frame::{Content, ExtendedText};
use id3::{Frame, TagLike};

use crate::action::{Action, ActionGenerator};
use crate::document::TagDocument;
use crate::error::Result;

/// Move a TXXX value from one description to another. A no-op when the
/// source frame is absent; an existing frame under the new description is
/// replaced.
#[derive(Debug, Clone)]
pub struct RenameExtendedTag {
    from: String,
    to: String,
}

impl RenameExtendedTag {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Action for RenameExtendedTag {
    fn key(&self) -> String {
        format!("RenameTag TXXX:{}", self.from)
    }

    fn apply(&self, doc: &mut TagDocument) -> Result<()> {
        let value = doc.tag().frames().find_map(|frame| match frame.content() {
            Content::ExtendedText(extended) if extended.description == self.from => {
                Some(extended.value.clone())
            }
            _ => None,
        });
        let Some(value) = value else {
            return Ok(());
        };

        doc.remove_by_key(&format!("TXXX:{}", self.from));
        doc.tag_mut().add_frame(Frame::with_content(
            "TXXX",
            Content::ExtendedText(ExtendedText {
                description: self.to.clone(),
                value,
            }),
        ));
        Ok(())
    }
}

/// One rename per TXXX frame whose description is not already its canonical
/// (uppercase) form.
#[derive(Debug, Clone)]
pub struct NormalizeExtendedTags;

impl ActionGenerator for NormalizeExtendedTags {
    fn generate(&self, doc: &TagDocument) -> Vec<Box<dyn Action>> {
        doc.tag()
            .frames()
            .filter_map(|frame| match frame.content() {
                Content::ExtendedText(extended) => {
                    let canonical = extended.description.to_uppercase();
                    if extended.description != canonical {
                        Some(Box::new(RenameExtendedTag::new(
                            extended.description.clone(),
                            canonical,
                        )) as Box<dyn Action>)
                    } else {
                        None
                    }
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn doc_with_txxx(desc: &str, value: &str) -> TagDocument {
        let mut tag = id3::Tag::new();
        tag.add_frame(Frame::with_content(
            "TXXX",
            Content::ExtendedText(ExtendedText {
                description: desc.to_string(),
                value: value.to_string(),
            }),
        ));
        TagDocument::from_parts(PathBuf::from("/music/a.mp3"), tag)
    }

    #[test]
    fn rename_moves_value_to_new_description() {
        let mut doc = doc_with_txxx("foo", "bar");
        RenameExtendedTag::new("foo", "FOO").apply(&mut doc).unwrap();
        assert_eq!(doc.keys(), vec!["TXXX:FOO"]);
    }

    #[test]
    fn rename_of_absent_frame_is_a_no_op() {
        let mut doc = doc_with_txxx("FOO", "bar");
        let before = doc.snapshot();
        RenameExtendedTag::new("missing", "MISSING")
            .apply(&mut doc)
            .unwrap();
        assert!(doc.diff_against(&before).is_empty());
    }

    #[test]
    fn normalize_emits_one_rename_per_lowercase_description() {
        let doc = doc_with_txxx("foo", "bar");
        let actions = NormalizeExtendedTags.generate(&doc);
        let keys: Vec<String> = actions.iter().map(|a| a.key()).collect();
        assert_eq!(keys, vec!["RenameTag TXXX:foo"]);
    }

    #[test]
    fn normalize_is_quiet_for_canonical_descriptions() {
        let doc = doc_with_txxx("FOO", "bar");
        assert!(NormalizeExtendedTags.generate(&doc).is_empty());
    }

    #[test]
    fn rename_diff_shows_old_and_new_keys() {
        let mut doc = doc_with_txxx("foo", "bar");
        let before = doc.snapshot();
        RenameExtendedTag::new("foo", "FOO").apply(&mut doc).unwrap();
        let diff = doc.diff_against(&before);
        assert!(diff.iter().any(|l| l.starts_with("TXXX:FOO. None --> ")));
        assert!(diff.iter().any(|l| l.starts_with("TXXX:foo. ") && l.ends_with("--> None")));
    }
}
