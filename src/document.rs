//! The mutable tag set of one file, behind the snapshot / restore / diff /
//! persist contract.
//!
//! `TagDocument` wraps the `id3` crate's container. Frames are addressed by
//! a canonical key in the shape tag editors conventionally use: the frame id
//! alone for scalar frames (`TPE1`), the id plus description for free-form
//! frames (`TXXX:FOO`, `APIC:`), and id:description:language for lyrics and
//! comments (`USLT::eng`).

use std::fs;
use std::path::{Path, PathBuf};

use id3::frame::Content;
use id3::{Frame, Tag, TagLike, Version};
use tracing::debug;

use crate::error::{Error, Result};
use crate::snapshot::{self, FieldTree};

/// One file's tag set for the duration of one run.
#[derive(Debug)]
pub struct TagDocument {
    /// Where the file was opened from.
    path: PathBuf,
    /// Where the file should end up; differs from `path` only if an action
    /// relocated the document.
    target: PathBuf,
    tag: Tag,
}

/// Immutable deep copy of a document's state at a point in time.
#[derive(Debug, Clone)]
pub struct TagSnapshot {
    tag: Tag,
    target: PathBuf,
}

impl TagDocument {
    /// Open the tag container of `path`. A file without an ID3 container is
    /// an open failure, like any malformed one.
    pub fn open(path: &Path) -> Result<Self> {
        let tag = Tag::read_from_path(path).map_err(|source| Error::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            target: path.to_path_buf(),
            tag,
        })
    }

    /// Build a document from an already-parsed tag. Used by tests and by
    /// callers that synthesize documents.
    pub fn from_parts(path: PathBuf, tag: Tag) -> Self {
        Self {
            target: path.clone(),
            path,
            tag,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Relocate the document; takes effect at persist time.
    pub fn set_target(&mut self, target: PathBuf) {
        self.target = target;
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn tag_mut(&mut self) -> &mut Tag {
        &mut self.tag
    }

    /// Canonical keys of all frames currently present, in frame order.
    pub fn keys(&self) -> Vec<String> {
        self.tag.frames().map(frame_key).collect()
    }

    /// Remove every frame whose canonical key equals `key`.
    pub fn remove_by_key(&mut self, key: &str) {
        let kept: Vec<Frame> = self
            .tag
            .frames()
            .filter(|frame| frame_key(frame) != key)
            .cloned()
            .collect();
        let mut tag = Tag::new();
        for frame in kept {
            tag.add_frame(frame);
        }
        self.tag = tag;
    }

    /// Deep copy of the current state plus target location.
    pub fn snapshot(&self) -> TagSnapshot {
        TagSnapshot {
            tag: self.tag.clone(),
            target: self.target.clone(),
        }
    }

    /// Overwrite state and target location from a snapshot. Afterwards the
    /// document diffs as equal to the state at copy time.
    pub fn restore(&mut self, snapshot: &TagSnapshot) {
        self.tag = snapshot.tag.clone();
        self.target = snapshot.target.clone();
    }

    /// Field-level changes from `prev` to the current state.
    pub fn diff_against(&self, prev: &TagSnapshot) -> Vec<String> {
        snapshot::diff(&field_tree(&prev.tag), &field_tree(&self.tag))
    }

    /// Write the tag container back to disk. If the target location differs
    /// from the original one the file is renamed afterwards and parent
    /// directories left empty by the move are removed.
    pub fn persist(&mut self) -> Result<()> {
        self.tag
            .write_to_path(&self.path, Version::Id3v24)
            .map_err(|source| Error::PersistFailed {
                path: self.path.clone(),
                source,
            })?;

        if self.target != self.path {
            if let Some(parent) = self.target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::rename(&self.path, &self.target)?;
            debug!(
                from = %self.path.display(),
                to = %self.target.display(),
                "relocated file"
            );
            remove_empty_parents(&self.path)?;
            self.path = self.target.clone();
        }
        Ok(())
    }
}

/// Remove now-empty ancestor directories of a moved file.
fn remove_empty_parents(path: &Path) -> Result<()> {
    let mut current = path.parent();
    while let Some(dir) = current {
        if fs::read_dir(dir)?.next().is_some() {
            break;
        }
        fs::remove_dir(dir)?;
        debug!(dir = %dir.display(), "removed empty directory");
        current = dir.parent();
    }
    Ok(())
}

/// Canonical key for a frame, derived from its id and discriminating parts.
pub fn frame_key(frame: &Frame) -> String {
    match frame.content() {
        Content::ExtendedText(extended) => format!("TXXX:{}", extended.description),
        Content::ExtendedLink(link) => format!("WXXX:{}", link.description),
        Content::Lyrics(lyrics) => {
            format!("USLT:{}:{}", lyrics.description, lyrics.lang)
        }
        Content::Comment(comment) => {
            format!("COMM:{}:{}", comment.description, comment.lang)
        }
        Content::Picture(picture) => format!("APIC:{}", picture.description),
        _ => frame.id().to_string(),
    }
}

/// Project a tag into its structural form for diffing.
pub fn field_tree(tag: &Tag) -> FieldTree {
    let mut root = FieldTree::root();
    for frame in tag.frames() {
        root.insert(frame_key(frame), frame_node(frame));
    }
    root
}

fn frame_node(frame: &Frame) -> FieldTree {
    match frame.content() {
        Content::Text(text) => FieldTree::scalar(text.clone()),
        Content::Link(link) => FieldTree::scalar(link.clone()),
        Content::ExtendedText(extended) => FieldTree::composite([
            ("desc", extended.description.clone()),
            ("value", extended.value.clone()),
        ]),
        Content::ExtendedLink(link) => FieldTree::composite([
            ("desc", link.description.clone()),
            ("link", link.link.clone()),
        ]),
        Content::Lyrics(lyrics) => FieldTree::composite([
            ("desc", lyrics.description.clone()),
            ("lang", lyrics.lang.clone()),
            ("text", lyrics.text.clone()),
        ]),
        Content::Comment(comment) => FieldTree::composite([
            ("desc", comment.description.clone()),
            ("lang", comment.lang.clone()),
            ("text", comment.text.clone()),
        ]),
        Content::Picture(picture) => FieldTree::composite([
            ("data", format!("{} bytes", picture.data.len())),
            ("desc", picture.description.clone()),
            ("mime", picture.mime_type.clone()),
            ("type", format!("{:?}", picture.picture_type)),
        ]),
        other => FieldTree::scalar(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use id3::frame::ExtendedText;

    fn sample_tag() -> Tag {
        let mut tag = Tag::new();
        tag.add_frame(Frame::with_content(
            "TPE1",
            Content::Text("Artist".to_string()),
        ));
        tag.add_frame(Frame::with_content(
            "TXXX",
            Content::ExtendedText(ExtendedText {
                description: "FOO".to_string(),
                value: "bar".to_string(),
            }),
        ));
        tag
    }

    #[test]
    fn frame_keys_follow_the_canonical_scheme() {
        let tag = sample_tag();
        let mut keys: Vec<String> = tag.frames().map(frame_key).collect();
        keys.sort();
        assert_eq!(keys, vec!["TPE1", "TXXX:FOO"]);
    }

    #[test]
    fn restore_undoes_mutation() {
        let mut doc = TagDocument::from_parts(PathBuf::from("/music/a.mp3"), sample_tag());
        let before = doc.snapshot();

        doc.remove_by_key("TPE1");
        assert!(!doc.diff_against(&before).is_empty());

        doc.restore(&before);
        assert!(doc.diff_against(&before).is_empty());
    }

    #[test]
    fn restore_rolls_back_target_location() {
        let mut doc = TagDocument::from_parts(PathBuf::from("/music/a.mp3"), sample_tag());
        let before = doc.snapshot();
        doc.set_target(PathBuf::from("/music/b.mp3"));
        doc.restore(&before);
        assert_eq!(doc.target(), Path::new("/music/a.mp3"));
    }

    #[test]
    fn persist_relocates_and_removes_empty_parents() {
        let root = tempfile::TempDir::new().unwrap();
        let old_dir = root.path().join("a").join("b");
        fs::create_dir_all(&old_dir).unwrap();
        let old_path = old_dir.join("song.mp3");
        fs::write(&old_path, b"").unwrap();
        sample_tag()
            .write_to_path(&old_path, Version::Id3v24)
            .unwrap();

        let mut doc = TagDocument::open(&old_path).unwrap();
        let target = root.path().join("c").join("song.mp3");
        doc.set_target(target.clone());
        doc.persist().unwrap();

        assert!(target.is_file(), "file should exist at the target location");
        assert!(!old_path.exists(), "file should be gone from the old location");
        assert!(
            !root.path().join("a").exists(),
            "emptied ancestors of the old location should be removed"
        );
        assert!(
            root.path().exists(),
            "the first non-empty ancestor stops the cleanup"
        );
        assert_eq!(doc.path(), target.as_path());

        let reread = Tag::read_from_path(&target).unwrap();
        assert!(reread.frames().any(|f| frame_key(f) == "TPE1"));
    }

    #[test]
    fn remove_by_key_only_touches_matching_frames() {
        let mut doc = TagDocument::from_parts(PathBuf::from("/music/a.mp3"), sample_tag());
        doc.remove_by_key("TXXX:FOO");
        assert_eq!(doc.keys(), vec!["TPE1"]);
    }

    #[test]
    fn diff_shows_deleted_frame_against_none() {
        let mut doc = TagDocument::from_parts(PathBuf::from("/music/a.mp3"), sample_tag());
        let before = doc.snapshot();
        doc.remove_by_key("TPE1");
        assert_eq!(doc.diff_against(&before), vec![r#"TPE1. "Artist" --> None"#]);
    }
}
