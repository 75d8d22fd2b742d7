//! Lyrics consolidation.

use id3::frame::{Content, Lyrics};
use id3::{Frame, TagLike};

use crate::action::Action;
use crate::document::TagDocument;
use crate::error::Result;

/// Collapse all lyrics frames into a single English one holding the longest
/// text found. Files without lyrics are untouched.
#[derive(Debug, Clone)]
pub struct FixLyrics;

impl Action for FixLyrics {
    fn key(&self) -> String {
        "FixLyrics".to_string()
    }

    fn apply(&self, doc: &mut TagDocument) -> Result<()> {
        let longest = doc
            .tag()
            .frames()
            .filter_map(|frame| match frame.content() {
                Content::Lyrics(lyrics) => Some(lyrics.text.clone()),
                _ => None,
            })
            .max_by_key(|text| text.len());
        let Some(text) = longest else {
            return Ok(());
        };

        let lyric_keys: Vec<String> = doc
            .tag()
            .frames()
            .filter(|frame| matches!(frame.content(), Content::Lyrics(_)))
            .map(crate::document::frame_key)
            .collect();
        for key in lyric_keys {
            doc.remove_by_key(&key);
        }

        doc.tag_mut().add_frame(Frame::with_content(
            "USLT",
            Content::Lyrics(Lyrics {
                lang: "eng".to_string(),
                description: String::new(),
                text,
            }),
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn lyrics_frame(lang: &str, text: &str) -> Frame {
        Frame::with_content(
            "USLT",
            Content::Lyrics(Lyrics {
                lang: lang.to_string(),
                description: String::new(),
                text: text.to_string(),
            }),
        )
    }

    #[test]
    fn keeps_the_longest_text_as_a_single_english_frame() {
        let mut tag = id3::Tag::new();
        tag.add_frame(lyrics_frame("rus", "short"));
        tag.add_frame(lyrics_frame("ger", "much longer lyrics text"));
        let mut doc = TagDocument::from_parts(PathBuf::from("/music/a.mp3"), tag);

        FixLyrics.apply(&mut doc).unwrap();

        assert_eq!(doc.keys(), vec!["USLT::eng"]);
        let text = doc
            .tag()
            .frames()
            .find_map(|f| match f.content() {
                Content::Lyrics(l) => Some(l.text.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(text, "much longer lyrics text");
    }

    #[test]
    fn no_lyrics_means_no_change() {
        let tag = id3::Tag::new();
        let mut doc = TagDocument::from_parts(PathBuf::from("/music/a.mp3"), tag);
        let before = doc.snapshot();
        FixLyrics.apply(&mut doc).unwrap();
        assert!(doc.diff_against(&before).is_empty());
    }

    #[test]
    fn already_consolidated_lyrics_produce_an_empty_diff() {
        let mut tag = id3::Tag::new();
        tag.add_frame(lyrics_frame("eng", "the words"));
        let mut doc = TagDocument::from_parts(PathBuf::from("/music/a.mp3"), tag);
        let before = doc.snapshot();
        FixLyrics.apply(&mut doc).unwrap();
        assert!(doc.diff_against(&before).is_empty());
    }
}
