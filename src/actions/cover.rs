//! Cover-art validation.

use id3::frame::Content;
use tracing::warn;

use crate::action::Action;
use crate::document::TagDocument;
use crate::error::Result;
use crate::probe::probe_image;

/// Validate embedded pictures: warn when a payload is not a readable image,
/// when an edge is below the configured minimum, or when the sniffed mime
/// type disagrees with the declared one. Never mutates, so it never prompts.
#[derive(Debug, Clone)]
pub struct CheckCoverArt {
    min_edge: u32,
}

impl CheckCoverArt {
    pub fn new(min_edge: u32) -> Self {
        Self { min_edge }
    }
}

impl Action for CheckCoverArt {
    fn key(&self) -> String {
        "CheckCoverArt".to_string()
    }

    fn apply(&self, doc: &mut TagDocument) -> Result<()> {
        for frame in doc.tag().frames() {
            let Content::Picture(picture) = frame.content() else {
                continue;
            };
            let path = doc.path().display().to_string();
            match probe_image(&picture.data) {
                None => {
                    warn!(file = %path, "cover art payload is not a readable image");
                }
                Some(info) => {
                    if info.width < self.min_edge || info.height < self.min_edge {
                        warn!(
                            file = %path,
                            width = info.width,
                            height = info.height,
                            min = self.min_edge,
                            "cover art is smaller than the configured minimum"
                        );
                    }
                    if let Some(mime) = &info.mime {
                        if !picture.mime_type.is_empty() && mime != &picture.mime_type {
                            warn!(
                                file = %path,
                                declared = %picture.mime_type,
                                sniffed = %mime,
                                "cover art mime type disagrees with the frame"
                            );
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
