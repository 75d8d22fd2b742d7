//! Image probe collaborator.
//!
//! Validation actions need exactly one question answered about an embedded
//! picture: its dimensions and actual mime type. Dimension parsing comes
//! from `imagesize` (header-only, never decodes pixel data) and the mime
//! type from `infer`'s magic-byte sniffing.

/// What a successful probe knows about an image payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Sniffed mime type; None when the magic bytes are unrecognized.
    pub mime: Option<String>,
}

/// Probe raw image bytes. Returns None when the payload is not a readable
/// image at all.
pub fn probe_image(data: &[u8]) -> Option<ImageInfo> {
    let size = imagesize::blob_size(data).ok()?;
    let mime = infer::get(data).map(|kind| kind.mime_type().to_string());
    Some(ImageInfo {
        width: size.width as u32,
        height: size.height as u32,
        mime,
    })
}
