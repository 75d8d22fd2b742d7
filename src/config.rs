//! Sweep policy configuration.
//!
//! Everything here is data, not engine logic: which frame keys are
//! acceptable, which directory names are skipped, which extensions are
//! processed, and how a per-file failure affects the run. A TOML file can
//! override any subset of the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What a per-file open/persist failure does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the whole traversal on the first failing file.
    Abort,
    /// Log the failure and continue with the next file.
    Skip,
}

/// Policy data driving the default action pipeline and the tree walker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Frame keys that survive `DeleteUnacceptableTags`.
    pub acceptable_tags: Vec<String>,
    /// Directory base names skipped entirely during traversal.
    pub excluded_dirs: Vec<String>,
    /// File extensions handed to the engine; anything else is skipped.
    pub extensions: Vec<String>,
    /// Per-file failure policy.
    pub on_error: ErrorPolicy,
    /// Minimum acceptable edge length for embedded cover art, in pixels.
    pub min_cover_edge: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            acceptable_tags: default_acceptable_tags(),
            excluded_dirs: vec![
                "__Unsorted".to_string(),
                ".sync".to_string(),
                "Rubbish".to_string(),
            ],
            extensions: vec!["mp3".to_string()],
            on_error: ErrorPolicy::Abort,
            min_cover_edge: 300,
        }
    }
}

impl SweepConfig {
    /// Load configuration from a TOML file, or defaults when `path` is None.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {} failed: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("parse {} failed: {e}", path.display())))
    }

    pub fn is_supported_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d == name)
    }
}

fn default_acceptable_tags() -> Vec<String> {
    [
        "APIC:",
        "TALB",
        "TPE1",
        "TPE2",
        "TCON",
        "TIT2",
        "TCOM",
        "TDRC",
        "TRCK",
        "USLT::eng",
        "TXXX:YEARORDER",
        "TXXX:YEARORDERDIGITS",
        "TXXX:TRACKDIGITS",
        "TXXX:PERFORMER",
        "TXXX:GROUP",
        "TXXX:LARGESERIESINDICATOR",
        "TXXX:SERIES",
        "TXXX:COUNTRY",
        "TXXX:SUPERGENRE",
        "TXXX:SUBGENRE",
        "TXXX:GENRESPECIFIER",
        "TXXX:SECONDARYGENRES",
        "TXXX:ALBUMTRANSLATION",
        "TXXX:ARTISTTRANSLATION",
        "TXXX:TITLETRANSLATION",
        "TXXX:ARTISTAPPENDIX",
        "TXXX:ALBUMAPPENDIX",
        "TXXX:TITLEAPPENDIX",
        "TXXX:EXTENDEDARTIST",
        "TXXX:EXTENDEDALBUM",
        "TXXX:EXTENDEDTITLE",
        "TXXX:RYMARTIST",
        "TXXX:RYMALBUM",
        "TXXX:RYMTYPE",
        "TXXX:SERIESEXCEPTION",
        "TXXX:ALBUMARTISTEXCEPTION",
        "TXXX:ALBUMEXCEPTION",
        "TXXX:ARTISTEXCEPTION",
        "TXXX:TITLEEXCEPTION",
        "TXXX:RYMARTISTEXCEPTION",
        "TXXX:RYMALBUMEXCEPTION",
        "TXXX:RYMTYPEEXCEPTION",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_standard_fields() {
        let config = SweepConfig::default();
        assert!(config.acceptable_tags.contains(&"TPE1".to_string()));
        assert!(config.acceptable_tags.contains(&"USLT::eng".to_string()));
        assert!(config.is_excluded_dir("Rubbish"));
        assert!(config.is_supported_extension("mp3"));
        assert!(config.is_supported_extension("MP3"));
        assert!(!config.is_supported_extension("flac"));
        assert_eq!(config.on_error, ErrorPolicy::Abort);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let parsed: SweepConfig = toml::from_str(
            r#"
            extensions = ["mp3", "flac"]
            on_error = "skip"
            "#,
        )
        .unwrap();
        assert!(parsed.is_supported_extension("flac"));
        assert_eq!(parsed.on_error, ErrorPolicy::Skip);
        assert_eq!(parsed.excluded_dirs, SweepConfig::default().excluded_dirs);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed: std::result::Result<SweepConfig, _> = toml::from_str("bogus = 1");
        assert!(parsed.is_err());
    }

    #[test]
    fn load_without_path_yields_defaults() {
        let config = SweepConfig::load(None).unwrap();
        assert_eq!(config.min_cover_edge, 300);
    }
}
