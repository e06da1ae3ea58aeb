//! Locating and rewriting version assignments inside a build file.
//!
//! This is a narrow pattern transform, not a Gradle parser: only the first
//! matching assignment is read or replaced and every other byte of the file
//! passes through unchanged.

use crate::error::{BumpError, Result};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Which version assignments a build file carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldLayout {
    /// `version = "1.2.3"` (or `versionName = ...`), no build counter
    #[default]
    Version,
    /// `versionName = "1.2.3"` together with `versionCode = 42`
    VersionNameAndCode,
}

impl FieldLayout {
    pub fn from_tracking(track_version_code: bool) -> Self {
        if track_version_code {
            FieldLayout::VersionNameAndCode
        } else {
            FieldLayout::Version
        }
    }

    pub fn tracks_code(&self) -> bool {
        matches!(self, FieldLayout::VersionNameAndCode)
    }

    fn name_regex(&self) -> &'static Regex {
        match self {
            FieldLayout::Version => {
                static RE: OnceLock<Regex> = OnceLock::new();
                RE.get_or_init(|| {
                    Regex::new(r#"\b(version(?:Name)?)\s*=\s*['"](.*?)['"]"#)
                        .expect("version regex must compile")
                })
            }
            FieldLayout::VersionNameAndCode => {
                static RE: OnceLock<Regex> = OnceLock::new();
                RE.get_or_init(|| {
                    Regex::new(r#"\b(versionName)\s*=\s*['"](.*?)['"]"#)
                        .expect("versionName regex must compile")
                })
            }
        }
    }
}

fn code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\bversionCode\s*=[ \t]*(\d*)").expect("versionCode regex must compile")
    })
}

/// Raw version values as they appear in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionFields {
    pub version_name: String,
    /// Present only for [`FieldLayout::VersionNameAndCode`]. May be empty when
    /// the file has `versionCode =` with no digits.
    pub version_code: Option<String>,
}

/// Read the first version assignment (and build counter, if tracked) from `blob`.
pub fn extract_version_fields(blob: &str, layout: FieldLayout) -> Result<VersionFields> {
    let version_name = layout
        .name_regex()
        .captures(blob)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string())
        .ok_or(BumpError::VersionFieldNotFound)?;

    let version_code = if layout.tracks_code() {
        let code = code_regex()
            .captures(blob)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or(BumpError::VersionCodeNotFound)?;
        Some(code)
    } else {
        None
    };

    Ok(VersionFields {
        version_name,
        version_code,
    })
}

/// Rewrite the first version assignment to `new_version_name` and, when the
/// layout tracks one, the first `versionCode` to `new_version_code`.
///
/// The value is always written in double quotes; the original key
/// (`version` or `versionName`) is kept.
pub fn apply_version_fields(
    blob: &str,
    layout: FieldLayout,
    new_version_name: &str,
    new_version_code: Option<u64>,
) -> String {
    let updated = layout
        .name_regex()
        .replace(blob, |caps: &Captures| {
            format!("{} = \"{}\"", &caps[1], new_version_name)
        })
        .into_owned();

    match new_version_code {
        Some(code) if layout.tracks_code() => code_regex()
            .replace(&updated, |_: &Captures| format!("versionCode = {}", code))
            .into_owned(),
        _ => updated,
    }
}
