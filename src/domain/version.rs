use crate::error::{BumpError, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic version as found in a build file: `major.minor.patch` plus an
/// optional `-suffix` that is carried through increments untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Empty, or a single leading hyphen followed by the tag (e.g. `-beta`).
    pub suffix: String,
}

impl Version {
    /// Create a version without a suffix
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            suffix: String::new(),
        }
    }

    /// Attach a suffix. A missing leading hyphen is added.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.suffix = if suffix.is_empty() || suffix.starts_with('-') {
            suffix
        } else {
            format!("-{}", suffix)
        };
        self
    }

    /// Parse a version string such as `1.2.3`, `1.2`, `1` or `1.2.3-beta`.
    ///
    /// Everything after the first hyphen becomes the suffix. Missing
    /// components are zero-filled and components past the third are ignored.
    /// Non-numeric components are rejected with [`BumpError::MalformedVersion`].
    pub fn parse(raw: &str) -> Result<Self> {
        let (base, suffix) = match raw.split_once('-') {
            Some((base, tag)) => (base, format!("-{}", tag)),
            None => (raw, String::new()),
        };

        let mut parts: Vec<&str> = base.split('.').collect();
        while parts.len() < 3 {
            parts.push("0");
        }

        let major = parse_component(raw, "major", parts[0])?;
        let minor = parse_component(raw, "minor", parts[1])?;
        let patch = parse_component(raw, "patch", parts[2])?;

        Ok(Version {
            major,
            minor,
            patch,
            suffix,
        })
    }

    /// Bump according to `kind`, resetting lower components to zero.
    pub fn bump(&self, kind: IncrementKind) -> Result<Self> {
        let overflow = || BumpError::MalformedVersion(format!("{} cannot be incremented", self));
        let bumped = match kind {
            IncrementKind::Major => Version {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
                suffix: self.suffix.clone(),
            },
            IncrementKind::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
                suffix: self.suffix.clone(),
            },
            IncrementKind::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
                suffix: self.suffix.clone(),
            },
        };
        Ok(bumped)
    }
}

fn parse_component(raw: &str, name: &str, component: &str) -> Result<u64> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BumpError::MalformedVersion(format!(
            "invalid {} component '{}' in '{}'",
            name, component, raw
        )));
    }
    component.parse::<u64>().map_err(|_| {
        BumpError::MalformedVersion(format!(
            "{} component '{}' in '{}' is out of range",
            name, component, raw
        ))
    })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}{}",
            self.major, self.minor, self.patch, self.suffix
        )
    }
}

/// Which component of the version advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementKind {
    Major,
    Minor,
    Patch,
}

impl IncrementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncrementKind::Major => "major",
            IncrementKind::Minor => "minor",
            IncrementKind::Patch => "patch",
        }
    }
}

impl FromStr for IncrementKind {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(IncrementKind::Major),
            "minor" => Ok(IncrementKind::Minor),
            "patch" => Ok(IncrementKind::Patch),
            _ => Err(BumpError::InvalidIncrementKind(s.to_string())),
        }
    }
}

impl fmt::Display for IncrementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the next version name for `kind`.
///
/// - `major` → `{major+1}.0.0{suffix}`
/// - `minor` → `{major}.{minor+1}.0{suffix}`
/// - `patch` → `{major}.{minor}.{patch+1}{suffix}`
///
/// `kind` is matched case-insensitively; anything else is
/// [`BumpError::InvalidIncrementKind`].
pub fn increment_version_name(version: &Version, kind: &str) -> Result<String> {
    let kind: IncrementKind = kind.parse()?;
    Ok(version.bump(kind)?.to_string())
}
