use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::version::error::VersionParseError;

/// Coarsest component in which two versions differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifferenceClass {
    #[serde(rename = "MAJOR")]
    Major,
    #[serde(rename = "MINOR")]
    Minor,
    #[serde(rename = "PATCH")]
    Patch,
    /// major.minor.patch are equal; any difference is in the suffix
    #[serde(rename = "OTHER")]
    Other,
    /// At least one side is not a dotted numeric version
    #[serde(rename = "INVALID_SEMVER")]
    Invalid,
}

impl DifferenceClass {
    pub const ALL: [DifferenceClass; 5] = [
        DifferenceClass::Major,
        DifferenceClass::Minor,
        DifferenceClass::Patch,
        DifferenceClass::Other,
        DifferenceClass::Invalid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifferenceClass::Major => "MAJOR",
            DifferenceClass::Minor => "MINOR",
            DifferenceClass::Patch => "PATCH",
            DifferenceClass::Other => "OTHER",
            DifferenceClass::Invalid => "INVALID_SEMVER",
        }
    }
}

impl std::fmt::Display for DifferenceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a dotted numeric version, padding missing minor/patch with zeros.
///
/// A non-numeric suffix is allowed after the numeric part when it starts with
/// `-`, `+`, `.`, `_` or a letter. The suffix is informational only:
/// classification compares major.minor.patch. It is kept as pre-release (or
/// build metadata for `+`) when it is valid semver, and dropped otherwise.
///
/// Examples:
/// - "1" -> 1.0.0
/// - "1.2" -> 1.2.0
/// - "5.3.1.RELEASE" -> 5.3.1-RELEASE
/// - "31.1-jre" -> 31.1.0-jre
/// - "RELEASE" -> error
pub fn parse_version(version: &str) -> Result<Version, VersionParseError> {
    let version = version.trim();
    if version.is_empty() {
        return Err(VersionParseError::Empty);
    }

    let mut components = [0u64; 3];
    let mut rest = version;
    for (i, slot) in components.iter_mut().enumerate() {
        if i > 0 {
            match rest.strip_prefix('.') {
                Some(tail) if tail.starts_with(|c: char| c.is_ascii_digit()) => rest = tail,
                _ => break,
            }
        }

        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            return Err(VersionParseError::NotNumeric(version.to_string()));
        }
        *slot = rest[..digits]
            .parse()
            .map_err(|_| VersionParseError::Overflow(version.to_string()))?;
        rest = &rest[digits..];
    }

    let [major, minor, patch] = components;
    let mut parsed = Version::new(major, minor, patch);
    if rest.is_empty() {
        return Ok(parsed);
    }

    let tail = suffix_tail(rest).ok_or_else(|| VersionParseError::InvalidSuffix {
        version: version.to_string(),
        suffix: rest.to_string(),
    })?;
    let kept = if rest.starts_with('+') {
        BuildMetadata::new(tail).map(|build| parsed.build = build)
    } else {
        Prerelease::new(tail).map(|pre| parsed.pre = pre)
    };
    if let Err(e) = kept {
        debug!("Dropping suffix '{}' of '{}': {}", rest, version, e);
    }

    Ok(parsed)
}

/// Returns the suffix without its leading separator, or None if the suffix is malformed
fn suffix_tail(suffix: &str) -> Option<&str> {
    let first = suffix.chars().next()?;
    if first.is_ascii_alphabetic() {
        return Some(suffix);
    }
    if !matches!(first, '-' | '+' | '.' | '_') {
        return None;
    }
    let tail = &suffix[1..];
    tail.starts_with(|c: char| c.is_ascii_alphanumeric())
        .then_some(tail)
}

/// Classify the difference between a resolved and an omitted version
pub fn try_classify(resolved: &str, omitted: &str) -> Result<DifferenceClass, VersionParseError> {
    let resolved = parse_version(resolved)?;
    let omitted = parse_version(omitted)?;

    let class = if resolved.major != omitted.major {
        DifferenceClass::Major
    } else if resolved.minor != omitted.minor {
        DifferenceClass::Minor
    } else if resolved.patch != omitted.patch {
        DifferenceClass::Patch
    } else {
        DifferenceClass::Other
    };

    Ok(class)
}

/// Like [`try_classify`], but folds parse failures into [`DifferenceClass::Invalid`]
pub fn classify(resolved: &str, omitted: &str) -> DifferenceClass {
    try_classify(resolved, omitted).unwrap_or_else(|e| {
        debug!("Cannot compare '{}' with '{}': {}", resolved, omitted, e);
        DifferenceClass::Invalid
    })
}
