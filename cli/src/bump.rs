//! Semantic version tag arithmetic.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BumpError {
    #[error("unknown version part {0:?}, expected major, minor or patch")]
    UnknownPart(String),

    #[error("tag {0:?} is not a version")]
    NotAVersion(String),
}

/// Which component of `major.minor.patch` to increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Major,
    Minor,
    Patch,
}

impl FromStr for Part {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Part::Major),
            "minor" => Ok(Part::Minor),
            "patch" | "" => Ok(Part::Patch),
            other => Err(BumpError::UnknownPart(other.to_string())),
        }
    }
}

/// Computes the tag following `current`.
///
/// `prefix` is stripped from `current` when present; anything after the
/// numeric `major.minor.patch` run is dropped. Missing components count
/// as zero. The result is `prefix`, the bumped version, then `suffix`.
pub fn next_tag(current: &str, prefix: &str, suffix: &str, part: Part) -> Result<String, BumpError> {
    let version = current.strip_prefix(prefix).unwrap_or(current);
    let end = version
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(version.len());
    let numbers: Vec<&str> = version[..end].trim_end_matches('.').split('.').collect();
    if numbers.len() > 3 || numbers.iter().any(|n| n.is_empty()) {
        return Err(BumpError::NotAVersion(current.to_string()));
    }

    let mut parsed = [0u64; 3];
    for (slot, number) in parsed.iter_mut().zip(&numbers) {
        *slot = number
            .parse()
            .map_err(|_| BumpError::NotAVersion(current.to_string()))?;
    }
    let [major, minor, patch] = parsed;
    let (major, minor, patch) = match part {
        Part::Major => (major + 1, 0, 0),
        Part::Minor => (major, minor + 1, 0),
        Part::Patch => (major, minor, patch + 1),
    };
    Ok(format!("{prefix}{major}.{minor}.{patch}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_tag_parts() {
        assert_eq!(next_tag("v1.2.3", "v", "", Part::Patch).unwrap(), "v1.2.4");
        assert_eq!(next_tag("v1.2.3", "v", "", Part::Minor).unwrap(), "v1.3.0");
        assert_eq!(next_tag("v1.2.3", "v", "", Part::Major).unwrap(), "v2.0.0");
    }

    #[test]
    fn test_next_tag_drops_old_suffix_and_adds_new() {
        assert_eq!(next_tag("v0.9.1-rc1", "v", "-rc", Part::Patch).unwrap(), "v0.9.2-rc");
    }

    #[test]
    fn test_next_tag_fills_missing_components() {
        assert_eq!(next_tag("3", "", "", Part::Minor).unwrap(), "3.1.0");
        assert_eq!(next_tag("release-2.4", "release-", "", Part::Patch).unwrap(), "release-2.4.1");
    }

    #[test]
    fn test_next_tag_rejects_non_versions() {
        assert_eq!(
            next_tag("latest", "v", "", Part::Patch),
            Err(BumpError::NotAVersion("latest".into()))
        );
        assert!(next_tag("1.2.3.4", "", "", Part::Patch).is_err());
        assert!(next_tag("1..2", "", "", Part::Patch).is_err());
    }

    #[test]
    fn test_part_from_str() {
        assert_eq!("minor".parse::<Part>(), Ok(Part::Minor));
        assert_eq!("".parse::<Part>(), Ok(Part::Patch));
        assert_eq!(
            "huge".parse::<Part>(),
            Err(BumpError::UnknownPart("huge".into()))
        );
    }
}
