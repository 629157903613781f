//! PingFederate product versions supported by this crate
//!
//! Versions may be given as `major.minor` (the latest known patch is
//! assumed) or `major.minor.patch`. An unknown patch of a known
//! `major.minor` is accepted with a warning.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Every version this crate knows, oldest first
const SUPPORTED: &[(u32, u32, u32)] = &[
    (11, 2, 0),
    (11, 2, 1),
    (11, 2, 2),
    (11, 2, 3),
    (11, 2, 4),
    (11, 2, 5),
    (11, 2, 6),
    (11, 2, 7),
    (11, 2, 8),
    (11, 2, 9),
    (11, 2, 10),
    (11, 2, 11),
    (11, 3, 0),
    (11, 3, 1),
    (11, 3, 2),
    (11, 3, 3),
    (11, 3, 4),
    (11, 3, 5),
    (11, 3, 6),
    (11, 3, 7),
    (11, 3, 8),
    (11, 3, 9),
    (11, 3, 10),
    (12, 0, 0),
    (12, 0, 1),
    (12, 0, 2),
    (12, 0, 3),
    (12, 0, 4),
    (12, 0, 5),
    (12, 0, 6),
    (12, 1, 0),
    (12, 1, 1),
    (12, 1, 2),
    (12, 1, 3),
    (12, 1, 4),
];

/// A supported PingFederate version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupportedVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

/// Outcome of parsing a version string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    /// The resolved supported version
    pub version: SupportedVersion,
    /// Set when an unknown patch was replaced by the latest known one
    pub warning: Option<String>,
    /// True only when the input named a known patch explicitly
    pub patch_pinned: bool,
}

impl SupportedVersion {
    const fn from_tuple((major, minor, patch): (u32, u32, u32)) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// All supported versions, oldest first
    pub fn all() -> impl Iterator<Item = SupportedVersion> {
        SUPPORTED.iter().copied().map(Self::from_tuple)
    }

    /// The newest supported version
    pub fn latest() -> Self {
        Self::from_tuple(SUPPORTED[SUPPORTED.len() - 1])
    }

    /// Check whether the exact version is known
    pub fn is_valid(major: u32, minor: u32, patch: u32) -> bool {
        SUPPORTED.contains(&(major, minor, patch))
    }

    /// Latest known patch for a major.minor line
    fn latest_patch(major: u32, minor: u32) -> Option<Self> {
        SUPPORTED
            .iter()
            .rev()
            .find(|(ma, mi, _)| *ma == major && *mi == minor)
            .copied()
            .map(Self::from_tuple)
    }

    /// Parse a `x.y` or `x.y.z` version string
    pub fn parse(input: &str) -> Result<ParsedVersion> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::version(
                "failed to parse PingFederate version: empty version string",
            ));
        }

        let digits: Vec<&str> = input.split('.').collect();
        if digits.len() != 2 && digits.len() != 3 {
            return Err(Error::version(format!(
                "failed to parse PingFederate version '{input}'. Expected either two digits (e.g. '11.3') or three digits (e.g. '11.3.4')"
            )));
        }

        let numbers = digits
            .iter()
            .map(|d| d.parse::<u32>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| {
                Error::version(format!(
                    "failed to parse PingFederate version '{input}': components must be numbers"
                ))
            })?;

        let (major, minor) = (numbers[0], numbers[1]);
        let Some(latest) = Self::latest_patch(major, minor) else {
            return Err(Error::version(format!(
                "PingFederate version '{input}' is not supported. {}",
                supported_versions_message()
            )));
        };

        let Some(&patch) = numbers.get(2) else {
            return Ok(ParsedVersion {
                version: latest,
                warning: None,
                patch_pinned: false,
            });
        };

        if Self::is_valid(major, minor, patch) {
            return Ok(ParsedVersion {
                version: Self {
                    major,
                    minor,
                    patch,
                },
                warning: None,
                patch_pinned: true,
            });
        }

        Ok(ParsedVersion {
            version: latest,
            warning: Some(format!(
                "PingFederate patch version '{input}' is not recognized. Assuming the latest supported patch version: '{latest}'"
            )),
            patch_pinned: false,
        })
    }
}

impl SupportedVersion {
    /// Check a server-reported version (e.g. `12.1.2.1`) against this one.
    ///
    /// The patch is compared only when `patch_pinned`; otherwise any patch of
    /// the same `major.minor` line matches.
    pub fn matches_server(&self, server_version: &str, patch_pinned: bool) -> bool {
        let mut components = server_version
            .trim()
            .split('.')
            .map(|c| c.parse::<u32>().ok());

        let (Some(Some(major)), Some(Some(minor))) = (components.next(), components.next())
        else {
            return false;
        };
        if (major, minor) != (self.major, self.minor) {
            return false;
        }
        if !patch_pinned {
            return true;
        }
        matches!(components.next(), Some(Some(patch)) if patch == self.patch)
    }
}

impl PartialOrd for SupportedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SupportedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl fmt::Display for SupportedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn supported_versions_message() -> String {
    let versions: Vec<String> = SupportedVersion::all().map(|v| v.to_string()).collect();
    format!("Supported versions are: {}", versions.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn v(major: u32, minor: u32, patch: u32) -> SupportedVersion {
        SupportedVersion {
            major,
            minor,
            patch,
        }
    }

    #[test_case("11.3.4", v(11, 3, 4) ; "exact")]
    #[test_case("11.2", v(11, 2, 11) ; "major minor 11.2")]
    #[test_case("12.0", v(12, 0, 6) ; "major minor 12.0")]
    #[test_case("12.1", v(12, 1, 4) ; "latest line")]
    #[test_case(" 12.0.1 ", v(12, 0, 1) ; "trimmed")]
    fn test_parse_supported(input: &str, expected: SupportedVersion) {
        let parsed = SupportedVersion::parse(input).unwrap();
        assert_eq!(parsed.version, expected);
        assert!(parsed.warning.is_none());
    }

    #[test_case("11.3.4", true ; "explicit patch")]
    #[test_case("11.3", false ; "major minor only")]
    #[test_case("11.3.99", false ; "unknown patch")]
    fn test_parse_patch_pinned(input: &str, pinned: bool) {
        assert_eq!(SupportedVersion::parse(input).unwrap().patch_pinned, pinned);
    }

    #[test]
    fn test_parse_unknown_patch_warns() {
        let parsed = SupportedVersion::parse("11.3.99").unwrap();
        assert_eq!(parsed.version, v(11, 3, 10));
        assert!(parsed.warning.unwrap().contains("11.3.10"));
    }

    #[test_case("12.1.2.1", false, true ; "unpinned any patch of the line")]
    #[test_case("12.1.4.0", true, true ; "pinned same patch")]
    #[test_case("12.1.2.1", true, false ; "pinned other patch")]
    #[test_case("12.0.6.3", false, false ; "other line")]
    #[test_case("12.1", false, true ; "server without patch")]
    #[test_case("12.1", true, false ; "pinned server without patch")]
    #[test_case("garbage", false, false ; "unparseable")]
    fn test_matches_server(server: &str, patch_pinned: bool, expected: bool) {
        assert_eq!(v(12, 1, 4).matches_server(server, patch_pinned), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("12" ; "one digit")]
    #[test_case("12.1.0.1" ; "four digits")]
    #[test_case("12.x" ; "not a number")]
    #[test_case("10.3" ; "unsupported line")]
    #[test_case("13.0.0" ; "future line")]
    fn test_parse_rejected(input: &str) {
        assert!(matches!(
            SupportedVersion::parse(input),
            Err(Error::Version { .. })
        ));
    }

    #[test]
    fn test_unsupported_lists_versions() {
        let err = SupportedVersion::parse("10.0").unwrap_err();
        assert!(err.to_string().contains("Supported versions are: 11.2.0"));
    }

    #[test]
    fn test_ordering() {
        assert!(v(11, 3, 10) < v(12, 0, 0));
        assert!(v(12, 1, 4) > v(12, 1, 3));
        assert_eq!(SupportedVersion::latest(), v(12, 1, 4));
        assert!(SupportedVersion::all().collect::<Vec<_>>().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_display() {
        assert_eq!(v(12, 0, 3).to_string(), "12.0.3");
    }
}
