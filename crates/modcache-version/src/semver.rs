//! `ModuleVersion`: the `vMAJOR.MINOR.PATCH[-pre][+build]` convention used by module paths.
//!
//! Module versions are semantic versions with a mandatory leading `v`, so that a bare
//! module path segment is never confused with a number. This wrapper owns the `v`
//! stripping/re-adding so the rest of the crate can work with [`semver::Version`] directly.

use std::ops::Deref;
use std::str::FromStr;

use semver::Version;

use crate::VersionError;

/// A parsed module version, e.g. `v1.2.3` or `v0.0.0-20230101000000-abcdef123456`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleVersion(Version);

impl ModuleVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Returns `true` if `s` parses as a valid module version (`v` prefix required).
    pub fn is_valid(s: &str) -> bool {
        s.parse::<ModuleVersion>().is_ok()
    }

    /// Access the underlying `semver` crate type.
    pub fn inner(&self) -> &Version {
        &self.0
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    pub fn pre(&self) -> &str {
        self.0.pre.as_str()
    }

    pub fn build(&self) -> &str {
        self.0.build.as_str()
    }
}

impl FromStr for ModuleVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix('v').ok_or(VersionError::MissingVPrefix)?;
        let version = rest.parse().map_err(VersionError::SemVer)?;
        Ok(Self(version))
    }
}

impl std::fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl Deref for ModuleVersion {
    type Target = Version;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_version() {
        let v: ModuleVersion = "v1.2.3".parse().unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (1, 2, 3));
    }

    #[test]
    fn parses_pseudo_version() {
        let v: ModuleVersion = "v0.0.0-20230101000000-abcdef123456".parse().unwrap();
        assert_eq!(v.pre(), "20230101000000-abcdef123456");
    }

    #[test]
    fn rejects_missing_v_prefix() {
        assert!("1.2.3".parse::<ModuleVersion>().is_err());
    }

    #[test]
    fn rejects_non_semver_body() {
        assert!("vlatest".parse::<ModuleVersion>().is_err());
        assert!("vmaster".parse::<ModuleVersion>().is_err());
    }

    #[test]
    fn is_valid_matches_parse() {
        assert!(ModuleVersion::is_valid("v1.0.0"));
        assert!(!ModuleVersion::is_valid("latest"));
        assert!(!ModuleVersion::is_valid("master"));
    }

    #[test]
    fn display_round_trips() {
        let v: ModuleVersion = "v1.2.3-beta.1+build.5".parse().unwrap();
        assert_eq!(v.to_string(), "v1.2.3-beta.1+build.5");
    }

    #[test]
    fn ordering_compares_numerically() {
        let v1: ModuleVersion = "v1.0.0".parse().unwrap();
        let v2: ModuleVersion = "v2.0.0".parse().unwrap();
        assert!(v1 < v2);
    }
}
