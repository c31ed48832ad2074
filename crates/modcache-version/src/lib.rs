//! Module version parsing and ordering.
//!
//! A module version is a [`semver`](https://semver.org) string with a mandatory leading
//! `v`, as used to identify a specific release of a module. Non-semver identifiers
//! (branch names, the literal `latest`) are valid inputs to resolution but are never
//! accepted here — callers distinguish "needs resolution" from "already a version" by
//! checking [`ModuleVersion::is_valid`] before constructing one.

pub mod semver;

pub use semver::ModuleVersion;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("module version is missing its leading 'v'")]
    MissingVPrefix,
    #[error("invalid semver: {0}")]
    SemVer(#[source] ::semver::Error),
}
