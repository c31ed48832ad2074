use std::path::PathBuf;

use modcache_resource::{decode, decode_version, FetchDescriptor, FetchOps, PathError};
use modcache_version::ModuleVersion;
use thiserror::Error;

use crate::SumdbConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("missing /@v/")]
    MissingAtV,
    #[error("no file extension in filename \"{0}\"")]
    NoFileExtension(String),
    #[error("unexpected extension \"{0}\"")]
    UnexpectedExtension(String),
    #[error("unrecognized version")]
    UnrecognizedVersion,
    #[error("invalid version")]
    InvalidVersion,
    #[error(transparent)]
    Path(#[from] PathError),
}

/// Classifies a raw proxy request path into a validated [`FetchDescriptor`].
///
/// `temp_dir` is handed to the driver adapter as scratch space; it is not
/// interpreted here. `sumdb` decides `required_to_verify` for the resolved
/// module path.
pub fn classify(name: &str, temp_dir: impl Into<PathBuf>, sumdb: &SumdbConfig) -> Result<FetchDescriptor, ClassifyError> {
    let temp_dir = temp_dir.into();

    if let Some(encoded_module_path) = name.strip_suffix("/@latest") {
        let module_path = decode(encoded_module_path)?;
        let required_to_verify = sumdb.required_to_verify(&module_path);
        return Ok(FetchDescriptor::new(
            FetchOps::Resolve,
            name,
            temp_dir,
            module_path,
            "latest",
            required_to_verify,
        ));
    }

    let (encoded_module_path, suffix) = name.split_once("/@v/").ok_or(ClassifyError::MissingAtV)?;

    let (ops, encoded_version) = if suffix == "list" {
        (FetchOps::List, "latest")
    } else {
        let (stem, ext) = suffix
            .rsplit_once('.')
            .ok_or_else(|| ClassifyError::NoFileExtension(suffix.to_string()))?;

        let ops = match ext {
            "info" => FetchOps::DownloadInfo,
            "mod" => FetchOps::DownloadMod,
            "zip" => FetchOps::DownloadZip,
            other => return Err(ClassifyError::UnexpectedExtension(format!(".{other}"))),
        };
        (ops, stem)
    };

    let module_path = decode(encoded_module_path)?;
    let module_version = if ops == FetchOps::List {
        encoded_version.to_string()
    } else {
        decode_version(encoded_version)?
    };

    if ops != FetchOps::List && module_version == "latest" {
        return Err(ClassifyError::InvalidVersion);
    }

    let is_semver = ModuleVersion::is_valid(&module_version);
    let ops = match ops {
        FetchOps::DownloadMod | FetchOps::DownloadZip if !is_semver => {
            return Err(ClassifyError::UnrecognizedVersion);
        }
        FetchOps::DownloadInfo if !is_semver => FetchOps::Resolve,
        other => other,
    };

    let required_to_verify = sumdb.required_to_verify(&module_path);
    Ok(FetchDescriptor::new(ops, name, temp_dir, module_path, module_version, required_to_verify))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_default(name: &str) -> Result<FetchDescriptor, ClassifyError> {
        classify(name, "/tmp", &SumdbConfig::default())
    }

    #[test]
    fn latest_shortcut_resolves() {
        let d = classify_default("example.com/foo/bar/@latest").unwrap();
        assert_eq!(d.ops, FetchOps::Resolve);
        assert_eq!(d.module_path, "example.com/foo/bar");
        assert_eq!(d.module_version, "latest");
        assert_eq!(d.content_type(), "application/json; charset=utf-8");
        assert!(d.required_to_verify);
    }

    #[test]
    fn list_endpoint() {
        let d = classify_default("example.com/foo/bar/@v/list").unwrap();
        assert_eq!(d.ops, FetchOps::List);
        assert_eq!(d.module_version, "latest");
        assert_eq!(d.content_type(), "text/plain; charset=utf-8");
    }

    #[test]
    fn download_info_with_semver() {
        let d = classify_default("example.com/foo/bar/@v/v1.0.0.info").unwrap();
        assert_eq!(d.ops, FetchOps::DownloadInfo);
        assert_eq!(d.module_version, "v1.0.0");
    }

    #[test]
    fn unexpected_extension_fails() {
        assert_eq!(
            classify_default("example.com/foo/bar/@v/v1.0.0.ext"),
            Err(ClassifyError::UnexpectedExtension(".ext".to_string()))
        );
    }

    #[test]
    fn explicit_latest_in_v_path_is_rejected() {
        assert_eq!(
            classify_default("example.com/foo/bar/@v/latest.info"),
            Err(ClassifyError::InvalidVersion)
        );
    }

    #[test]
    fn non_semver_info_downgrades_to_resolve() {
        let d = classify_default("example.com/foo/bar/@v/master.info").unwrap();
        assert_eq!(d.ops, FetchOps::Resolve);
        assert_eq!(d.module_version, "master");
    }

    #[test]
    fn non_semver_mod_is_unrecognized() {
        assert_eq!(
            classify_default("example.com/foo/bar/@v/master.mod"),
            Err(ClassifyError::UnrecognizedVersion)
        );
    }

    #[test]
    fn missing_at_v_fails() {
        assert_eq!(classify_default("example.com/foo/bar"), Err(ClassifyError::MissingAtV));
    }

    #[test]
    fn empty_suffix_has_no_extension() {
        assert_eq!(
            classify_default("example.com/foo/bar/@v/"),
            Err(ClassifyError::NoFileExtension(String::new()))
        );
    }

    #[test]
    fn escaped_case_round_trips_through_classification() {
        let d = classify_default("example.com/!foo/bar/@v/!v1.0.0.info").unwrap();
        assert_eq!(d.module_path, "example.com/Foo/bar");
        assert_eq!(d.module_version, "V1.0.0");
    }

    #[test]
    fn double_bang_is_rejected() {
        assert!(matches!(classify_default("example.com/!!foo/bar/@latest"), Err(ClassifyError::Path(_))));
    }

    #[test]
    fn sumdb_off_disables_verification() {
        let sumdb = SumdbConfig::new(false, "", "");
        let d = classify("example.com/foo/bar/@latest", "/tmp", &sumdb).unwrap();
        assert!(!d.required_to_verify);
    }
}
