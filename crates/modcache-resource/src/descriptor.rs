use std::path::PathBuf;

use modcache_version::ModuleVersion;

use crate::FetchOps;

/// A validated, immutable proxy request, assembled by the request classifier.
#[derive(Debug, Clone)]
pub struct FetchDescriptor {
    pub ops: FetchOps,
    /// The original proxy path, kept for logging and as the cache key.
    pub name: String,
    /// Scratch directory the driver may write artifacts into.
    pub temp_dir: PathBuf,
    pub module_path: String,
    /// The decoded version string. For `Resolve` this may be a non-semver
    /// identifier such as `"latest"` or a branch name.
    pub module_version: String,
    pub required_to_verify: bool,
}

impl FetchDescriptor {
    pub fn new(
        ops: FetchOps,
        name: impl Into<String>,
        temp_dir: impl Into<PathBuf>,
        module_path: impl Into<String>,
        module_version: impl Into<String>,
        required_to_verify: bool,
    ) -> Self {
        Self {
            ops,
            name: name.into(),
            temp_dir: temp_dir.into(),
            module_path: module_path.into(),
            module_version: module_version.into(),
            required_to_verify,
        }
    }

    /// `"<module_path>@<module_version>"`, the argument shape the driver expects.
    pub fn mod_at_ver(&self) -> String {
        format!("{}@{}", self.module_path, self.module_version)
    }

    /// MIME type of the byte stream this descriptor will ultimately produce.
    /// A pure function of `ops` — never of request content.
    pub fn content_type(&self) -> &'static str {
        match self.ops {
            FetchOps::Resolve => "application/json; charset=utf-8",
            FetchOps::List => "text/plain; charset=utf-8",
            FetchOps::DownloadInfo => "application/json; charset=utf-8",
            FetchOps::DownloadMod => "text/plain; charset=utf-8",
            FetchOps::DownloadZip => "application/zip",
            FetchOps::Invalid => "application/octet-stream",
        }
    }

    /// `true` when `module_version` parses as a semantic version (mandatory
    /// `v` prefix). Descriptors for `DownloadMod`/`DownloadZip` must satisfy this.
    pub fn has_semver_version(&self) -> bool {
        ModuleVersion::is_valid(&self.module_version)
    }
}
