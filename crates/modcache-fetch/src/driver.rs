use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use modcache_resource::{FetchDescriptor, FetchOps};
use modcache_version::ModuleVersion;
use serde::Deserialize;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::error::{FetchError, Result};
use crate::result::FetchResult;

/// The driver boundary: resolves, lists, and downloads modules on behalf of
/// the fetch pipeline. An implementation never reimplements the upstream
/// build tool's version-control access — it only ever re-invokes the build
/// tool as a subprocess ([`ProcessDriver`]), or hands back a canned answer
/// for tests ([`FakeDriver`]).
#[async_trait]
pub trait ModuleDriver: Send + Sync {
    async fn run(&self, descriptor: &FetchDescriptor, cancel: CancellationToken) -> Result<FetchResult>;
}

/// Invokes an external build-tool binary (default `go`, resolved via `PATH`
/// unless overridden) as a child process per operation. `descriptor.temp_dir`
/// is handed to the child as its module cache directory, so the artifacts the
/// driver writes land inside the caller's scratch space rather than the
/// ambient system cache.
pub struct ProcessDriver {
    binary: PathBuf,
}

impl ProcessDriver {
    pub fn new() -> Self {
        Self::with_binary("go")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }

    fn command(&self, temp_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.env("GOPATH", temp_dir);
        cmd.env("GOMODCACHE", temp_dir.join("mod"));
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    /// Runs `cmd` to completion, honoring `cancel`. On cancellation the child
    /// is killed and `temp_dir`'s partial contents are removed before the
    /// cancellation error is returned.
    async fn run_json<T>(&self, mut cmd: Command, cancel: CancellationToken, temp_dir: &Path) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let mut child = cmd.spawn()?;

        let output = tokio::select! {
            _ = cancel.cancelled() => {
                let _ = child.start_kill();
                let _ = child.wait().await;
                let _ = tokio::fs::remove_dir_all(temp_dir).await;
                return Err(FetchError::Cancelled);
            }
            output = child.wait_with_output() => output?,
        };

        if !output.status.success() {
            let message = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(FetchError::DriverFailed(message));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

impl Default for ProcessDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct ResolveOutput {
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Time")]
    time: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ListOutput {
    #[serde(rename = "Versions", default)]
    versions: Vec<String>,
}

#[derive(Deserialize)]
struct DownloadOutput {
    #[serde(rename = "Info", default)]
    info: Option<PathBuf>,
    #[serde(rename = "GoMod", default)]
    go_mod: Option<PathBuf>,
    #[serde(rename = "Zip", default)]
    zip: Option<PathBuf>,
}

#[async_trait]
impl ModuleDriver for ProcessDriver {
    #[instrument(skip(self, cancel), fields(mod_at_ver = %descriptor.mod_at_ver()))]
    async fn run(&self, descriptor: &FetchDescriptor, cancel: CancellationToken) -> Result<FetchResult> {
        match descriptor.ops {
            FetchOps::Resolve => {
                let mut cmd = self.command(&descriptor.temp_dir);
                cmd.args(["list", "-m", "-json", &descriptor.mod_at_ver()]);
                let out: ResolveOutput = self.run_json(cmd, cancel, &descriptor.temp_dir).await?;
                Ok(FetchResult::resolve(descriptor.clone(), out.version, out.time))
            }
            FetchOps::List => {
                let mut cmd = self.command(&descriptor.temp_dir);
                cmd.args(["list", "-m", "-versions", "-json", &descriptor.module_path]);
                let out: ListOutput = self.run_json(cmd, cancel, &descriptor.temp_dir).await?;

                let mut versions: Vec<ModuleVersion> = out.versions.iter().filter_map(|v| v.parse().ok()).collect();
                versions.sort();
                versions.dedup();

                Ok(FetchResult::list(descriptor.clone(), versions.iter().map(ModuleVersion::to_string).collect()))
            }
            FetchOps::DownloadInfo | FetchOps::DownloadMod | FetchOps::DownloadZip => {
                let mut cmd = self.command(&descriptor.temp_dir);
                cmd.args(["mod", "download", "-json", &descriptor.mod_at_ver()]);
                let out: DownloadOutput = self.run_json(cmd, cancel, &descriptor.temp_dir).await?;

                match descriptor.ops {
                    FetchOps::DownloadInfo => Ok(FetchResult::download_info(
                        descriptor.clone(),
                        out.info.ok_or(FetchError::MissingArtifact("info"))?,
                    )),
                    FetchOps::DownloadMod => Ok(FetchResult::download_mod(
                        descriptor.clone(),
                        out.go_mod.ok_or(FetchError::MissingArtifact("go_mod"))?,
                    )),
                    FetchOps::DownloadZip => Ok(FetchResult::download_zip(
                        descriptor.clone(),
                        out.zip.ok_or(FetchError::MissingArtifact("zip"))?,
                    )),
                    _ => unreachable!(),
                }
            }
            FetchOps::Invalid => Err(FetchError::InvalidOperation),
        }
    }
}

#[derive(Clone, Default)]
struct FakeArtifact {
    info: Vec<u8>,
    go_mod: Vec<u8>,
    zip: Vec<u8>,
}

/// A deterministic, in-memory [`ModuleDriver`] backed by a caller-supplied
/// fixture table. Used by this crate's own tests and by the CLI's
/// `--offline` mode.
#[derive(Clone, Default)]
pub struct FakeDriver {
    resolves: HashMap<String, (String, DateTime<Utc>)>,
    lists: HashMap<String, Vec<String>>,
    artifacts: HashMap<String, FakeArtifact>,
}

impl FakeDriver {
    pub fn builder() -> FakeDriverBuilder {
        FakeDriverBuilder::default()
    }
}

#[derive(Default)]
pub struct FakeDriverBuilder {
    inner: FakeDriver,
}

impl FakeDriverBuilder {
    /// Seeds a resolve fixture, keyed by `"<module_path>@<identifier>"`.
    pub fn with_resolve(mut self, mod_at_ver: impl Into<String>, version: impl Into<String>, time: DateTime<Utc>) -> Self {
        self.inner.resolves.insert(mod_at_ver.into(), (version.into(), time));
        self
    }

    /// Seeds a version-list fixture, keyed by bare module path.
    pub fn with_list(mut self, module_path: impl Into<String>, versions: Vec<String>) -> Self {
        self.inner.lists.insert(module_path.into(), versions);
        self
    }

    /// Seeds info/mod/zip bytes for a `"<module_path>@<version>"` key, served
    /// by whichever download operation is requested.
    pub fn with_artifact(mut self, mod_at_ver: impl Into<String>, info: impl Into<Vec<u8>>, go_mod: impl Into<Vec<u8>>, zip: impl Into<Vec<u8>>) -> Self {
        self.inner.artifacts.insert(
            mod_at_ver.into(),
            FakeArtifact {
                info: info.into(),
                go_mod: go_mod.into(),
                zip: zip.into(),
            },
        );
        self
    }

    pub fn build(self) -> FakeDriver {
        self.inner
    }
}

#[async_trait]
impl ModuleDriver for FakeDriver {
    async fn run(&self, descriptor: &FetchDescriptor, cancel: CancellationToken) -> Result<FetchResult> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        match descriptor.ops {
            FetchOps::Resolve => {
                let (version, time) = self
                    .resolves
                    .get(&descriptor.mod_at_ver())
                    .ok_or_else(|| FetchError::DriverFailed(format!("no fixture for {}", descriptor.mod_at_ver())))?;
                Ok(FetchResult::resolve(descriptor.clone(), version.clone(), *time))
            }
            FetchOps::List => {
                let versions = self
                    .lists
                    .get(&descriptor.module_path)
                    .ok_or_else(|| FetchError::DriverFailed(format!("no fixture for {}", descriptor.module_path)))?;
                Ok(FetchResult::list(descriptor.clone(), versions.clone()))
            }
            FetchOps::DownloadInfo | FetchOps::DownloadMod | FetchOps::DownloadZip => {
                let artifact = self
                    .artifacts
                    .get(&descriptor.mod_at_ver())
                    .ok_or_else(|| FetchError::DriverFailed(format!("no fixture for {}", descriptor.mod_at_ver())))?;

                tokio::fs::create_dir_all(&descriptor.temp_dir).await?;

                let (bytes, ext) = match descriptor.ops {
                    FetchOps::DownloadInfo => (&artifact.info, "info"),
                    FetchOps::DownloadMod => (&artifact.go_mod, "mod"),
                    FetchOps::DownloadZip => (&artifact.zip, "zip"),
                    _ => unreachable!(),
                };
                let path = descriptor.temp_dir.join(format!("{}.{ext}", descriptor.module_version));
                tokio::fs::write(&path, bytes).await?;

                match descriptor.ops {
                    FetchOps::DownloadInfo => Ok(FetchResult::download_info(descriptor.clone(), path)),
                    FetchOps::DownloadMod => Ok(FetchResult::download_mod(descriptor.clone(), path)),
                    FetchOps::DownloadZip => Ok(FetchResult::download_zip(descriptor.clone(), path)),
                    _ => unreachable!(),
                }
            }
            FetchOps::Invalid => Err(FetchError::InvalidOperation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn descriptor(ops: FetchOps, module_version: &str) -> FetchDescriptor {
        FetchDescriptor::new(ops, "example.com/foo/bar", "/tmp/scratch", "example.com/foo/bar", module_version, true)
    }

    #[tokio::test]
    async fn fake_driver_resolves_from_fixture() {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let driver = FakeDriver::builder().with_resolve("example.com/foo/bar@latest", "v1.2.3", time).build();

        let result = driver.run(&descriptor(FetchOps::Resolve, "latest"), CancellationToken::new()).await.unwrap();
        assert_eq!(result.version.as_deref(), Some("v1.2.3"));
        assert_eq!(result.time, Some(time));
    }

    #[tokio::test]
    async fn fake_driver_lists_from_fixture() {
        let driver = FakeDriver::builder()
            .with_list("example.com/foo/bar", vec!["v1.0.0".into(), "v1.1.0".into()])
            .build();

        let result = driver.run(&descriptor(FetchOps::List, "latest"), CancellationToken::new()).await.unwrap();
        assert_eq!(result.versions, Some(vec!["v1.0.0".to_string(), "v1.1.0".to_string()]));
    }

    #[tokio::test]
    async fn fake_driver_writes_artifact_into_temp_dir() {
        let dir = tempdir().unwrap();
        let driver = FakeDriver::builder()
            .with_artifact("example.com/foo/bar@v1.0.0", b"{}".to_vec(), b"module foo".to_vec(), b"PK\x03\x04".to_vec())
            .build();

        let mut d = descriptor(FetchOps::DownloadMod, "v1.0.0");
        d.temp_dir = dir.path().to_path_buf();

        let result = driver.run(&d, CancellationToken::new()).await.unwrap();
        let path = result.go_mod.unwrap();
        assert!(path.starts_with(dir.path()));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"module foo");
    }

    #[tokio::test]
    async fn fake_driver_missing_fixture_fails() {
        let driver = FakeDriver::default();
        let err = driver.run(&descriptor(FetchOps::Resolve, "latest"), CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, FetchError::DriverFailed(_)));
    }

    #[tokio::test]
    async fn fake_driver_honors_cancellation() {
        let driver = FakeDriver::default();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = driver.run(&descriptor(FetchOps::Resolve, "latest"), cancel).await.unwrap_err();
        assert!(matches!(err, FetchError::Cancelled));
    }
}
