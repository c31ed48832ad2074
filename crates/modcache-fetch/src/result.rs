use std::io::Cursor;
use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use modcache_resource::{FetchDescriptor, FetchOps};
use serde::Serialize;
use tokio::io::AsyncRead;

use crate::error::{FetchError, Result};

/// The post-execution record produced by a [`crate::ModuleDriver`].
///
/// Mirrors the wire shape directly: only the fields relevant to
/// `descriptor.ops` are ever populated. [`FetchResult::open`] fails
/// deterministically if the populated fields don't match `ops`.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub descriptor: FetchDescriptor,
    pub version: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub versions: Option<Vec<String>>,
    pub info: Option<PathBuf>,
    pub go_mod: Option<PathBuf>,
    pub zip: Option<PathBuf>,
}

impl FetchResult {
    fn empty(descriptor: FetchDescriptor) -> Self {
        Self {
            descriptor,
            version: None,
            time: None,
            versions: None,
            info: None,
            go_mod: None,
            zip: None,
        }
    }

    pub fn resolve(descriptor: FetchDescriptor, version: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            version: Some(version.into()),
            time: Some(time),
            ..Self::empty(descriptor)
        }
    }

    pub fn list(descriptor: FetchDescriptor, versions: Vec<String>) -> Self {
        Self {
            versions: Some(versions),
            ..Self::empty(descriptor)
        }
    }

    pub fn download_info(descriptor: FetchDescriptor, path: PathBuf) -> Self {
        Self {
            info: Some(path),
            ..Self::empty(descriptor)
        }
    }

    pub fn download_mod(descriptor: FetchDescriptor, path: PathBuf) -> Self {
        Self {
            go_mod: Some(path),
            ..Self::empty(descriptor)
        }
    }

    pub fn download_zip(descriptor: FetchDescriptor, path: PathBuf) -> Self {
        Self {
            zip: Some(path),
            ..Self::empty(descriptor)
        }
    }

    /// Renders this result as a readable byte stream shaped by
    /// `descriptor.ops`. Close is implicit in dropping the returned reader.
    pub async fn open(&self) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
        match self.descriptor.ops {
            FetchOps::Resolve => {
                let version = self.version.as_deref().ok_or(FetchError::MissingArtifact("version"))?;
                let time = self.time.ok_or(FetchError::MissingArtifact("time"))?;
                Ok(Box::new(Cursor::new(marshal_info(version, time)?)))
            }
            FetchOps::List => {
                let versions = self.versions.as_ref().ok_or(FetchError::MissingArtifact("versions"))?;
                Ok(Box::new(Cursor::new(versions.join("\n").into_bytes())))
            }
            FetchOps::DownloadInfo => self.open_artifact(self.info.as_deref(), "info").await,
            FetchOps::DownloadMod => self.open_artifact(self.go_mod.as_deref(), "go_mod").await,
            FetchOps::DownloadZip => self.open_artifact(self.zip.as_deref(), "zip").await,
            FetchOps::Invalid => Err(FetchError::InvalidOperation),
        }
    }

    async fn open_artifact(&self, path: Option<&std::path::Path>, field: &'static str) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
        let path = path.ok_or(FetchError::MissingArtifact(field))?;
        let file = tokio::fs::File::open(path).await?;
        Ok(Box::new(file))
    }
}

#[derive(Serialize)]
struct InfoJson<'a> {
    #[serde(rename = "Version")]
    version: &'a str,
    #[serde(rename = "Time")]
    time: String,
}

/// The UTF-8 JSON representation of `{"Version": v, "Time": t}`, with `t`
/// first converted to UTC. Field order is fixed: `Version` then `Time`.
pub fn marshal_info(version: &str, t: DateTime<Utc>) -> Result<Vec<u8>> {
    let doc = InfoJson {
        version,
        time: format_rfc3339_nano(t.with_timezone(&Utc)),
    };
    Ok(serde_json::to_vec(&doc)?)
}

/// Renders `t` the way Go's `time.RFC3339Nano` layout does: whole-second
/// precision with the fractional part omitted entirely when it's zero, and
/// otherwise exactly as many fractional digits as the non-zero nanosecond
/// value needs (trailing zeros trimmed, not rounded to a fixed SI bucket).
/// `chrono`'s `SecondsFormat::AutoSi` instead steps through fixed 3/6/9-digit
/// buckets, which diverges from Go's exact trim for a value like
/// `123450000` ns (`AutoSi` renders `.123450`; Go renders `.12345`).
fn format_rfc3339_nano(t: DateTime<Utc>) -> String {
    let whole_seconds = t.to_rfc3339_opts(SecondsFormat::Secs, true);
    let nanos = t.nanosecond() % 1_000_000_000;
    if nanos == 0 {
        return whole_seconds;
    }

    let fractional = format!("{nanos:09}");
    let fractional = fractional.trim_end_matches('0');

    let (without_z, _) = whole_seconds.split_at(whole_seconds.len() - 1);
    format!("{without_z}.{fractional}Z")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use modcache_resource::FetchDescriptor;
    use tempfile::NamedTempFile;

    fn descriptor(ops: FetchOps) -> FetchDescriptor {
        FetchDescriptor::new(ops, "example.com/foo/bar/@v/v1.0.0.info", "/tmp", "example.com/foo/bar", "v1.0.0", true)
    }

    #[test]
    fn marshal_info_matches_fixed_field_order() {
        let t = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();
        let bytes = marshal_info("v1.0.0", t).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"Version":"v1.0.0","Time":"0001-01-01T00:00:00Z"}"#);
    }

    #[test]
    fn marshal_info_trims_fractional_seconds_exactly_like_go() {
        // 123_450_000 ns sits between chrono's milli (3-digit) and micro
        // (6-digit) `AutoSi` buckets; Go's exact trim renders 5 digits.
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap().with_nanosecond(123_450_000).unwrap();
        let bytes = marshal_info("v1.0.0", t).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"Version":"v1.0.0","Time":"2024-01-02T03:04:05.12345Z"}"#);
    }

    #[test]
    fn marshal_info_keeps_full_nine_digits_when_not_trimmable() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap().with_nanosecond(123_456_789).unwrap();
        let bytes = marshal_info("v1.0.0", t).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"Version":"v1.0.0","Time":"2024-01-02T03:04:05.123456789Z"}"#);
    }

    #[tokio::test]
    async fn open_resolve_synthesizes_info_json() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let result = FetchResult::resolve(descriptor(FetchOps::Resolve), "v1.0.0", t);
        let mut stream = result.open().await.unwrap();
        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut stream, &mut buf).await.unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), r#"{"Version":"v1.0.0","Time":"2024-01-02T03:04:05Z"}"#);
    }

    #[tokio::test]
    async fn open_list_joins_with_newlines_no_trailing() {
        let result = FetchResult::list(descriptor(FetchOps::List), vec!["v1.0.0".into(), "v1.1.0".into()]);
        let mut stream = result.open().await.unwrap();
        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut stream, &mut buf).await.unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "v1.0.0\nv1.1.0");
    }

    #[tokio::test]
    async fn open_download_mod_reads_named_file() {
        let mut file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"module example.com/foo/bar").unwrap();
        let result = FetchResult::download_mod(descriptor(FetchOps::DownloadMod), file.path().to_path_buf());
        let mut stream = result.open().await.unwrap();
        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut stream, &mut buf).await.unwrap();
        assert_eq!(buf, b"module example.com/foo/bar");
    }

    #[tokio::test]
    async fn open_invalid_operation_fails_with_literal_message() {
        let result = FetchResult::empty(descriptor(FetchOps::Invalid));
        let err = result.open().await.unwrap_err();
        assert_eq!(err.to_string(), "invalid fetch operation");
    }

    #[tokio::test]
    async fn open_mismatched_shape_fails_deterministically() {
        let result = FetchResult::empty(descriptor(FetchOps::Resolve));
        assert!(result.open().await.is_err());
    }
}
