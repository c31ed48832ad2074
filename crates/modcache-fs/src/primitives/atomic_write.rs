use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, Default)]
pub struct AtomicWriteOptions {
    pub sync: bool,
    /// If set, the written file's modification time is stamped with this
    /// instant instead of the current time. The disk cache uses this to
    /// encode an entry's expiration in-band, since there is no separate
    /// metadata file per entry.
    pub mtime: Option<SystemTime>,
}

impl AtomicWriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    pub fn mtime(mut self, mtime: SystemTime) -> Self {
        self.mtime = Some(mtime);
        self
    }
}

/// Writes `content` to `path` atomically: the data lands in a sibling temp file
/// first, which is then renamed into place. Readers never observe a partial write.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8], options: AtomicWriteOptions) -> Result<()> {
    let path = path.as_ref();
    let parent = path.parent().ok_or_else(|| Error::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other("no parent directory"),
    })?;

    let mut tmp_path = parent.to_path_buf();
    tmp_path.push(format!(".tmp.{}", uuid::Uuid::new_v4()));

    let result = fs::write(&tmp_path, content).and_then(|_| {
        if let Some(mtime) = options.mtime {
            filetime::set_file_mtime(&tmp_path, filetime::FileTime::from_system_time(mtime))?;
        }
        if options.sync {
            fs::File::open(&tmp_path)?.sync_all()?;
        }
        fs::rename(&tmp_path, path)
    });

    result.map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

pub fn atomic_read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_and_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("entry");
        atomic_write(&path, b"hello world", AtomicWriteOptions::new()).unwrap();
        assert_eq!(atomic_read(&path).unwrap(), b"hello world");
    }

    #[test]
    fn overwrites_existing_content_in_one_rename() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("entry");
        atomic_write(&path, b"first", AtomicWriteOptions::new()).unwrap();
        atomic_write(&path, b"second", AtomicWriteOptions::new()).unwrap();
        assert_eq!(atomic_read(&path).unwrap(), b"second");
    }

    #[test]
    fn stamps_requested_mtime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("entry");
        let expiry = SystemTime::now() + std::time::Duration::from_secs(3600);
        atomic_write(&path, b"data", AtomicWriteOptions::new().mtime(expiry)).unwrap();

        let actual = fs::metadata(&path).unwrap().modified().unwrap();
        let delta = actual
            .duration_since(expiry)
            .or_else(|_| expiry.duration_since(actual))
            .unwrap();
        assert!(delta.as_secs() < 2);
    }

    #[test]
    fn leaves_no_temp_file_behind_on_success() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("entry");
        atomic_write(&path, b"data", AtomicWriteOptions::new()).unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }
}
