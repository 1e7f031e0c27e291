use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::io::storage::atomic_write;

/// Error type for the file read / download capabilities
#[derive(Debug, thiserror::Error)]
pub enum FileAccessError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Reads a user-chosen file
pub trait FileSource {
    fn read(&self, handle: &str) -> Result<Vec<u8>, FileAccessError>;
}

/// Hands generated bytes to the user under a suggested file name.
/// Returns where the bytes ended up.
pub trait Download {
    fn offer(&self, bytes: &[u8], filename: &str) -> Result<String, FileAccessError>;
}

/// Treats handles as filesystem paths
#[derive(Debug, Clone, Default)]
pub struct FsFileSource;

impl FileSource for FsFileSource {
    fn read(&self, handle: &str) -> Result<Vec<u8>, FileAccessError> {
        fs::read(handle).map_err(|source| FileAccessError::Read {
            path: PathBuf::from(handle),
            source,
        })
    }
}

/// Saves downloads into a directory
#[derive(Debug, Clone)]
pub struct DirDownload {
    dir: PathBuf,
}

impl DirDownload {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        DirDownload {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl Download for DirDownload {
    fn offer(&self, bytes: &[u8], filename: &str) -> Result<String, FileAccessError> {
        fs::create_dir_all(&self.dir).map_err(|source| FileAccessError::Write {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(filename);
        atomic_write(&path, bytes).map_err(|source| FileAccessError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn download_then_read_back() {
        let dir = TempDir::new().unwrap();
        let download = DirDownload::new(dir.path().join("out"));
        let location = download.offer(b"{\"checked\":[]}", "ds_x.json").unwrap();
        assert!(location.ends_with("ds_x.json"));

        let bytes = FsFileSource.read(&location).unwrap();
        assert_eq!(bytes, b"{\"checked\":[]}");
    }

    #[test]
    fn read_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        let err = FsFileSource.read(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, FileAccessError::Read { .. }));
    }
}
