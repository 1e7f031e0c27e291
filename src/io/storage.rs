use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Error type for storage capabilities
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid storage identifier: {0:?}")]
    InvalidId(String),
    #[error("could not encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String blobs addressed by a fixed identifier
pub trait Storage {
    /// Stored value, `None` when nothing is stored
    fn get(&self, id: &str) -> Result<Option<String>, StorageError>;

    /// Replace whatever is stored under `id`
    fn set(&self, id: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value. Removing a missing id is not an error.
    fn remove(&self, id: &str) -> Result<(), StorageError>;
}

/// One file per identifier inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        FileStorage {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, StorageError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !id.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(id))
    }
}

impl Storage for FileStorage {
    fn get(&self, id: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(id)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn set(&self, id: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(id)?;
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Write {
            path: self.dir.clone(),
            source,
        })?;
        atomic_write(&path, value.as_bytes())
            .map_err(|source| StorageError::Write { path, source })
    }

    fn remove(&self, id: &str) -> Result<(), StorageError> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Write { path, source }),
        }
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// In-process storage, for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Peek at a stored value without going through the trait
    pub fn raw(&self, id: &str) -> Option<String> {
        self.values.borrow().get(id).cloned()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, id: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(id).cloned())
    }

    fn set(&self, id: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(id.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<(), StorageError> {
        self.values.borrow_mut().remove(id);
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for std::rc::Rc<S> {
    fn get(&self, id: &str) -> Result<Option<String>, StorageError> {
        (**self).get(id)
    }

    fn set(&self, id: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(id, value)
    }

    fn remove(&self, id: &str) -> Result<(), StorageError> {
        (**self).remove(id)
    }
}
