//! File-backed cart slot

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use storefront::storage::{CartStorage, StorageError};
use tracing::debug;

/// Keeps each slot in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub(crate) struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub(crate) fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key);

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(backend_error(&path, &error)),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|error| backend_error(&self.dir, &error))?;

        let path = self.path(key);

        fs::write(&path, value).map_err(|error| backend_error(&path, &error))?;

        debug!(path = %path.display(), bytes = value.len(), "wrote cart slot");

        Ok(())
    }
}

fn backend_error(path: &Path, error: &io::Error) -> StorageError {
    StorageError::Backend(format!("{}: {error}", path.display()))
}
