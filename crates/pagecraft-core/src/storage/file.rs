//! Directory of JSON documents on disk.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::document::{self, ExportedDocument};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each document as `<name>.json` in one directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Open a storage directory, creating it if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|source| StorageError::Io {
                path: base_path.clone(),
                source,
            })?;
        }
        Ok(Self { base_path })
    }

    /// Storage in the platform data directory, e.g.
    /// `~/.local/share/pagecraft/documents` on Linux.
    pub fn default_location() -> StorageResult<Self> {
        Self::new(Self::default_path()?)
    }

    /// The directory [`FileStorage::default_location`] uses.
    pub fn default_path() -> StorageResult<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::NotFound("home directory".to_string()))?;
        Ok(base.join("pagecraft").join("documents"))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File path for a document name. Characters other than ASCII letters,
    /// digits, `-` and `_` become `_`.
    pub fn document_path(&self, name: &str) -> PathBuf {
        let file_stem: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", file_stem))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Storage for FileStorage {
    fn save(&self, name: &str, document: &ExportedDocument) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(name);
        let json = document.to_json();
        Box::pin(async move {
            let json = json?;
            fs::write(&path, json).map_err(io_error(&path))?;
            log::info!("Saved {}", path.display());
            Ok(())
        })
    }

    fn load(&self, name: &str) -> BoxFuture<'_, StorageResult<ExportedDocument>> {
        let path = self.document_path(name);
        let name = name.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(name));
            }
            let json = fs::read_to_string(&path).map_err(io_error(&path))?;
            log::debug!("Read {} bytes from {}", json.len(), path.display());
            Ok(document::parse_document(&json)?)
        })
    }

    fn delete(&self, name: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(name);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(io_error(&path))?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let entries = fs::read_dir(&self.base_path).map_err(io_error(&self.base_path))?;
            let mut names: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .collect();
            names.sort();
            Ok(names)
        })
    }

    fn exists(&self, name: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.document_path(name);
        Box::pin(async move { Ok(path.exists()) })
    }
}
