//! In-memory storage.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::document::ExportedDocument;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Keeps documents in a map for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RwLock<BTreeMap<String, ExportedDocument>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, name: &str, document: &ExportedDocument) -> BoxFuture<'_, StorageResult<()>> {
        let name = name.to_string();
        let document = document.clone();
        Box::pin(async move {
            let mut docs = self.documents.write().map_err(|_| StorageError::Poisoned)?;
            log::debug!("Saving {} to memory", name);
            docs.insert(name, document);
            Ok(())
        })
    }

    fn load(&self, name: &str) -> BoxFuture<'_, StorageResult<ExportedDocument>> {
        let name = name.to_string();
        Box::pin(async move {
            let docs = self.documents.read().map_err(|_| StorageError::Poisoned)?;
            docs.get(&name).cloned().ok_or(StorageError::NotFound(name))
        })
    }

    fn delete(&self, name: &str) -> BoxFuture<'_, StorageResult<()>> {
        let name = name.to_string();
        Box::pin(async move {
            let mut docs = self.documents.write().map_err(|_| StorageError::Poisoned)?;
            docs.remove(&name);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let docs = self.documents.read().map_err(|_| StorageError::Poisoned)?;
            Ok(docs.keys().cloned().collect())
        })
    }

    fn exists(&self, name: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let name = name.to_string();
        Box::pin(async move {
            let docs = self.documents.read().map_err(|_| StorageError::Poisoned)?;
            Ok(docs.contains_key(&name))
        })
    }
}
