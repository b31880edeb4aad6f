//! Persistence of exported documents.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::document::{DocumentError, ExportedDocument};
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future returned by storage backends.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A place documents can be saved to by name.
pub trait Storage: Send + Sync {
    fn save(&self, name: &str, document: &ExportedDocument) -> BoxFuture<'_, StorageResult<()>>;

    fn load(&self, name: &str) -> BoxFuture<'_, StorageResult<ExportedDocument>>;

    /// Delete a document. Deleting a missing document succeeds.
    fn delete(&self, name: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Names of all stored documents.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, name: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Drive a storage future to completion on the current thread.
///
/// The backends never actually suspend, so a no-op waker is enough.
pub fn block_on<F: Future>(future: F) -> F::Output {
    use std::task::{Context, Poll, Waker};

    let mut cx = Context::from_waker(Waker::noop());
    let mut future = std::pin::pin!(future);
    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            return output;
        }
    }
}
