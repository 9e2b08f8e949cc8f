use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::StorageError;

pub mod local;

/// Where uploaded image payloads end up.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Stores `payload` at `relative_path` and returns the relative path actually used,
    /// which differs from the request when the backend had to avoid a collision.
    async fn store(&self, relative_path: &str, payload: &[u8]) -> Result<String, StorageError>;
}

#[async_trait]
impl<T> ImageStorage for Arc<T>
where
    T: ImageStorage + ?Sized,
{
    async fn store(&self, relative_path: &str, payload: &[u8]) -> Result<String, StorageError> {
        (**self).store(relative_path, payload).await
    }
}
