use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;

/// A record that is marked deleted through a nullable timestamp instead of being removed.
pub trait SoftDeletable {
    fn id(&self) -> Uuid;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }
}

/// The two read views over a soft-deletable collection.
///
/// Both views are plain filters over storage-native order; neither mutates anything.
#[async_trait]
pub trait SoftDeleteManager: Send + Sync {
    type Entity: SoftDeletable + Send;

    /// Entities whose `deleted_at` is null.
    async fn active_view(&self) -> Result<Vec<Self::Entity>, AppError>;

    /// Every entity regardless of deletion state.
    async fn all_view(&self) -> Result<Vec<Self::Entity>, AppError>;
}

#[async_trait]
impl<T> SoftDeleteManager for Arc<T>
where
    T: SoftDeleteManager + ?Sized,
{
    type Entity = T::Entity;

    async fn active_view(&self) -> Result<Vec<Self::Entity>, AppError> {
        (**self).active_view().await
    }

    async fn all_view(&self) -> Result<Vec<Self::Entity>, AppError> {
        (**self).all_view().await
    }
}
