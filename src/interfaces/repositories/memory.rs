//! In-process repositories backed by `parking_lot` locks.
//!
//! Insertion order is the storage-native order for both views. Besides the
//! repository traits, the image store tracks how many full saves each image
//! received so callers can tell a full save from a field-only patch.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    entities::{
        project::{Project, ProjectInsert},
        project_image::{ProjectImage, ProjectImageInsert},
        soft_delete::SoftDeleteManager,
    },
    errors::AppError,
    repositories::{project::ProjectRepository, project_image::ProjectImageRepository},
};

#[derive(Default)]
pub struct InMemoryProjectRepo {
    rows: RwLock<Vec<Project>>,
}

impl InMemoryProjectRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SoftDeleteManager for InMemoryProjectRepo {
    type Entity = Project;

    async fn active_view(&self) -> Result<Vec<Project>, AppError> {
        Ok(self.rows.read().iter().filter(|p| p.deleted_at.is_none()).cloned().collect())
    }

    async fn all_view(&self) -> Result<Vec<Project>, AppError> {
        Ok(self.rows.read().clone())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepo {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let created = Project {
            id: Uuid::new_v4(),
            name: project.name.clone(),
            description: project.description.clone(),
            icon: project.icon.clone(),
            color: project.color.clone(),
            created_at: project.created_at,
            updated_at: project.updated_at,
            deleted_at: None,
        };
        self.rows.write().push(created.clone());
        Ok(created)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        self.rows
            .read()
            .iter()
            .find(|p| p.id == *id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Project {}", id)))
    }

    async fn update_project(&self, project: &Project) -> Result<Project, AppError> {
        let mut rows = self.rows.write();
        let row = rows
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| AppError::NotFound(format!("Project {}", project.id)))?;

        *row = Project {
            created_at: row.created_at,
            updated_at: Utc::now(),
            ..project.clone()
        };
        Ok(row.clone())
    }

    async fn set_deleted_at(&self, ids: &[Uuid], deleted_at: Option<DateTime<Utc>>) -> Result<u64, AppError> {
        let mut touched = 0;
        for row in self.rows.write().iter_mut().filter(|p| ids.contains(&p.id)) {
            row.deleted_at = deleted_at;
            touched += 1;
        }
        Ok(touched)
    }

    async fn search_projects(&self, query: &str) -> Result<Vec<Project>, AppError> {
        let needle = query.to_lowercase();
        let matches = |text: &str| text.to_lowercase().contains(&needle);

        Ok(self
            .rows
            .read()
            .iter()
            .filter(|p| matches(&p.name) || p.description.as_deref().is_some_and(|d| matches(d)))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryProjectImageRepo {
    rows: RwLock<Vec<ProjectImage>>,
    full_saves: RwLock<HashMap<Uuid, usize>>,
}

impl InMemoryProjectImageRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `update_image` ran for this image.
    pub fn full_saves(&self, id: &Uuid) -> usize {
        self.full_saves.read().get(id).copied().unwrap_or(0)
    }
}

#[async_trait]
impl SoftDeleteManager for InMemoryProjectImageRepo {
    type Entity = ProjectImage;

    async fn active_view(&self) -> Result<Vec<ProjectImage>, AppError> {
        Ok(self.rows.read().iter().filter(|i| i.deleted_at.is_none()).cloned().collect())
    }

    async fn all_view(&self) -> Result<Vec<ProjectImage>, AppError> {
        Ok(self.rows.read().clone())
    }
}

#[async_trait]
impl ProjectImageRepository for InMemoryProjectImageRepo {
    async fn create_image(&self, image: &ProjectImageInsert) -> Result<ProjectImage, AppError> {
        let created = ProjectImage {
            id: Uuid::new_v4(),
            project_id: image.project_id,
            image_path: image.image_path.clone(),
            url: None,
            created_at: image.created_at,
            updated_at: image.updated_at,
            deleted_at: None,
        };
        self.rows.write().push(created.clone());
        Ok(created)
    }

    async fn get_image_by_id(&self, id: &Uuid) -> Result<ProjectImage, AppError> {
        self.rows
            .read()
            .iter()
            .find(|i| i.id == *id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Project image {}", id)))
    }

    async fn images_for_project(&self, project_id: &Uuid, include_deleted: bool) -> Result<Vec<ProjectImage>, AppError> {
        Ok(self
            .rows
            .read()
            .iter()
            .filter(|i| i.project_id == *project_id && (include_deleted || i.deleted_at.is_none()))
            .cloned()
            .collect())
    }

    async fn count_images_for_project(&self, project_id: &Uuid) -> Result<i64, AppError> {
        Ok(self.rows.read().iter().filter(|i| i.project_id == *project_id).count() as i64)
    }

    async fn update_image(&self, image: &ProjectImage) -> Result<ProjectImage, AppError> {
        let saved = {
            let mut rows = self.rows.write();
            let row = rows
                .iter_mut()
                .find(|i| i.id == image.id)
                .ok_or_else(|| AppError::NotFound(format!("Project image {}", image.id)))?;

            *row = ProjectImage {
                created_at: row.created_at,
                updated_at: Utc::now(),
                ..image.clone()
            };
            row.clone()
        };

        *self.full_saves.write().entry(image.id).or_insert(0) += 1;
        Ok(saved)
    }

    async fn patch_image_url(&self, id: &Uuid, url: &str) -> Result<(), AppError> {
        let mut rows = self.rows.write();
        let row = rows
            .iter_mut()
            .find(|i| i.id == *id)
            .ok_or_else(|| AppError::NotFound(format!("Project image {}", id)))?;

        row.url = Some(url.to_string());
        Ok(())
    }
}
