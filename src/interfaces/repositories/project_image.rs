use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::{
        project_image::{ProjectImage, ProjectImageInsert},
        soft_delete::SoftDeleteManager,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectImageRepo,
};

#[async_trait]
pub trait ProjectImageRepository: SoftDeleteManager<Entity = ProjectImage> {
    async fn create_image(&self, image: &ProjectImageInsert) -> Result<ProjectImage, AppError>;

    /// All-view lookup.
    async fn get_image_by_id(&self, id: &Uuid) -> Result<ProjectImage, AppError>;

    /// Images owned by a project, soft-deleted ones only when `include_deleted` is set.
    async fn images_for_project(&self, project_id: &Uuid, include_deleted: bool) -> Result<Vec<ProjectImage>, AppError>;

    /// Number of images owned by a project, soft-deleted ones included.
    async fn count_images_for_project(&self, project_id: &Uuid) -> Result<i64, AppError>;

    /// Full save: writes every attribute and refreshes `updated_at`.
    async fn update_image(&self, image: &ProjectImage) -> Result<ProjectImage, AppError>;

    /// Field-only write of `url`. Leaves `updated_at` alone and runs no save hooks.
    async fn patch_image_url(&self, id: &Uuid, url: &str) -> Result<(), AppError>;
}

#[async_trait]
impl<T> ProjectImageRepository for Arc<T>
where
    T: ProjectImageRepository + ?Sized,
{
    async fn create_image(&self, image: &ProjectImageInsert) -> Result<ProjectImage, AppError> {
        (**self).create_image(image).await
    }

    async fn get_image_by_id(&self, id: &Uuid) -> Result<ProjectImage, AppError> {
        (**self).get_image_by_id(id).await
    }

    async fn images_for_project(&self, project_id: &Uuid, include_deleted: bool) -> Result<Vec<ProjectImage>, AppError> {
        (**self).images_for_project(project_id, include_deleted).await
    }

    async fn count_images_for_project(&self, project_id: &Uuid) -> Result<i64, AppError> {
        (**self).count_images_for_project(project_id).await
    }

    async fn update_image(&self, image: &ProjectImage) -> Result<ProjectImage, AppError> {
        (**self).update_image(image).await
    }

    async fn patch_image_url(&self, id: &Uuid, url: &str) -> Result<(), AppError> {
        (**self).patch_image_url(id, url).await
    }
}

impl SqlxProjectImageRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectImageRepo { pool }
    }
}

#[async_trait]
impl SoftDeleteManager for SqlxProjectImageRepo {
    type Entity = ProjectImage;

    async fn active_view(&self) -> Result<Vec<ProjectImage>, AppError> {
        let images = sqlx::query_as::<_, ProjectImage>(
            "SELECT * FROM project_images WHERE deleted_at IS NULL ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn all_view(&self) -> Result<Vec<ProjectImage>, AppError> {
        let images = sqlx::query_as::<_, ProjectImage>("SELECT * FROM project_images ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(images)
    }
}

#[async_trait]
impl ProjectImageRepository for SqlxProjectImageRepo {
    async fn create_image(&self, image: &ProjectImageInsert) -> Result<ProjectImage, AppError> {
        let created = sqlx::query_as::<_, ProjectImage>(
            r#"
            INSERT INTO project_images (id, project_id, image_path, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(image.project_id)
        .bind(&image.image_path)
        .bind(image.created_at)
        .bind(image.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_image_by_id(&self, id: &Uuid) -> Result<ProjectImage, AppError> {
        sqlx::query_as::<_, ProjectImage>("SELECT * FROM project_images WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project image {}", id)))
    }

    async fn images_for_project(&self, project_id: &Uuid, include_deleted: bool) -> Result<Vec<ProjectImage>, AppError> {
        let images = sqlx::query_as::<_, ProjectImage>(
            r#"
            SELECT * FROM project_images
            WHERE project_id = $1
              AND ($2 OR deleted_at IS NULL)
            ORDER BY created_at, id
            "#,
        )
        .bind(project_id)
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    async fn count_images_for_project(&self, project_id: &Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM project_images WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn update_image(&self, image: &ProjectImage) -> Result<ProjectImage, AppError> {
        sqlx::query_as::<_, ProjectImage>(
            r#"
            UPDATE project_images SET
                project_id = $1,
                image_path = $2,
                url = $3,
                deleted_at = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(image.project_id)
        .bind(&image.image_path)
        .bind(&image.url)
        .bind(image.deleted_at)
        .bind(image.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project image {}", image.id)))
    }

    async fn patch_image_url(&self, id: &Uuid, url: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE project_images SET url = $1 WHERE id = $2")
            .bind(url)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Project image {}", id)));
        }

        Ok(())
    }
}
