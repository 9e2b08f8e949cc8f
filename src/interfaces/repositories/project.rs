use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::{
        project::{Project, ProjectInsert},
        soft_delete::SoftDeleteManager,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

#[async_trait]
pub trait ProjectRepository: SoftDeleteManager<Entity = Project> {
    /// Inserts a new row and returns it with its assigned id.
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError>;

    /// Looks a project up through the all-view, so trashed projects are found too.
    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError>;

    /// Full save: writes every attribute and refreshes `updated_at`.
    async fn update_project(&self, project: &Project) -> Result<Project, AppError>;

    /// Field-only patch of `deleted_at` for a set of ids. Does not touch `updated_at`.
    async fn set_deleted_at(&self, ids: &[Uuid], deleted_at: Option<DateTime<Utc>>) -> Result<u64, AppError>;

    /// Case-insensitive substring match on name or description, over the all-view.
    async fn search_projects(&self, query: &str) -> Result<Vec<Project>, AppError>;
}

#[async_trait]
impl<T> ProjectRepository for Arc<T>
where
    T: ProjectRepository + ?Sized,
{
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        (**self).create_project(project).await
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        (**self).get_project_by_id(id).await
    }

    async fn update_project(&self, project: &Project) -> Result<Project, AppError> {
        (**self).update_project(project).await
    }

    async fn set_deleted_at(&self, ids: &[Uuid], deleted_at: Option<DateTime<Utc>>) -> Result<u64, AppError> {
        (**self).set_deleted_at(ids, deleted_at).await
    }

    async fn search_projects(&self, query: &str) -> Result<Vec<Project>, AppError> {
        (**self).search_projects(query).await
    }
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

#[async_trait]
impl SoftDeleteManager for SqlxProjectRepo {
    type Entity = Project;

    async fn active_view(&self) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE deleted_at IS NULL ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn all_view(&self) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(projects)
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn create_project(&self, project: &ProjectInsert) -> Result<Project, AppError> {
        let created = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (id, name, description, icon, color, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.icon)
        .bind(&project.color)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {}", id)))
    }

    async fn update_project(&self, project: &Project) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                name = $1,
                description = $2,
                icon = $3,
                color = $4,
                deleted_at = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.icon)
        .bind(&project.color)
        .bind(project.deleted_at)
        .bind(project.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {}", project.id)))
    }

    async fn set_deleted_at(&self, ids: &[Uuid], deleted_at: Option<DateTime<Utc>>) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE projects SET deleted_at = $1 WHERE id = ANY($2)")
            .bind(deleted_at)
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn search_projects(&self, query: &str) -> Result<Vec<Project>, AppError> {
        let pattern = format!("%{}%", escape_like(query));
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT * FROM projects
            WHERE name ILIKE $1 ESCAPE '\' OR description ILIKE $1 ESCAPE '\'
            ORDER BY created_at, id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }
}

/// Escapes `LIKE` metacharacters so the query matches literally.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%_done"), r"100\%\_done");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
        assert_eq!(escape_like("plain"), "plain");
    }
}
