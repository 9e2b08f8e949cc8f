use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::soft_delete::SoftDeletable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectImage {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Storage-relative path of the payload, fixed when the payload is stored.
    pub image_path: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ProjectImageInsert {
    pub project_id: Uuid,
    pub image_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectImageInsert {
    pub fn new(project_id: Uuid, image_path: String) -> Self {
        let now = Utc::now();
        ProjectImageInsert {
            project_id,
            image_path,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ProjectImage {
    /// File name part of the stored path.
    pub fn file_name(&self) -> &str {
        self.image_path
            .rsplit_once('/')
            .map_or(self.image_path.as_str(), |(_, name)| name)
    }

    /// Human-readable caption of an image owned by `project_name`.
    pub fn label(project_name: &str) -> String {
        format!("Image for {}", project_name)
    }
}

impl SoftDeletable for ProjectImage {
    fn id(&self) -> Uuid {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_at(path: &str) -> ProjectImage {
        let now = Utc::now();
        ProjectImage {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            image_path: path.to_string(),
            url: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn file_name_is_last_path_segment() {
        assert_eq!(image_at("public/images/projects/alpha-2.png").file_name(), "alpha-2.png");
        assert_eq!(image_at("alpha-2.png").file_name(), "alpha-2.png");
    }

    #[test]
    fn label_names_the_owning_project() {
        assert_eq!(ProjectImage::label("Portfolio"), "Image for Portfolio");
    }
}
