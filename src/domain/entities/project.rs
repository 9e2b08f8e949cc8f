use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{option_fields::OptionField, soft_delete::SoftDeletable};

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ProjectInsert {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ───── Input Requests ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProjectRequest {
    pub name: OptionField<String>,
    pub description: OptionField<String>,
    pub icon: OptionField<String>,
    pub color: OptionField<String>,
}

// ───── Conversions ───────────────────────────────────────────────────

impl NewProject {
    pub fn named(name: impl Into<String>) -> Self {
        NewProject {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn prepare_for_insert(self) -> ProjectInsert {
        let now = Utc::now();
        ProjectInsert {
            name: self.name,
            description: self.description,
            icon: self.icon,
            color: self.color,
            created_at: now,
            updated_at: now,
        }
    }
}

impl UpdateProjectRequest {
    /// Applies the patch on top of `project`. A null name is ignored.
    pub fn apply_to(self, mut project: Project) -> Project {
        if let Some(name) = self.name.take_value() {
            project.name = name;
        }
        if let Some(description) = self.description.into_option() {
            project.description = description;
        }
        if let Some(icon) = self.icon.into_option() {
            project.icon = icon;
        }
        if let Some(color) = self.color.into_option() {
            project.color = color;
        }
        project
    }
}

impl SoftDeletable for Project {
    fn id(&self) -> Uuid {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
