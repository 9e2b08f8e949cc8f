use std::{collections::HashSet, fmt, str::FromStr};

use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    entities::{
        project::Project,
        soft_delete::{SoftDeletable, SoftDeleteManager},
    },
    errors::AppError,
    repositories::project::ProjectRepository,
};

/// The trash filter offered on project listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrashFilter {
    #[default]
    All,
    Active,
    Deleted,
}

impl TrashFilter {
    /// Maps the `deleted` lookup value: absent → all, `"no"` → active, `"yes"` → trashed.
    pub fn from_lookup(value: Option<&str>) -> Result<Self, AppError> {
        match value {
            None => Ok(TrashFilter::All),
            Some(v) => v.parse(),
        }
    }

    /// Resolves the filter against a manager's views.
    ///
    /// `Deleted` is the all-view minus the active-view.
    pub async fn apply<M>(&self, manager: &M) -> Result<Vec<M::Entity>, AppError>
    where
        M: SoftDeleteManager + ?Sized,
    {
        match self {
            TrashFilter::All => manager.all_view().await,
            TrashFilter::Active => manager.active_view().await,
            TrashFilter::Deleted => {
                let active: HashSet<Uuid> = manager.active_view().await?.iter().map(|e| e.id()).collect();
                Ok(manager
                    .all_view()
                    .await?
                    .into_iter()
                    .filter(|e| !active.contains(&e.id()))
                    .collect())
            }
        }
    }

    pub fn admits<E: SoftDeletable>(&self, entity: &E) -> bool {
        match self {
            TrashFilter::All => true,
            TrashFilter::Active => !entity.is_deleted(),
            TrashFilter::Deleted => entity.is_deleted(),
        }
    }
}

impl FromStr for TrashFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TrashFilter::All),
            "no" | "active" => Ok(TrashFilter::Active),
            "yes" | "deleted" => Ok(TrashFilter::Deleted),
            _ => Err(AppError::InvalidInput(format!("Unknown trash filter: {}", s))),
        }
    }
}

impl fmt::Display for TrashFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrashFilter::All => "all",
            TrashFilter::Active => "active",
            TrashFilter::Deleted => "deleted",
        };
        write!(f, "{s}")
    }
}

/// Listing and bulk actions for the project admin screen.
pub struct ProjectAdmin<P>
where
    P: ProjectRepository,
{
    pub project_repo: P,
}

impl<P> ProjectAdmin<P>
where
    P: ProjectRepository,
{
    pub fn new(project_repo: P) -> Self {
        ProjectAdmin { project_repo }
    }

    /// Projects matching the trash filter and, when given, a name/description search.
    #[instrument(skip(self))]
    pub async fn list_projects(&self, filter: TrashFilter, search: Option<&str>) -> Result<Vec<Project>, AppError> {
        match search.map(str::trim).filter(|q| !q.is_empty()) {
            None => filter.apply(&self.project_repo).await,
            Some(query) => Ok(self
                .project_repo
                .search_projects(query)
                .await?
                .into_iter()
                .filter(|p| filter.admits(p))
                .collect()),
        }
    }

    /// Clears `deleted_at` on the selected projects with a single field-only write.
    ///
    /// Save hooks do not run. Returns the number of rows matched.
    #[instrument(skip(self, ids), fields(selected = ids.len()))]
    pub async fn restore_projects(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let restored = self.project_repo.set_deleted_at(ids, None).await?;
        info!("Restored {} projects", restored);
        Ok(restored)
    }
}
