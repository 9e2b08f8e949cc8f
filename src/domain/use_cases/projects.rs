use chrono::Utc;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::{
    entities::{
        project::{NewProject, Project, UpdateProjectRequest},
        project_image::{ProjectImage, ProjectImageInsert},
    },
    errors::AppError,
    naming::{derive_filename, derive_url, ordinal_after, upload_extension, upload_path},
    repositories::{project::ProjectRepository, project_image::ProjectImageRepository},
    settings::MediaSettings,
    storage::ImageStorage,
};

/// Entity-level operations on projects and their images.
///
/// Full saves go through [`save_project`](Self::save_project) and
/// [`save_image`](Self::save_image), which run the rename cascade and the url
/// recompute. The url recompute itself writes through
/// [`ProjectImageRepository::patch_image_url`], a field-only write that never
/// re-enters either save path.
pub struct ProjectHandler<P, I, S>
where
    P: ProjectRepository,
    I: ProjectImageRepository,
    S: ImageStorage,
{
    pub project_repo: P,
    pub image_repo: I,
    pub storage: S,
    pub media: MediaSettings,
}

impl<P, I, S> ProjectHandler<P, I, S>
where
    P: ProjectRepository,
    I: ProjectImageRepository,
    S: ImageStorage,
{
    pub fn new(project_repo: P, image_repo: I, storage: S, media: MediaSettings) -> Self {
        ProjectHandler {
            project_repo,
            image_repo,
            storage,
            media,
        }
    }

    /// Creates a project. First-time creation never cascades.
    #[instrument(skip(self))]
    pub async fn create_project(&self, request: NewProject) -> Result<Project, AppError> {
        let project = self
            .project_repo
            .create_project(&request.prepare_for_insert())
            .await?;

        info!(project_id = %project.id, "Created project {}", project.name);
        Ok(project)
    }

    /// Finds a project whether or not it is in the trash.
    pub async fn get_project(&self, id: &Uuid) -> Result<Project, AppError> {
        self.project_repo.get_project_by_id(id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Project not found".to_string()),
            _ => e,
        })
    }

    /// Persists an existing project.
    ///
    /// The stored row supplies the previous name, so a project missing from the
    /// all-view fails with `NotFound` before anything is written. When the name
    /// changed, every owned image is saved again.
    #[instrument(skip(self, project), fields(project_id = %project.id))]
    pub async fn save_project(&self, project: &Project) -> Result<Project, AppError> {
        let previous_name = self.get_project(&project.id).await?.name;

        let saved = self.project_repo.update_project(project).await?;

        if saved.name != previous_name {
            info!("Project renamed from {:?} to {:?}", previous_name, saved.name);
            self.cascade_rename(&saved).await?;
        }

        Ok(saved)
    }

    /// Applies a PATCH-style request and saves.
    #[instrument(skip(self, request))]
    pub async fn update_project(&self, id: &Uuid, request: UpdateProjectRequest) -> Result<Project, AppError> {
        let current = self.get_project(id).await?;
        self.save_project(&request.apply_to(current)).await
    }

    /// Moves a project to the trash. Deleting twice only refreshes the timestamp.
    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: &Uuid) -> Result<Project, AppError> {
        let mut project = self.get_project(id).await?;
        project.deleted_at = Some(Utc::now());

        let saved = self.save_project(&project).await?;
        info!("Project {} moved to trash", saved.id);
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn restore_project(&self, id: &Uuid) -> Result<Project, AppError> {
        let mut project = self.get_project(id).await?;
        project.deleted_at = None;

        let saved = self.save_project(&project).await?;
        info!("Project {} restored", saved.id);
        Ok(saved)
    }

    /// Re-saves every image of a renamed project, trashed ones included.
    ///
    /// Stored files are not moved. Each image's url is recomputed from its
    /// existing path, so unless the static root changed the value stays the same.
    async fn cascade_rename(&self, project: &Project) -> Result<usize, AppError> {
        let images = self.image_repo.images_for_project(&project.id, true).await?;
        let count = images.len();

        for image in &images {
            self.save_image(image).await?;
        }

        debug!("Re-saved {} images of project {}", count, project.id);
        Ok(count)
    }

    /// Ordinal for the next image of a project, counting trashed images.
    ///
    /// Read-then-write with no isolation: concurrent uploads to one project may
    /// receive the same ordinal.
    pub async fn next_ordinal(&self, project_id: &Uuid) -> Result<i64, AppError> {
        let existing = self.image_repo.count_images_for_project(project_id).await?;
        Ok(ordinal_after(existing))
    }

    /// Stores a payload for a project and records it as a new image.
    ///
    /// A storage failure aborts before any row is written.
    #[instrument(skip(self, payload), fields(size = payload.len()))]
    pub async fn upload_image(&self, project_id: &Uuid, file_name: &str, payload: &[u8]) -> Result<ProjectImage, AppError> {
        let project = self.get_project(project_id).await?;
        let stored_path = self.store_payload(&project, file_name, payload).await?;

        let image = self
            .image_repo
            .create_image(&ProjectImageInsert::new(project.id, stored_path))
            .await?;

        info!(image_id = %image.id, "Uploaded {} as {}", ProjectImage::label(&project.name), image.image_path);
        self.sync_image_url(image).await
    }

    /// Swaps the payload of an existing image. The new file name uses a fresh
    /// ordinal, which counts the image being replaced.
    #[instrument(skip(self, payload), fields(size = payload.len()))]
    pub async fn replace_image(&self, image_id: &Uuid, file_name: &str, payload: &[u8]) -> Result<ProjectImage, AppError> {
        let mut image = self.get_image(image_id).await?;
        let project = self.get_project(&image.project_id).await?;

        image.image_path = self.store_payload(&project, file_name, payload).await?;

        info!("Replaced payload of image {} with {}", image.id, image.image_path);
        self.save_image(&image).await
    }

    /// Full save of an image followed by the url recompute.
    pub async fn save_image(&self, image: &ProjectImage) -> Result<ProjectImage, AppError> {
        let saved = self.image_repo.update_image(image).await?;
        self.sync_image_url(saved).await
    }

    pub async fn get_image(&self, id: &Uuid) -> Result<ProjectImage, AppError> {
        self.image_repo.get_image_by_id(id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Project image not found".to_string()),
            _ => e,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_image(&self, id: &Uuid) -> Result<ProjectImage, AppError> {
        let mut image = self.get_image(id).await?;
        image.deleted_at = Some(Utc::now());
        self.save_image(&image).await
    }

    #[instrument(skip(self))]
    pub async fn restore_image(&self, id: &Uuid) -> Result<ProjectImage, AppError> {
        let mut image = self.get_image(id).await?;
        image.deleted_at = None;
        self.save_image(&image).await
    }

    /// Images of a project for inline display.
    pub async fn list_project_images(&self, project_id: &Uuid, include_deleted: bool) -> Result<Vec<ProjectImage>, AppError> {
        self.image_repo.images_for_project(project_id, include_deleted).await
    }

    async fn store_payload(&self, project: &Project, file_name: &str, payload: &[u8]) -> Result<String, AppError> {
        let ordinal = self.next_ordinal(&project.id).await?;
        let extension = upload_extension(file_name, payload);
        let target = upload_path(
            &self.media.upload_dir,
            &derive_filename(&project.name, ordinal, &extension),
        );

        self.storage.store(&target, payload).await.map_err(|e| {
            error!("Failed to store {}: {}", target, e);
            AppError::from(e)
        })
    }

    /// Writes the derived url when it differs from the stored one.
    async fn sync_image_url(&self, mut image: ProjectImage) -> Result<ProjectImage, AppError> {
        let url = derive_url(&self.media.static_url, &image.image_path);

        if image.url.as_deref() != Some(url.as_str()) {
            debug!(image_id = %image.id, "Updating url to {}", url);
            self.image_repo.patch_image_url(&image.id, &url).await?;
            image.url = Some(url);
        }

        Ok(image)
    }
}
