#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use mockall::mock;
use parking_lot::RwLock;
use project_admin::{
    db::postgres::{create_pool, run_migrations},
    entities::{
        project::{NewProject, Project},
        project_image::ProjectImage,
    },
    errors::StorageError,
    repositories::{
        memory::{InMemoryProjectImageRepo, InMemoryProjectRepo},
        sqlx_repo::{SqlxProjectImageRepo, SqlxProjectRepo},
    },
    settings::MediaSettings,
    storage::ImageStorage,
    use_cases::{admin::ProjectAdmin, projects::ProjectHandler},
};
use sqlx::PgPool;
use tokio::sync::OnceCell;
use uuid::Uuid;

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

/// Storage double that keeps payloads in a map keyed by relative path.
#[derive(Default)]
pub struct MemoryStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn contains(&self, relative_path: &str) -> bool {
        self.files.read().contains_key(relative_path)
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }
}

#[async_trait]
impl ImageStorage for MemoryStorage {
    async fn store(&self, relative_path: &str, payload: &[u8]) -> Result<String, StorageError> {
        self.files.write().insert(relative_path.to_string(), payload.to_vec());
        Ok(relative_path.to_string())
    }
}

mock! {
    pub Storage {}

    #[async_trait]
    impl ImageStorage for Storage {
        async fn store(&self, relative_path: &str, payload: &[u8]) -> Result<String, StorageError>;
    }
}

pub type TestHandler<S> = ProjectHandler<Arc<InMemoryProjectRepo>, Arc<InMemoryProjectImageRepo>, S>;

pub struct TestApp<S: ImageStorage = Arc<MemoryStorage>> {
    pub handler: TestHandler<S>,
    pub admin: ProjectAdmin<Arc<InMemoryProjectRepo>>,
    pub projects: Arc<InMemoryProjectRepo>,
    pub images: Arc<InMemoryProjectImageRepo>,
}

impl TestApp {
    pub fn spawn() -> (Self, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::default());
        (Self::with_storage(storage.clone(), MediaSettings::default()), storage)
    }
}

impl<S: ImageStorage> TestApp<S> {
    pub fn with_storage(storage: S, media: MediaSettings) -> Self {
        let projects = Arc::new(InMemoryProjectRepo::new());
        let images = Arc::new(InMemoryProjectImageRepo::new());
        Self::sharing(projects, images, storage, media)
    }

    /// Builds a handler over existing stores, e.g. to simulate a config change.
    pub fn sharing(
        projects: Arc<InMemoryProjectRepo>,
        images: Arc<InMemoryProjectImageRepo>,
        storage: S,
        media: MediaSettings,
    ) -> Self {
        TestApp {
            handler: ProjectHandler::new(projects.clone(), images.clone(), storage, media),
            admin: ProjectAdmin::new(projects.clone()),
            projects,
            images,
        }
    }

    pub async fn create_project(&self, name: &str) -> Project {
        self.handler
            .create_project(NewProject::named(name))
            .await
            .expect("Failed to create project")
    }

    pub async fn upload_png(&self, project: &Project) -> ProjectImage {
        self.handler
            .upload_image(&project.id, "screenshot.png", PNG_BYTES)
            .await
            .expect("Failed to upload image")
    }
}

pub type PgHandler = ProjectHandler<Arc<SqlxProjectRepo>, Arc<SqlxProjectImageRepo>, Arc<MemoryStorage>>;

/// Handler wired to the Postgres adapters of the database named by `APP_DATABASE_URL`.
pub struct PgTestApp {
    pub handler: PgHandler,
    pub admin: ProjectAdmin<Arc<SqlxProjectRepo>>,
    pub projects: Arc<SqlxProjectRepo>,
    pub images: Arc<SqlxProjectImageRepo>,
    pub storage: Arc<MemoryStorage>,
    pub db_pool: PgPool,
}

static SCHEMA_READY: OnceCell<()> = OnceCell::const_new();

impl PgTestApp {
    /// Returns `None` when no test database is configured.
    ///
    /// Migrations and the table reset run once per test binary; tests share the
    /// tables afterwards, so they should only assert on rows they created.
    pub async fn spawn() -> Option<Self> {
        let Ok(database_url) = std::env::var("APP_DATABASE_URL") else {
            eprintln!("APP_DATABASE_URL not set, skipping Postgres test");
            return None;
        };

        let db_pool = create_pool(&database_url, 2)
            .await
            .expect("Failed to create test DB pool");

        let pool = db_pool.clone();
        SCHEMA_READY
            .get_or_init(|| async move {
                run_migrations(&pool).await.expect("Failed to run migrations");
                sqlx::query("TRUNCATE TABLE project_images, projects")
                    .execute(&pool)
                    .await
                    .expect("Failed to truncate tables");
            })
            .await;

        let projects = Arc::new(SqlxProjectRepo::new(db_pool.clone()));
        let images = Arc::new(SqlxProjectImageRepo::new(db_pool.clone()));
        let storage = Arc::new(MemoryStorage::default());

        Some(PgTestApp {
            handler: ProjectHandler::new(projects.clone(), images.clone(), storage.clone(), MediaSettings::default()),
            admin: ProjectAdmin::new(projects.clone()),
            projects,
            images,
            storage,
            db_pool,
        })
    }

    /// Creates a project whose name carries a random tag, so searches can be
    /// scoped to rows this test owns.
    pub async fn create_tagged_project(&self, name: &str) -> (Project, String) {
        let tag = Uuid::new_v4().simple().to_string();
        let project = self
            .handler
            .create_project(NewProject::named(format!("{} {}", name, tag)))
            .await
            .expect("Failed to create project");
        (project, tag)
    }

    pub async fn upload_png(&self, project: &Project) -> ProjectImage {
        self.handler
            .upload_image(&project.id, "screenshot.png", PNG_BYTES)
            .await
            .expect("Failed to upload image")
    }
}
