mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod telemetry;

pub use domain::{entities, naming, use_cases};
pub use interfaces::repositories;
pub use infrastructure::{db, storage, utils};

use repositories::sqlx_repo::{SqlxProjectImageRepo, SqlxProjectRepo};
use storage::local::LocalImageStorage;
use use_cases::{admin::ProjectAdmin, projects::ProjectHandler};

pub type AppProjectHandler = ProjectHandler<SqlxProjectRepo, SqlxProjectImageRepo, LocalImageStorage>;
pub type AppProjectAdmin = ProjectAdmin<SqlxProjectRepo>;

pub struct AppState {
    pub project_handler: AppProjectHandler,
    pub project_admin: AppProjectAdmin,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let project_handler = ProjectHandler::new(
            SqlxProjectRepo::new(pool.clone()),
            SqlxProjectImageRepo::new(pool.clone()),
            LocalImageStorage::new(&config.media_root),
            config.media(),
        );
        let project_admin = ProjectAdmin::new(SqlxProjectRepo::new(pool));

        AppState {
            project_handler,
            project_admin,
        }
    }
}
