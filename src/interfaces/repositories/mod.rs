pub mod memory;
pub mod project;
pub mod project_image;
pub mod sqlx_repo;
