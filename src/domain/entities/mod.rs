pub mod option_fields;
pub mod project;
pub mod project_image;
pub mod soft_delete;
