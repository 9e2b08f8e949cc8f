use uuid::Uuid;

use crate::errors::AppError;

/// Parses a project or image id coming from outside the crate.
pub fn valid_uuid(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id.trim()).map_err(|_| AppError::InvalidInput(format!("Invalid id: {:?}", id)))
}

/// Parses a selection of ids, failing on the first malformed one.
pub fn valid_uuids<S: AsRef<str>>(ids: &[S]) -> Result<Vec<Uuid>, AppError> {
    ids.iter().map(|id| valid_uuid(id.as_ref())).collect()
}
