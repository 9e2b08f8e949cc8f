use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use tokio::fs;
use tracing::{debug, info};

use crate::{errors::StorageError, storage::ImageStorage};

const SUFFIX_LEN: usize = 7;
const MAX_NAME_ATTEMPTS: usize = 100;

/// Filesystem storage rooted at the configured media directory.
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    root: PathBuf,
}

impl LocalImageStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalImageStorage { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn available_name(&self, relative_path: &str) -> Result<String, StorageError> {
        if !fs::try_exists(self.root.join(relative_path)).await? {
            return Ok(relative_path.to_string());
        }

        let (dir, file_name) = match relative_path.rsplit_once('/') {
            Some((dir, name)) => (format!("{}/", dir), name),
            None => (String::new(), relative_path),
        };
        let (stem, ext) = match file_name.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{}", ext)),
            None => (file_name, String::new()),
        };

        for _ in 0..MAX_NAME_ATTEMPTS {
            let candidate = format!("{}{}_{}{}", dir, stem, random_suffix(), ext);
            if !fs::try_exists(self.root.join(&candidate)).await? {
                debug!("{} exists, storing as {}", relative_path, candidate);
                return Ok(candidate);
            }
        }

        Err(StorageError::Rejected(format!("no free name for {}", relative_path)))
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect()
}

fn check_relative(relative_path: &str) -> Result<(), StorageError> {
    let path = Path::new(relative_path);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if relative_path.is_empty() || escapes {
        return Err(StorageError::InvalidPath(relative_path.to_string()));
    }
    Ok(())
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn store(&self, relative_path: &str, payload: &[u8]) -> Result<String, StorageError> {
        check_relative(relative_path)?;

        let stored = self.available_name(relative_path).await?;
        let target = self.root.join(&stored);

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, payload).await?;

        info!("Stored {} bytes at {}", payload.len(), target.display());
        Ok(stored)
    }
}
