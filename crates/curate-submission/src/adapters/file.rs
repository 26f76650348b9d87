//! # Filesystem Draft Store
//!
//! One JSON file per draft key under a configured directory. File names
//! are the hashed storage key, so event ids and addresses never appear in
//! paths.

use crate::errors::DraftError;
use crate::ports::{Draft, DraftStore};
use crate::state::DraftKey;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

pub struct FileDraftStore {
    dir: PathBuf,
}

impl FileDraftStore {
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &DraftKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.storage_key()))
    }
}

fn io_error(e: std::io::Error) -> DraftError {
    DraftError::Io {
        detail: e.to_string(),
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn save(&self, key: &DraftKey, draft: &Draft) -> Result<(), DraftError> {
        fs::create_dir_all(&self.dir).await.map_err(io_error)?;
        let bytes = serde_json::to_vec(draft).map_err(|e| DraftError::Io {
            detail: e.to_string(),
        })?;
        let path = self.path_for(key);
        fs::write(&path, bytes).await.map_err(io_error)?;
        debug!(path = %path.display(), "draft saved");
        Ok(())
    }

    async fn load(&self, key: &DraftKey) -> Result<Option<Draft>, DraftError> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(e)),
        };
        let draft = serde_json::from_slice(&bytes).map_err(|e| DraftError::Corrupt {
            detail: e.to_string(),
        })?;
        Ok(Some(draft))
    }

    async fn delete(&self, key: &DraftKey) -> Result<(), DraftError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curate_types::match_model::test_fixtures::sample_match;
    use curate_types::{Address, Hash32};

    fn key(event: u8, actor: u8) -> DraftKey {
        DraftKey::new(Hash32([event; 32]), Address([actor; 20]))
    }

    #[tokio::test]
    async fn test_save_load_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path());
        let draft = Draft {
            matches: vec![sample_match(0), sample_match(1)],
            last_saved_at: 1_700_000_000,
        };

        store.save(&key(1, 2), &draft).await.unwrap();
        assert_eq!(store.load(&key(1, 2)).await.unwrap(), Some(draft));

        store.delete(&key(1, 2)).await.unwrap();
        assert_eq!(store.load(&key(1, 2)).await.unwrap(), None);
        store.delete(&key(1, 2)).await.unwrap();
    }

    #[tokio::test]
    async fn test_keys_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path());
        let a = Draft {
            matches: vec![sample_match(0)],
            last_saved_at: 1,
        };
        let b = Draft {
            matches: vec![sample_match(1)],
            last_saved_at: 2,
        };

        store.save(&key(1, 2), &a).await.unwrap();
        store.save(&key(1, 3), &b).await.unwrap();
        assert_eq!(store.load(&key(1, 2)).await.unwrap(), Some(a));
        assert_eq!(store.load(&key(1, 3)).await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn test_corrupt_draft_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path());
        let path = dir
            .path()
            .join(format!("{}.json", key(1, 2).storage_key()));
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        assert!(matches!(
            store.load(&key(1, 2)).await,
            Err(DraftError::Corrupt { .. })
        ));
    }
}
