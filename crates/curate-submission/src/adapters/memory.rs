//! # In-Memory Draft Store

use crate::errors::DraftError;
use crate::ports::{Draft, DraftStore};
use crate::state::DraftKey;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryDraftStore {
    drafts: RwLock<HashMap<DraftKey, Draft>>,
}

impl MemoryDraftStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn save(&self, key: &DraftKey, draft: &Draft) -> Result<(), DraftError> {
        self.drafts.write().await.insert(*key, draft.clone());
        Ok(())
    }

    async fn load(&self, key: &DraftKey) -> Result<Option<Draft>, DraftError> {
        Ok(self.drafts.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &DraftKey) -> Result<(), DraftError> {
        self.drafts.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curate_types::match_model::test_fixtures::sample_match;
    use curate_types::{Address, Hash32};

    fn key() -> DraftKey {
        DraftKey::new(Hash32([1; 32]), Address([2; 20]))
    }

    #[tokio::test]
    async fn test_save_load_delete_round_trip() {
        let store = MemoryDraftStore::new();
        let draft = Draft {
            matches: vec![sample_match(0)],
            last_saved_at: 1_700_000_000,
        };

        assert_eq!(store.load(&key()).await.unwrap(), None);
        store.save(&key(), &draft).await.unwrap();
        assert_eq!(store.load(&key()).await.unwrap(), Some(draft));
        store.delete(&key()).await.unwrap();
        assert_eq!(store.load(&key()).await.unwrap(), None);
        // Deleting again is a no-op.
        store.delete(&key()).await.unwrap();
    }
}
