//! # Draft Persistence Port

use crate::errors::DraftError;
use crate::state::DraftKey;
use async_trait::async_trait;
use curate_types::Match;
use serde::{Deserialize, Serialize};

/// A saved draft: the matches as last edited, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub matches: Vec<Match>,
    pub last_saved_at: u64,
}

/// Draft persistence. Saving overwrites; loading a missing draft is
/// `Ok(None)`, a corrupt one is an error.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn save(&self, key: &DraftKey, draft: &Draft) -> Result<(), DraftError>;

    async fn load(&self, key: &DraftKey) -> Result<Option<Draft>, DraftError>;

    /// Deleting a missing draft is a no-op.
    async fn delete(&self, key: &DraftKey) -> Result<(), DraftError>;
}
