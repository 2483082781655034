//! Short-lived record handoff
//!
//! A record selected in a search result is parked here so a follow-up
//! details request can pick it up by id. Entries are single-read and expire
//! after a TTL; nothing survives a restart.

use crate::types::PlantRecord;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Default lifetime of a parked record
pub const DEFAULT_HANDOFF_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Clone)]
pub struct HandoffStore {
    entries: Arc<RwLock<HashMap<Uuid, (Instant, PlantRecord)>>>,
    ttl: Duration,
}

impl Default for HandoffStore {
    fn default() -> Self {
        Self::new(DEFAULT_HANDOFF_TTL)
    }
}

impl HandoffStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Park a record, returning its handoff id
    pub async fn put(&self, record: PlantRecord) -> Uuid {
        let id = Uuid::new_v4();
        let mut entries = self.entries.write().await;

        let ttl = self.ttl;
        let before = entries.len();
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
        if entries.len() < before {
            debug!(expired = before - entries.len(), "Purged expired handoff entries");
        }

        entries.insert(id, (Instant::now(), record));
        id
    }

    /// Remove and return a parked record; `None` when unknown or expired
    pub async fn take(&self, id: &Uuid) -> Option<PlantRecord> {
        let (stored_at, record) = self.entries.write().await.remove(id)?;
        if stored_at.elapsed() < self.ttl {
            Some(record)
        } else {
            debug!(handoff_id = %id, "Handoff entry expired");
            None
        }
    }

    /// Number of parked entries (expired ones included until purged)
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
