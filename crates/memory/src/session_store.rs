//! In-memory session registry: one conversation memory per session id.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use taleweaver_core::Message;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::conversation::ConversationMemory;

/// A session's memory, shared between every caller that asked for it.
pub type SharedMemory = Arc<RwLock<ConversationMemory>>;

/// Summary of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
}

/// A thread-safe registry of per-session chat histories.
///
/// Cloning the store is cheap and every clone sees the same sessions.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SharedMemory>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the memory for `id`, creating it on first use.
    ///
    /// At most one memory is ever created per id, even when many tasks ask
    /// for the same new id at once.
    pub async fn session(&self, id: &str) -> SharedMemory {
        if let Some(existing) = self.sessions.read().await.get(id) {
            return Arc::clone(existing);
        }

        let mut sessions = self.sessions.write().await;
        let memory = sessions.entry(id.to_string()).or_insert_with(|| {
            tracing::debug!(session_id = id, "Created chat session");
            Arc::new(RwLock::new(ConversationMemory::new()))
        });
        Arc::clone(memory)
    }

    /// Create a session under a fresh id and return the id.
    pub async fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.session(&id).await;
        id
    }

    /// Pop the newest message of an existing session.
    ///
    /// Unknown sessions are not created.
    pub async fn drop_last_message(&self, id: &str) -> Option<Message> {
        let memory = self.sessions.read().await.get(id).cloned()?;
        let dropped = memory.write().await.remove_last();
        if dropped.is_some() {
            tracing::debug!(session_id = id, "Dropped last message");
        }
        dropped
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// All session ids, sorted.
    pub async fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn info(&self, id: &str) -> Option<SessionInfo> {
        let memory = self.sessions.read().await.get(id).cloned()?;
        let memory = memory.read().await;
        Some(SessionInfo {
            id: id.to_string(),
            created_at: memory.created_at(),
            updated_at: memory.updated_at(),
            message_count: memory.len(),
        })
    }
}
