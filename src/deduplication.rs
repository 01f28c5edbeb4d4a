//! # Update Deduplication
//!
//! Telegram may deliver the same message or callback query more than once
//! after network retries. Handlers consult a [`RequestDeduplicator`] before
//! doing any work and drop repeats seen within the TTL.

use crate::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use teloxide::types::{ChatId, MessageId};

/// Identity of one incoming update
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum RequestKey {
    Message { chat_id: ChatId, message_id: MessageId },
    /// Callback query ids are unique per press
    Callback(String),
}

impl RequestKey {
    pub fn message(chat_id: ChatId, message_id: MessageId) -> Self {
        RequestKey::Message {
            chat_id,
            message_id,
        }
    }

    pub fn callback(query_id: impl Into<String>) -> Self {
        RequestKey::Callback(query_id.into())
    }
}

#[derive(Debug, Clone)]
struct SeenEntry {
    first_seen: Instant,
    hits: u32,
}

/// In-memory TTL set of recently processed updates
#[derive(Debug)]
pub struct RequestDeduplicator {
    seen: Mutex<HashMap<RequestKey, SeenEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl RequestDeduplicator {
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            seen: Mutex::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
            max_entries,
        }
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, HashMap<RequestKey, SeenEntry>>> {
        self.seen
            .lock()
            .map_err(|e| AppError::Internal(format!("Failed to acquire deduplication lock: {}", e)))
    }

    /// Returns true when `key` was already seen within the TTL.
    ///
    /// A new key is remembered; at capacity the oldest entry is evicted.
    pub fn is_duplicate(&self, key: &RequestKey) -> AppResult<bool> {
        let mut seen = self.lock()?;
        let now = Instant::now();

        seen.retain(|_, entry| now.duration_since(entry.first_seen) < self.ttl);

        if let Some(entry) = seen.get_mut(key) {
            entry.hits += 1;
            return Ok(true);
        }

        if seen.len() >= self.max_entries {
            if let Some(oldest) = seen
                .iter()
                .min_by_key(|(_, entry)| entry.first_seen)
                .map(|(key, _)| key.clone())
            {
                seen.remove(&oldest);
            }
        }

        seen.insert(
            key.clone(),
            SeenEntry {
                first_seen: now,
                hits: 1,
            },
        );
        Ok(false)
    }

    pub fn stats(&self) -> AppResult<DeduplicationStats> {
        let seen = self.lock()?;
        Ok(DeduplicationStats {
            tracked: seen.len(),
            duplicates: seen.values().map(|e| e.hits.saturating_sub(1)).sum(),
            max_entries: self.max_entries,
            ttl: self.ttl,
        })
    }

    pub fn clear(&self) -> AppResult<()> {
        self.lock()?.clear();
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DeduplicationStats {
    pub tracked: usize,
    /// Repeats dropped for the keys still tracked
    pub duplicates: u32,
    pub max_entries: usize,
    pub ttl: Duration,
}

impl Default for RequestDeduplicator {
    fn default() -> Self {
        Self::new(300, 10_000)
    }
}

pub type SharedDeduplicator = Arc<RequestDeduplicator>;

pub fn create_shared_deduplicator(ttl_secs: u64, max_entries: usize) -> SharedDeduplicator {
    Arc::new(RequestDeduplicator::new(ttl_secs, max_entries))
}
