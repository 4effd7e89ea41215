use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Per-session key/value storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str, key: &str) -> Option<Value>;
    async fn set(&self, session_id: &str, key: &str, value: Value);
    async fn remove(&self, session_id: &str, key: &str) -> Option<Value>;
}

#[derive(Debug, Clone)]
struct SessionData {
    values: HashMap<String, Value>,
    last_activity: DateTime<Utc>,
}

impl SessionData {
    fn new() -> Self {
        Self {
            values: HashMap::new(),
            last_activity: Utc::now(),
        }
    }
}

/// In-process session store. Sessions live until they have been idle for
/// longer than the configured timeout.
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop every session idle since before `now - idle_timeout`. Returns how many went.
    pub async fn expire_idle(&self, idle_timeout: Duration, now: DateTime<Utc>) -> usize {
        let Ok(timeout) = ChronoDuration::from_std(idle_timeout) else {
            return 0;
        };
        let Some(cutoff) = now.checked_sub_signed(timeout) else {
            return 0;
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, data| data.last_activity >= cutoff);
        before - sessions.len()
    }

    pub fn start_background_expiry(self: Arc<Self>, idle_timeout: Duration) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                let expired = self.expire_idle(idle_timeout, Utc::now()).await;
                if expired > 0 {
                    info!("Expired {} idle sessions", expired);
                }
            }
        });
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, session_id: &str, key: &str) -> Option<Value> {
        let mut sessions = self.sessions.write().await;
        let data = sessions.get_mut(session_id)?;
        data.last_activity = Utc::now();
        data.values.get(key).cloned()
    }

    async fn set(&self, session_id: &str, key: &str, value: Value) {
        let mut sessions = self.sessions.write().await;
        let data = sessions.entry(session_id.to_string()).or_insert_with(|| {
            debug!(session_id, "new session");
            SessionData::new()
        });
        data.last_activity = Utc::now();
        data.values.insert(key.to_string(), value);
    }

    async fn remove(&self, session_id: &str, key: &str) -> Option<Value> {
        let mut sessions = self.sessions.write().await;
        let data = sessions.get_mut(session_id)?;
        data.last_activity = Utc::now();
        data.values.remove(key)
    }
}
