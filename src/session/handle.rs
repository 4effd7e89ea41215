use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::server::AppState;
use super::store::SessionStore;

const FLASH_KEY: &str = "_flash";

/// Session id attached to the request by the cookie middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

/// One browser session: its id plus the store it lives in.
#[derive(Clone)]
pub struct Session {
    id: String,
    store: Arc<dyn SessionStore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Notice,
    Error,
}

/// A one-shot message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Session {
    pub fn new(id: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            id: id.into(),
            store,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.store.get(&self.id, key).await?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(session = %self.id, key, error = %e, "Ignoring malformed session value");
                None
            }
        }
    }

    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).await.unwrap_or(default)
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(v) => self.store.set(&self.id, key, v).await,
            Err(e) => warn!(session = %self.id, key, error = %e, "Failed to serialize session value"),
        }
    }

    pub async fn add_flash(&self, level: FlashLevel, message: impl Into<String>) {
        let mut flashes: Vec<Flash> = self.get_or(FLASH_KEY, Vec::new()).await;
        flashes.push(Flash {
            level,
            message: message.into(),
        });
        self.set(FLASH_KEY, &flashes).await;
    }

    /// Returns pending flashes and clears them.
    pub async fn take_flashes(&self) -> Vec<Flash> {
        self.store
            .remove(&self.id, FLASH_KEY)
            .await
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let id = parts
            .extensions
            .get::<SessionId>()
            .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
        Ok(Session::new(id.0.clone(), state.sessions.clone()))
    }
}
