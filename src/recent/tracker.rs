use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::session::Session;
use crate::tmdb::{MovieSource, QueryResult};

/// How many movies the recently-viewed list holds.
pub const MAX_RECENT_MOVIES: usize = 5;

const RECENT_MOVIES_KEY: &str = "recent_movies";

fn snapshot_key(movie_id: u64) -> String {
    format!("movie_{}", movie_id)
}

/// Display fields kept in the session for the recently-viewed sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSnapshot {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl MovieSnapshot {
    /// Snapshot from a movie detail payload. `None` unless the payload
    /// carries both an id and a title.
    pub fn from_details(result: &QueryResult) -> Option<Self> {
        let payload = result.payload()?;
        Some(Self {
            id: payload.get("id")?.as_u64()?,
            title: payload.get("title")?.as_str()?.to_string(),
            poster_path: payload
                .get("poster_path")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            release_date: payload
                .get("release_date")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        })
    }
}

/// Move `movie_id` to the front of `list`, dropping any earlier occurrence
/// and anything past `MAX_RECENT_MOVIES`.
pub fn push_recent(mut list: Vec<u64>, movie_id: u64) -> Vec<u64> {
    list.retain(|&id| id != movie_id);
    list.insert(0, movie_id);
    list.truncate(MAX_RECENT_MOVIES);
    list
}

/// Keeps the per-session list of recently viewed movies.
pub struct RecentlyViewed {
    source: Arc<dyn MovieSource>,
}

impl RecentlyViewed {
    pub fn new(source: Arc<dyn MovieSource>) -> Self {
        Self { source }
    }

    /// Record a detail-page view and return the detail fetch it made. The
    /// id is listed even when the fetch fails; the snapshot is only
    /// written on success.
    pub async fn record_view(&self, session: &Session, movie_id: u64) -> QueryResult {
        let list: Vec<u64> = session.get_or(RECENT_MOVIES_KEY, Vec::new()).await;
        let list = push_recent(list, movie_id);
        session.set(RECENT_MOVIES_KEY, &list).await;

        let details = self.source.movie_details(movie_id).await;
        if details.is_failure() {
            debug!(movie_id, "No snapshot for failed detail fetch");
            return details;
        }

        match MovieSnapshot::from_details(&details) {
            Some(snapshot) => session.set(&snapshot_key(movie_id), &snapshot).await,
            None => warn!(movie_id, "Detail payload lacks id or title, not stored"),
        }
        details
    }
}

pub async fn recent_movie_ids(session: &Session) -> Vec<u64> {
    session.get_or(RECENT_MOVIES_KEY, Vec::new()).await
}

/// Snapshots for the session's list, newest first. Ids without a
/// snapshot are skipped.
pub async fn list_recently_viewed(session: &Session) -> Vec<MovieSnapshot> {
    let mut movies = Vec::new();
    for movie_id in recent_movie_ids(session).await {
        if let Some(snapshot) = session.get::<MovieSnapshot>(&snapshot_key(movie_id)).await {
            movies.push(snapshot);
        }
    }
    movies
}
