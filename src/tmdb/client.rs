use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::config::{CacheConfig, TmdbConfig};
use super::image::resolve_image_url;
use super::query::{MovieQuery, TtlClass};
use super::types::QueryResult;

/// Anything that can produce movie details. The recently-viewed tracker
/// only needs this much of the client.
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn movie_details(&self, movie_id: u64) -> QueryResult;
}

/// Cached TMDB client. Every query goes through the process-wide TTL cache.
pub struct TmdbClient {
    http: reqwest::Client,
    config: TmdbConfig,
    ttls: CacheConfig,
    cache: TtlCache<QueryResult>,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig, ttls: CacheConfig) -> Result<Self, TmdbError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(TmdbError::Client)?;

        Ok(Self {
            http,
            config,
            ttls,
            cache: TtlCache::new(),
        })
    }

    pub async fn search_movies(&self, query: &str, page: u32) -> QueryResult {
        self.query(&MovieQuery::Search {
            query: query.to_string(),
            page,
        })
        .await
    }

    pub async fn popular_movies(&self, page: u32) -> QueryResult {
        self.query(&MovieQuery::Popular { page }).await
    }

    pub async fn upcoming_movies(&self, page: u32) -> QueryResult {
        self.query(&MovieQuery::Upcoming { page }).await
    }

    pub async fn movies_by_genre(&self, genre_id: u64, page: u32) -> QueryResult {
        self.query(&MovieQuery::ByGenre { genre_id, page }).await
    }

    pub async fn movie_details(&self, movie_id: u64) -> QueryResult {
        self.query(&MovieQuery::Details { movie_id }).await
    }

    pub async fn genres(&self) -> QueryResult {
        self.query(&MovieQuery::Genres).await
    }

    pub fn image_url(&self, path: Option<&str>) -> Option<String> {
        resolve_image_url(&self.config.image_base_url, path)
    }

    pub async fn query(&self, query: &MovieQuery) -> QueryResult {
        let key = query.cache_key();
        let ttl = match query.ttl_class() {
            TtlClass::Short => self.ttls.ttl(),
            TtlClass::Long => self.ttls.genre_ttl(),
        };
        let failure_ttl = self.ttls.failure_ttl();

        self.cache
            .get_or_compute_with(
                &key,
                |result| if result.is_failure() { failure_ttl } else { ttl },
                || self.fetch(query),
            )
            .await
    }

    async fn fetch(&self, query: &MovieQuery) -> QueryResult {
        match self.fetch_json(query).await {
            Ok(payload) => QueryResult::Success(payload),
            Err(e) => {
                warn!(path = %query.path(), error = %e, "TMDB request failed");
                QueryResult::Failure(e.to_string())
            }
        }
    }

    async fn fetch_json(&self, query: &MovieQuery) -> Result<Value, TmdbError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), query.path());

        let mut params = vec![
            ("api_key", self.config.api_key.clone()),
            ("language", self.config.language.clone()),
        ];
        params.extend(query.params());

        debug!(url = %url, "TMDB request");

        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| TmdbError::Transport(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TmdbError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TmdbError::Decode(e.without_url()))
    }
}

#[async_trait]
impl MovieSource for TmdbClient {
    async fn movie_details(&self, movie_id: u64) -> QueryResult {
        TmdbClient::movie_details(self, movie_id).await
    }
}

/// Request URLs carry the api key, so they are stripped from these errors.
#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("API request failed: {0}")]
    Transport(reqwest::Error),
    #[error("API request failed: HTTP status {0}")]
    Status(u16),
    #[error("API request failed: invalid response body: {0}")]
    Decode(reqwest::Error),
}
