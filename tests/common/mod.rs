#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use cinebrowse_rs::config::{CacheConfig, Config, TmdbConfig};
use cinebrowse_rs::tmdb::TmdbClient;

pub const API_KEY: &str = "fake_api_key";
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Movie id the mock answers with a 404.
pub const MISSING_MOVIE: u64 = 404;
/// Movie id the mock answers with a body that isn't JSON.
pub const GARBLED_MOVIE: u64 = 777;

#[derive(Debug, Clone)]
pub struct Hit {
    pub path: String,
    pub params: HashMap<String, String>,
}

/// A stand-in for the TMDB API, served on an ephemeral local port.
#[derive(Clone, Default)]
pub struct MockTmdb {
    hits: Arc<Mutex<Vec<Hit>>>,
    down: Arc<AtomicBool>,
}

impl MockTmdb {
    pub async fn start() -> (Self, String) {
        let mock = MockTmdb::default();
        let app = Router::new().fallback(handle).with_state(mock.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (mock, format!("http://{}/3", addr))
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_for(&self, path: &str) -> usize {
        self.hits().iter().filter(|h| h.path == path).count()
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }
}

async fn handle(
    State(mock): State<MockTmdb>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let path = uri.path().strip_prefix("/3").unwrap_or(uri.path()).to_string();
    mock.hits.lock().unwrap().push(Hit {
        path: path.clone(),
        params: params.clone(),
    });

    if mock.down.load(Ordering::SeqCst) {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    if params.get("api_key").map(String::as_str) != Some(API_KEY) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match path.as_str() {
        "/search/movie" => Json(json!({
            "page": 1,
            "total_pages": 1,
            "results": [
                {"id": 550, "title": "Fight Club", "release_date": "1999-10-15", "vote_average": 8.4, "poster_path": "/fc.jpg"}
            ]
        }))
        .into_response(),
        "/movie/popular" => Json(json!({
            "page": 1,
            "total_pages": 10,
            "results": [
                {"id": 1, "title": "Movie 1"},
                {"id": 2, "title": "Movie 2"}
            ]
        }))
        .into_response(),
        "/movie/upcoming" => Json(json!({
            "page": 1,
            "total_pages": 5,
            "results": [
                {"id": 1, "title": "Upcoming Movie 1"},
                {"id": 2, "title": "Upcoming Movie 2"}
            ]
        }))
        .into_response(),
        "/discover/movie" => Json(json!({
            "page": 1,
            "total_pages": 3,
            "results": [
                {"id": 1, "title": "Action Movie 1"},
                {"id": 2, "title": "Action Movie 2"}
            ]
        }))
        .into_response(),
        "/genre/movie/list" => Json(json!({
            "genres": [
                {"id": 28, "name": "Action"},
                {"id": 35, "name": "Comedy"},
                {"id": 18, "name": "Drama"}
            ]
        }))
        .into_response(),
        other => match other.strip_prefix("/movie/").and_then(|id| id.parse::<u64>().ok()) {
            Some(MISSING_MOVIE) => StatusCode::NOT_FOUND.into_response(),
            Some(GARBLED_MOVIE) => "<html>not json</html>".into_response(),
            Some(id) => {
                let title = if id == 550 {
                    "Fight Club".to_string()
                } else {
                    format!("Movie {}", id)
                };
                Json(json!({
                    "id": id,
                    "title": title,
                    "overview": "A ticking-time-bomb insomniac...",
                    "poster_path": format!("/{}.jpg", id),
                    "backdrop_path": format!("/{}-bg.jpg", id),
                    "release_date": "1999-10-15",
                    "runtime": 139
                }))
                .into_response()
            }
            None => StatusCode::NOT_FOUND.into_response(),
        },
    }
}

pub fn tmdb_config(base_url: &str) -> TmdbConfig {
    TmdbConfig {
        api_key: API_KEY.to_string(),
        base_url: base_url.to_string(),
        image_base_url: IMAGE_BASE.to_string(),
        language: "fr-FR".to_string(),
        timeout: Some(5),
    }
}

pub fn client(base_url: &str, cache: CacheConfig) -> TmdbClient {
    TmdbClient::new(tmdb_config(base_url), cache).unwrap()
}

pub fn app_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.tmdb = tmdb_config(base_url);
    config
}

/// A base URL nothing listens on.
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/3", addr)
}
