use axum::{extract::Request, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::config::Config;
use crate::recent::RecentlyViewed;
use crate::session::SessionStore;
use crate::tmdb::TmdbClient;
use crate::web;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tmdb: Arc<TmdbClient>,
    pub sessions: Arc<dyn SessionStore>,
    pub recent: Arc<RecentlyViewed>,
}

impl AppState {
    pub fn new(config: Config, tmdb: Arc<TmdbClient>, sessions: Arc<dyn SessionStore>) -> Self {
        let recent = Arc::new(RecentlyViewed::new(tmdb.clone()));
        Self {
            config: Arc::new(config),
            tmdb,
            sessions,
            recent,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    // Only the detail page feeds the recently-viewed list.
    let detail = get(web::details).route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        web::record_recent_view,
    ));

    let movie_routes = Router::new()
        .route("/movies", get(web::popular))
        .route("/movies/", get(web::popular))
        .route("/movies/search", get(web::search))
        .route("/movies/upcoming", get(web::upcoming))
        .route("/movies/genres", get(web::genres))
        .route("/movies/recent", get(web::recent))
        .route("/movies/genre/:genre_id", get(web::by_genre))
        .route("/movies/:id", detail);

    let mut router = Router::new()
        .route("/robots.txt", get(robots_txt_handler))
        .merge(movie_routes)
        .fallback(fallback_handler);

    if let Some(ref appdir) = state.config.appdir {
        router = router.fallback_service(ServeDir::new(appdir));
    }

    router
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::session::session_cookie,
        ))
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

async fn fallback_handler(_req: Request) -> impl IntoResponse {
    StatusCode::NOT_FOUND
}
