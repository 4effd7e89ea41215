use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};

use crate::recent::list_recently_viewed;
use crate::server::AppState;
use crate::session::{FlashLevel, Session};
use crate::tmdb::QueryResult;
use crate::util::QueryParams;
use super::types::*;

/// Offered on the search page when no query was entered.
pub const SEARCH_SUGGESTIONS: &[&str] = &[
    "Inception",
    "Interstellar",
    "The Matrix",
    "Pulp Fiction",
    "Fight Club",
    "The Shawshank Redemption",
];

const DETAIL_ERROR: &str = "Movie not found or API error";
const DEFAULT_GENRE_NAME: &str = "Movies";
const INDEX_PATH: &str = "/movies/";

/// Detail fetch made while recording the view, handed on to the detail
/// handler so one view costs one upstream request.
#[derive(Debug, Clone)]
pub struct ViewedDetails(pub QueryResult);

async fn sidebar(state: &AppState, session: &Session) -> Sidebar {
    let image_base = &state.config.tmdb.image_base_url;
    let recent_movies = list_recently_viewed(session)
        .await
        .into_iter()
        .map(|s| RecentMovieCard::from_snapshot(s, image_base))
        .collect();

    Sidebar {
        recent_movies,
        flashes: session.take_flashes().await,
    }
}

fn parse_id(raw: &str) -> Result<u64, StatusCode> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StatusCode::NOT_FOUND);
    }
    raw.parse::<u64>().map_err(|_| StatusCode::NOT_FOUND)
}

pub async fn popular(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<QueryParams>,
) -> Json<ListingPage> {
    let page = params.page();
    let result = state.tmdb.popular_movies(page).await;
    let grid = MovieGrid::from_result(
        &result,
        &state.config.tmdb.image_base_url,
        INDEX_PATH,
        &[],
        page,
    );

    Json(ListingPage {
        heading: "Popular movies".to_string(),
        grid,
        sidebar: sidebar(&state, &session).await,
    })
}

pub async fn upcoming(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<QueryParams>,
) -> Json<ListingPage> {
    let page = params.page();
    let result = state.tmdb.upcoming_movies(page).await;
    let grid = MovieGrid::from_result(
        &result,
        &state.config.tmdb.image_base_url,
        "/movies/upcoming",
        &[],
        page,
    );

    Json(ListingPage {
        heading: "Upcoming movies".to_string(),
        grid,
        sidebar: sidebar(&state, &session).await,
    })
}

pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<QueryParams>,
) -> Json<SearchPage> {
    let query = params.get_str("q").to_string();
    let page = params.page();
    let extra = [("q", query.as_str())];

    let (grid, suggestions) = if query.is_empty() {
        let suggestions = SEARCH_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
        (MovieGrid::empty("/movies/search", &extra, page), suggestions)
    } else {
        let result = state.tmdb.search_movies(&query, page).await;
        let grid = MovieGrid::from_result(
            &result,
            &state.config.tmdb.image_base_url,
            "/movies/search",
            &extra,
            page,
        );
        (grid, Vec::new())
    };

    Json(SearchPage {
        query,
        grid,
        suggestions,
        sidebar: sidebar(&state, &session).await,
    })
}

pub async fn by_genre(
    State(state): State<AppState>,
    session: Session,
    Path(genre_id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Json<GenrePage>, StatusCode> {
    let genre_id = parse_id(&genre_id)?;
    let page = params.page();

    let result = state.tmdb.movies_by_genre(genre_id, page).await;
    let base = format!("/movies/genre/{}", genre_id);
    let grid = MovieGrid::from_result(
        &result,
        &state.config.tmdb.image_base_url,
        &base,
        &[],
        page,
    );

    let genre = state
        .tmdb
        .genres()
        .await
        .genres()
        .into_iter()
        .find(|g| g.id == genre_id)
        .map(|g| g.name)
        .unwrap_or_else(|| DEFAULT_GENRE_NAME.to_string());

    Ok(Json(GenrePage {
        genre,
        genre_id,
        grid,
        sidebar: sidebar(&state, &session).await,
    }))
}

pub async fn genres(State(state): State<AppState>) -> Json<GenresPage> {
    let result = state.tmdb.genres().await;
    Json(GenresPage {
        genres: result.genres(),
        has_error: result.is_failure(),
        error_message: result.error_message().map(str::to_string),
    })
}

pub async fn details(
    State(state): State<AppState>,
    session: Session,
    Path(movie_id): Path<String>,
    viewed: Option<Extension<ViewedDetails>>,
) -> Result<Response, StatusCode> {
    let movie_id = parse_id(&movie_id)?;
    let result = match viewed {
        Some(Extension(ViewedDetails(result))) => result,
        None => state.tmdb.movie_details(movie_id).await,
    };

    let Some(movie) = result.payload().cloned() else {
        session.add_flash(FlashLevel::Error, DETAIL_ERROR).await;
        return Ok(Redirect::to(INDEX_PATH).into_response());
    };

    let image = |key: &str| {
        state
            .tmdb
            .image_url(movie.get(key).and_then(|v| v.as_str()))
    };
    let poster_url = image("poster_path");
    let backdrop_url = image("backdrop_path");

    Ok(Json(DetailPage {
        movie,
        poster_url,
        backdrop_url,
        sidebar: sidebar(&state, &session).await,
    })
    .into_response())
}

pub async fn recent(State(state): State<AppState>, session: Session) -> Json<Sidebar> {
    Json(sidebar(&state, &session).await)
}

/// Route layer for the detail page: records the view before the handler
/// runs. Ids that don't route to a detail page are left alone.
pub async fn record_recent_view(
    State(state): State<AppState>,
    session: Session,
    Path(movie_id): Path<String>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Ok(movie_id) = parse_id(&movie_id) {
        let details = state.recent.record_view(&session, movie_id).await;
        req.extensions_mut().insert(ViewedDetails(details));
    }
    next.run(req).await
}
