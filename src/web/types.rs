use serde::Serialize;
use serde_json::Value;

use crate::recent::MovieSnapshot;
use crate::session::Flash;
use crate::tmdb::{resolve_image_url, Genre, MovieSummary, QueryResult};

#[derive(Debug, Clone, Serialize)]
pub struct MovieCard {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub genre_ids: Vec<u64>,
    pub poster_url: Option<String>,
}

impl MovieCard {
    pub fn from_summary(movie: MovieSummary, image_base: &str) -> Self {
        let poster_url = resolve_image_url(image_base, movie.poster_path.as_deref());
        Self {
            id: movie.id,
            title: movie.title,
            overview: movie.overview,
            release_date: movie.release_date,
            vote_average: movie.vote_average,
            genre_ids: movie.genre_ids,
            poster_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentMovieCard {
    pub id: u64,
    pub title: String,
    pub release_date: Option<String>,
    pub poster_url: Option<String>,
}

impl RecentMovieCard {
    pub fn from_snapshot(snapshot: MovieSnapshot, image_base: &str) -> Self {
        let poster_url = resolve_image_url(image_base, snapshot.poster_path.as_deref());
        Self {
            id: snapshot.id,
            title: snapshot.title,
            release_date: snapshot.release_date,
            poster_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

impl Pagination {
    /// `extra` parameters are URL-encoded and placed before `page`.
    pub fn new(base: &str, extra: &[(&str, &str)], page: u32, total_pages: u32) -> Self {
        let link = |p: u32| {
            let mut query: Vec<String> = extra
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect();
            query.push(format!("page={}", p));
            format!("{}?{}", base, query.join("&"))
        };

        Self {
            page,
            total_pages,
            prev_url: (page > 1).then(|| link(page - 1)),
            next_url: (page < total_pages).then(|| link(page + 1)),
        }
    }
}

/// Movie grid shared by the listing pages.
#[derive(Debug, Clone, Serialize)]
pub struct MovieGrid {
    pub movies: Vec<MovieCard>,
    pub pagination: Pagination,
    pub has_error: bool,
    pub error_message: Option<String>,
}

impl MovieGrid {
    /// A failed result renders as an empty grid with the error flag set.
    pub fn from_result(
        result: &QueryResult,
        image_base: &str,
        base: &str,
        extra: &[(&str, &str)],
        page: u32,
    ) -> Self {
        let movies = result
            .results()
            .into_iter()
            .map(|m| MovieCard::from_summary(m, image_base))
            .collect();

        Self {
            movies,
            pagination: Pagination::new(base, extra, page, result.total_pages()),
            has_error: result.is_failure(),
            error_message: result.error_message().map(str::to_string),
        }
    }

    pub fn empty(base: &str, extra: &[(&str, &str)], page: u32) -> Self {
        Self {
            movies: Vec::new(),
            pagination: Pagination::new(base, extra, page, 1),
            has_error: false,
            error_message: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Sidebar {
    pub recent_movies: Vec<RecentMovieCard>,
    pub flashes: Vec<Flash>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub heading: String,
    #[serde(flatten)]
    pub grid: MovieGrid,
    #[serde(flatten)]
    pub sidebar: Sidebar,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub query: String,
    #[serde(flatten)]
    pub grid: MovieGrid,
    pub suggestions: Vec<String>,
    #[serde(flatten)]
    pub sidebar: Sidebar,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenrePage {
    pub genre: String,
    pub genre_id: u64,
    #[serde(flatten)]
    pub grid: MovieGrid,
    #[serde(flatten)]
    pub sidebar: Sidebar,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailPage {
    pub movie: Value,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    #[serde(flatten)]
    pub sidebar: Sidebar,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenresPage {
    pub genres: Vec<Genre>,
    pub has_error: bool,
    pub error_message: Option<String>,
}
