use sha2::{Digest, Sha256};

/// One logical upstream request. Identical queries share a cache slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovieQuery {
    Search { query: String, page: u32 },
    Popular { page: u32 },
    Upcoming { page: u32 },
    ByGenre { genre_id: u64, page: u32 },
    Details { movie_id: u64 },
    Genres,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    /// Listings, searches and details.
    Short,
    /// The genre taxonomy.
    Long,
}

impl MovieQuery {
    pub fn path(&self) -> String {
        match self {
            MovieQuery::Search { .. } => "/search/movie".to_string(),
            MovieQuery::Popular { .. } => "/movie/popular".to_string(),
            MovieQuery::Upcoming { .. } => "/movie/upcoming".to_string(),
            MovieQuery::ByGenre { .. } => "/discover/movie".to_string(),
            MovieQuery::Details { movie_id } => format!("/movie/{}", movie_id),
            MovieQuery::Genres => "/genre/movie/list".to_string(),
        }
    }

    /// Shape-specific query parameters; `api_key` and `language` are added by the client.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            MovieQuery::Search { query, page } => vec![
                ("query", query.clone()),
                ("page", page.to_string()),
            ],
            MovieQuery::Popular { page } | MovieQuery::Upcoming { page } => {
                vec![("page", page.to_string())]
            }
            MovieQuery::ByGenre { genre_id, page } => vec![
                ("with_genres", genre_id.to_string()),
                ("page", page.to_string()),
            ],
            MovieQuery::Details { .. } => {
                vec![("append_to_response", "credits,videos".to_string())]
            }
            MovieQuery::Genres => Vec::new(),
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            MovieQuery::Search { query, page } => {
                let mut hasher = Sha256::new();
                hasher.update(format!("{}_{}", query, page).as_bytes());
                format!("search_{}", hex::encode(hasher.finalize()))
            }
            MovieQuery::Popular { page } => format!("popular_{}", page),
            MovieQuery::Upcoming { page } => format!("upcoming_{}", page),
            MovieQuery::ByGenre { genre_id, page } => format!("genre_{}_{}", genre_id, page),
            MovieQuery::Details { movie_id } => format!("movie_{}", movie_id),
            MovieQuery::Genres => "genres".to_string(),
        }
    }

    pub fn ttl_class(&self) -> TtlClass {
        match self {
            MovieQuery::Genres => TtlClass::Long,
            _ => TtlClass::Short,
        }
    }
}
