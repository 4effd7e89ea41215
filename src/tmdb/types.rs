use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of an upstream query. Failures are values, never errors.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Success(Value),
    Failure(String),
}

impl QueryResult {
    pub fn is_success(&self) -> bool {
        matches!(self, QueryResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            QueryResult::Success(payload) => Some(payload),
            QueryResult::Failure(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            QueryResult::Success(_) => None,
            QueryResult::Failure(message) => Some(message),
        }
    }

    /// The `results` array of a paged listing. Entries that don't look
    /// like a movie are skipped.
    pub fn results(&self) -> Vec<MovieSummary> {
        self.payload()
            .and_then(|p| p.get("results"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| MovieSummary::deserialize(item).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn total_pages(&self) -> u32 {
        self.payload()
            .and_then(|p| p.get("total_pages"))
            .and_then(Value::as_u64)
            .map(|n| n.min(u32::MAX as u64) as u32)
            .unwrap_or(1)
    }

    pub fn genres(&self) -> Vec<Genre> {
        self.payload()
            .and_then(|p| p.get("genres"))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| Genre::deserialize(item).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}
