use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Raw query string parameters. Lookups never fail; malformed numbers
/// fall back to defaults the way the page routes expect.
#[derive(Debug, Default)]
pub struct QueryParams {
    map: HashMap<String, String>,
}

impl<'de> Deserialize<'de> for QueryParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(QueryParams { map })
    }
}

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|v| v.as_str())
    }

    /// Trimmed string value, empty when absent.
    pub fn get_str(&self, key: &str) -> &str {
        self.get(key).map(str::trim).unwrap_or("")
    }

    /// The `page` parameter, clamped to at least 1. Missing or
    /// non-numeric values count as page 1.
    pub fn page(&self) -> u32 {
        self.get("page")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(|n| n.clamp(1, u32::MAX as i64) as u32)
            .unwrap_or(1)
    }
}

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        QueryParams {
            map: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_page_clamping() {
        assert_eq!(params(&[]).page(), 1);
        assert_eq!(params(&[("page", "3")]).page(), 3);
        assert_eq!(params(&[("page", "0")]).page(), 1);
        assert_eq!(params(&[("page", "-4")]).page(), 1);
        assert_eq!(params(&[("page", "abc")]).page(), 1);
        assert_eq!(params(&[("page", " 2 ")]).page(), 2);
    }

    #[test]
    fn test_get_str() {
        let p = params(&[("q", "  inception ")]);
        assert_eq!(p.get_str("q"), "inception");
        assert_eq!(p.get_str("missing"), "");
    }
}
