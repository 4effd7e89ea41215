use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::server::AppState;
use super::handle::SessionId;

/// Attach a `SessionId` to every request, issuing a new cookie when the
/// browser didn't send a valid one.
pub async fn session_cookie(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie_name = &state.config.session.cookie_name;

    let (id, is_new) = match session_id_from_cookies(req.headers(), cookie_name) {
        Some(id) => (id, false),
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            debug!(session = %id, "issuing session cookie");
            (id, true)
        }
    };

    req.extensions_mut().insert(SessionId(id.clone()));
    let mut response = next.run(req).await;

    if is_new {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", cookie_name, id);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

/// Find the session cookie among the request's `Cookie` headers. Only
/// well-formed UUIDs are accepted.
pub fn session_id_from_cookies(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == cookie_name)
        .and_then(|(_, value)| uuid::Uuid::parse_str(value.trim()).ok())
        .map(|id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for c in cookies {
            map.append(header::COOKIE, HeaderValue::from_str(c).unwrap());
        }
        map
    }

    #[test]
    fn test_finds_session_cookie() {
        let id = "0b7d4c6e-3c4a-4b8e-9a55-2f7a1f0c9d11";
        let cookie = format!("theme=dark; cinebrowse_session={}; other=1", id);
        let h = headers(&[cookie.as_str()]);
        assert_eq!(session_id_from_cookies(&h, "cinebrowse_session").as_deref(), Some(id));
    }

    #[test]
    fn test_searches_all_cookie_headers() {
        let id = "0b7d4c6e-3c4a-4b8e-9a55-2f7a1f0c9d11";
        let cookie = format!("sid={}", id);
        let h = headers(&["a=b", cookie.as_str()]);
        assert_eq!(session_id_from_cookies(&h, "sid").as_deref(), Some(id));
    }

    #[test]
    fn test_rejects_missing_or_malformed() {
        assert_eq!(session_id_from_cookies(&HeaderMap::new(), "sid"), None);
        assert_eq!(session_id_from_cookies(&headers(&["sid=../../etc"]), "sid"), None);
        assert_eq!(session_id_from_cookies(&headers(&["xsid=0b7d4c6e-3c4a-4b8e-9a55-2f7a1f0c9d11"]), "sid"), None);
    }
}
