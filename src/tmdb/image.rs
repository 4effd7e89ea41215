/// Build an absolute image URL from a TMDB relative path such as `/abc123.jpg`.
/// No network access; a missing or empty path yields `None`.
pub fn resolve_image_url(image_base: &str, path: Option<&str>) -> Option<String> {
    let path = path?.trim();
    if path.is_empty() {
        return None;
    }

    let base = image_base.trim_end_matches('/');
    if path.starts_with('/') {
        Some(format!("{}{}", base, path))
    } else {
        Some(format!("{}/{}", base, path))
    }
}
