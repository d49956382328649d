//! Canonical identifier extraction from detail-page locators.

/// Extract the canonical post identifier from a detail-page locator.
///
/// Accepts absolute URLs and path-relative hrefs alike; the locator must end
/// in a `/status/<digits>` pair for the identifier (the last path segment) to
/// be considered extractable. Query strings and fragments are ignored.
/// Returns `None` for anything malformed — never panics.
pub fn id_from_locator(locator: &str) -> Option<String> {
    // Drop query/fragment, then walk path segments from the right.
    let path = locator
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    let mut segments = path.rsplit('/');
    let id = segments
        .next()
        .filter(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()))?;
    segments.next().filter(|s| *s == "status")?;

    Some(id.to_string())
}
