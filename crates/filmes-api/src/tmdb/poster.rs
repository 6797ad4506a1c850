//! Poster URL resolution from a relative TMDB path.

use super::types::ProviderImageConfig;

/// Shown when a movie has no poster at all.
pub const PLACEHOLDER_POSTER: &str = "/images/no-poster.png";

/// Size token picked whenever the provider offers it.
pub const PREFERRED_POSTER_SIZE: &str = "w342";

/// Turns a relative poster path into a displayable URL.
///
/// - No path: [`PLACEHOLDER_POSTER`].
/// - Configuration with at least one size: `base_url + size + path`, where
///   size is [`PREFERRED_POSTER_SIZE`] if listed, else the third entry if
///   there are at least three, else the first.
/// - Otherwise the path is returned unchanged and may not be a full URL.
#[must_use]
pub fn resolve_poster_url(config: Option<&ProviderImageConfig>, relative_path: Option<&str>) -> String {
    let Some(path) = relative_path.filter(|p| !p.is_empty()) else {
        return String::from(PLACEHOLDER_POSTER);
    };

    let Some(config) = config else {
        return String::from(path);
    };
    let Some(size) = pick_poster_size(&config.poster_sizes) else {
        return String::from(path);
    };

    format!("{}{size}{path}", config.base_url)
}

/// Preferred label, then index 2, then index 0.
fn pick_poster_size(sizes: &[String]) -> Option<&str> {
    if sizes.iter().any(|s| s == PREFERRED_POSTER_SIZE) {
        return Some(PREFERRED_POSTER_SIZE);
    }
    sizes.get(2).or_else(|| sizes.first()).map(String::as_str)
}
