/// Normalises a service base URL: prepends `http://` when no scheme is
/// given and strips trailing slashes.
pub(crate) fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

pub(crate) fn user_agent() -> String {
    format!("pipeline-metrics/{}", env!("CARGO_PKG_VERSION"))
}
