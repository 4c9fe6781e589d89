/// Path of the Action API below the catalog root.
pub(crate) const ACTION_PATH: &str = "/api/3/action";

/// Trims whitespace and trailing slashes so paths can be appended directly.
pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

pub(crate) fn action_url(base: &str, action: &str) -> String {
    format!("{}{}/{}", base.trim_end_matches('/'), ACTION_PATH, action)
}

/// Accepts `host:port` as well as a full proxy URL.
pub(crate) fn normalize_proxy(proxy: &str) -> String {
    let proxy = proxy.trim();
    if proxy.contains("://") {
        proxy.to_string()
    } else {
        format!("http://{}", proxy)
    }
}

pub(crate) fn is_blank(s: Option<&str>) -> bool {
    s.is_none_or(|s| s.trim().is_empty())
}
