//! URL resolution utilities.
//!
//! [§ 4.2.3 The base element](https://html.spec.whatwg.org/multipage/semantics.html#the-base-element)
//! [URL Standard](https://url.spec.whatwg.org/)

/// Schemes the parser recognises as already absolute.
fn is_absolute(href: &str) -> bool {
    ["http://", "https://", "data:", "file:"]
        .iter()
        .any(|scheme| href.starts_with(scheme))
}

/// The `scheme://host` prefix of an absolute URL, if it has one.
fn origin_of(url: &str) -> Option<&str> {
    let scheme_end = url.find("://")? + 3;
    match url[scheme_end..].find('/') {
        Some(path_start) => Some(&url[..scheme_end + path_start]),
        None => Some(url),
    }
}

/// [§ 2.5 URLs](https://html.spec.whatwg.org/multipage/urls-and-fetching.html#resolving-urls)
///
/// Resolve a potentially relative URL against a base URL.
///
/// STEP 1: "If url is an absolute URL, return url."
///
/// STEP 2: "Otherwise, resolve url relative to base."
///
/// NOTE: This is a simplified implementation. Full URL resolution requires
/// implementing the URL Standard's URL parsing algorithm; the cases handled
/// here (absolute, protocol-relative, absolute-path, relative-path) cover
/// what the parser needs for `<base href>`.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    // STEP 1: an absolute href stands on its own.
    if is_absolute(href) {
        return href.to_string();
    }

    // STEP 2: resolve against the base, when there is one to resolve
    // against.
    let base = match base_url {
        Some(base) if !base.is_empty() => base,
        _ => return href.to_string(),
    };

    if let Some(rest) = href.strip_prefix("//") {
        // Protocol-relative: borrow the scheme from the base.
        let scheme = if base.starts_with("https:") { "https" } else { "http" };
        return format!("{scheme}://{rest}");
    }

    if href.starts_with('/') {
        // Absolute path: join onto the base's origin.
        return match origin_of(base) {
            Some(origin) => format!("{origin}{href}"),
            None => href.to_string(),
        };
    }

    // Relative path: join onto the base's directory.
    let base_dir = base.rsplit_once('/').map_or(base, |(dir, _)| dir);
    format!("{base_dir}/{href}")
}

#[cfg(test)]
mod tests {
    use super::resolve_url;

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(
            resolve_url("https://example.com/a", Some("https://other.net/")),
            "https://example.com/a"
        );
    }

    #[test]
    fn protocol_relative_urls_borrow_the_scheme() {
        assert_eq!(
            resolve_url("//cdn.example.com/x.css", Some("https://example.com/page")),
            "https://cdn.example.com/x.css"
        );
    }

    #[test]
    fn absolute_path_joins_origin() {
        assert_eq!(
            resolve_url("/style.css", Some("https://example.com/docs/index.html")),
            "https://example.com/style.css"
        );
    }

    #[test]
    fn relative_path_joins_base_directory() {
        assert_eq!(
            resolve_url("style.css", Some("https://example.com/docs/index.html")),
            "https://example.com/docs/style.css"
        );
    }

    #[test]
    fn no_base_returns_href() {
        assert_eq!(resolve_url("style.css", None), "style.css");
        assert_eq!(resolve_url("style.css", Some("")), "style.css");
    }
}
