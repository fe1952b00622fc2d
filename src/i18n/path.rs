//! Site path normalization.

/// Path prefixes that are never rewritten between locales.
const NON_TRANSLATABLE_PREFIXES: &[&str] = &[
    "/assets/",
    "/favicon",
    "/site.webmanifest",
    "/apple-touch-icon",
];

/// Normalize a site path.
///
/// Query strings and fragments are dropped, a leading and trailing `/` is
/// enforced and repeated slashes are collapsed. `""`, `"?x"` and `"#top"`
/// all normalize to `/`.
pub fn normalize_path(raw: &str) -> String {
    let mut path = raw.trim();

    if let Some(idx) = path.find('#') {
        path = &path[..idx];
    }
    if let Some(idx) = path.find('?') {
        path = &path[..idx];
    }

    let mut out = String::with_capacity(path.len() + 2);
    out.push('/');
    for ch in path.chars() {
        if ch == '/' && out.ends_with('/') {
            continue;
        }
        out.push(ch);
    }
    if !out.ends_with('/') {
        out.push('/');
    }
    out
}

/// Whether an `href` found in the header may be rewritten to another locale.
///
/// Only same-site absolute paths without a query or fragment qualify, and
/// asset, icon and manifest paths are left alone.
pub fn is_rewritable_link(href: &str) -> bool {
    if !href.starts_with('/') || href.starts_with("//") {
        return false;
    }
    if href.contains('#') || href.contains('?') {
        return false;
    }
    let normalized = normalize_path(href);
    !NON_TRANSLATABLE_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
}
