//! URL path to template candidate resolution.
//!
//! Everything here is lexical; nothing touches the filesystem.
//!
//! ```text
//! "/"            → ["index.html"]
//! "/about"       → ["about.html", "about/index.html"]
//! "/about/"      → ["about.html", "about/index.html"]
//! "/docs/_base"  → []
//! ```

/// Template rendered for the site root.
pub const INDEX_TEMPLATE: &str = "index.html";

/// Extension every page template carries.
pub const TEMPLATE_EXT: &str = ".html";

/// Strip one leading and one trailing `/`.
pub fn normalize(url_path: &str) -> &str {
    let path = url_path.strip_prefix('/').unwrap_or(url_path);
    path.strip_suffix('/').unwrap_or(path)
}

/// Final segment of a `/`-separated path.
pub fn leaf(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Layouts and partials start with `_` and are never pages.
pub fn is_partial(name: &str) -> bool {
    name.starts_with('_')
}

/// Ordered list of templates that may render `url_path`. First existing wins.
pub fn template_candidates(url_path: &str) -> Vec<String> {
    let path = normalize(url_path);
    if path.is_empty() {
        return vec![INDEX_TEMPLATE.to_owned()];
    }
    if is_partial(leaf(path)) {
        return Vec::new();
    }
    vec![
        format!("{path}{TEMPLATE_EXT}"),
        format!("{path}/{INDEX_TEMPLATE}"),
    ]
}
