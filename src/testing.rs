//! Shared test fixtures.

use std::{fs, path::Path};
use tempfile::TempDir;

/// Files of the example site: `(relative path, contents)`.
pub const EXAMPLE_SITE: &[(&str, &str)] = &[
    ("_base.html", "<body>{% block body %}{% endblock %}</body>"),
    (
        "index.html",
        r#"{% extends "_base.html" %}{% block body %}<h1>Index</h1>{% endblock %}"#,
    ),
    (
        "simple.html",
        r#"{% extends "_base.html" %}{% block body %}<h1>Simple</h1>{% endblock %}"#,
    ),
    (
        "sub-with-404/404.html",
        r#"{% extends "_base.html" %}{% block body %}<h1>404 Not Found</h1>{% endblock %}"#,
    ),
    (
        "sub-with-index/index.html",
        r#"{% extends "_base.html" %}{% block body %}<h1>Sub/Index</h1>{% endblock %}"#,
    ),
    (
        "sub-without-index/simple.html",
        r#"{% extends "_base.html" %}{% block body %}<h1>Sub/Simple</h1>{% endblock %}"#,
    ),
    ("robots.txt", "User-agent: *\nDisallow: /\n"),
    ("theme.css", "body { color: #333; }\n"),
];

/// Write `files` below `root`, creating parent directories.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
}

/// Temporary copy of the example site.
pub fn example_site() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_files(dir.path(), EXAMPLE_SITE);
    dir
}
