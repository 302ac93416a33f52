//! Page resolution and rendering.
//!
//! - **resolve**: map a URL path to candidate template files
//! - **engine**: the template engine seam and its minijinja implementation
//!
//! # Flow
//!
//! ```text
//! url path ──► template_candidates() ──► first candidate on disk ──► engine.render()
//!                    │                                                   │
//!                    ▼                                                   ▼
//!             [] for "_partials"                                 Some(html) / None
//! ```

pub mod engine;
pub mod resolve;

pub use engine::{Context, MiniJinjaEngine, RenderError, TemplateEngine};
pub use resolve::template_candidates;

use crate::site::SiteSource;
use resolve::normalize;

/// URL path segment of a directory's scoped error page.
const NOT_FOUND_PAGE: &str = "404";

/// Renders pages of a site with a session-wide context.
///
/// Holds no per-request state, so one renderer can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct PageRenderer<E = MiniJinjaEngine> {
    source: SiteSource,
    engine: E,
    context: Context,
}

impl PageRenderer {
    /// Renderer backed by minijinja templates loaded from `source`.
    pub fn new(source: SiteSource, context: Context) -> Self {
        let engine = MiniJinjaEngine::new(source.root());
        Self::with_engine(source, engine, context)
    }
}

impl<E: TemplateEngine> PageRenderer<E> {
    pub fn with_engine(source: SiteSource, engine: E, context: Context) -> Self {
        Self {
            source,
            engine,
            context,
        }
    }

    pub fn source(&self) -> &SiteSource {
        &self.source
    }

    /// True iff some candidate template of `url_path` is a regular file.
    pub fn has_page(&self, url_path: &str) -> bool {
        template_candidates(url_path)
            .iter()
            .any(|template| self.source.is_file(template))
    }

    /// Render the first candidate template present on disk.
    ///
    /// Returns `Ok(None)` when no candidate exists. A present template that
    /// fails to render is an error; later candidates are not tried.
    pub fn render_page(&self, url_path: &str) -> Result<Option<String>, RenderError> {
        for template in template_candidates(url_path) {
            match self.engine.render(&template, &self.context) {
                Ok(html) => return Ok(Some(html)),
                Err(RenderError::NotFound(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }

    /// URL path of the nearest `404` page for a missed `url_path`.
    ///
    /// Starts at the directory the request points into and walks up to the
    /// site root. A trailing slash means the request names a directory itself.
    pub fn not_found_page(&self, url_path: &str) -> Option<String> {
        let mut dir = if url_path.ends_with('/') {
            normalize(url_path)
        } else {
            parent(normalize(url_path))
        };

        loop {
            let candidate = if dir.is_empty() {
                format!("/{NOT_FOUND_PAGE}")
            } else {
                format!("/{dir}/{NOT_FOUND_PAGE}")
            };
            if self.has_page(&candidate) {
                return Some(candidate);
            }
            if dir.is_empty() {
                return None;
            }
            dir = parent(dir);
        }
    }
}

/// Parent of a `/`-separated relative path, `""` at the top.
fn parent(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}
