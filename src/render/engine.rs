//! Template engine seam.
//!
//! Pages go through [`TemplateEngine`], which only has to tell a missing
//! template apart from every other failure. [`MiniJinjaEngine`] is the
//! default implementation.

use crate::site::safe_join;
use minijinja::{AutoEscape, Environment, ErrorKind, path_loader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Variables exposed to every template of a session.
pub type Context = serde_json::Map<String, serde_json::Value>;

/// Rendering failures.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The requested template is not on disk. Callers may try another one.
    #[error("template not found: {0}")]
    NotFound(String),

    /// The template exists but could not be rendered.
    #[error("failed to render `{name}`")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

impl RenderError {
    fn template(name: &str, source: minijinja::Error) -> Self {
        Self::Template {
            name: name.to_owned(),
            source,
        }
    }
}

/// Renders a named template with a context.
pub trait TemplateEngine {
    fn render(&self, template: &str, context: &Context) -> Result<String, RenderError>;
}

/// File-based minijinja engine rooted at the site source.
///
/// Builds a fresh environment per render so edited templates show up on the
/// next request.
#[derive(Debug, Clone)]
pub struct MiniJinjaEngine {
    root: PathBuf,
}

impl MiniJinjaEngine {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn environment(&self) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_loader(path_loader(self.root.clone()));
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template: &str, context: &Context) -> Result<String, RenderError> {
        // Only the requested template maps to NotFound. A missing parent or
        // include surfaces from minijinja as a render failure.
        if !safe_join(&self.root, template).is_some_and(|path| path.is_file()) {
            return Err(RenderError::NotFound(template.to_owned()));
        }

        let env = self.environment();
        let tmpl = env.get_template(template).map_err(|err| match err.kind() {
            ErrorKind::TemplateNotFound => RenderError::NotFound(template.to_owned()),
            _ => RenderError::template(template, err),
        })?;

        tmpl.render(context)
            .map_err(|err| RenderError::template(template, err))
    }
}
