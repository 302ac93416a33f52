//! Static site building.
//!
//! Mirrors the site source into a fresh target directory.
//!
//! # Architecture
//!
//! ```text
//! render_site()
//!     │
//!     ├── SiteSource::open() / ensure_fresh_target()   (fatal on failure)
//!     │
//!     └── build_with()
//!             │
//!             └── collect_all_files() ──► for each file
//!                     ├── _partial.html  ──► skipped
//!                     ├── page.html      ──► PageRenderer ──► write
//!                     └── anything else  ──► copy
//! ```

use crate::{
    logger::Printer,
    render::{
        Context, PageRenderer, TemplateEngine,
        resolve::{TEMPLATE_EXT, is_partial, leaf},
    },
    site::{SiteSource, relative_slash_path},
};
use anyhow::{Context as _, Result, anyhow};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// What happened to the files of a build.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Rendered templates, relative to the source root.
    pub pages: Vec<String>,
    /// Verbatim copies.
    pub copied: Vec<String>,
    /// Underscore templates left out of the output.
    pub skipped: Vec<String>,
}

impl BuildReport {
    /// Number of files written to the target.
    pub fn written(&self) -> usize {
        self.pages.len() + self.copied.len()
    }
}

/// How a source file ends up in the build output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Partial,
    Page,
    Asset,
}

fn classify(relative: &str) -> FileKind {
    if !relative.ends_with(TEMPLATE_EXT) {
        FileKind::Asset
    } else if is_partial(leaf(relative)) {
        FileKind::Partial
    } else {
        FileKind::Page
    }
}

/// URL path that renders the template at `relative`.
fn page_url(relative: &str) -> String {
    let stem = relative.strip_suffix(TEMPLATE_EXT).unwrap_or(relative);
    format!("/{stem}")
}

/// Render `source` into the not yet existing directory `target`.
///
/// Prints `OK: <relative path>` for every file written.
pub fn render_site<W: Write>(
    source: &Path,
    target: &Path,
    context: Context,
    printer: &mut Printer<W>,
) -> Result<BuildReport> {
    let site = SiteSource::open(source)?;
    SiteSource::ensure_fresh_target(target)?;

    let renderer = PageRenderer::new(site, context);
    build_with(&renderer, target, printer)
}

/// Build every file under the renderer's source into `target`.
///
/// Stops at the first failure. Files written before it stay on disk.
pub fn build_with<E: TemplateEngine, W: Write>(
    renderer: &PageRenderer<E>,
    target: &Path,
    printer: &mut Printer<W>,
) -> Result<BuildReport> {
    let root = renderer.source().root();
    let mut report = BuildReport::default();

    for path in collect_all_files(root)? {
        let relative = relative_slash_path(&path, root)
            .ok_or_else(|| anyhow!("Invalid path: {}", path.display()))?;
        let dest = target.join(&relative);

        match classify(&relative) {
            FileKind::Partial => {
                report.skipped.push(relative);
                continue;
            }
            FileKind::Page => {
                let html = renderer
                    .render_page(&page_url(&relative))
                    .with_context(|| format!("Failed to render {relative}"))?
                    .ok_or_else(|| anyhow!("No page resolved for {relative}"))?;
                write_file(&dest, html.as_bytes())?;
                report.pages.push(relative.clone());
            }
            FileKind::Asset => {
                create_parent(&dest)?;
                fs::copy(&path, &dest)
                    .with_context(|| format!("Failed to copy {relative}"))?;
                report.copied.push(relative.clone());
            }
        }

        printer.echo(&format!("OK: {relative}"))?;
    }

    printer.final_echo()?;
    Ok(report)
}

/// Collect all files below `dir`, in file name order.
fn collect_all_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    create_parent(path)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
