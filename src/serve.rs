//! Development server.
//!
//! Renders pages straight from the site source on every request, built on
//! `tiny_http`:
//!
//! - Page rendering through [`PageRenderer`]
//! - Static file serving for everything that is not a page
//! - Scoped `404.html` pages
//! - Graceful shutdown on Ctrl+C
//!
//! # Request Resolution
//!
//! ```text
//! url ──► decode, drop query ──► page? ──yes──► 200 text/html (rendered)
//!                                  │no
//!                                  ▼
//!                     static file? (not *.html, no trailing /) ──yes──► 200 guessed type
//!                                  │no
//!                                  ▼
//!                     404 page in scope and no dot in leaf? ──yes──► 404 text/html (rendered)
//!                                  │no
//!                                  ▼
//!                             404 empty body
//! ```

use crate::{
    config::ServeConfig,
    log,
    render::{Context, PageRenderer, resolve},
    site::{SiteError, SiteSource},
};
use anyhow::{Context as _, Result, anyhow};
use std::{
    borrow::Cow,
    fmt, fs,
    io::Cursor,
    net::{IpAddr, SocketAddr},
    path::Path,
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// Content type of rendered pages.
const HTML: &str = "text/html";

// ============================================================================
// Replies
// ============================================================================

/// Status of a dispatched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    NotFound,
}

impl Status {
    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NotFound => 404,
        }
    }

    pub const fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NotFound => "Not Found",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

/// A fully buffered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: Status,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Reply {
    fn html(status: Status, html: String) -> Self {
        Self {
            status,
            content_type: HTML.to_owned(),
            body: html.into_bytes(),
        }
    }

    fn file(path: &Path, body: Vec<u8>) -> Self {
        Self {
            status: Status::Ok,
            content_type: mime_guess::from_path(path)
                .first_or_octet_stream()
                .to_string(),
            body,
        }
    }

    fn not_found() -> Self {
        Self::html(Status::NotFound, String::new())
    }

    /// `Content-Type` and `Content-Length`, in that order.
    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            ("Content-Type", self.content_type.clone()),
            ("Content-Length", self.body.len().to_string()),
        ]
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Maps request URLs of one site to replies.
///
/// Stateless between requests; share it freely across threads.
#[derive(Debug, Clone)]
pub struct SiteHandler {
    renderer: PageRenderer,
}

impl SiteHandler {
    /// Open `source` for serving. Fails if it is not a directory.
    pub fn new(source: impl AsRef<Path>, context: Context) -> Result<Self, SiteError> {
        let source = SiteSource::open(source)?;
        Ok(Self {
            renderer: PageRenderer::new(source, context),
        })
    }

    pub fn source(&self) -> &SiteSource {
        self.renderer.source()
    }

    /// Produce the reply for a raw request URL.
    ///
    /// Misses always become 404 replies. Errors mean a page exists but could
    /// not be rendered, or a static file could not be read.
    pub fn handle(&self, raw_url: &str) -> Result<Reply> {
        let path = request_path(raw_url);
        if !is_plain_path(&path) {
            return Ok(Reply::not_found());
        }
        self.dispatch(&path)
    }

    fn dispatch(&self, path: &str) -> Result<Reply> {
        if self.renderer.has_page(path)
            && let Some(html) = self.renderer.render_page(path)?
        {
            return Ok(Reply::html(Status::Ok, html));
        }

        if let Some(relative) = static_path(path)
            && let Some(full_path) = self.source().join(relative)
            && full_path.is_file()
        {
            let body = fs::read(&full_path)
                .with_context(|| format!("Failed to read {}", full_path.display()))?;
            return Ok(Reply::file(&full_path, body));
        }

        if !looks_like_asset(path)
            && let Some(page) = self.renderer.not_found_page(path)
            && let Some(html) = self.renderer.render_page(&page)?
        {
            return Ok(Reply::html(Status::NotFound, html));
        }

        Ok(Reply::not_found())
    }
}

/// Decode a raw request URL into a `/`-rooted path without query or fragment.
fn request_path(raw_url: &str) -> String {
    let path = raw_url.split(['?', '#']).next().unwrap_or_default();
    let path = urlencoding::decode(path).unwrap_or(Cow::Borrowed(path));
    if path.starts_with('/') {
        path.into_owned()
    } else {
        format!("/{path}")
    }
}

/// True if every segment between the leading and an optional trailing `/`
/// is a plain name: no empty segments (`//`), no `.` or `..`.
fn is_plain_path(path: &str) -> bool {
    let inner = resolve::normalize(path);
    inner.is_empty()
        || inner
            .split('/')
            .all(|segment| !matches!(segment, "" | "." | ".."))
}

/// Relative file path a request may be served from as a static file.
///
/// Templates are never served raw, and a trailing slash never names a file.
fn static_path(path: &str) -> Option<&str> {
    if path.ends_with(resolve::TEMPLATE_EXT) || path.ends_with('/') {
        return None;
    }
    let relative = path.strip_prefix('/').unwrap_or(path);
    (!relative.is_empty()).then_some(relative)
}

/// Paths like `/missing.txt` are asset requests and get no HTML error page.
fn looks_like_asset(path: &str) -> bool {
    resolve::leaf(resolve::normalize(path)).contains('.')
}

// ============================================================================
// Server Entry Point
// ============================================================================

/// Serve `handler` until Ctrl+C is received.
///
/// This function:
/// 1. Binds to the configured interface and port (with auto-retry on port conflict)
/// 2. Sets up Ctrl+C handler for graceful shutdown
/// 3. Handles requests one at a time in the calling thread
pub fn serve_site(handler: SiteHandler, config: &ServeConfig) -> Result<()> {
    let interface: IpAddr = config
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", config.interface))?;

    let (server, addr) = try_bind_port(interface, config.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "{} at http://{}", handler.source().root().display(), addr);

    for request in server.incoming_requests() {
        if let Err(e) = respond(request, &handler) {
            log!("error"; "request error: {e:#}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Answer a single request. Render failures become an empty 500.
fn respond(request: Request, handler: &SiteHandler) -> Result<()> {
    let url = request.url().to_owned();

    match handler.handle(&url) {
        Ok(reply) => {
            log!("serve"; "{} {}", reply.status, url);
            request.respond(into_response(reply)?)?;
        }
        Err(err) => {
            log!("error"; "{}: {:#}", url, err);
            request.respond(Response::empty(StatusCode(500)))?;
        }
    }
    Ok(())
}

/// Convert a reply into a `tiny_http` response.
fn into_response(reply: Reply) -> Result<Response<Cursor<Vec<u8>>>> {
    let headers = reply
        .headers()
        .into_iter()
        .map(|(field, value)| {
            Header::from_bytes(field, value.as_bytes())
                .map_err(|()| anyhow!("Invalid header `{field}: {value}`"))
        })
        .collect::<Result<Vec<_>>>()?;
    let length = reply.body.len();

    Ok(Response::new(
        StatusCode(reply.status.code()),
        headers,
        Cursor::new(reply.body),
        Some(length),
        None,
    ))
}

// ============================================================================
// Tests
// ============================================================================
