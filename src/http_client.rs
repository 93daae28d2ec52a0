use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};

/// Number of characters of a device response echoed to the console
pub const SNIPPET_CHARS: usize = 1000;

/// Create the HTTP session shared by every request of a run
///
/// The session keeps cookies and pooled keep-alive connections for the
/// lifetime of the returned client.
///
/// # Examples
/// ```no_run
/// use ecp_sideload::http_client::session_client;
///
/// let client = session_client().expect("failed to create client");
/// ```
pub fn session_client() -> Result<Client> {
    Client::builder()
        .cookie_store(true)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to create HTTP session client")
}

/// Status and body of a completed device request
///
/// The control API answers with HTML or XML and sometimes with non-success
/// codes on benign pages, so the status is kept for the caller to interpret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl EcpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn snippet(&self) -> String {
        snippet(&self.body, SNIPPET_CHARS)
    }
}

/// Capture status and body of a response without judging the status
///
/// # Arguments
/// * `res` - The HTTP response to capture
/// * `context_msg` - Context message describing the request (e.g., "GET /query/apps")
pub async fn capture_response(res: Response, context_msg: &str) -> Result<EcpResponse> {
    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("failed to read response body of {context_msg}"))?;

    Ok(EcpResponse { status, body })
}

/// First `max_chars` characters of `body`
pub fn head(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

/// First `max_chars` characters of `body` on a single line
pub fn snippet(body: &str, max_chars: usize) -> String {
    head(body, max_chars).replace(['\n', '\r'], " ")
}
