//! HTTP transport to the Mreg API.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::diagnostics::Diagnostic;
use crate::session::Session;
use crate::utils::log_sanitizer::truncate_for_log;

/// Connect timeout for outbound requests (seconds).
const CONNECT_TIMEOUT_SECS: u64 = 10;
/// Overall request timeout (seconds).
const REQUEST_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("mreg-reconciler/", env!("CARGO_PKG_VERSION"));

/// One completed exchange with the API.
///
/// `json` is populated only when the response declared a JSON content-type
/// and the body parsed cleanly.
#[derive(Debug)]
pub struct ApiResponse {
    pub text: String,
    pub json: Option<Value>,
}

/// Issues requests against a single Mreg endpoint on behalf of a [`Session`].
///
/// The gateway holds no state beyond the reqwest connection pool; every
/// failure is reported as exactly one `Error` [`Diagnostic`] and nothing is
/// retried.
#[derive(Debug)]
pub struct Gateway {
    pub(crate) client: Client,
    pub(crate) session: Session,
}

impl Gateway {
    pub fn new(session: Session) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");
        Self { client, session }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Perform one request and classify the response.
    ///
    /// `path` is joined to the session's base URL (trailing slash already
    /// stripped). A JSON `body`, when given, is serialized and sent with a
    /// JSON content-type; the `Authorization: Token <token>` header is added
    /// whenever the session carries a token.
    ///
    /// Success means the response status equals `expected` exactly. Any other
    /// status yields an `Error` diagnostic whose detail contains the method,
    /// URL, request body, status and raw response body. A body that fails to
    /// parse as JSON despite a JSON content-type is also an `Error`, even
    /// when the status matched.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        expected: StatusCode,
    ) -> Result<ApiResponse, Diagnostic> {
        let url = format!("{}{}", self.session.base_url(), path);
        log::debug!("{method} {url}");

        let mut builder = self.client.request(method.clone(), &url);
        if let Some(token) = self.session.token() {
            builder = builder.header("Authorization", format!("Token {token}"));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            log::error!("{method} {url} failed: {e}");
            Diagnostic::error(
                "Could not reach the Mreg API",
                format!("{method} {url}\n{e}"),
            )
        })?;

        let status = response.status();
        log::debug!("{method} {url} -> {status}");

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        let text = response.text().await.map_err(|e| {
            Diagnostic::error(
                "Failed to read the Mreg API response body",
                format!("{method} {url}\n{e}"),
            )
        })?;

        if status != expected {
            log::error!(
                "{method} {url} returned {status}: {}",
                truncate_for_log(&text)
            );
            let request_body = body.map(Value::to_string).unwrap_or_default();
            return Err(Diagnostic::error(
                "Got an error message from the Mreg API",
                format!(
                    "{method} {url}\nrequest body: {request_body}\nresponse: http status {}\n{text}",
                    status.as_u16()
                ),
            ));
        }

        let json = if is_json {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::error!("{method} {url}: JSON parse failed: {e}");
                    return Err(Diagnostic::error(e.to_string(), text));
                }
            }
        } else {
            None
        };

        Ok(ApiResponse { text, json })
    }
}
