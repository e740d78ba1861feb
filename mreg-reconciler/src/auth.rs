//! Token acquisition against `/api/token-auth/`.

use reqwest::{Method, StatusCode};
use serde_json::{Value, json};

use crate::diagnostics::Diagnostic;
use crate::gateway::Gateway;

impl Gateway {
    /// Exchange a username and password for a bearer token.
    ///
    /// Consumes this gateway and returns a new one whose session carries the
    /// issued token, so the token is set exactly once and only on success.
    /// A response that lacks a string `token` field is an `Error` diagnostic
    /// quoting the raw body, and no credentialed gateway is produced.
    ///
    /// Callers holding a token-only session never log in; this is only for
    /// sessions configured with a username and password.
    pub async fn login(self, username: &str, password: &str) -> Result<Gateway, Diagnostic> {
        let payload = json!({
            "username": username,
            "password": password,
        });
        let response = self
            .request(Method::POST, "/api/token-auth/", Some(&payload), StatusCode::OK)
            .await?;

        let token = response
            .json
            .as_ref()
            .and_then(|body| body.get("token"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Diagnostic::error(
                    "The Mreg token-auth endpoint returned an unexpected result",
                    response.text.clone(),
                )
            })?;

        log::debug!("login succeeded for {username}");
        Ok(Gateway {
            client: self.client,
            session: self.session.authenticated(token.to_string()),
        })
    }
}
