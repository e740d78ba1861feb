/// Connection parameters for one Mreg API endpoint.
///
/// A session is an immutable value. It either carries a token from the start
/// ([`Session::with_token`]) or starts anonymous and is replaced wholesale by
/// a logged-in session returned from [`Gateway::login`](crate::Gateway::login).
/// The token is never mutated in place, so a session can be cloned and
/// threaded through any number of operations without hidden state.
#[derive(Clone)]
pub struct Session {
    server_url: String,
    token: Option<String>,
}

impl Session {
    /// Session authenticated with a pre-issued API token.
    pub fn with_token(server_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            token: Some(token.into()),
        }
    }

    /// Session without credentials, suitable only for a subsequent login.
    pub fn anonymous(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            token: None,
        }
    }

    /// The configured server URL with any trailing slash stripped.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Consume this session and return one carrying the freshly issued token.
    pub(crate) fn authenticated(self, token: String) -> Self {
        Self {
            server_url: self.server_url,
            token: Some(token),
        }
    }
}

// The token never appears in Debug output.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("server_url", &self.server_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
