/*
[INPUT]:  Login/password and the unauthenticated HTTP client
[OUTPUT]: Established session (bearer token + display name)
[POS]:    Auth layer - orchestrates the basic-auth login exchange
[UPDATE]: When auth endpoints or login response shapes change
*/

use reqwest::Method;
use tracing::{info, warn};

use crate::http::client::send_checked;
use crate::http::{AuthenticatedClient, Result, WfeClient, WfeError};
use crate::types::{AuthTokenResponse, LoginRequest};

use super::{Session, SessionStore};

/// Manages login, the current session and logout
#[derive(Debug, Clone)]
pub struct AuthManager {
    client: WfeClient,
    sessions: SessionStore,
}

impl AuthManager {
    /// Create a new auth manager with an empty session store
    pub fn new(client: WfeClient) -> Self {
        Self {
            client,
            sessions: SessionStore::new(),
        }
    }

    /// The underlying unauthenticated client
    pub fn client(&self) -> &WfeClient {
        &self.client
    }

    /// The session store
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Current session if logged in
    pub fn session(&self) -> Option<Session> {
        self.sessions.get()
    }

    /// Client bound to the current session's token
    pub fn authenticated_client(&self) -> Option<AuthenticatedClient> {
        self.sessions
            .token()
            .map(|token| self.client.authenticated(token))
    }

    /// Exchange credentials for a session and store it.
    ///
    /// POST auth/basic {login, password}
    ///
    /// Every failure, transport or server-side, is reported as
    /// `WfeError::Authentication`; the previous session is left untouched.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<Session> {
        let session = self.authenticate(identifier, secret).await?;
        self.sessions.set(session.clone());
        Ok(session)
    }

    /// Exchange credentials for a session without storing it.
    ///
    /// Callers that must order the store against a concurrent logout
    /// set it themselves through `sessions()`.
    pub async fn authenticate(&self, identifier: &str, secret: &str) -> Result<Session> {
        match self.request_session(identifier, secret).await {
            Ok(session) => {
                info!(display_name = %session.display_name, "login succeeded");
                Ok(session)
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                Err(match err {
                    WfeError::Authentication { .. } => err,
                    other => WfeError::authentication(other.to_string()),
                })
            }
        }
    }

    /// Forget the current session. The server is not notified.
    pub fn logout(&self) {
        self.sessions.clear();
        info!("logged out");
    }

    async fn request_session(&self, identifier: &str, secret: &str) -> Result<Session> {
        let body = LoginRequest {
            login: identifier.to_string(),
            password: secret.to_string(),
        };
        let builder = self.client.request(Method::POST, "auth/basic")?.json(&body);
        let response = send_checked(builder).await?;
        let text = response.text().await?;
        parse_login_body(&text, identifier)
    }
}

/// Accepts `{token, user}`, a JSON string, or a raw token body
fn parse_login_body(body: &str, identifier: &str) -> Result<Session> {
    let body = body.trim();

    let (token, user) = if body.starts_with('{') {
        let parsed: AuthTokenResponse = serde_json::from_str(body)?;
        (parsed.token, parsed.user)
    } else if body.starts_with('"') {
        (serde_json::from_str::<String>(body)?, None)
    } else {
        (body.to_string(), None)
    };

    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(WfeError::authentication("server returned an empty token"));
    }

    let display_name = user
        .and_then(|u| u.full_name.filter(|n| !n.is_empty()).or(u.name))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| identifier.to_string());

    Ok(Session::new(token, display_name))
}
