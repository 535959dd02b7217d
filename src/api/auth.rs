// src/api/auth.rs
// Login, session check, logout and registration

use reqwest::{Method, StatusCode};
use tracing::{info, warn};

use super::paths;
use crate::client::{AuthClient, decode};
use crate::error::{ClientError, Result};
use crate::models::{LoginRequest, LoginResponse, RegisterForm};
use crate::navigation::{DASHBOARD_PATH, LOGIN_PATH};

/// Shown when the token was issued but the session check did not come back 200
pub const TOKEN_SETUP_FAILED: &str = "Token setup failed. Please try again.";

/// Shown when registration returned a success status other than 200/201
pub const REGISTRATION_FAILED: &str = "Registration failed. Try again.";

/// What a successful login left in the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub username: Option<String>,
}

pub struct AuthApi<'a> {
    client: &'a AuthClient,
}

impl AuthClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }
}

impl AuthApi<'_> {
    /// Exchange phone + password for a token, store it, confirm it works,
    /// then move to the dashboard.
    ///
    /// Both calls are made outside the 401 policy: a rejected password or a
    /// token refused by the session check surfaces as `Status` (message from
    /// the server) rather than a forced logout. A refused token is not kept.
    pub async fn login(&self, phone: &str, password: &str) -> Result<LoginOutcome> {
        let body = LoginRequest {
            phone: phone.to_string(),
            password: password.to_string(),
        };
        let builder = self
            .client
            .public_request(Method::POST, paths::LOGIN)?
            .json(&body);
        let login: LoginResponse = decode(self.client.send_public(builder).await?).await?;

        let session = self.client.session();
        session.set_token(&login.token)?;
        if let Some(username) = &login.username {
            session.set_username(username)?;
        }

        let check = self.client.request(Method::GET, paths::SECURE)?;
        let status = match self.client.send_public(check).await {
            Ok(response) => response.status(),
            Err(e) => {
                warn!("session check after login failed: {}", e);
                if let Err(clear) = session.evict_token() {
                    warn!("Failed to clear session token: {}", clear);
                }
                return Err(e);
            }
        };
        if status != StatusCode::OK {
            warn!(%status, "session check after login did not return 200");
            return Err(ClientError::SessionSetup(TOKEN_SETUP_FAILED.into()));
        }

        info!(username = ?login.username, "logged in");
        self.client.navigator().redirect(DASHBOARD_PATH);
        Ok(LoginOutcome {
            username: login.username,
        })
    }

    /// Ask the server whether the stored token is still accepted.
    /// A rejected token goes through the usual 401 policy.
    pub async fn secure(&self) -> Result<()> {
        self.check_session().await.map(|_| ())
    }

    /// Tell the server we are leaving, then clear the session and go to
    /// `/login` no matter how the call went.
    ///
    /// Returns whether the server acknowledged the logout. Only a failure to
    /// clear local credentials is an error. The redirect happens exactly once:
    /// when the server answered 401 the client has already redirected.
    pub async fn logout(&self) -> Result<bool> {
        let outcome = match self.client.request(Method::POST, paths::LOGOUT) {
            Ok(builder) => self.client.execute(builder).await.map(|_| ()),
            Err(e) => Err(e),
        };

        let already_redirected = matches!(outcome, Err(ClientError::Unauthorized));
        if let Err(e) = &outcome {
            warn!("Logout API failed: {}", e);
        }

        let cleared = self.client.session().clear();
        if !already_redirected {
            self.client.navigator().redirect(LOGIN_PATH);
        }
        cleared?;

        Ok(outcome.is_ok())
    }

    /// Validate the form locally and create the account.
    /// On success the user is sent to the login page.
    pub async fn register(&self, form: RegisterForm) -> Result<()> {
        let body = form.into_request()?;
        let builder = self
            .client
            .public_request(Method::POST, paths::REGISTER)?
            .json(&body);
        let response = self.client.send_public(builder).await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                info!(phone = %body.phone, "registered");
                self.client.navigator().redirect(LOGIN_PATH);
                Ok(())
            }
            status => {
                warn!(%status, "unexpected registration status");
                Err(ClientError::Validation(REGISTRATION_FAILED.into()))
            }
        }
    }

    async fn check_session(&self) -> Result<StatusCode> {
        let builder = self.client.request(Method::GET, paths::SECURE)?;
        Ok(self.client.execute(builder).await?.status())
    }
}
