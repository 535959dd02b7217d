//! Authenticated HTTP client for the timesheet REST API
//!
//! Every request built through [`AuthClient::request`] carries
//! `Authorization: Bearer <token>` when the session holds a token. Any 401
//! answer evicts the token and redirects the navigator to `/login` before the
//! error is handed back to the caller. Other failures pass through untouched.
//!
//! There is no retry, queueing or refresh: one attempt per call.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::ApiMessage;
use crate::navigation::{LOGIN_PATH, Navigator};
use crate::session::{CredentialStore, Session};

/// HTTP client bound to one API base URL, one session and one navigator
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
    navigator: Arc<dyn Navigator>,
}

impl AuthClient {
    pub fn new(
        config: &ClientConfig,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: normalize_base_url(&config.api_url)?,
            session: Session::new(store),
            navigator,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Resolve an endpoint path against the base URL.
    /// Leading slashes are ignored so `"/Auth/logout"` and `"Auth/logout"`
    /// land on the same place.
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", path, e)))
    }

    /// Builder for `method path` with the bearer header attached when a
    /// token is stored.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let builder = self.http.request(method, self.url(path)?);
        Ok(match self.session.token()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Builder with no credentials, for anonymous endpoints
    pub fn public_request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.http.request(method, self.url(path)?))
    }

    /// Send once and apply the session policy.
    ///
    /// Success statuses come back as the raw response. A 401 evicts the
    /// token, redirects to `/login` and returns `Unauthorized`; any other
    /// status becomes `Status` with the server's message if it sent one.
    pub async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self.send(builder).await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.force_logout();
            return Err(ClientError::Unauthorized);
        }

        if !status.is_success() {
            return Err(status_error(response).await);
        }

        Ok(response)
    }

    /// Send once without the 401 policy. Non-success statuses, 401
    /// included, come back as `Status`.
    pub async fn send_public(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self.send(builder).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let builder = self.request(Method::GET, path)?.query(query);
        decode(self.execute(builder).await?).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.execute(builder).await
    }

    /// Evict the token and send the user to the login page
    pub fn force_logout(&self) {
        warn!("Received 401; clearing session token");
        if let Err(e) = self.session.evict_token() {
            warn!("Failed to clear session token: {}", e);
        }
        self.navigator.redirect(LOGIN_PATH);
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build()?;
        debug!(
            method = %request.method(),
            url = %request.url(),
            authenticated = request.headers().contains_key(reqwest::header::AUTHORIZATION),
            "sending request"
        );
        let response = self.http.execute(request).await?;
        debug!(status = %response.status(), "received response");
        Ok(response)
    }
}

/// Make sure the base URL ends in `/` so relative joins keep its path
fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Url::parse(&with_slash).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))
}

async fn status_error(response: Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiMessage>(&body)
        .ok()
        .and_then(|m| m.message)
        .filter(|m| !m.is_empty());
    debug!(%status, ?message, "request failed");
    ClientError::Status { status, message }
}

pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::History;
    use crate::session::MemoryStore;

    fn client(api_url: &str, store: Arc<MemoryStore>) -> AuthClient {
        AuthClient::new(
            &ClientConfig::new(api_url),
            store,
            Arc::new(History::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = normalize_base_url("https://example.com/api").unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/");
    }

    #[test]
    fn test_url_join_keeps_base_path() {
        let client = client("https://example.com/api", Arc::new(MemoryStore::new()));
        assert_eq!(
            client.url("User/login").unwrap().as_str(),
            "https://example.com/api/User/login"
        );
        assert_eq!(
            client.url("/Auth/logout").unwrap().as_str(),
            "https://example.com/api/Auth/logout"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = AuthClient::new(
            &ClientConfig::new("not a url"),
            Arc::new(MemoryStore::new()),
            Arc::new(History::new()),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_request_attaches_bearer() {
        let client = client(
            "https://example.com/api/",
            Arc::new(MemoryStore::with_token("abc123")),
        );
        let request = client
            .request(Method::GET, "timesheet")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer abc123"
        );
    }

    #[test]
    fn test_request_without_token_has_no_header() {
        let client = client("https://example.com/api/", Arc::new(MemoryStore::new()));
        let request = client
            .request(Method::GET, "timesheet")
            .unwrap()
            .build()
            .unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_public_request_never_authenticated() {
        let client = client(
            "https://example.com/api/",
            Arc::new(MemoryStore::with_token("abc123")),
        );
        let request = client
            .public_request(Method::POST, "User/login")
            .unwrap()
            .build()
            .unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }
}
