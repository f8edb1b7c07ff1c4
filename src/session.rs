//! The authenticated transport shared by every client of this crate
//!
//! A [`Session`] owns the credentials, the HTTP connection pool (with its cookie store) and the bearer token.
//! The token is acquired lazily by [`Session::ensure_authenticated`], and is never refreshed: an expired token
//! makes later requests fail with an HTTP error instead of triggering a new login.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::config::{ClientConfig, Credentials};
use crate::error::{Error, Result};

#[derive(Deserialize)]
struct LoginReply {
    #[serde(rename = "loginToken")]
    login_token: Option<String>,
}

pub struct Session {
    config: ClientConfig,
    credentials: Credentials,

    /// `None` once the session has been closed
    http: Option<reqwest::Client>,
    token: Option<String>,
}

impl Session {
    /// Create a session. This does not start a connection
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            config,
            credentials,
            http: Some(builder.build()?),
            token: None,
        })
    }

    pub fn config(&self) -> &ClientConfig { &self.config }
    pub fn username(&self) -> &str { self.credentials.username() }
    pub fn is_authenticated(&self) -> bool { self.token.is_some() }
    pub fn is_closed(&self) -> bool { self.http.is_none() }

    fn http(&self) -> Result<&reqwest::Client> {
        self.http.as_ref().ok_or(Error::SessionClosed)
    }

    /// Log in, unless a token is already held.
    ///
    /// If the server rejects the credentials, the session is closed before the error is returned.
    pub async fn ensure_authenticated(&mut self) -> Result<()> {
        self.http()?;
        if self.token.is_some() {
            return Ok(());
        }

        match self.login().await {
            Ok(token) => {
                // Only a complete exchange records a token
                self.token = Some(token);
                Ok(())
            },
            Err(err @ Error::Authentication(_)) => {
                log::warn!("Login as {} failed, closing the session", self.credentials.username());
                self.close();
                Err(err)
            },
            Err(err) => Err(err),
        }
    }

    async fn login(&self) -> Result<String> {
        let url = self.config.endpoint("login")?;
        log::debug!("Logging in as {}", self.credentials.username());

        let body = serde_json::json!({
            "email": self.credentials.username(),
            "password": self.credentials.password(),
        });
        let response = self.http()?
            .post(url)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if status.is_success() == false {
            return Err(Error::Authentication(text));
        }

        match serde_json::from_str::<LoginReply>(&text) {
            Ok(LoginReply { login_token: Some(token) }) => Ok(token),
            _ => Err(Error::Authentication(text)),
        }
    }

    /// Start a request carrying the bearer token.
    ///
    /// [`Session::ensure_authenticated`] must have succeeded before.
    pub fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.token.as_deref()
            .ok_or_else(|| Error::Authentication("no login token is held".to_string()))?;

        Ok(self.http()?
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(token))
    }

    /// Start a request that carries no bearer token (e.g. to the chat server, that has its own auth header)
    pub fn request_without_token(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        Ok(self.http()?.request(method, url))
    }

    /// Release the connection pool. Every later request fails with [`Error::SessionClosed`].
    ///
    /// Closing an already closed session does nothing.
    pub fn close(&mut self) {
        if self.http.take().is_some() {
            self.token = None;
            log::debug!("Session for {} closed", self.credentials.username());
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.http.is_some() {
            log::warn!("A session for {} has been dropped without being closed", self.credentials.username());
        }
    }
}


/// Send a request and deserialize its JSON reply
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = check_status(request.send().await?).await?;
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// Send a request and return its raw reply
pub async fn send_bytes(request: RequestBuilder) -> Result<Vec<u8>> {
    let response = check_status(request.send().await?).await?;
    Ok(response.bytes().await?.to_vec())
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::RemoteRequestFailed { status: status.as_u16(), body })
}
