//! Support for library configuration options

use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;
use url::Url;

use crate::error::{Error, Result};

/// Part of the ProdID string that describes the organization (example of a ProdID string: `-//ABC Corporation//My Product//EN`).
/// Feel free to override it when initing this library.
pub static ORG_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("My organization".to_string())));

/// Part of the ProdID string that describes the product name (example of a ProdID string: `-//ABC Corporation//My Product//EN`).
/// Feel free to override it when initing this library.
pub static PRODUCT_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Spond".to_string())));

pub const CORE_API_URL: &str = "https://api.spond.com/core/v1/";
pub const CLUB_API_URL: &str = "https://api.spond.com/club/v1/";

/// Where and how a client talks to the remote API
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Url,
    /// `None` keeps the transport default (no timeout)
    timeout: Option<Duration>,
    user_agent: String,
}

impl ClientConfig {
    /// Create a config for any base URL (e.g. a mock server in tests).
    ///
    /// A trailing slash is added if missing, so that endpoint paths can be joined to it.
    pub fn new<S: AsRef<str>>(base_url: S) -> Result<Self> {
        let mut raw = base_url.as_ref().to_string();
        if raw.ends_with('/') == false {
            raw.push('/');
        }
        Ok(Self {
            base_url: Url::parse(&raw)?,
            timeout: None,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        })
    }

    /// The production core API
    pub fn core() -> Result<Self> {
        Self::new(CORE_API_URL)
    }

    /// The production club (payments) API
    pub fn club() -> Result<Self> {
        Self::new(CLUB_API_URL)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent<S: ToString>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn base_url(&self) -> &Url { &self.base_url }
    pub fn timeout(&self) -> Option<Duration> { self.timeout }
    pub fn user_agent(&self) -> &str { &self.user_agent }

    /// Build the URL of an endpoint, relative to the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Build the URL of a resource below the base URL, one path segment per item of `segments`.
    ///
    /// Each segment is percent-encoded (including `/`, `?` and `#`), so an identifier can never point to another
    /// endpoint. Empty, `.` and `..` segments are rejected.
    pub fn resource_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut()
                .map_err(|_| Error::Config(format!("{} cannot be used as a base URL", self.base_url)))?;
            path.pop_if_empty();
            for segment in segments {
                if segment.is_empty() || *segment == "." || *segment == ".." {
                    return Err(Error::InvalidIdentifier(segment.to_string()));
                }
                path.push(segment);
            }
        }
        Ok(url)
    }
}


/// Login credentials. They cannot be changed once a client has been created.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new<T: ToString, U: ToString>(username: T, password: U) -> Self {
        Self { username: username.to_string(), password: password.to_string() }
    }

    /// Read `SPOND_USERNAME` and `SPOND_PASSWORD`, after loading a `.env` file if there is one
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(Self::new(required_var("SPOND_USERNAME")?, required_var("SPOND_PASSWORD")?))
    }

    pub fn username(&self) -> &str { &self.username }
    pub fn password(&self) -> &str { &self.password }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Read `SPOND_CLUB_ID`, the tenant identifier used by the club API
pub fn club_id_from_env() -> Result<String> {
    dotenvy::dotenv().ok();
    required_var("SPOND_CLUB_ID")
}

fn required_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map(|v| v.trim().to_string())
        .map_err(|_| Error::Config(format!("missing environment variable {}", name)))
}
