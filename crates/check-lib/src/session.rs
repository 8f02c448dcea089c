//! HTTP login session against the radio web UI
//!
//! AirOS devices gate their JSON status pages behind a cookie session:
//! the client first fetches `login.cgi` to receive a session cookie,
//! then posts the login form as `multipart/form-data` with a `uri` field
//! naming the page to land on, follows the redirect, and finally hits
//! `logout.cgi` so the device is not left with an open session.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{multipart, Client};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Errors from the login/fetch/logout sequence.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid device URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The post-login redirect did not land on the requested page,
    /// usually a failed login bouncing back to the login form.
    #[error("reached a wrong page: {0}")]
    WrongPage(String),
    /// The landing page is not JSON, another login-failure tell.
    #[error("response has wrong content-type: {0}")]
    WrongContentType(String),
}

/// Connection settings for one device.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    host: String,
    username: String,
    password: String,
    timeout: Duration,
    insecure: bool,
}

impl SessionConfig {
    /// Settings with the default timeout and certificate verification on.
    pub fn new(host: &str, username: &str, password: &str) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            timeout: Duration::from_secs(10),
            insecure: false,
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept self-signed certificates; these devices ship with one
    /// pre-installed, so HTTPS monitoring usually needs this.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }
}

/// A cookie-holding HTTP client bound to one device.
pub struct DeviceSession {
    client: Client,
    config: SessionConfig,
}

impl DeviceSession {
    /// Build the client and validate the device URL.
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        Url::parse(&config.host)?;

        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Log in, fetch `/{source}.cgi` as JSON and log out.
    pub async fn fetch(&self, source: &str) -> Result<Value, SessionError> {
        let login_url = format!("{}/login.cgi", self.config.host);
        let target_url = format!("{}/{}.cgi", self.config.host, source);

        debug!(url = %login_url, "opening session");
        self.client.get(&login_url).send().await?;

        let form = multipart::Form::new()
            .text("username", self.config.username.clone())
            .text("password", self.config.password.clone())
            .text("Submit", "Login")
            .text("uri", format!("/{}.cgi", source));

        debug!("logging in and collecting data");
        let response = self.client.post(&login_url).multipart(form).send().await?;

        // A successful login redirects to the page named in the form;
        // landing anywhere else means the login was rejected.
        if response.url().as_str() != target_url {
            return Err(SessionError::WrongPage(response.url().to_string()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        if media_type != "application/json" {
            return Err(SessionError::WrongContentType(content_type));
        }

        let data = response.json().await?;

        debug!("closing session");
        self.client
            .get(format!("{}/logout.cgi", self.config.host))
            .send()
            .await?;

        Ok(data)
    }
}
