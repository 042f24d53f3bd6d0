use std::{fmt, time::Duration};

use crate::{error::Error, models::response::Response, result::Result};
use reqwest::{
    header::USER_AGENT, Client as ReqwestClient, IntoUrl, RequestBuilder, StatusCode,
};
use url::Url;

/// Search endpoint used unless [`ClientBuilder::endpoint`] says otherwise.
pub const DEFAULT_ENDPOINT: &str = "http://webhose.io/search";

/// Environment variable read by [`Client::from_env`].
pub const TOKEN_ENV: &str = "WEBHOSE_TOKEN";

const DEFAULT_USER_AGENT: &str = "WebhoseClient/1.0";

/// Executes searches against the webhose API.
///
/// A `Client` holds an optional default token and one pooled HTTP
/// client, so it should be created once and reused.
pub struct Client {
    http: ReqwestClient,
    endpoint: String,
    user_agent: String,
    token: Option<String>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .field("user_agent", &self.user_agent)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client with no default token.
    pub fn new() -> Client {
        Client {
            http: ReqwestClient::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            token: None,
        }
    }

    /// Creates a client with a default token.
    pub fn with_token(token: impl Into<String>) -> Client {
        let mut client = Client::new();
        client.set_token(token);
        client
    }

    /// Creates a client whose default token is read from `WEBHOSE_TOKEN`.
    /// The token stays unset when the variable is missing.
    pub fn from_env() -> Client {
        let mut client = Client::new();
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            client.set_token(token);
        }
        client
    }

    /// Returns a builder for a customized client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Returns the default token (if set).
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replaces the default token.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    /// Returns the search endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Runs one search and returns its first page.
    ///
    /// `query` is usually a [`Query`], but any string is accepted and
    /// sent verbatim. `token` overrides the client's default token;
    /// an empty token counts as absent.
    /// `since` is a `ts` cursor (see [`Response::next_ts`]) to resume a
    /// previous search from.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingToken`] when no token is available,
    /// [`Error::RequestFailed`] when the API answers with a status other
    /// than `200 OK`, and an error if the request or decoding fails.
    ///
    /// [`Query`]: crate::query::Query
    pub async fn search(
        &self,
        query: impl fmt::Display,
        token: Option<&str>,
        since: Option<&str>,
    ) -> Result<Response> {
        let token = token
            .filter(|t| !t.is_empty())
            .or_else(|| self.token().filter(|t| !t.is_empty()))
            .ok_or(Error::MissingToken)?;
        let query = query.to_string();

        let mut params = vec![("q", query.as_str()), ("token", token)];
        if let Some(ts) = since {
            params.push(("ts", ts));
        }

        log::info!("search for `{}` dispatched", query);
        self.fetch(self.http.get(&self.endpoint).query(&params))
            .await
    }

    /// Fetches an arbitrary result page, typically a `next` link.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequestFailed`] when the API answers with a status
    /// other than `200 OK`, and an error if the request or decoding fails.
    pub async fn get(&self, url: impl IntoUrl) -> Result<Response> {
        self.fetch(self.http.get(url)).await
    }

    async fn fetch(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        // the final URL anchors relative `next` links
        let url = response.url().clone();
        let status = response.status();
        log::info!("response status: {} from {}", status, url.path());

        let body = response.text().await?;
        match status {
            StatusCode::OK => Response::from_body(&url, &body),
            status => {
                log::warn!("request to {} failed with {}", url.path(), status);
                Err(Error::RequestFailed { status, body })
            }
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Configures a [`Client`].
///
/// ```rust
/// # fn main() -> webhose::Result<()> {
/// use std::time::Duration;
///
/// let client = webhose::Client::builder()
///     .token("my-token")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// assert_eq!(client.token(), Some("my-token"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    token: Option<String>,
    endpoint: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Sets the default token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the search endpoint. Defaults to [`DEFAULT_ENDPOINT`].
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the `User-Agent` header sent with every request.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets a timeout for each request.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP
    /// client cannot be initialized.
    pub fn build(self) -> Result<Client> {
        let endpoint = match self.endpoint {
            Some(endpoint) => Url::parse(&endpoint)?.to_string(),
            None => DEFAULT_ENDPOINT.to_string(),
        };

        let mut http = ReqwestClient::builder();
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(Client {
            http: http.build()?,
            endpoint,
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            token: self.token,
        })
    }
}
