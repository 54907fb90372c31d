//! Authenticated HTTP client for the content backend.
//!
//! One [`HttpClient`] is built at startup from [`Config`] and shared (it is
//! cheap to clone). Every call is a single `GET` with a bearer token, bounded
//! by the configured timeout and throttled by the client-side rate limiter.
//! Non-2xx answers become [`Error::Status`]; nothing is retried here.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue, USER_AGENT};
use reqwest::{Method, Request};
use serde::de::DeserializeOwned;
use tokio::time::{Instant, timeout};
use tracing::debug;

use crate::config::Config;
use crate::error::Error;
use crate::security::RateLimiter;

pub mod query;
pub mod transport;
pub mod url;

pub use query::Query;
pub use transport::{Reply, Transport};
pub use self::url::BaseUrl;

const AGENT: &str = concat!("rcms/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<Inner>,
}

struct Inner {
    base: BaseUrl,
    authorization: HeaderValue,
    timeout: Duration,
    limiter: RateLimiter,
    transport: Box<dyn Transport>,
}

impl HttpClient {
    /// Builds a client backed by a [`reqwest::Client`] with the configured
    /// timeout and user agent. `https://` endpoints use rustls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the configured API URL is unusable,
    /// [`Error::InvalidHeader`] if the token cannot be sent as a header, and
    /// [`Error::Transport`] if the TLS backend fails to initialize.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(AGENT)
            .build()?;
        Self::with_transport(config, client)
    }

    /// Builds a client that sends through `transport`.
    pub fn with_transport<T>(config: &Config, transport: T) -> Result<Self, Error>
    where
        T: Transport + 'static,
    {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.api_token))
            .map_err(|_| Error::InvalidHeader {
                name: "authorization",
            })?;
        authorization.set_sensitive(true);

        Ok(Self {
            inner: Arc::new(Inner {
                base: BaseUrl::parse(&config.api_url)?,
                authorization,
                timeout: config.request_timeout,
                limiter: RateLimiter::new(config.rate_limit),
                transport: Box::new(transport),
            }),
        })
    }

    /// Returns the parsed base URL.
    pub fn base_url(&self) -> &BaseUrl {
        &self.inner.base
    }

    /// Issues `GET {base}/{resource}?{query}` and returns the 2xx reply.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`]: no complete response within the configured timeout.
    /// - [`Error::Status`]: the backend answered with a non-2xx status.
    /// - [`Error::Transport`]: connection, TLS or protocol failure.
    pub async fn get(&self, resource: &str, query: &Query) -> Result<Reply, Error> {
        let inner = &self.inner;
        let url = inner.base.endpoint(resource, query);

        let mut request = Request::new(Method::GET, url.clone());
        let headers = request.headers_mut();
        headers.insert(AUTHORIZATION, inner.authorization.clone());
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(AGENT));

        inner.limiter.acquire().await;

        debug!(%url, "GET");
        let started = Instant::now();

        let reply = match timeout(inner.timeout, inner.transport.send(request)).await {
            Err(_) => return Err(Error::Timeout(inner.timeout)),
            Ok(Err(Error::Transport(e))) if e.is_timeout() => {
                return Err(Error::Timeout(inner.timeout));
            }
            Ok(result) => result?,
        };

        debug!(
            %url,
            status = reply.status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response received"
        );

        if !reply.status.is_success() {
            return Err(Error::Status {
                status: reply.status.as_u16(),
                reason: reply.status.canonical_reason().unwrap_or_default().to_owned(),
                body: reply.text(),
            });
        }
        Ok(reply)
    }

    /// Like [`get`](Self::get), then decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// In addition to the errors of [`get`](Self::get), returns
    /// [`Error::Decode`] when the body does not match `T`.
    pub async fn get_json<T>(&self, resource: &str, query: &Query) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.get(resource, query).await?.json()
    }
}
