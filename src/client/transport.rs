//! The seam between the client and the network.

use bytes::Bytes;
use reqwest::StatusCode;

use crate::BoxFuture;
use crate::error::Error;

/// Status and body of one completed exchange.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl Reply {
    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the body is not valid JSON for `T`.
    pub fn json<T>(&self) -> Result<T, Error>
    where
        T: serde::de::DeserializeOwned,
    {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Executes one fully built request and returns the complete reply.
///
/// [`reqwest::Client`] is the production implementation; tests substitute
/// in-memory transports to observe exactly which requests were issued.
pub trait Transport: Send + Sync {
    fn send(&self, request: reqwest::Request) -> BoxFuture<'_, Result<Reply, Error>>;
}

impl Transport for reqwest::Client {
    fn send(&self, request: reqwest::Request) -> BoxFuture<'_, Result<Reply, Error>> {
        Box::pin(async move {
            let response = self.execute(request).await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok(Reply { status, body })
        })
    }
}
