//! The configured backend base URL.

use std::fmt;

use url::Url;

use super::Query;
use crate::error::Error;

/// An absolute `http://` or `https://` base URL, e.g. `https://cms.example.com/api`.
///
/// # Examples
///
/// ```
/// use rcms::client::{BaseUrl, Query};
///
/// let base = BaseUrl::parse("https://cms.example.com/api/").unwrap();
/// let url = base.endpoint("hero", &Query::new().pair("populate[buttons]", "true"));
/// assert_eq!(
///     url.as_str(),
///     "https://cms.example.com/api/hero?populate%5Bbuttons%5D=true"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    url: Url,
}

impl BaseUrl {
    /// Parses and normalizes a base URL. A trailing slash is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] for anything but an absolute http(s) URL
    /// with a host and without credentials, query or fragment.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| Error::InvalidUrl {
            url: raw.to_owned(),
            reason: reason.to_owned(),
        };

        let mut url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("expected an http:// or https:// URL"));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not contain a query or fragment"));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(invalid("credentials in the URL are not supported"));
        }

        let trimmed = url.path().trim_end_matches('/').to_owned();
        url.set_path(&trimmed);
        Ok(Self { url })
    }

    /// Returns the normalized URL.
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Builds `{base}/{resource}?{query}`.
    pub fn endpoint(&self, resource: &str, query: &Query) -> Url {
        let mut url = self.url.clone();
        let path = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            resource.trim_start_matches('/')
        );
        url.set_path(&path);
        if !query.is_empty() {
            url.set_query(Some(&query.encode()));
        }
        url
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str().trim_end_matches('/'))
    }
}
