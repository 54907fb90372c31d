//! Section services: one typed `GET` per content section.
//!
//! Every section is a marker type implementing [`Section`]. It names the
//! backend resource, the response shape and the fixed populate query that
//! inlines exactly the relations its view needs. [`fetch`] issues the request;
//! failures pass through [`report`] and are returned unchanged. Nothing here
//! retries, that is the query cache's job.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::client::{HttpClient, Query};
use crate::content::Envelope;
use crate::error::{Error, report};
use crate::query::QueryKey;

pub mod community;
pub mod footer;
pub mod gallery;
pub mod hero;
pub mod partners;
pub mod testimonials;
pub mod tools;

pub use community::{Community, fetch_community};
pub use footer::{Footer, fetch_footer};
pub use gallery::{Gallery, fetch_gallery};
pub use hero::{Hero, fetch_hero};
pub use partners::{Partners, fetch_partners};
pub use testimonials::{Testimonials, fetch_testimonials};
pub use tools::{Tools, fetch_tools};

/// The content sections of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Hero,
    Gallery,
    Community,
    Partners,
    Testimonials,
    Tools,
    Footer,
}

impl SectionKind {
    pub const ALL: [SectionKind; 7] = [
        Self::Hero,
        Self::Gallery,
        Self::Community,
        Self::Partners,
        Self::Testimonials,
        Self::Tools,
        Self::Footer,
    ];

    /// Stable identifier, used as the cache key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Gallery => "gallery",
            Self::Community => "community",
            Self::Partners => "partners",
            Self::Testimonials => "testimonials",
            Self::Tools => "tools",
            Self::Footer => "footer",
        }
    }

    /// Display name, used as the logging context.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hero => "Hero",
            Self::Gallery => "Gallery",
            Self::Community => "Community",
            Self::Partners => "Partners",
            Self::Testimonials => "Testimonials",
            Self::Tools => "Tools",
            Self::Footer => "Footer",
        }
    }

    pub fn query_key(self) -> QueryKey {
        QueryKey::from(self.key())
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A content section served by the backend.
///
/// # Examples
///
/// ```
/// use rcms::services::{Hero, Section};
///
/// assert_eq!(Hero::PATH, "hero");
/// assert_eq!(
///     Hero::populate().encode(),
///     "populate%5Bbackground%5D=true&populate%5Bbuttons%5D=true"
/// );
/// ```
pub trait Section: Send + Sync + 'static {
    const KIND: SectionKind;

    /// Resource path relative to the API base URL.
    const PATH: &'static str;

    /// Shape of the envelope's `data`.
    type Data: DeserializeOwned + Serialize + Send + Sync + 'static;

    /// Relations the backend must inline for this section.
    fn populate() -> Query;
}

/// Fetches section `S`: exactly one `GET {base}/{S::PATH}?{S::populate()}`.
///
/// # Errors
///
/// Any transport, HTTP or decode failure, logged through [`report`] with the
/// section name as context and returned as-is.
pub async fn fetch<S: Section>(client: &HttpClient) -> Result<Envelope<S::Data>, Error> {
    client
        .get_json(S::PATH, &S::populate())
        .await
        .map_err(|err| report(S::KIND.name(), err))
}
