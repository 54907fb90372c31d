//! The entry point most applications use: one HTTP client, one query cache,
//! and typed per-section accessors on top.

use crate::client::HttpClient;
use crate::config::Config;
use crate::content::{Envelope, Media};
use crate::error::Error;
use crate::query::{QueryClient, QueryObserver, QueryOptions, QueryState};
use crate::services::{Section, fetch};
use crate::view::SectionView;

/// Cached value of section `S`.
pub type SectionState<S> = QueryState<Envelope<<S as Section>::Data>>;

/// Typed, cached access to every content section.
///
/// # Examples
///
/// ```rust,no_run
/// use rcms::{Cms, Config};
/// use rcms::services::Hero;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cms = Cms::new(&Config::from_env()?)?;
///     match cms.view::<Hero>().await.ready() {
///         Some(hero) => println!("{}", hero.data.title),
///         None => println!("hero unavailable"),
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Cms {
    http: HttpClient,
    queries: QueryClient,
    image_url: String,
    options: QueryOptions,
}

impl Cms {
    /// Builds the client stack from `config` with default cache options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the API URL cannot be used.
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self::with_parts(
            HttpClient::new(config)?,
            QueryClient::new(),
            config.image_url.clone(),
        ))
    }

    /// Assembles a facade from existing parts, e.g. to share a cache.
    pub fn with_parts(http: HttpClient, queries: QueryClient, image_url: impl Into<String>) -> Self {
        Self {
            http,
            queries,
            image_url: image_url.into(),
            options: QueryOptions::default(),
        }
    }

    /// Overrides staleness and retry behaviour for every section.
    #[must_use]
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Subscribes to section `S`, fetching it unless the cache is fresh.
    pub fn observe<S: Section>(&self) -> QueryObserver<Envelope<S::Data>> {
        let http = self.http.clone();
        self.queries
            .observe(S::KIND.query_key(), self.options, move || {
                let http = http.clone();
                async move { fetch::<S>(&http).await }
            })
    }

    /// Loads section `S` and waits for the result, retries included.
    pub async fn query<S: Section>(&self) -> SectionState<S> {
        self.observe::<S>().settled().await
    }

    /// Loads section `S` and projects it for display.
    pub async fn view<S: Section>(&self) -> SectionView<Envelope<S::Data>> {
        SectionView::from_state(S::KIND, &self.query::<S>().await)
    }

    /// Current display state of `S`, without fetching.
    pub fn snapshot<S: Section>(&self) -> SectionView<Envelope<S::Data>> {
        let state = self.queries.state(&S::KIND.query_key());
        SectionView::from_state(S::KIND, &state)
    }

    /// Refetches `S` even if the cached copy is fresh.
    pub async fn refresh<S: Section>(&self) -> SectionState<S> {
        self.observe::<S>().refetch().await
    }

    /// Marks `S` stale so the next access refetches.
    pub fn invalidate<S: Section>(&self) {
        self.queries.invalidate(&S::KIND.query_key());
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Absolute URL of `media` on the configured media host.
    pub fn image_url(&self, media: &Media) -> String {
        media.resolve_url(&self.image_url)
    }
}
