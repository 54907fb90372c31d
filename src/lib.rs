//! # rcms
//!
//! A typed, cached, retrying client for the headless CMS behind the site's
//! content sections (hero, gallery, community, partners, testimonials, tools,
//! footer).
//!
//! Each section is fetched with one authenticated `GET` carrying a fixed
//! populate query. Results live in a keyed query cache that deduplicates
//! concurrent requests, serves fresh results for 15 minutes, and retries
//! failures with exponential backoff before a section falls back to a static
//! placeholder.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rcms::{Cms, Config};
//! use rcms::services::{Footer, Hero};
//! use rcms::view::SectionView;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cms = Cms::new(&Config::from_env()?)?;
//!
//!     match cms.view::<Hero>().await {
//!         SectionView::Ready(hero) => println!("{}", hero.data.title),
//!         SectionView::Unavailable(fallback) => println!("{}", fallback.render()),
//!         SectionView::Loading => println!("loading"),
//!     }
//!
//!     let footer = cms.query::<Footer>().await;
//!     println!("footer cached: {}", footer.data.is_some());
//!     Ok(())
//! }
//! ```

use std::pin::Pin;

// ── Wire level ────────────────────────────────────────────────────────────────
pub mod client;

// ── Content ───────────────────────────────────────────────────────────────────
pub mod content;
pub mod services;

// ── Caching and presentation ──────────────────────────────────────────────────
pub mod cms;
pub mod query;
pub mod view;

// ── Cross-cutting ─────────────────────────────────────────────────────────────
pub mod config;
pub mod error;
pub mod security;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use cms::Cms;
pub use config::{Config, ConfigError};
pub use content::{Envelope, Link, Media};
pub use error::{Error, ErrorKind};
pub use query::{QueryClient, QueryKey, QueryOptions, QueryState, QueryStatus, RetryPolicy};
pub use view::{Fallback, SectionView};

/// Boxed, `Send` future used at the crate's type-erasure seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
