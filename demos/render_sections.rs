//! Loads every section once and prints what the page would show.
//!
//! ```sh
//! CMS_API_URL=http://localhost:1337/api \
//! CMS_API_TOKEN=... \
//! CMS_IMAGE_URL=http://localhost:1337 \
//! RUST_LOG=rcms=debug \
//! cargo run --example render_sections
//! ```

use std::fmt::Display;

use rcms::security::ContentSecurityPolicy;
use rcms::services::{Community, Footer, Gallery, Hero, Partners, Section, Testimonials, Tools};
use rcms::{Cms, Config, Envelope, SectionView};
use tracing_subscriber::EnvFilter;

fn show<S, F, D>(view: &SectionView<Envelope<S::Data>>, summary: F)
where
    S: Section,
    F: FnOnce(&S::Data) -> D,
    D: Display,
{
    match view {
        SectionView::Ready(envelope) => println!("{:<13} {}", S::KIND.name(), summary(&envelope.data)),
        SectionView::Unavailable(fallback) => println!("{:<13} {}", S::KIND.name(), fallback.render()),
        SectionView::Loading => println!("{:<13} loading", S::KIND.name()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rcms=info")),
        )
        .init();

    let config = Config::from_env()?;
    let cms = Cms::new(&config)?;
    println!(
        "{}: {}\n",
        ContentSecurityPolicy::HEADER,
        ContentSecurityPolicy::for_site(&config).header_value()
    );

    let (hero, gallery, community, partners, testimonials, tools, footer) = tokio::join!(
        cms.view::<Hero>(),
        cms.view::<Gallery>(),
        cms.view::<Community>(),
        cms.view::<Partners>(),
        cms.view::<Testimonials>(),
        cms.view::<Tools>(),
        cms.view::<Footer>(),
    );

    show::<Hero, _, _>(&hero, |h| h.title.clone());
    show::<Gallery, _, _>(&gallery, |g| {
        let first = g.images.first().map(|m| cms.image_url(m));
        format!("{} ({} images, first: {first:?})", g.title, g.images.len())
    });
    show::<Community, _, _>(&community, |c| format!("{} ({} members)", c.title, c.members.len()));
    show::<Partners, _, _>(&partners, |p| {
        p.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join(", ")
    });
    show::<Testimonials, _, _>(&testimonials, |t| format!("{} quotes", t.len()));
    show::<Tools, _, _>(&tools, |t| format!("{} ({} tools)", t.title, t.tools.len()));
    show::<Footer, _, _>(&footer, |f| {
        f.copyright.clone().unwrap_or_else(|| "no copyright line".to_owned())
    });

    Ok(())
}
