use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Section, SectionKind, fetch};
use crate::client::{HttpClient, Query};
use crate::content::{Envelope, Link, Media};
use crate::error::Error;

/// The landing banner at the top of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroData {
    pub id: u64,
    pub document_id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub background: Option<Media>,
    #[serde(default)]
    pub buttons: Vec<Link>,
    /// Fields this type does not name, kept for a lossless round trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct Hero;

impl Section for Hero {
    const KIND: SectionKind = SectionKind::Hero;
    const PATH: &'static str = "hero";
    type Data = HeroData;

    fn populate() -> Query {
        Query::new()
            .pair("populate[background]", "true")
            .pair("populate[buttons]", "true")
    }
}

pub async fn fetch_hero(client: &HttpClient) -> Result<Envelope<HeroData>, Error> {
    fetch::<Hero>(client).await
}
