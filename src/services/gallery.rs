use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Section, SectionKind, fetch};
use crate::client::{HttpClient, Query};
use crate::content::{Envelope, Media};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryData {
    pub id: u64,
    pub document_id: String,
    pub title: String,
    #[serde(default)]
    pub images: Vec<Media>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct Gallery;

impl Section for Gallery {
    const KIND: SectionKind = SectionKind::Gallery;
    const PATH: &'static str = "gallery";
    type Data = GalleryData;

    // Image variants come with the media relation; nothing deeper is needed.
    fn populate() -> Query {
        Query::new().pair("populate[images]", "true")
    }
}

pub async fn fetch_gallery(client: &HttpClient) -> Result<Envelope<GalleryData>, Error> {
    fetch::<Gallery>(client).await
}
