use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Section, SectionKind, fetch};
use crate::client::{HttpClient, Query};
use crate::content::{Envelope, Link, Media};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterData {
    pub id: u64,
    pub document_id: String,
    pub copyright: Option<String>,
    #[serde(default)]
    pub menus: Vec<Menu>,
    #[serde(default)]
    pub app_stores: Vec<AppStore>,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A titled column of links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// "Download on ..." badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStore {
    pub id: u64,
    pub name: String,
    pub url: String,
    pub badge: Option<Media>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub id: u64,
    pub platform: String,
    pub url: String,
    pub logo: Option<Media>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct Footer;

impl Section for Footer {
    const KIND: SectionKind = SectionKind::Footer;
    const PATH: &'static str = "footer";
    type Data = FooterData;

    fn populate() -> Query {
        Query::new()
            .pair("populate[menus][populate][links]", "true")
            .pair("populate[appStores][populate][badge]", "true")
            .pair("populate[socialLinks][populate][logo]", "true")
    }
}

pub async fn fetch_footer(client: &HttpClient) -> Result<Envelope<FooterData>, Error> {
    fetch::<Footer>(client).await
}
