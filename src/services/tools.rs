use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Section, SectionKind, fetch};
use crate::client::{HttpClient, Query};
use crate::content::{Envelope, Link, Media};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsData {
    pub id: u64,
    pub document_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<Media>,
    pub link: Option<Link>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct Tools;

impl Section for Tools {
    const KIND: SectionKind = SectionKind::Tools;
    const PATH: &'static str = "tool-section";
    type Data = ToolsData;

    fn populate() -> Query {
        Query::new()
            .pair("populate[tools][populate][icon]", "true")
            .pair("populate[tools][populate][link]", "true")
    }
}

pub async fn fetch_tools(client: &HttpClient) -> Result<Envelope<ToolsData>, Error> {
    fetch::<Tools>(client).await
}
