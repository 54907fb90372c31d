use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Section, SectionKind, fetch};
use crate::client::{HttpClient, Query};
use crate::content::{Envelope, Link, Media};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityData {
    pub id: u64,
    pub document_id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub members: Vec<Member>,
    pub call_to_action: Option<Link>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: u64,
    pub name: String,
    pub role: Option<String>,
    pub avatar: Option<Media>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct Community;

impl Section for Community {
    const KIND: SectionKind = SectionKind::Community;
    const PATH: &'static str = "community";
    type Data = CommunityData;

    fn populate() -> Query {
        Query::new()
            .pair("populate[members][populate][avatar]", "true")
            .pair("populate[callToAction]", "true")
    }
}

pub async fn fetch_community(client: &HttpClient) -> Result<Envelope<CommunityData>, Error> {
    fetch::<Community>(client).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{assert_round_trip, fetch_canned};

    const BODY: &str = r#"{
        "data": {
            "id": 4,
            "documentId": "c1",
            "title": "Our community",
            "description": "Thousands of builders",
            "members": [
                {"id": 1, "name": "Ada", "role": "Maintainer", "avatar": null},
                {"id": 2, "name": "Lin", "role": null, "avatar": null}
            ],
            "callToAction": {"id": 9, "label": "Join Discord", "url": "https://discord.gg/x", "isExternal": true}
        },
        "meta": {}
    }"#;

    #[tokio::test]
    async fn decodes_members_and_cta() {
        let (result, sent) = fetch_canned::<Community>(200, BODY).await;
        let community = result.unwrap().into_data();
        assert_eq!(community.members.len(), 2);
        assert_eq!(community.members[1].role, None);
        assert_eq!(community.call_to_action.unwrap().label, "Join Discord");
        assert_eq!(
            sent[0].query_string(),
            Some("populate%5Bmembers%5D%5Bpopulate%5D%5Bavatar%5D=true&populate%5BcallToAction%5D=true")
        );
    }

    #[test]
    fn round_trip() {
        assert_round_trip::<Community>(BODY);
    }
}
