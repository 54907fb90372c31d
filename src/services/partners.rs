use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Section, SectionKind, fetch};
use crate::client::{HttpClient, Query};
use crate::content::{Envelope, Media};
use crate::error::Error;

/// One entry of the `partners` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: u64,
    pub document_id: String,
    pub name: String,
    pub website: Option<String>,
    pub logo: Option<Media>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct Partners;

impl Section for Partners {
    const KIND: SectionKind = SectionKind::Partners;
    const PATH: &'static str = "partners";
    type Data = Vec<Partner>;

    fn populate() -> Query {
        Query::new().pair("populate[logo]", "true")
    }
}

pub async fn fetch_partners(client: &HttpClient) -> Result<Envelope<Vec<Partner>>, Error> {
    fetch::<Partners>(client).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{assert_round_trip, fetch_canned};

    const BODY: &str = r#"{
        "data": [
            {
                "id": 1,
                "documentId": "p1",
                "name": "Acme",
                "website": "https://acme.example",
                "logo": {
                    "id": 5,
                    "documentId": "m5",
                    "url": "/uploads/acme.svg",
                    "alternativeText": "Acme logo",
                    "width": null,
                    "height": null,
                    "formats": null
                }
            },
            {"id": 2, "documentId": "p2", "name": "Globex", "website": null, "logo": null}
        ],
        "meta": {"pagination": {"page": 1, "pageSize": 25, "pageCount": 1, "total": 2}}
    }"#;

    #[tokio::test]
    async fn decodes_collection_and_keeps_meta() {
        let (result, _) = fetch_canned::<Partners>(200, BODY).await;
        let envelope = result.unwrap();
        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data[0].name, "Acme");
        assert!(envelope.data[1].logo.is_none());
        assert_eq!(envelope.meta["pagination"]["total"], 2);
    }

    #[test]
    fn round_trip() {
        assert_round_trip::<Partners>(BODY);
    }

    #[tokio::test]
    async fn single_object_instead_of_list_is_a_decode_error() {
        let (result, _) = fetch_canned::<Partners>(
            200,
            r#"{"data":{"id":1,"documentId":"p1","name":"Acme"}}"#,
        )
        .await;
        assert!(matches!(result, Err(Error::Decode(_))));
    }
}
