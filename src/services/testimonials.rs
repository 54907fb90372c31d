use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Section, SectionKind, fetch};
use crate::client::{HttpClient, Query};
use crate::content::{Envelope, Media};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: u64,
    pub document_id: String,
    pub quote: String,
    pub author: String,
    pub role: Option<String>,
    pub company: Option<String>,
    pub avatar: Option<Media>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct Testimonials;

impl Section for Testimonials {
    const KIND: SectionKind = SectionKind::Testimonials;
    const PATH: &'static str = "testimonials";
    type Data = Vec<Testimonial>;

    fn populate() -> Query {
        Query::new().pair("populate[avatar]", "true")
    }
}

pub async fn fetch_testimonials(client: &HttpClient) -> Result<Envelope<Vec<Testimonial>>, Error> {
    fetch::<Testimonials>(client).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{assert_round_trip, fetch_canned};

    const BODY: &str = r#"{
        "data": [
            {
                "id": 1,
                "documentId": "t1",
                "quote": "Shipping got boring, in a good way.",
                "author": "Sam",
                "role": "CTO",
                "company": "Initech",
                "avatar": null
            }
        ],
        "meta": {}
    }"#;

    #[tokio::test]
    async fn decodes_testimonials() {
        let (result, sent) = fetch_canned::<Testimonials>(200, BODY).await;
        let list = result.unwrap().into_data();
        assert_eq!(list[0].author, "Sam");
        assert_eq!(list[0].company.as_deref(), Some("Initech"));
        assert_eq!(sent[0].path(), "/api/testimonials");
    }

    #[test]
    fn round_trip() {
        assert_round_trip::<Testimonials>(BODY);
    }

    #[tokio::test]
    async fn unknown_fields_are_kept() {
        let (result, _) = fetch_canned::<Testimonials>(
            200,
            r#"{"data":[{"id":1,"documentId":"t1","quote":"q","author":"a","rating":5}]}"#,
        )
        .await;
        let list = result.unwrap().into_data();
        assert_eq!(list[0].quote, "q");
        assert_eq!(list[0].extra.get("rating"), Some(&serde_json::json!(5)));
    }
}
