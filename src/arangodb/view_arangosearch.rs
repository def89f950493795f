use std::ops::Deref;
use crate::arangosearch::view_properties::ArangoSearchViewProperties;
use crate::common::error::Result;
use crate::common::response::ResponseEnvelope;
use crate::connection::{call_get, call_patch, call_put};
use super::view::View;

/// Handle to an `arangosearch` view
#[derive(Debug, Clone)]
pub struct ArangoSearchView {
    view: View,
}

impl ArangoSearchView {
    pub(crate) fn new(view: View) -> Self {
        ArangoSearchView { view }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub async fn properties(&self) -> Result<ArangoSearchViewProperties> {
        let url = self.view.url(&["properties"]);
        let response = call_get(self.view.database().conn(), &url).await?;

        match response.code() {
            200 => {
                let body: ResponseEnvelope<ArangoSearchViewProperties> = response.decode()?;
                Ok(body.payload)
            }
            _ => Err(response.as_arango_error()),
        }
    }

    /// Replaces all mutable properties; unset ones fall back to server defaults.
    /// Identity fields read back from the server are not sent.
    pub async fn set_properties(&self, properties: &ArangoSearchViewProperties) -> Result<()> {
        let url = self.view.url(&["properties"]);
        let response = call_put(self.view.database().conn(), &url, &properties.without_identity()).await?;

        match response.code() {
            200 => Ok(()),
            _ => Err(response.as_arango_error()),
        }
    }

    /// Changes only the properties that are set.
    pub async fn update_properties(&self, properties: &ArangoSearchViewProperties) -> Result<()> {
        let url = self.view.url(&["properties"]);
        let response = call_patch(self.view.database().conn(), &url, &properties.without_identity()).await?;

        match response.code() {
            200 => Ok(()),
            _ => Err(response.as_arango_error()),
        }
    }
}

impl Deref for ArangoSearchView {
    type Target = View;

    fn deref(&self) -> &View {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use crate::arangodb::database::tests::test_database;
    use crate::arangosearch::view_properties::{ArangoSearchElementProperties, BytesAccumPolicy, ConsolidationPolicy};
    use crate::connection::mock::MockConnection;
    use crate::connection::HttpMethod;
    use super::*;
    use serde_json::json;

    const PROPERTIES: &str = "/_db/shop/_api/view/products_view/properties";

    async fn products_view(mock: &Arc<MockConnection>) -> ArangoSearchView {
        mock.on(
            HttpMethod::GET,
            "/_db/shop/_api/view/products_view",
            200,
            json!({"id": "7", "name": "products_view", "type": "arangosearch"}),
        );
        test_database(mock)
            .view("products_view")
            .await
            .unwrap()
            .arangosearch()
            .unwrap()
    }

    #[tokio::test]
    async fn test_properties() {
        let mock = Arc::new(MockConnection::new());
        let view = products_view(&mock).await;
        mock.on(
            HttpMethod::GET,
            PROPERTIES,
            200,
            json!({
                "error": false,
                "code": 200,
                "id": "7",
                "name": "products_view",
                "type": "arangosearch",
                "consolidationPolicy": {"type": "bytes_accum", "threshold": 0.1},
                "links": {"products": {"includeAllFields": true}}
            }),
        );

        let properties = view.properties().await.unwrap();
        assert_eq!(properties.name.as_deref(), Some("products_view"));
        assert_eq!(
            properties.consolidation_policy,
            Some(ConsolidationPolicy::BytesAccum(BytesAccumPolicy { threshold: Some(0.1) }))
        );
        assert_eq!(properties.links.unwrap()["products"].include_all_fields, Some(true));
    }

    #[tokio::test]
    async fn test_properties_of_removed_view() {
        let mock = Arc::new(MockConnection::new());
        let view = products_view(&mock).await;
        mock.on_error(HttpMethod::GET, PROPERTIES, 404, 1203, "collection or view not found");

        assert!(view.properties().await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_set_and_update_properties() {
        let mock = Arc::new(MockConnection::new());
        let view = products_view(&mock).await;
        mock.on(HttpMethod::PUT, PROPERTIES, 200, json!({"error": false, "code": 200}));
        mock.on(HttpMethod::PATCH, PROPERTIES, 200, json!({"error": false, "code": 200}));

        let full = ArangoSearchViewProperties::default().with_link(
            "products",
            ArangoSearchElementProperties {
                analyzers: Some(vec!["text_en".to_string()]),
                ..Default::default()
            },
        );
        view.set_properties(&full).await.unwrap();
        let request = mock.last_request();
        assert_eq!(request.method, HttpMethod::PUT);
        assert_eq!(request.json_body(), Some(json!({"links": {"products": {"analyzers": ["text_en"]}}})));

        let partial = ArangoSearchViewProperties {
            commit_interval_msec: Some(500),
            ..Default::default()
        };
        view.update_properties(&partial).await.unwrap();
        let request = mock.last_request();
        assert_eq!(request.method, HttpMethod::PATCH);
        assert_eq!(request.json_body(), Some(json!({"commitIntervalMsec": 500})));
    }

    #[tokio::test]
    async fn test_read_modify_write_sends_only_mutable_fields() {
        let mock = Arc::new(MockConnection::new());
        let view = products_view(&mock).await;
        mock.on(
            HttpMethod::GET,
            PROPERTIES,
            200,
            json!({
                "error": false,
                "code": 200,
                "id": "7",
                "name": "products_view",
                "type": "arangosearch",
                "globallyUniqueId": "g/7",
                "commitIntervalMsec": 1000
            }),
        );
        mock.on(HttpMethod::PUT, PROPERTIES, 200, json!({"error": false, "code": 200}));
        mock.on(HttpMethod::PATCH, PROPERTIES, 200, json!({"error": false, "code": 200}));

        let mut properties = view.properties().await.unwrap();
        assert_eq!(properties.globally_unique_id.as_deref(), Some("g/7"));
        properties.commit_interval_msec = Some(500);

        view.set_properties(&properties).await.unwrap();
        assert_eq!(mock.last_request().json_body(), Some(json!({"commitIntervalMsec": 500})));

        view.update_properties(&properties).await.unwrap();
        let request = mock.last_request();
        assert_eq!(request.method, HttpMethod::PATCH);
        assert_eq!(request.json_body(), Some(json!({"commitIntervalMsec": 500})));
    }

    #[tokio::test]
    async fn test_set_properties_bad_parameter() {
        let mock = Arc::new(MockConnection::new());
        let view = products_view(&mock).await;
        mock.on_error(HttpMethod::PUT, PROPERTIES, 400, 10, "bad parameter");

        let err = view
            .set_properties(&ArangoSearchViewProperties::default())
            .await
            .unwrap_err();
        assert_eq!(err.http_code(), Some(400));
        assert!(!err.is_not_found());
    }
}
