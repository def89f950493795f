use std::fmt;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::common::error::Result;
use crate::common::response::{ResponseEnvelope, ResultResponse};
use crate::connection::{call_delete, call_get, call_post, call_put, HttpMethod, Request};
use super::database::Database;

/// Collection type, numeric on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CollectionType {
    #[default]
    Document = 2,
    Edge = 3,
}

impl CollectionType {
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            2 => Some(CollectionType::Document),
            3 => Some(CollectionType::Edge),
            _ => None,
        }
    }
}

impl fmt::Display for CollectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionType::Document => f.write_str("document"),
            CollectionType::Edge => f.write_str("edge"),
        }
    }
}

impl Serialize for CollectionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.as_u32())
    }
}

impl<'de> Deserialize<'de> for CollectionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = u32::deserialize(deserializer)?;
        CollectionType::from_u32(value)
            .ok_or_else(|| de::Error::custom(format!("unknown collection type {}", value)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInfo {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub collection_type: CollectionType,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub globally_unique_id: Option<String>,
}

/// Attribute computed by the server on write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedValue {
    pub name: String,
    pub expression: String,
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute_on: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_null: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_warning: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProperties {
    #[serde(flatten)]
    pub info: CollectionInfo,
    #[serde(default)]
    pub wait_for_sync: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_values: Option<Vec<ComputedValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_options: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_shards: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_factor: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_concern: Option<u64>,
}

/// Mutable collection properties; unset fields are not changed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCollectionPropertiesOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_sync: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_values: Option<Vec<ComputedValue>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCollectionOptions {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub collection_type: Option<CollectionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_sync: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_values: Option<Vec<ComputedValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_shards: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_system: Option<bool>,
}

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    #[serde(flatten)]
    options: Option<&'a CreateCollectionOptions>,
}

#[derive(Deserialize)]
struct CountBody {
    count: u64,
}

/// Handle to a collection
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    database: Database,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    fn url(&self, parts: &[&str]) -> String {
        let mut all = vec!["_api", "collection", self.name.as_str()];
        all.extend_from_slice(parts);
        self.database.url(&all)
    }

    pub async fn properties(&self) -> Result<CollectionProperties> {
        let url = self.url(&["properties"]);
        let response = call_get(self.database.conn(), &url).await?;

        match response.code() {
            200 => {
                let body: ResponseEnvelope<CollectionProperties> = response.decode()?;
                Ok(body.payload)
            }
            _ => Err(response.as_arango_error()),
        }
    }

    pub async fn set_properties(&self, options: &SetCollectionPropertiesOptions) -> Result<()> {
        let url = self.url(&["properties"]);
        let response = call_put(self.database.conn(), &url, options).await?;

        match response.code() {
            200 => Ok(()),
            _ => Err(response.as_arango_error()),
        }
    }

    pub async fn count(&self) -> Result<u64> {
        let url = self.url(&["count"]);
        let response = call_get(self.database.conn(), &url).await?;

        match response.code() {
            200 => {
                let body: CountBody = response.decode()?;
                Ok(body.count)
            }
            _ => Err(response.as_arango_error()),
        }
    }

    /// Removes every document, keeping indexes and properties.
    pub async fn truncate(&self) -> Result<()> {
        let url = self.url(&["truncate"]);
        let request = Request::new(HttpMethod::PUT, url).with_json_body(&serde_json::json!({}))?;
        let response = self.database.conn().call(request).await?;

        match response.code() {
            200 => Ok(()),
            _ => Err(response.as_arango_error()),
        }
    }

    pub async fn remove(&self) -> Result<()> {
        let url = self.url(&[]);
        let response = call_delete(self.database.conn(), &url).await?;

        match response.code() {
            200 => {
                tracing::debug!(database = self.database.name(), collection = %self.name, "collection removed");
                Ok(())
            }
            _ => Err(response.as_arango_error()),
        }
    }
}

impl Database {
    /// Opens an existing collection; not-found if it does not exist.
    pub async fn collection(&self, name: &str) -> Result<Collection> {
        let url = self.url(&["_api", "collection", name]);
        let response = call_get(self.conn(), &url).await?;

        match response.code() {
            200 => Ok(Collection {
                name: name.to_string(),
                database: self.clone(),
            }),
            _ => Err(response.as_arango_error()),
        }
    }

    pub async fn collection_exists(&self, name: &str) -> Result<bool> {
        match self.collection(name).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn collections(&self) -> Result<Vec<Collection>> {
        let url = self.url(&["_api", "collection"]);
        let response = call_get(self.conn(), &url).await?;

        match response.code() {
            200 => {
                let body: ResultResponse<Vec<CollectionInfo>> = response.decode()?;
                Ok(body
                    .result
                    .into_iter()
                    .map(|info| Collection {
                        name: info.name,
                        database: self.clone(),
                    })
                    .collect())
            }
            _ => Err(response.as_arango_error()),
        }
    }

    /// Creates a collection; conflict if the name is taken.
    pub async fn create_collection(&self, name: &str, options: Option<&CreateCollectionOptions>) -> Result<Collection> {
        let url = self.url(&["_api", "collection"]);
        let request = CreateCollectionRequest { name, options };
        let response = call_post(self.conn(), &url, &request).await?;

        match response.code() {
            200 => Ok(Collection {
                name: name.to_string(),
                database: self.clone(),
            }),
            _ => Err(response.as_arango_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::arangodb::database::tests::test_database;
    use crate::connection::mock::MockConnection;
    use serde_json::json;

    #[tokio::test]
    async fn test_collection_exists() {
        let mock = Arc::new(MockConnection::new());
        mock.on(HttpMethod::GET, "/_db/shop/_api/collection/products", 200, json!({"name": "products", "type": 2}));

        let db = test_database(&mock);
        assert!(db.collection_exists("products").await.unwrap());
        assert!(!db.collection_exists("orders").await.unwrap());
    }

    #[tokio::test]
    async fn test_collections() {
        let mock = Arc::new(MockConnection::new());
        mock.on(
            HttpMethod::GET,
            "/_db/shop/_api/collection",
            200,
            json!({"error": false, "code": 200, "result": [
                {"id": "1", "name": "products", "type": 2, "isSystem": false, "status": 3},
                {"id": "2", "name": "links", "type": 3, "isSystem": false, "status": 3}
            ]}),
        );

        let names: Vec<String> = test_database(&mock)
            .collections()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(names, vec!["products", "links"]);
    }

    #[tokio::test]
    async fn test_create_edge_collection() {
        let mock = Arc::new(MockConnection::new());
        mock.on(HttpMethod::POST, "/_db/shop/_api/collection", 200, json!({"name": "links", "type": 3}));

        let options = CreateCollectionOptions {
            collection_type: Some(CollectionType::Edge),
            ..Default::default()
        };
        let collection = test_database(&mock)
            .create_collection("links", Some(&options))
            .await
            .unwrap();
        assert_eq!(collection.name(), "links");
        assert_eq!(mock.last_request().json_body(), Some(json!({"name": "links", "type": 3})));
    }

    #[tokio::test]
    async fn test_create_existing_collection_is_conflict() {
        let mock = Arc::new(MockConnection::new());
        mock.on_error(HttpMethod::POST, "/_db/shop/_api/collection", 409, 1207, "duplicate name");

        let err = test_database(&mock).create_collection("products", None).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_properties_and_count() {
        let mock = Arc::new(MockConnection::new());
        mock.on(HttpMethod::GET, "/_db/shop/_api/collection/products", 200, json!({"name": "products"}));
        mock.on(
            HttpMethod::GET,
            "/_db/shop/_api/collection/products/properties",
            200,
            json!({
                "error": false, "code": 200,
                "id": "1", "name": "products", "type": 2, "isSystem": false,
                "waitForSync": true, "cacheEnabled": false,
                "computedValues": [{"name": "createdAt", "expression": "RETURN DATE_NOW()", "overwrite": true, "computeOn": ["insert"]}],
                "keyOptions": {"type": "traditional", "allowUserKeys": true}
            }),
        );
        mock.on(HttpMethod::GET, "/_db/shop/_api/collection/products/count", 200, json!({"name": "products", "count": 42}));

        let collection = test_database(&mock).collection("products").await.unwrap();
        let properties = collection.properties().await.unwrap();
        assert_eq!(properties.info.collection_type, CollectionType::Document);
        assert!(properties.wait_for_sync);
        assert_eq!(properties.computed_values.unwrap()[0].compute_on, Some(vec!["insert".to_string()]));
        assert_eq!(collection.count().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_set_properties_truncate_remove() {
        let mock = Arc::new(MockConnection::new());
        mock.on(HttpMethod::GET, "/_db/shop/_api/collection/products", 200, json!({"name": "products"}));
        mock.on(HttpMethod::PUT, "/_db/shop/_api/collection/products/properties", 200, json!({"name": "products"}));
        mock.on(HttpMethod::PUT, "/_db/shop/_api/collection/products/truncate", 200, json!({"name": "products"}));
        mock.on(HttpMethod::DELETE, "/_db/shop/_api/collection/products", 200, json!({"id": "1"}));

        let collection = test_database(&mock).collection("products").await.unwrap();
        collection
            .set_properties(&SetCollectionPropertiesOptions {
                wait_for_sync: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(mock.last_request().json_body(), Some(json!({"waitForSync": false})));

        collection.truncate().await.unwrap();
        collection.remove().await.unwrap();
        assert_eq!(mock.requests().len(), 4);
    }

    #[test]
    fn test_collection_type_wire_form() {
        assert_eq!(serde_json::to_value(CollectionType::Edge).unwrap(), json!(3));
        assert!(serde_json::from_value::<CollectionType>(json!(7)).is_err());
    }
}
