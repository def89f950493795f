use std::collections::HashMap;
use serde::de::{self, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Consolidate segments of similar size, grouped in tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments_min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments_max: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments_bytes_max: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments_bytes_floor: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<u64>,
}

/// Consolidate when the ratio of removed documents exceeds `threshold`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BytesAccumPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

/// How often index segments are merged, selected by the `type` tag.
///
/// A tag this client does not know decodes as `Unknown` and is written back
/// unchanged, so a view using it can still be read and updated.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsolidationPolicy {
    Tier(TierPolicy),
    BytesAccum(BytesAccumPolicy),
    Unknown {
        type_name: String,
        properties: Map<String, Value>,
    },
}

impl ConsolidationPolicy {
    pub fn type_name(&self) -> &str {
        match self {
            ConsolidationPolicy::Tier(_) => "tier",
            ConsolidationPolicy::BytesAccum(_) => "bytes_accum",
            ConsolidationPolicy::Unknown { type_name, .. } => type_name,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ConsolidationPolicy::Unknown { .. })
    }
}

impl Serialize for ConsolidationPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let body = match self {
            ConsolidationPolicy::Tier(p) => serde_json::to_value(p).map_err(ser::Error::custom)?,
            ConsolidationPolicy::BytesAccum(p) => serde_json::to_value(p).map_err(ser::Error::custom)?,
            ConsolidationPolicy::Unknown { properties, .. } => Value::Object(properties.clone()),
        };
        let mut object = match body {
            Value::Object(object) => object,
            _ => Map::new(),
        };
        object.insert("type".to_string(), Value::String(self.type_name().to_string()));
        object.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConsolidationPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut object = Map::<String, Value>::deserialize(deserializer)?;
        let type_name = match object.remove("type") {
            Some(Value::String(type_name)) => type_name,
            _ => return Err(de::Error::custom("consolidation policy without a type")),
        };

        match type_name.as_str() {
            "tier" => serde_json::from_value(Value::Object(object))
                .map(ConsolidationPolicy::Tier)
                .map_err(de::Error::custom),
            "bytes_accum" => serde_json::from_value(Value::Object(object))
                .map(ConsolidationPolicy::BytesAccum)
                .map_err(de::Error::custom),
            _ => {
                tracing::warn!(policy_type = %type_name, "unknown consolidation policy, keeping raw properties");
                Ok(ConsolidationPolicy::Unknown {
                    type_name,
                    properties: object,
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimarySortEntry {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asc: Option<bool>,
}

impl PrimarySortEntry {
    pub fn new(field: impl Into<String>, ascending: bool) -> Self {
        PrimarySortEntry {
            field: field.into(),
            asc: Some(ascending),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimarySortCompression {
    Lz4,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredValue {
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<PrimarySortCompression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreValues {
    None,
    Id,
}

/// Link of a view to one collection, or the options of a nested field.
/// `fields` and `nested` recurse into sub-attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArangoSearchElementProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<HashMap<String, ArangoSearchElementProperties>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_all_fields: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_list_positions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_values: Option<StoreValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_background: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<HashMap<String, ArangoSearchElementProperties>>,
}

/// Properties of an `arangosearch` view.
///
/// Every field is optional: unset fields are left out of the request, which
/// on PATCH keeps the server's current value. `id`, `name`, `type` and
/// `globally_unique_id` are only filled in responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArangoSearchViewProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub view_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub globally_unique_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_interval_step: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_interval_msec: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidation_interval_msec: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consolidation_policy: Option<ConsolidationPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_sort: Option<Vec<PrimarySortEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_sort_compression: Option<PrimarySortCompression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_values: Option<Vec<StoredValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writebuffer_idle: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writebuffer_active: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writebuffer_size_max: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<HashMap<String, ArangoSearchElementProperties>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimize_top_k: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_sort_cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key_cache: Option<bool>,
}

impl ArangoSearchViewProperties {
    /// Copy without the server-assigned identity fields, suitable as a request body.
    pub fn without_identity(&self) -> Self {
        ArangoSearchViewProperties {
            id: None,
            name: None,
            view_type: None,
            globally_unique_id: None,
            ..self.clone()
        }
    }

    pub fn with_link(mut self, collection: impl Into<String>, link: ArangoSearchElementProperties) -> Self {
        self.links
            .get_or_insert_with(HashMap::new)
            .insert(collection.into(), link);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasOperation {
    Add,
    Del,
}

/// Reference to an inverted index of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArangoSearchAliasIndex {
    pub collection: String,
    pub index: String,
    /// Only meaningful on PATCH; absent means add.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<AliasOperation>,
}

impl ArangoSearchAliasIndex {
    pub fn new(collection: impl Into<String>, index: impl Into<String>) -> Self {
        ArangoSearchAliasIndex {
            collection: collection.into(),
            index: index.into(),
            operation: None,
        }
    }

    pub fn with_operation(mut self, operation: AliasOperation) -> Self {
        self.operation = Some(operation);
        self
    }
}

/// Properties of a `search-alias` view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArangoSearchAliasViewProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub view_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub globally_unique_id: Option<String>,
    #[serde(default)]
    pub indexes: Vec<ArangoSearchAliasIndex>,
}

impl ArangoSearchAliasViewProperties {
    pub fn new(indexes: impl IntoIterator<Item = ArangoSearchAliasIndex>) -> Self {
        ArangoSearchAliasViewProperties {
            indexes: indexes.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn without_identity(&self) -> Self {
        ArangoSearchAliasViewProperties::new(self.indexes.iter().cloned())
    }
}
