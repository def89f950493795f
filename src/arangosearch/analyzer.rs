//! Analyzer definitions and the per-type property variants.
//!
//! On the wire an analyzer is a `{name, type, properties, features}` object
//! where the shape of `properties` depends on `type`. Here every type gets its
//! own properties struct and [`AnalyzerProperties`] is the tagged union over
//! them, so a value can only ever carry the options its type accepts.
//!
//! Decoding is permissive: an unrecognized `type` is kept as
//! [`AnalyzerProperties::Unknown`] with its raw properties, and fields a known
//! type does not model are kept in that type's `extra` map and written back
//! on encode. Encoding an `Unknown` value fails with
//! [`ArangoError::UnknownAnalyzerType`].

use std::fmt;
use std::str::FromStr;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::common::error::{ArangoError, Result};
use super::features::Features;

/// Default `top_k` for classification and nearest_neighbors analyzers.
pub const DEFAULT_TOP_K: u64 = 1;
/// Default probability threshold for classification analyzers.
pub const DEFAULT_THRESHOLD: f64 = 0.99;

/// Closed set of analyzer types known to this client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyzerType {
    /// Treat the value as an atom (no transformation).
    Identity,
    /// Split into tokens at a user-defined character.
    Delimiter,
    /// Apply stemming to the value as a whole.
    Stem,
    /// Apply normalization to the value as a whole.
    Norm,
    /// Create n-grams with user-defined lengths.
    NGram,
    /// Tokenize into words, optionally with stemming, normalization and stop-word filtering.
    Text,
    /// Run a restricted AQL query per value.
    Aql,
    /// Chain several analyzers; each stage consumes the tokens of the previous one.
    Pipeline,
    /// Remove the listed tokens.
    Stopwords,
    /// Break GeoJSON objects into indexable geo tokens.
    GeoJson,
    /// Like `geojson`, with a more compact on-disk format.
    GeoS2,
    /// Break coordinate objects into indexable geo tokens.
    GeoPoint,
    /// Language-agnostic word segmentation.
    Segmentation,
    /// Language-specific collation tokens.
    Collation,
    /// fastText classification (Enterprise Edition).
    Classification,
    /// fastText nearest neighbors (Enterprise Edition).
    NearestNeighbors,
    /// MinHash signatures (Enterprise Edition).
    Minhash,
}

impl AnalyzerType {
    pub const ALL: [AnalyzerType; 17] = [
        AnalyzerType::Identity,
        AnalyzerType::Delimiter,
        AnalyzerType::Stem,
        AnalyzerType::Norm,
        AnalyzerType::NGram,
        AnalyzerType::Text,
        AnalyzerType::Aql,
        AnalyzerType::Pipeline,
        AnalyzerType::Stopwords,
        AnalyzerType::GeoJson,
        AnalyzerType::GeoS2,
        AnalyzerType::GeoPoint,
        AnalyzerType::Segmentation,
        AnalyzerType::Collation,
        AnalyzerType::Classification,
        AnalyzerType::NearestNeighbors,
        AnalyzerType::Minhash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzerType::Identity => "identity",
            AnalyzerType::Delimiter => "delimiter",
            AnalyzerType::Stem => "stem",
            AnalyzerType::Norm => "norm",
            AnalyzerType::NGram => "ngram",
            AnalyzerType::Text => "text",
            AnalyzerType::Aql => "aql",
            AnalyzerType::Pipeline => "pipeline",
            AnalyzerType::Stopwords => "stopwords",
            AnalyzerType::GeoJson => "geojson",
            AnalyzerType::GeoS2 => "geo_s2",
            AnalyzerType::GeoPoint => "geopoint",
            AnalyzerType::Segmentation => "segmentation",
            AnalyzerType::Collation => "collation",
            AnalyzerType::Classification => "classification",
            AnalyzerType::NearestNeighbors => "nearest_neighbors",
            AnalyzerType::Minhash => "minhash",
        }
    }
}

impl FromStr for AnalyzerType {
    type Err = ArangoError;

    fn from_str(s: &str) -> Result<Self> {
        AnalyzerType::ALL
            .iter()
            .copied()
            .find(|analyzer_type| analyzer_type.as_str() == s)
            .ok_or_else(|| ArangoError::UnknownAnalyzerType(s.to_string()))
    }
}

impl fmt::Display for AnalyzerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AnalyzerType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnalyzerType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseType {
    Upper,
    Lower,
    /// Keep the character case (default).
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NGramStreamType {
    #[default]
    Binary,
    Utf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AqlReturnType {
    String,
    Number,
    Bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoJsonType {
    /// Index all GeoJSON geometry types (default).
    #[default]
    Shape,
    /// Index only the centroid of the geometry.
    Centroid,
    /// Index only `Point` objects.
    Point,
}

/// Binary representation geo_s2 uses to store coordinates in the index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeoS2Format {
    /// Two 8-byte floats per pair (default).
    #[default]
    LatLngDouble,
    /// Two 4-byte integers per pair, precise to roughly 1-10 cm.
    LatLngInt,
    /// Native S2 point.
    S2Point,
}

impl GeoS2Format {
    pub fn bytes_per_coordinate_pair(&self) -> usize {
        match self {
            GeoS2Format::LatLngDouble => 16,
            GeoS2Format::LatLngInt => 8,
            GeoS2Format::S2Point => 24,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakType {
    /// Return all tokens.
    All,
    /// Return tokens made of alphanumeric characters only (default).
    #[default]
    Alpha,
    /// Return tokens made of non-whitespace characters only.
    Graphic,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeNGram {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_original: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// S2 tuning shared by the geo analyzers; usually left unset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cells: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_level: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityProperties {
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DelimiterProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StemProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<CaseType>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<CaseType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_ngram: Option<EdgeNGram>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stemming: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopwords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopwords_path: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollationProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NGramProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preserve_original: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_type: Option<NGramStreamType>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AqlProperties {
    pub query_string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse_positions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_null: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<AqlReturnType>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AqlProperties {
    pub fn new(query_string: impl Into<String>) -> Self {
        AqlProperties {
            query_string: query_string.into(),
            ..Default::default()
        }
    }
}

/// Stages run in order; the final token is the output of the last stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineProperties {
    #[serde(default)]
    pub pipeline: Vec<AnalyzerProperties>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PipelineProperties {
    pub fn new(stages: impl IntoIterator<Item = AnalyzerProperties>) -> Self {
        PipelineProperties {
            pipeline: stages.into_iter().collect(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopwordsProperties {
    #[serde(default)]
    pub stopwords: Vec<String>,
    /// When true every entry of `stopwords` is a hex-encoded byte string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StopwordsProperties {
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StopwordsProperties {
            stopwords: stopwords.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Builds a hex-encoded stopword list from raw byte tokens.
    pub fn from_bytes<I, B>(tokens: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        StopwordsProperties {
            stopwords: tokens.into_iter().map(hex::encode).collect(),
            hex: Some(true),
            extra: Map::new(),
        }
    }

    /// Stopwords as raw bytes, hex-decoding when `hex` is set.
    pub fn tokens(&self) -> Result<Vec<Vec<u8>>> {
        if self.hex != Some(true) {
            return Ok(self.stopwords.iter().map(|word| word.as_bytes().to_vec()).collect());
        }
        self.stopwords
            .iter()
            .map(|word| {
                hex::decode(word)
                    .map_err(|e| ArangoError::malformed(format!("stopword '{}' is not valid hex: {}", word, e)))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonProperties {
    #[serde(rename = "type", default)]
    pub shape_type: GeoJsonType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<GeoOptions>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoS2Properties {
    #[serde(rename = "type", default)]
    pub shape_type: GeoJsonType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<GeoOptions>,
    #[serde(default)]
    pub format: GeoS2Format,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `latitude` / `longitude` are attribute paths into the indexed object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPointProperties {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub latitude: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub longitude: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<GeoOptions>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentationProperties {
    #[serde(default)]
    pub case: CaseType,
    #[serde(rename = "break", default)]
    pub break_type: BreakType,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_top_k() -> u64 {
    DEFAULT_TOP_K
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// `model_location` must exist on every node of a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationProperties {
    pub model_location: String,
    #[serde(default = "default_top_k")]
    pub top_k: u64,
    /// Probability in `[0, 1]` a label needs to be assigned.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClassificationProperties {
    pub fn new(model_location: impl Into<String>) -> Self {
        ClassificationProperties {
            model_location: model_location.into(),
            top_k: DEFAULT_TOP_K,
            threshold: DEFAULT_THRESHOLD,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestNeighborsProperties {
    pub model_location: String,
    #[serde(default = "default_top_k")]
    pub top_k: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NearestNeighborsProperties {
    pub fn new(model_location: impl Into<String>) -> Self {
        NearestNeighborsProperties {
            model_location: model_location.into(),
            top_k: DEFAULT_TOP_K,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinhashProperties {
    /// Inner analyzer; a missing or empty object means identity.
    #[serde(default, deserialize_with = "deserialize_inner_analyzer")]
    pub analyzer: Box<AnalyzerProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_hashes: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn deserialize_inner_analyzer<'de, D>(deserializer: D) -> std::result::Result<Box<AnalyzerProperties>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let empty = match &value {
        Value::Null => true,
        Value::Object(object) => object.is_empty(),
        _ => false,
    };
    if empty {
        return Ok(Box::default());
    }
    AnalyzerProperties::from_tagged(value)
        .map(Box::new)
        .map_err(de::Error::custom)
}

/// Analyzer properties, one variant per analyzer type.
///
/// Serialized on its own as the `{"type": ..., "properties": {...}}` pair,
/// which is the shape pipeline stages and the minhash inner analyzer use.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerProperties {
    Identity(IdentityProperties),
    Delimiter(DelimiterProperties),
    Stem(StemProperties),
    Norm(NormProperties),
    NGram(NGramProperties),
    Text(TextProperties),
    Aql(AqlProperties),
    Pipeline(PipelineProperties),
    Stopwords(StopwordsProperties),
    GeoJson(GeoJsonProperties),
    GeoS2(GeoS2Properties),
    GeoPoint(GeoPointProperties),
    Segmentation(SegmentationProperties),
    Collation(CollationProperties),
    Classification(ClassificationProperties),
    NearestNeighbors(NearestNeighborsProperties),
    Minhash(MinhashProperties),
    /// A type this client does not know, kept verbatim.
    Unknown { type_name: String, properties: Value },
}

impl Default for AnalyzerProperties {
    fn default() -> Self {
        AnalyzerProperties::Identity(IdentityProperties::default())
    }
}

fn parse<T: DeserializeOwned>(analyzer_type: AnalyzerType, properties: Value) -> Result<T> {
    serde_json::from_value(properties).map_err(|e| {
        ArangoError::malformed(format!("invalid '{}' analyzer properties: {}", analyzer_type, e))
    })
}

fn encode<T: Serialize>(properties: &T) -> Result<Value> {
    serde_json::to_value(properties).map_err(ArangoError::Encode)
}

impl AnalyzerProperties {
    /// Strict type lookup; fails for [`AnalyzerProperties::Unknown`].
    pub fn analyzer_type(&self) -> Result<AnalyzerType> {
        let analyzer_type = match self {
            AnalyzerProperties::Identity(_) => AnalyzerType::Identity,
            AnalyzerProperties::Delimiter(_) => AnalyzerType::Delimiter,
            AnalyzerProperties::Stem(_) => AnalyzerType::Stem,
            AnalyzerProperties::Norm(_) => AnalyzerType::Norm,
            AnalyzerProperties::NGram(_) => AnalyzerType::NGram,
            AnalyzerProperties::Text(_) => AnalyzerType::Text,
            AnalyzerProperties::Aql(_) => AnalyzerType::Aql,
            AnalyzerProperties::Pipeline(_) => AnalyzerType::Pipeline,
            AnalyzerProperties::Stopwords(_) => AnalyzerType::Stopwords,
            AnalyzerProperties::GeoJson(_) => AnalyzerType::GeoJson,
            AnalyzerProperties::GeoS2(_) => AnalyzerType::GeoS2,
            AnalyzerProperties::GeoPoint(_) => AnalyzerType::GeoPoint,
            AnalyzerProperties::Segmentation(_) => AnalyzerType::Segmentation,
            AnalyzerProperties::Collation(_) => AnalyzerType::Collation,
            AnalyzerProperties::Classification(_) => AnalyzerType::Classification,
            AnalyzerProperties::NearestNeighbors(_) => AnalyzerType::NearestNeighbors,
            AnalyzerProperties::Minhash(_) => AnalyzerType::Minhash,
            AnalyzerProperties::Unknown { type_name, .. } => {
                return Err(ArangoError::UnknownAnalyzerType(type_name.clone()));
            }
        };
        Ok(analyzer_type)
    }

    /// The wire discriminator, including unknown ones.
    pub fn type_name(&self) -> &str {
        match self {
            AnalyzerProperties::Unknown { type_name, .. } => type_name,
            known => known.analyzer_type().map(|t| t.as_str()).unwrap_or_default(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, AnalyzerProperties::Unknown { .. })
    }

    /// Fails if this value or any nested stage has an unknown type.
    fn ensure_encodable(&self) -> Result<()> {
        match self {
            AnalyzerProperties::Unknown { type_name, .. } => {
                Err(ArangoError::UnknownAnalyzerType(type_name.clone()))
            }
            AnalyzerProperties::Pipeline(pipeline) => pipeline
                .pipeline
                .iter()
                .try_for_each(AnalyzerProperties::ensure_encodable),
            AnalyzerProperties::Minhash(minhash) => minhash.analyzer.ensure_encodable(),
            _ => Ok(()),
        }
    }

    /// Decodes `properties` according to the `type_name` discriminator.
    ///
    /// A `null` properties value is read as an empty object. Unknown type
    /// names decode to [`AnalyzerProperties::Unknown`].
    pub fn from_wire(type_name: &str, properties: Value) -> Result<Self> {
        let properties = match properties {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let analyzer_type = match type_name.parse::<AnalyzerType>() {
            Ok(analyzer_type) => analyzer_type,
            Err(_) => {
                tracing::warn!(analyzer_type = type_name, "unknown analyzer type, keeping raw properties");
                return Ok(AnalyzerProperties::Unknown {
                    type_name: type_name.to_string(),
                    properties,
                });
            }
        };

        let decoded = match analyzer_type {
            AnalyzerType::Identity => AnalyzerProperties::Identity(parse(analyzer_type, properties)?),
            AnalyzerType::Delimiter => AnalyzerProperties::Delimiter(parse(analyzer_type, properties)?),
            AnalyzerType::Stem => AnalyzerProperties::Stem(parse(analyzer_type, properties)?),
            AnalyzerType::Norm => AnalyzerProperties::Norm(parse(analyzer_type, properties)?),
            AnalyzerType::NGram => AnalyzerProperties::NGram(parse(analyzer_type, properties)?),
            AnalyzerType::Text => AnalyzerProperties::Text(parse(analyzer_type, properties)?),
            AnalyzerType::Aql => AnalyzerProperties::Aql(parse(analyzer_type, properties)?),
            AnalyzerType::Pipeline => AnalyzerProperties::Pipeline(parse(analyzer_type, properties)?),
            AnalyzerType::Stopwords => AnalyzerProperties::Stopwords(parse(analyzer_type, properties)?),
            AnalyzerType::GeoJson => AnalyzerProperties::GeoJson(parse(analyzer_type, properties)?),
            AnalyzerType::GeoS2 => AnalyzerProperties::GeoS2(parse(analyzer_type, properties)?),
            AnalyzerType::GeoPoint => AnalyzerProperties::GeoPoint(parse(analyzer_type, properties)?),
            AnalyzerType::Segmentation => AnalyzerProperties::Segmentation(parse(analyzer_type, properties)?),
            AnalyzerType::Collation => AnalyzerProperties::Collation(parse(analyzer_type, properties)?),
            AnalyzerType::Classification => AnalyzerProperties::Classification(parse(analyzer_type, properties)?),
            AnalyzerType::NearestNeighbors => {
                AnalyzerProperties::NearestNeighbors(parse(analyzer_type, properties)?)
            }
            AnalyzerType::Minhash => AnalyzerProperties::Minhash(parse(analyzer_type, properties)?),
        };
        Ok(decoded)
    }

    /// Encodes into the discriminator and the properties object for it.
    pub fn to_wire(&self) -> Result<(AnalyzerType, Value)> {
        self.ensure_encodable()?;

        let properties = match self {
            AnalyzerProperties::Identity(p) => encode(p)?,
            AnalyzerProperties::Delimiter(p) => encode(p)?,
            AnalyzerProperties::Stem(p) => encode(p)?,
            AnalyzerProperties::Norm(p) => encode(p)?,
            AnalyzerProperties::NGram(p) => encode(p)?,
            AnalyzerProperties::Text(p) => encode(p)?,
            AnalyzerProperties::Aql(p) => encode(p)?,
            AnalyzerProperties::Pipeline(p) => encode(p)?,
            AnalyzerProperties::Stopwords(p) => encode(p)?,
            AnalyzerProperties::GeoJson(p) => encode(p)?,
            AnalyzerProperties::GeoS2(p) => encode(p)?,
            AnalyzerProperties::GeoPoint(p) => encode(p)?,
            AnalyzerProperties::Segmentation(p) => encode(p)?,
            AnalyzerProperties::Collation(p) => encode(p)?,
            AnalyzerProperties::Classification(p) => encode(p)?,
            AnalyzerProperties::NearestNeighbors(p) => encode(p)?,
            AnalyzerProperties::Minhash(p) => encode(p)?,
            AnalyzerProperties::Unknown { type_name, .. } => {
                return Err(ArangoError::UnknownAnalyzerType(type_name.clone()));
            }
        };
        Ok((self.analyzer_type()?, properties))
    }

    /// Reads a `{"type": ..., "properties": {...}}` object.
    pub fn from_tagged(value: Value) -> Result<Self> {
        let Value::Object(mut object) = value else {
            return Err(ArangoError::malformed(format!(
                "analyzer must be a JSON object, got {}",
                value
            )));
        };

        let type_name = match object.remove("type") {
            Some(Value::String(type_name)) => type_name,
            Some(other) => {
                return Err(ArangoError::malformed(format!(
                    "analyzer type must be a string, got {}",
                    other
                )));
            }
            None => return Err(ArangoError::malformed("missing analyzer type")),
        };

        let properties = object.remove("properties").unwrap_or(Value::Null);
        Self::from_wire(&type_name, properties)
    }

    pub fn to_tagged(&self) -> Result<Value> {
        let (analyzer_type, properties) = self.to_wire()?;
        let mut object = Map::new();
        object.insert("type".to_string(), Value::String(analyzer_type.as_str().to_string()));
        object.insert("properties".to_string(), properties);
        Ok(Value::Object(object))
    }
}

impl Serialize for AnalyzerProperties {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_tagged()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AnalyzerProperties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        AnalyzerProperties::from_tagged(value).map_err(de::Error::custom)
    }
}

/// A named analyzer as stored by the server
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerDefinition {
    pub name: String,
    pub properties: AnalyzerProperties,
    pub features: Features,
}

impl AnalyzerDefinition {
    pub fn new(name: impl Into<String>, properties: AnalyzerProperties) -> Self {
        AnalyzerDefinition {
            name: name.into(),
            properties,
            features: Features::default(),
        }
    }

    pub fn with_features(mut self, features: impl Into<Features>) -> Self {
        self.features = features.into();
        self
    }

    pub fn analyzer_type(&self) -> Result<AnalyzerType> {
        self.properties.analyzer_type()
    }

    /// Encodes into `{name, type, properties, features}`; empty features are omitted.
    pub fn to_wire(&self) -> Result<Value> {
        let (analyzer_type, properties) = self.properties.to_wire()?;

        let mut object = Map::new();
        object.insert("name".to_string(), Value::String(self.name.clone()));
        object.insert("type".to_string(), Value::String(analyzer_type.as_str().to_string()));
        object.insert("properties".to_string(), properties);
        if !self.features.is_empty() {
            object.insert("features".to_string(), encode(&self.features)?);
        }
        Ok(Value::Object(object))
    }

    /// Decodes a definition; extra keys such as response status fields are ignored.
    /// Inconsistent features are logged, the server being authoritative for them.
    pub fn from_wire(value: Value) -> Result<Self> {
        let Value::Object(mut object) = value else {
            return Err(ArangoError::malformed(format!(
                "analyzer definition must be a JSON object, got {}",
                value
            )));
        };

        let name = match object.remove("name") {
            Some(Value::String(name)) => name,
            _ => return Err(ArangoError::malformed("missing analyzer name")),
        };

        let features: Features = match object.remove("features") {
            None | Some(Value::Null) => Features::default(),
            Some(features) => serde_json::from_value(features).map_err(|e| {
                ArangoError::malformed(format!("invalid features of analyzer '{}': {}", name, e))
            })?,
        };
        if let Err(e) = features.validate() {
            tracing::warn!(analyzer = %name, error = %e, "analyzer features are inconsistent");
        }

        let properties = AnalyzerProperties::from_tagged(Value::Object(object))?;

        Ok(AnalyzerDefinition {
            name,
            properties,
            features,
        })
    }
}

impl Serialize for AnalyzerDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_wire()
            .map_err(ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AnalyzerDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        AnalyzerDefinition::from_wire(value).map_err(de::Error::custom)
    }
}
