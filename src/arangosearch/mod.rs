//! ArangoSearch configuration model: analyzers, features and view properties.

pub mod analyzer;
pub mod features;
pub mod view_properties;

pub use analyzer::{AnalyzerDefinition, AnalyzerProperties, AnalyzerType};
pub use features::{Feature, Features};
pub use view_properties::{
    ArangoSearchAliasIndex, ArangoSearchAliasViewProperties, ArangoSearchElementProperties,
    ArangoSearchViewProperties, BytesAccumPolicy, ConsolidationPolicy, TierPolicy,
};
