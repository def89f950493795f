// ArangoDB client library
// Typed bindings for the ArangoDB HTTP API with a focus on ArangoSearch

// Common modules
pub mod common {
    pub mod error;
    pub mod response;
    pub mod utils;
}

// Transport
pub mod connection;

// ArangoSearch analyzer and view model
pub mod arangosearch;

// Resource handles
pub mod arangodb;

// Re-export commonly used types for convenience
pub use common::error::{ArangoError, ErrorCode, Result};
pub use connection::{Authentication, ClientConfig, Connection, HttpConnection, Request, Response};

pub use arangosearch::{
    AnalyzerDefinition,
    AnalyzerProperties,
    AnalyzerType,
    ArangoSearchAliasViewProperties,
    ArangoSearchViewProperties,
    Feature,
    Features,
};

pub use arangodb::{
    Analyzer,
    ArangoSearchAliasView,
    ArangoSearchView,
    Client,
    Collection,
    Database,
    ResponseReader,
    ServerMode,
    View,
    ViewType,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "arango-client");
    }
}
