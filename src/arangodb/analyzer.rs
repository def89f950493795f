use serde_json::Value;
use crate::arangosearch::analyzer::{AnalyzerDefinition, AnalyzerType};
use crate::common::error::Result;
use crate::common::response::ResultResponse;
use crate::common::utils::database_url;
use crate::connection::{call_get, call_post, HttpMethod, Request};
use super::database::Database;
use super::reader::ResponseReader;

/// Handle to an analyzer together with its definition
#[derive(Debug, Clone)]
pub struct Analyzer {
    definition: AnalyzerDefinition,
    database: Database,
}

impl Analyzer {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Name without the `database::` prefix the server adds.
    pub fn unqualified_name(&self) -> &str {
        match self.definition.name.split_once("::") {
            Some((_, name)) => name,
            None => &self.definition.name,
        }
    }

    pub fn analyzer_type(&self) -> Result<AnalyzerType> {
        self.definition.analyzer_type()
    }

    pub fn definition(&self) -> &AnalyzerDefinition {
        &self.definition
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Database that owns the analyzer, taken from the name prefix when present.
    pub fn owning_database(&self) -> &str {
        match self.definition.name.split_once("::") {
            Some((database, _)) if !database.is_empty() => database,
            _ => self.database.name(),
        }
    }

    /// Deletes the analyzer in the database that owns it. With `force` it is
    /// removed even while views use it.
    pub async fn remove(&self, force: bool) -> Result<()> {
        let url = database_url(self.owning_database(), &["_api", "analyzer", self.unqualified_name()]);
        let request = Request::new(HttpMethod::DELETE, url).with_query("force", force);
        let response = self.database.conn().call(request).await?;

        match response.code() {
            200 => {
                tracing::debug!(analyzer = %self.definition.name, force, "analyzer removed");
                Ok(())
            }
            _ => Err(response.as_arango_error()),
        }
    }
}

impl Database {
    /// Opens an existing analyzer; not-found if it does not exist.
    pub async fn analyzer(&self, name: &str) -> Result<Analyzer> {
        let url = self.url(&["_api", "analyzer", name]);
        let response = call_get(self.conn(), &url).await?;

        match response.code() {
            200 => {
                let definition = AnalyzerDefinition::from_wire(response.decode::<Value>()?)?;
                Ok(Analyzer {
                    definition,
                    database: self.clone(),
                })
            }
            _ => Err(response.as_arango_error()),
        }
    }

    /// Lists all analyzers visible from this database, built-ins included.
    pub async fn analyzers(&self) -> Result<ResponseReader<Analyzer>> {
        let url = self.url(&["_api", "analyzer"]);
        let response = call_get(self.conn(), &url).await?;

        match response.code() {
            200 => {
                let body: ResultResponse<Vec<Value>> = response.decode()?;
                let definitions = body
                    .result
                    .into_iter()
                    .map(AnalyzerDefinition::from_wire)
                    .collect::<Result<Vec<_>>>()?;
                let database = self.clone();
                Ok(ResponseReader::new(definitions.into_iter().map(move |definition| Analyzer {
                    definition,
                    database: database.clone(),
                })))
            }
            _ => Err(response.as_arango_error()),
        }
    }

    /// Creates the analyzer unless an identical one exists.
    ///
    /// Returns whether it already existed. A different definition under the
    /// same name is a conflict. Features are checked before anything is sent.
    pub async fn ensure_analyzer(&self, definition: &AnalyzerDefinition) -> Result<(bool, Analyzer)> {
        definition.features.validate()?;
        let body = definition.to_wire()?;

        let url = self.url(&["_api", "analyzer"]);
        let response = call_post(self.conn(), &url, &body).await?;

        let existed = match response.code() {
            201 => false,
            200 => true,
            _ => return Err(response.as_arango_error()),
        };

        let definition = AnalyzerDefinition::from_wire(response.decode::<Value>()?)?;
        tracing::debug!(analyzer = %definition.name, existed, "analyzer ensured");
        Ok((
            existed,
            Analyzer {
                definition,
                database: self.clone(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::arangodb::database::tests::test_database;
    use crate::arangosearch::analyzer::{AnalyzerProperties, DelimiterProperties, StemProperties, PipelineProperties};
    use crate::arangosearch::features::Feature;
    use crate::common::error::ArangoError;
    use crate::connection::mock::MockConnection;
    use serde_json::json;

    fn split_and_stem() -> AnalyzerDefinition {
        AnalyzerDefinition::new(
            "split_and_stem",
            AnalyzerProperties::Pipeline(PipelineProperties::new([
                AnalyzerProperties::Delimiter(DelimiterProperties {
                    delimiter: Some(",".to_string()),
                    ..Default::default()
                }),
                AnalyzerProperties::Stem(StemProperties {
                    locale: Some("en".to_string()),
                    ..Default::default()
                }),
            ])),
        )
        .with_features([Feature::Frequency, Feature::Position])
    }

    fn stored(definition: &AnalyzerDefinition, name: &str) -> Value {
        let mut wire = definition.to_wire().unwrap();
        wire["name"] = json!(name);
        wire
    }

    #[tokio::test]
    async fn test_ensure_analyzer_created_then_existing() {
        let mock = Arc::new(MockConnection::new());
        let definition = split_and_stem();
        mock.on(HttpMethod::POST, "/_db/shop/_api/analyzer", 201, stored(&definition, "shop::split_and_stem"))
            .on(HttpMethod::POST, "/_db/shop/_api/analyzer", 200, stored(&definition, "shop::split_and_stem"));

        let db = test_database(&mock);
        let (existed, analyzer) = db.ensure_analyzer(&definition).await.unwrap();
        assert!(!existed);
        assert_eq!(analyzer.name(), "shop::split_and_stem");
        assert_eq!(analyzer.unqualified_name(), "split_and_stem");
        assert_eq!(analyzer.definition().properties, definition.properties);
        assert_eq!(mock.last_request().json_body(), Some(definition.to_wire().unwrap()));

        let (existed, _) = db.ensure_analyzer(&definition).await.unwrap();
        assert!(existed);
    }

    #[tokio::test]
    async fn test_ensure_analyzer_conflicting_definition() {
        let mock = Arc::new(MockConnection::new());
        mock.on_error(HttpMethod::POST, "/_db/shop/_api/analyzer", 409, 1207, "analyzer with different definition exists");

        let err = test_database(&mock).ensure_analyzer(&split_and_stem()).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_ensure_analyzer_rejects_bad_features_locally() {
        let mock = Arc::new(MockConnection::new());
        let definition = split_and_stem().with_features([Feature::Offset]);

        let err = test_database(&mock).ensure_analyzer(&definition).await.unwrap_err();
        assert!(matches!(err, ArangoError::Validation(_)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_analyzer_rejects_unknown_type_locally() {
        let mock = Arc::new(MockConnection::new());
        let definition = AnalyzerDefinition::new(
            "future",
            AnalyzerProperties::Unknown {
                type_name: "wordpiece".to_string(),
                properties: json!({}),
            },
        );

        let err = test_database(&mock).ensure_analyzer(&definition).await.unwrap_err();
        assert!(matches!(err, ArangoError::UnknownAnalyzerType(_)));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_analyzer_get_and_remove() {
        let mock = Arc::new(MockConnection::new());
        mock.on(
            HttpMethod::GET,
            "/_db/shop/_api/analyzer/text_en",
            200,
            json!({
                "error": false,
                "code": 200,
                "name": "text_en",
                "type": "text",
                "properties": {"locale": "en", "case": "lower", "stopwords": [], "accent": false, "stemming": true},
                "features": ["frequency", "norm", "position"]
            }),
        );
        mock.on(HttpMethod::DELETE, "/_db/shop/_api/analyzer/text_en", 200, json!({"error": false, "code": 200, "name": "text_en"}));

        let analyzer = test_database(&mock).analyzer("text_en").await.unwrap();
        assert_eq!(analyzer.analyzer_type().unwrap(), AnalyzerType::Text);
        assert!(analyzer.definition().features.contains(Feature::Norm));

        analyzer.remove(true).await.unwrap();
        assert_eq!(mock.last_request().get_query_param("force"), Some("true"));
    }

    #[tokio::test]
    async fn test_remove_targets_owning_database() {
        let mock = Arc::new(MockConnection::new());
        mock.on(
            HttpMethod::GET,
            "/_db/shop/_api/analyzer",
            200,
            json!({"error": false, "code": 200, "result": [
                {"name": "_system::text_en", "type": "text", "properties": {"locale": "en"}, "features": []}
            ]}),
        );
        mock.on(HttpMethod::DELETE, "/_db/_system/_api/analyzer/text_en", 200, json!({"error": false, "code": 200}));

        let analyzer = test_database(&mock).analyzers().await.unwrap().read().unwrap();
        assert_eq!(analyzer.database().name(), "shop");
        assert_eq!(analyzer.owning_database(), "_system");

        analyzer.remove(false).await.unwrap();
        let request = mock.last_request();
        assert_eq!(request.method, HttpMethod::DELETE);
        assert_eq!(request.path, "/_db/_system/_api/analyzer/text_en");
    }

    #[tokio::test]
    async fn test_analyzer_in_use_cannot_be_removed() {
        let mock = Arc::new(MockConnection::new());
        mock.on(
            HttpMethod::GET,
            "/_db/shop/_api/analyzer/delim",
            200,
            json!({"name": "shop::delim", "type": "delimiter", "properties": {"delimiter": ";"}, "features": []}),
        );
        mock.on_error(HttpMethod::DELETE, "/_db/shop/_api/analyzer/delim", 409, 1200, "analyzer in use");

        let analyzer = test_database(&mock).analyzer("delim").await.unwrap();
        let err = analyzer.remove(false).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(mock.last_request().get_query_param("force"), Some("false"));
    }

    #[tokio::test]
    async fn test_analyzers_listing_keeps_unknown_types() {
        let mock = Arc::new(MockConnection::new());
        mock.on(
            HttpMethod::GET,
            "/_db/shop/_api/analyzer",
            200,
            json!({"error": false, "code": 200, "result": [
                {"name": "identity", "type": "identity", "properties": {}, "features": ["frequency", "norm"]},
                {"name": "shop::future", "type": "wordpiece", "properties": {"vocab": "v"}, "features": []}
            ]}),
        );

        let mut reader = test_database(&mock).analyzers().await.unwrap();
        assert_eq!(reader.read().unwrap().analyzer_type().unwrap(), AnalyzerType::Identity);
        let future = reader.read().unwrap();
        assert!(future.definition().properties.is_unknown());
        assert!(reader.read().unwrap_err().is_no_more_documents());
    }

    #[tokio::test]
    async fn test_analyzers_listing_with_malformed_entry() {
        let mock = Arc::new(MockConnection::new());
        mock.on(
            HttpMethod::GET,
            "/_db/shop/_api/analyzer",
            200,
            json!({"error": false, "code": 200, "result": [{"name": "broken", "properties": {}}]}),
        );

        let err = test_database(&mock).analyzers().await.unwrap_err();
        assert!(matches!(err, ArangoError::MalformedPayload(_)));
    }
}
