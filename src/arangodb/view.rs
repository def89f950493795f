use std::fmt;
use serde::{Deserialize, Serialize};
use crate::arangosearch::view_properties::{ArangoSearchAliasViewProperties, ArangoSearchViewProperties};
use crate::common::error::{ArangoError, Result};
use crate::common::response::{ResponseEnvelope, ResultResponse};
use crate::connection::{call_delete, call_get, call_post, call_put};
use super::database::Database;
use super::reader::ResponseReader;
use super::view_alias::ArangoSearchAliasView;
use super::view_arangosearch::ArangoSearchView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewType {
    #[serde(rename = "arangosearch")]
    ArangoSearch,
    #[serde(rename = "search-alias")]
    SearchAlias,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewType::ArangoSearch => f.write_str("arangosearch"),
            ViewType::SearchAlias => f.write_str("search-alias"),
            ViewType::Unknown => f.write_str("unknown"),
        }
    }
}

/// Identity of a view as returned by the view endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewBase {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub view_type: ViewType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub globally_unique_id: Option<String>,
}

#[derive(Serialize)]
struct CreateViewRequest<'a, P: Serialize> {
    name: &'a str,
    #[serde(rename = "type")]
    view_type: ViewType,
    #[serde(flatten)]
    properties: P,
}

#[derive(Serialize)]
struct RenameViewRequest<'a> {
    name: &'a str,
}

/// Handle to a view of any kind. Use [`View::arangosearch`] or
/// [`View::arangosearch_alias`] to reach the kind-specific properties.
#[derive(Debug, Clone)]
pub struct View {
    name: String,
    view_type: ViewType,
    database: Database,
}

impl View {
    pub(crate) fn from_base(base: ViewBase, database: Database) -> Self {
        View {
            name: base.name,
            view_type: base.view_type,
            database,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub(crate) fn url(&self, parts: &[&str]) -> String {
        let mut all = vec!["_api", "view", self.name.as_str()];
        all.extend_from_slice(parts);
        self.database.url(&all)
    }

    /// Renames the view and returns a handle under the new name.
    /// Not supported in clusters.
    pub async fn rename(&self, new_name: &str) -> Result<View> {
        let url = self.url(&["rename"]);
        let response = call_put(self.database.conn(), &url, &RenameViewRequest { name: new_name }).await?;

        match response.code() {
            200 => {
                let body: ResponseEnvelope<ViewBase> = response.decode()?;
                tracing::debug!(from = %self.name, to = %body.payload.name, "view renamed");
                Ok(View::from_base(body.payload, self.database.clone()))
            }
            _ => Err(response.as_arango_error()),
        }
    }

    pub async fn remove(&self) -> Result<()> {
        let url = self.url(&[]);
        let response = call_delete(self.database.conn(), &url).await?;

        match response.code() {
            200 => Ok(()),
            _ => Err(response.as_arango_error()),
        }
    }

    /// Typed handle for an `arangosearch` view; fails for other kinds.
    pub fn arangosearch(&self) -> Result<ArangoSearchView> {
        match self.view_type {
            ViewType::ArangoSearch => Ok(ArangoSearchView::new(self.clone())),
            other => Err(ArangoError::validation(format!(
                "view '{}' is of type '{}', not 'arangosearch'",
                self.name, other
            ))),
        }
    }

    /// Typed handle for a `search-alias` view; fails for other kinds.
    pub fn arangosearch_alias(&self) -> Result<ArangoSearchAliasView> {
        match self.view_type {
            ViewType::SearchAlias => Ok(ArangoSearchAliasView::new(self.clone())),
            other => Err(ArangoError::validation(format!(
                "view '{}' is of type '{}', not 'search-alias'",
                self.name, other
            ))),
        }
    }
}

impl Database {
    /// Opens an existing view; not-found if it does not exist.
    pub async fn view(&self, name: &str) -> Result<View> {
        let url = self.url(&["_api", "view", name]);
        let response = call_get(self.conn(), &url).await?;

        match response.code() {
            200 => {
                let body: ResponseEnvelope<ViewBase> = response.decode()?;
                Ok(View::from_base(body.payload, self.clone()))
            }
            _ => Err(response.as_arango_error()),
        }
    }

    /// `Ok(false)` only for not-found; every other failure is returned as is.
    pub async fn view_exists(&self, name: &str) -> Result<bool> {
        match self.view(name).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Lists all views. Each call fetches a fresh listing.
    pub async fn views(&self) -> Result<ResponseReader<View>> {
        let url = self.url(&["_api", "view"]);
        let response = call_get(self.conn(), &url).await?;

        match response.code() {
            200 => {
                let body: ResultResponse<Vec<ViewBase>> = response.decode()?;
                let database = self.clone();
                Ok(ResponseReader::new(
                    body.result
                        .into_iter()
                        .map(move |base| View::from_base(base, database.clone())),
                ))
            }
            _ => Err(response.as_arango_error()),
        }
    }

    /// Creates an `arangosearch` view; conflict if the name is taken.
    pub async fn create_arangosearch_view(
        &self,
        name: &str,
        options: Option<&ArangoSearchViewProperties>,
    ) -> Result<ArangoSearchView> {
        let request = CreateViewRequest {
            name,
            view_type: ViewType::ArangoSearch,
            properties: options.map(ArangoSearchViewProperties::without_identity).unwrap_or_default(),
        };
        let view = self.create_view(&request).await?;
        Ok(ArangoSearchView::new(view))
    }

    /// Creates a `search-alias` view; conflict if the name is taken.
    pub async fn create_arangosearch_alias_view(
        &self,
        name: &str,
        options: Option<&ArangoSearchAliasViewProperties>,
    ) -> Result<ArangoSearchAliasView> {
        let request = CreateViewRequest {
            name,
            view_type: ViewType::SearchAlias,
            properties: options.map(ArangoSearchAliasViewProperties::without_identity).unwrap_or_default(),
        };
        let view = self.create_view(&request).await?;
        Ok(ArangoSearchAliasView::new(view))
    }

    async fn create_view<P: Serialize + Sync>(&self, request: &CreateViewRequest<'_, P>) -> Result<View> {
        let url = self.url(&["_api", "view"]);
        let response = call_post(self.conn(), &url, request).await?;

        match response.code() {
            201 => {
                let body: ResponseEnvelope<ViewBase> = response.decode()?;
                tracing::debug!(database = %self.name(), view = %body.payload.name, "view created");
                Ok(View::from_base(body.payload, self.clone()))
            }
            _ => Err(response.as_arango_error()),
        }
    }
}
