use std::ops::Deref;
use crate::arangosearch::view_properties::ArangoSearchAliasViewProperties;
use crate::common::error::Result;
use crate::common::response::ResponseEnvelope;
use crate::connection::{call_get, call_patch, call_put};
use super::view::View;

/// Handle to a `search-alias` view
#[derive(Debug, Clone)]
pub struct ArangoSearchAliasView {
    view: View,
}

impl ArangoSearchAliasView {
    pub(crate) fn new(view: View) -> Self {
        ArangoSearchAliasView { view }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub async fn properties(&self) -> Result<ArangoSearchAliasViewProperties> {
        let url = self.view.url(&["properties"]);
        let response = call_get(self.view.database().conn(), &url).await?;

        match response.code() {
            200 => {
                let body: ResponseEnvelope<ArangoSearchAliasViewProperties> = response.decode()?;
                Ok(body.payload)
            }
            _ => Err(response.as_arango_error()),
        }
    }

    /// Replaces the index list.
    pub async fn set_properties(&self, properties: &ArangoSearchAliasViewProperties) -> Result<()> {
        let url = self.view.url(&["properties"]);
        let response = call_put(self.view.database().conn(), &url, &properties.without_identity()).await?;

        match response.code() {
            200 => Ok(()),
            _ => Err(response.as_arango_error()),
        }
    }

    /// Adds or removes the listed indexes, according to each entry's `operation`.
    pub async fn update_properties(&self, properties: &ArangoSearchAliasViewProperties) -> Result<()> {
        let url = self.view.url(&["properties"]);
        let response = call_patch(self.view.database().conn(), &url, &properties.without_identity()).await?;

        match response.code() {
            200 => Ok(()),
            _ => Err(response.as_arango_error()),
        }
    }
}

impl Deref for ArangoSearchAliasView {
    type Target = View;

    fn deref(&self) -> &View {
        &self.view
    }
}
