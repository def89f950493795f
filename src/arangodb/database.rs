use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::common::error::Result;
use crate::common::response::ResultResponse;
use crate::common::utils::{database_url, new_url};
use crate::connection::{call_delete, call_get, Connection};

/// Information about the database a handle points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_concern: Option<u64>,
}

/// Handle to a database on the server.
///
/// Cheap to clone. Views, collections and analyzers are reached through the
/// methods defined next to their handles.
#[derive(Clone)]
pub struct Database {
    name: String,
    connection: Arc<dyn Connection>,
}

impl Database {
    pub(crate) fn new(name: impl Into<String>, connection: Arc<dyn Connection>) -> Self {
        Database {
            name: name.into(),
            connection,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// `/_db/{name}/...` with every part escaped.
    pub(crate) fn url(&self, parts: &[&str]) -> String {
        database_url(&self.name, parts)
    }

    pub(crate) fn conn(&self) -> &dyn Connection {
        self.connection.as_ref()
    }

    pub async fn info(&self) -> Result<DatabaseInfo> {
        let url = self.url(&["_api", "database", "current"]);
        let response = call_get(self.conn(), &url).await?;

        match response.code() {
            200 => {
                let body: ResultResponse<DatabaseInfo> = response.decode()?;
                Ok(body.result)
            }
            _ => Err(response.as_arango_error()),
        }
    }

    /// Drops the database. The handle must not be used afterwards.
    pub async fn remove(&self) -> Result<()> {
        let url = new_url(&["_api", "database", &self.name]);
        let response = call_delete(self.conn(), &url).await?;

        match response.code() {
            200 | 202 => {
                tracing::debug!(database = %self.name, "database removed");
                Ok(())
            }
            _ => Err(response.as_arango_error()),
        }
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database").field("name", &self.name).finish()
    }
}
