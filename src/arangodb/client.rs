use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use crate::common::error::Result;
use crate::common::response::{ResponseEnvelope, ResultResponse};
use crate::common::utils::{database_url, new_url};
use crate::connection::{call_get, call_post, ClientConfig, Connection, HttpConnection};
use super::database::Database;

/// Answer of `/_api/version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub server: String,
    pub version: String,
    #[serde(default)]
    pub license: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, String>>,
}

impl VersionInfo {
    pub fn is_enterprise(&self) -> bool {
        self.license == "enterprise"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseUserOptions {
    pub username: String,
    #[serde(rename = "passwd", default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseDefaultOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_factor: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_concern: Option<u64>,
    /// `""`, `"flexible"` or `"single"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharding: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateDatabaseOptions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<CreateDatabaseUserOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<CreateDatabaseDefaultOptions>,
}

#[derive(Serialize)]
struct CreateDatabaseRequest<'a> {
    name: &'a str,
    #[serde(flatten)]
    options: Option<&'a CreateDatabaseOptions>,
}

/// Entry point of the client. Owns the shared connection every handle uses.
#[derive(Clone)]
pub struct Client {
    connection: Arc<dyn Connection>,
}

impl Client {
    pub fn new(connection: impl Connection + 'static) -> Self {
        Client {
            connection: Arc::new(connection),
        }
    }

    pub fn from_connection(connection: Arc<dyn Connection>) -> Self {
        Client { connection }
    }

    /// Builds an HTTP client from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Client::new(HttpConnection::from_config(config)?))
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    pub(crate) fn conn(&self) -> &dyn Connection {
        self.connection.as_ref()
    }

    pub async fn version(&self) -> Result<VersionInfo> {
        let url = new_url(&["_api", "version"]);
        let response = call_get(self.conn(), &url).await?;

        match response.code() {
            200 => {
                let body: ResponseEnvelope<VersionInfo> = response.decode()?;
                Ok(body.payload)
            }
            _ => Err(response.as_arango_error()),
        }
    }

    /// Opens an existing database; not-found if it does not exist.
    pub async fn database(&self, name: &str) -> Result<Database> {
        let url = database_url(name, &["_api", "database", "current"]);
        let response = call_get(self.conn(), &url).await?;

        match response.code() {
            200 => Ok(Database::new(name, self.connection.clone())),
            _ => Err(response.as_arango_error()),
        }
    }

    pub async fn database_exists(&self, name: &str) -> Result<bool> {
        match self.database(name).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// All databases on the server. Needs access to `_system`.
    pub async fn databases(&self) -> Result<Vec<Database>> {
        self.list_databases(&["_api", "database"]).await
    }

    /// Databases the current user can access.
    pub async fn accessible_databases(&self) -> Result<Vec<Database>> {
        self.list_databases(&["_api", "database", "user"]).await
    }

    async fn list_databases(&self, parts: &[&str]) -> Result<Vec<Database>> {
        let url = new_url(parts);
        let response = call_get(self.conn(), &url).await?;

        match response.code() {
            200 => {
                let body: ResultResponse<Vec<String>> = response.decode()?;
                Ok(body
                    .result
                    .into_iter()
                    .map(|name| Database::new(name, self.connection.clone()))
                    .collect())
            }
            _ => Err(response.as_arango_error()),
        }
    }

    /// Creates a database; conflict if the name is taken.
    pub async fn create_database(&self, name: &str, options: Option<&CreateDatabaseOptions>) -> Result<Database> {
        let url = new_url(&["_api", "database"]);
        let request = CreateDatabaseRequest { name, options };
        let response = call_post(self.conn(), &url, &request).await?;

        match response.code() {
            201 => {
                tracing::debug!(database = name, "database created");
                Ok(Database::new(name, self.connection.clone()))
            }
            _ => Err(response.as_arango_error()),
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("connection", &self.connection)
            .finish()
    }
}
