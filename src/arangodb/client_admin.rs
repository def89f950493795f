use std::collections::HashMap;
use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::common::error::Result;
use crate::common::utils::new_url;
use crate::connection::{call_get, call_put, HttpMethod, Request};
use super::client::Client;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
    /// Normal operation.
    Default,
    /// Writes are rejected.
    Readonly,
}

impl fmt::Display for ServerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMode::Default => f.write_str("default"),
            ServerMode::Readonly => f.write_str("readonly"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServerStatus {
    Good,
    Bad,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Health of one server as reported by the agency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerHealth {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_heartbeat_acked: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_heartbeat_status: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub short_name: String,
    pub status: ServerStatus,
    #[serde(default)]
    pub can_be_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Cluster configuration and per-server health
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterHealth {
    #[serde(rename = "ClusterId")]
    pub id: String,
    #[serde(rename = "Health", default)]
    pub health: HashMap<String, ServerHealth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ServerModeBody {
    mode: ServerMode,
}

/// Log level per topic, e.g. `{"general": "INFO", "requests": "DEBUG"}`
pub type LogLevels = HashMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogLevelsGetOptions {
    /// Ask a specific server of the cluster.
    pub server_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogLevelsSetOptions {
    pub server_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseStatus {
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "expiring")]
    Expiring,
    #[serde(rename = "expired")]
    Expired,
    #[serde(rename = "read-only")]
    ReadOnly,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseFeatures {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub features: LicenseFeatures,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub version: u32,
    pub status: LicenseStatus,
    #[serde(default)]
    pub hash: String,
}

fn with_server_id(request: Request, server_id: Option<&str>) -> Request {
    match server_id {
        Some(server_id) => request.with_query("serverId", server_id),
        None => request,
    }
}

impl Client {
    /// Cluster health. Only available on coordinators and in active failover.
    pub async fn health(&self) -> Result<ClusterHealth> {
        let url = new_url(&["_admin", "cluster", "health"]);
        let response = call_get(self.conn(), &url).await?;

        match response.code() {
            200 => response.decode(),
            _ => Err(response.as_arango_error()),
        }
    }

    pub async fn server_mode(&self) -> Result<ServerMode> {
        let url = new_url(&["_admin", "server", "mode"]);
        let response = call_get(self.conn(), &url).await?;

        match response.code() {
            200 => {
                let body: ServerModeBody = response.decode()?;
                Ok(body.mode)
            }
            _ => Err(response.as_arango_error()),
        }
    }

    /// Needs a JWT-authenticated connection.
    pub async fn set_server_mode(&self, mode: ServerMode) -> Result<()> {
        let url = new_url(&["_admin", "server", "mode"]);
        let response = call_put(self.conn(), &url, &ServerModeBody { mode }).await?;

        match response.code() {
            200 => {
                tracing::info!(%mode, "server mode changed");
                Ok(())
            }
            _ => Err(response.as_arango_error()),
        }
    }

    pub async fn get_log_levels(&self, options: Option<&LogLevelsGetOptions>) -> Result<LogLevels> {
        let url = new_url(&["_admin", "log", "level"]);
        let server_id = options.and_then(|o| o.server_id.as_deref());
        let request = with_server_id(Request::new(HttpMethod::GET, url), server_id);
        let response = self.conn().call(request).await?;

        match response.code() {
            200 => response.decode(),
            _ => Err(response.as_arango_error()),
        }
    }

    pub async fn set_log_levels(&self, levels: &LogLevels, options: Option<&LogLevelsSetOptions>) -> Result<()> {
        let url = new_url(&["_admin", "log", "level"]);
        let server_id = options.and_then(|o| o.server_id.as_deref());
        let request = with_server_id(Request::new(HttpMethod::PUT, url), server_id).with_json_body(levels)?;
        let response = self.conn().call(request).await?;

        match response.code() {
            200 => Ok(()),
            _ => Err(response.as_arango_error()),
        }
    }

    pub async fn get_license(&self) -> Result<License> {
        let url = new_url(&["_admin", "license"]);
        let response = call_get(self.conn(), &url).await?;

        match response.code() {
            200 => response.decode(),
            _ => Err(response.as_arango_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use chrono::TimeZone;
    use crate::connection::mock::MockConnection;
    use serde_json::json;

    fn client(mock: &Arc<MockConnection>) -> Client {
        Client::from_connection(mock.clone())
    }

    #[tokio::test]
    async fn test_health() {
        let mock = Arc::new(MockConnection::new());
        mock.on(
            HttpMethod::GET,
            "/_admin/cluster/health",
            200,
            json!({
                "error": false,
                "code": 200,
                "ClusterId": "c0ffee",
                "Health": {
                    "PRMR-1": {"Endpoint": "tcp://[::1]:8629", "Role": "DBServer", "ShortName": "DBServer0001",
                               "Status": "GOOD", "CanBeDeleted": false, "Version": "3.11.4"},
                    "CRDN-1": {"Endpoint": "tcp://[::1]:8529", "Role": "Coordinator", "ShortName": "Coordinator0001",
                               "Status": "WHATEVER"}
                }
            }),
        );

        let health = client(&mock).health().await.unwrap();
        assert_eq!(health.id, "c0ffee");
        assert_eq!(health.health["PRMR-1"].status, ServerStatus::Good);
        assert_eq!(health.health["PRMR-1"].version.as_deref(), Some("3.11.4"));
        assert_eq!(health.health["CRDN-1"].status, ServerStatus::Unknown);
    }

    #[tokio::test]
    async fn test_server_mode() {
        let mock = Arc::new(MockConnection::new());
        mock.on(HttpMethod::GET, "/_admin/server/mode", 200, json!({"mode": "readonly"}));
        mock.on(HttpMethod::PUT, "/_admin/server/mode", 200, json!({"mode": "default"}));

        let client = client(&mock);
        assert_eq!(client.server_mode().await.unwrap(), ServerMode::Readonly);
        client.set_server_mode(ServerMode::Default).await.unwrap();
        assert_eq!(mock.last_request().json_body(), Some(json!({"mode": "default"})));
    }

    #[tokio::test]
    async fn test_set_server_mode_forbidden() {
        let mock = Arc::new(MockConnection::new());
        mock.on_error(HttpMethod::PUT, "/_admin/server/mode", 403, 11, "forbidden");

        let err = client(&mock).set_server_mode(ServerMode::Readonly).await.unwrap_err();
        assert_eq!(err.http_code(), Some(403));
    }

    #[tokio::test]
    async fn test_log_levels_with_server_id() {
        let mock = Arc::new(MockConnection::new());
        mock.on(HttpMethod::GET, "/_admin/log/level", 200, json!({"general": "INFO", "requests": "DEBUG"}));
        mock.on(HttpMethod::PUT, "/_admin/log/level", 200, json!({"general": "WARNING"}));

        let client = client(&mock);
        let options = LogLevelsGetOptions {
            server_id: Some("PRMR-1".to_string()),
        };
        let levels = client.get_log_levels(Some(&options)).await.unwrap();
        assert_eq!(levels["requests"], "DEBUG");
        assert_eq!(mock.last_request().get_query_param("serverId"), Some("PRMR-1"));

        let mut update = LogLevels::new();
        update.insert("general".to_string(), "WARNING".to_string());
        client.set_log_levels(&update, None).await.unwrap();
        let request = mock.last_request();
        assert_eq!(request.get_query_param("serverId"), None);
        assert_eq!(request.json_body(), Some(json!({"general": "WARNING"})));
    }

    #[tokio::test]
    async fn test_license() {
        let mock = Arc::new(MockConnection::new());
        mock.on(
            HttpMethod::GET,
            "/_admin/license",
            200,
            json!({
                "features": {"expires": 1735689600},
                "license": "JD4E...",
                "version": 1,
                "status": "read-only",
                "hash": "abc"
            }),
        );

        let license = client(&mock).get_license().await.unwrap();
        assert_eq!(license.status, LicenseStatus::ReadOnly);
        assert_eq!(license.features.expires, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }
}
