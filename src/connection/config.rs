use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::common::error::Result;
use super::http::Authentication;

/// Environment variable prefix, e.g. `ARANGO_ENDPOINT`, `ARANGO_TIMEOUT_SECS`
pub const ENV_PREFIX: &str = "ARANGO";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Takes precedence over basic credentials when set.
    pub jwt: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: "http://127.0.0.1:8529".to_string(),
            database: "_system".to_string(),
            username: None,
            password: None,
            jwt: None,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Loads defaults, then the optional TOML file, then `ARANGO_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).format(config::FileFormat::Toml));
        }
        builder = builder.add_source(config::Environment::with_prefix(env_prefix).try_parsing(true));

        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn authentication(&self) -> Authentication {
        if let Some(token) = &self.jwt {
            return Authentication::Jwt(token.clone());
        }
        match &self.username {
            Some(username) => Authentication::Basic {
                username: username.clone(),
                password: self.password.clone(),
            },
            None => Authentication::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, "http://127.0.0.1:8529");
        assert_eq!(config.database, "_system");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.authentication(), Authentication::None);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "endpoint = \"http://db.internal:8529\"\ndatabase = \"shop\"\nusername = \"root\"\npassword = \"pw\"\ntimeout_secs = 5"
        )
        .unwrap();

        let config = ClientConfig::load_with_prefix(Some(file.path()), "ARANGO_CLIENT_TEST_UNUSED").unwrap();
        assert_eq!(config.endpoint, "http://db.internal:8529");
        assert_eq!(config.database, "shop");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(
            config.authentication(),
            Authentication::Basic {
                username: "root".to_string(),
                password: Some("pw".to_string()),
            }
        );
    }

    #[test]
    fn test_jwt_wins_over_basic() {
        let config = ClientConfig {
            username: Some("root".to_string()),
            jwt: Some("token".to_string()),
            ..ClientConfig::default()
        };
        assert_eq!(config.authentication(), Authentication::Jwt("token".to_string()));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ClientConfig::load_with_prefix(
            Some(Path::new("/definitely/not/here.toml")),
            "ARANGO_CLIENT_TEST_UNUSED",
        )
        .unwrap_err();
        assert!(matches!(err, crate::common::error::ArangoError::Config(_)));
    }
}
