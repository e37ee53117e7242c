use std::collections::HashMap;

use crate::database::DEFAULT_DATABASE_PATH;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Server settings resolved from `FARMSYNC_*` environment variables.
///
/// Command-line flags are applied on top by the binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub database: String,
    pub cors_origin: Option<String>,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_map(&HashMap::new())
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let values = Self::tracked_keys()
            .into_iter()
            .filter_map(|key| std::env::var(key).ok().map(|value| (key.to_string(), value)))
            .collect();
        Self::from_map(&values)
    }

    pub fn from_map(values: &HashMap<String, String>) -> Self {
        fn value(values: &HashMap<String, String>, key: &str) -> Option<String> {
            values
                .get(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        }

        fn parsed<T: std::str::FromStr>(values: &HashMap<String, String>, key: &str) -> Option<T> {
            let raw = value(values, key)?;
            match raw.parse() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    tracing::warn!("Ignoring unparseable {}={}", key, raw);
                    None
                }
            }
        }

        Self {
            bind_address: value(values, "FARMSYNC_BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port: parsed(values, "FARMSYNC_PORT").unwrap_or(DEFAULT_PORT),
            database: value(values, "FARMSYNC_DATABASE")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            cors_origin: value(values, "FARMSYNC_CORS_ORIGIN"),
            max_upload_bytes: parsed(values, "FARMSYNC_MAX_UPLOAD_BYTES")
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn with_database(mut self, database: Option<String>) -> Self {
        if let Some(database) = database {
            self.database = database;
        }
        self
    }

    pub fn with_cors_origin(mut self, cors_origin: Option<String>) -> Self {
        if cors_origin.is_some() {
            self.cors_origin = cors_origin;
        }
        self
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    fn tracked_keys() -> [&'static str; 5] {
        [
            "FARMSYNC_BIND_ADDRESS",
            "FARMSYNC_PORT",
            "FARMSYNC_DATABASE",
            "FARMSYNC_CORS_ORIGIN",
            "FARMSYNC_MAX_UPLOAD_BYTES",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.database, "farmsync.db");
        assert_eq!(config.cors_origin, None);
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn test_values_from_map() {
        let config = ServerConfig::from_map(&map(&[
            ("FARMSYNC_PORT", "8080"),
            ("FARMSYNC_DATABASE", "/var/lib/farmsync/data.db"),
            ("FARMSYNC_CORS_ORIGIN", "http://localhost:5173"),
            ("FARMSYNC_MAX_UPLOAD_BYTES", "1024"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.database, "/var/lib/farmsync/data.db");
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:5173"));
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.listen_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_blank_and_invalid_values_fall_back() {
        let config = ServerConfig::from_map(&map(&[
            ("FARMSYNC_PORT", "not-a-port"),
            ("FARMSYNC_CORS_ORIGIN", "  "),
        ]));
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.cors_origin, None);
    }

    #[test]
    fn test_cli_overrides() {
        let config = ServerConfig::from_map(&map(&[("FARMSYNC_PORT", "8080")]))
            .with_port(Some(9000))
            .with_database(None)
            .with_cors_origin(Some("*".to_string()));
        assert_eq!(config.port, 9000);
        assert_eq!(config.database, DEFAULT_DATABASE_PATH);
        assert_eq!(config.cors_origin.as_deref(), Some("*"));
    }
}
