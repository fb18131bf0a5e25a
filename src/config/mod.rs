/// Configuration management for the Folio content backend
///
/// Handles server configuration, database location, and admin access parameters.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default request body limit for snapshot imports (16 MiB)
pub const DEFAULT_MAX_IMPORT_BYTES: usize = 16 * 1024 * 1024;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Admin area configuration
    pub admin: AdminConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Database configuration for the single site database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Directory holding the site database (default: "instance")
    /// Creates: {data_dir}/site.db
    pub data_dir: String,
}

impl DatabaseConfig {
    /// Full path of the SQLite database file
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("site.db")
    }
}

/// Admin area configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Static bearer token required on /admin routes. None leaves them open,
    /// which is only meant for running behind an authenticating proxy.
    pub token: Option<String>,
    /// Maximum accepted body size for snapshot imports
    pub max_import_bytes: usize,
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("FOLIO_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("FOLIO_PORT")
                    .unwrap_or_else(|_| "3004".to_string())
                    .parse()
                    .unwrap_or(3004),
            },
            database: DatabaseConfig {
                data_dir: std::env::var("FOLIO_DATA_DIR")
                    .unwrap_or_else(|_| "instance".to_string()),
            },
            admin: AdminConfig {
                token: std::env::var("FOLIO_ADMIN_TOKEN")
                    .ok()
                    .filter(|token| !token.trim().is_empty()),
                max_import_bytes: std::env::var("FOLIO_MAX_IMPORT_BYTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_IMPORT_BYTES),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_is_inside_data_dir() {
        let db = DatabaseConfig { data_dir: "instance".to_string() };
        assert_eq!(db.database_path(), PathBuf::from("instance").join("site.db"));
    }
}
