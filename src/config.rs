/// Configuration management for the admin console
use crate::error::{ConsoleError, ConsoleResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Document store backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreBackend {
    /// On-disk SQLite rendering of the document store
    Sqlite { db_path: PathBuf },
    /// Index-less in-memory store, handy for demos and smoke tests
    Memory,
}

/// Main console configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    pub hostname: String,
    pub port: u16,
    pub store: StoreBackend,
    pub jwt_secret: String,
    pub admin_id: String,
    pub admin_email: String,
    /// Hex SHA-256 digest of the operator password
    pub admin_password_sha256: String,
    pub session_ttl_hours: i64,
    pub log_level: String,
}

impl ConsoleConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ConsoleResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("CONSOLE_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("CONSOLE_PORT")
            .unwrap_or_else(|_| "8600".to_string())
            .parse()
            .map_err(|_| ConsoleError::Config("Invalid port number".to_string()))?;

        let store = match env::var("CONSOLE_STORE")
            .unwrap_or_else(|_| "sqlite".to_string())
            .to_lowercase()
            .as_str()
        {
            "sqlite" => StoreBackend::Sqlite {
                db_path: env::var("CONSOLE_DB_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./data/console.db")),
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConsoleError::Config(format!(
                    "Unknown store backend: {}",
                    other
                )))
            }
        };

        let jwt_secret = env::var("CONSOLE_JWT_SECRET")
            .map_err(|_| ConsoleError::Config("CONSOLE_JWT_SECRET required".to_string()))?;

        let admin_id = env::var("CONSOLE_ADMIN_ID").unwrap_or_else(|_| "admin".to_string());
        let admin_email = env::var("CONSOLE_ADMIN_EMAIL")
            .unwrap_or_else(|_| "admin@kaarigar360.com".to_string());
        let admin_password_sha256 = env::var("CONSOLE_ADMIN_PASSWORD_SHA256").map_err(|_| {
            ConsoleError::Config("CONSOLE_ADMIN_PASSWORD_SHA256 required".to_string())
        })?;

        let session_ttl_hours = env::var("CONSOLE_SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "12".to_string())
            .parse()
            .unwrap_or(12);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ConsoleConfig {
            hostname,
            port,
            store,
            jwt_secret,
            admin_id,
            admin_email,
            admin_password_sha256,
            session_ttl_hours,
            log_level,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ConsoleResult<()> {
        if self.hostname.is_empty() {
            return Err(ConsoleError::Config("Hostname cannot be empty".to_string()));
        }

        if self.jwt_secret.len() < 32 {
            return Err(ConsoleError::Config(
                "JWT secret must be at least 32 characters".to_string(),
            ));
        }

        if !self.admin_email.contains('@') {
            return Err(ConsoleError::Config(
                "Admin email must be a valid address".to_string(),
            ));
        }

        if self.admin_password_sha256.len() != 64
            || !self
                .admin_password_sha256
                .chars()
                .all(|c| c.is_ascii_hexdigit())
        {
            return Err(ConsoleError::Config(
                "Admin password digest must be 64 hex characters".to_string(),
            ));
        }

        if self.session_ttl_hours <= 0 {
            return Err(ConsoleError::Config(
                "Session TTL must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
