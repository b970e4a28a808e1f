//! Database and server configuration
//!
//! Values come from the binary's argument/environment parsing; this module
//! only validates them and turns them into sqlx connection options.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Default Postgres port
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Default HTTP listening port
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration error
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// How the database server certificate is checked.
///
/// Transport is encrypted in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsPolicy {
    /// Verify the certificate chain and host name
    #[default]
    Verified,
    /// Encrypt but accept self-signed or otherwise unverified certificates
    AcceptInvalidCerts,
}

impl TlsPolicy {
    pub fn from_flag(accept_invalid_certs: bool) -> Self {
        if accept_invalid_certs {
            Self::AcceptInvalidCerts
        } else {
            Self::Verified
        }
    }

    pub fn ssl_mode(&self) -> PgSslMode {
        match self {
            Self::Verified => PgSslMode::VerifyFull,
            Self::AcceptInvalidCerts => PgSslMode::Require,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verify-full",
            Self::AcceptInvalidCerts => "require (certificate not verified)",
        }
    }
}

/// Connection settings for the Postgres pool
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub tls: TlsPolicy,
    /// CA bundle used to verify the server certificate
    pub root_cert: Option<PathBuf>,
}

impl DatabaseConfig {
    /// Check required fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Missing("DB_HOST"));
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError::Missing("DB_NAME"));
        }
        if self.user.trim().is_empty() {
            return Err(ConfigError::Missing("DB_USER"));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Zero("DB_MAX_CONNECTIONS"));
        }
        Ok(())
    }

    /// Build sqlx connection options, always with an encrypted transport.
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
            .ssl_mode(self.tls.ssl_mode())
            .application_name("actionplan");

        if let Some(root_cert) = &self.root_cert {
            options = options.ssl_root_cert(root_cert);
        }

        options
    }
}

// Keep the password out of logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .field("max_connections", &self.max_connections)
            .field("tls", &self.tls)
            .field("root_cert", &self.root_cert)
            .finish()
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:5000)
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_HTTP_PORT)),
        }
    }
}

impl ServerConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
        }
    }
}
