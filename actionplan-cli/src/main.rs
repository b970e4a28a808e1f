//! actionplan: serve the Action Plan read API
//!
//! Settings are read from flags, then the environment, then a `.env` file in
//! the working directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use actionplan_server::config::{
    DatabaseConfig, ServerConfig, TlsPolicy, DEFAULT_DB_PORT, DEFAULT_HTTP_PORT,
    DEFAULT_MAX_CONNECTIONS,
};

mod tracing_setup;

use tracing_setup::TracingConfig;

/// Read-only HTTP API over the Action Plan subjects and actions database
#[derive(Parser, Debug)]
#[command(name = "actionplan", version, about)]
struct Cli {
    /// HTTP port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = DEFAULT_HTTP_PORT)]
    port: u16,

    /// Database host
    #[arg(long, env = "DB_HOST")]
    db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = DEFAULT_DB_PORT)]
    db_port: u16,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    db_name: String,

    /// Database user
    #[arg(long, env = "DB_USER")]
    db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    db_password: String,

    /// Maximum pooled database connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    db_max_connections: u32,

    /// Encrypt the database connection without verifying the server certificate
    #[arg(long, env = "DB_SSL_ACCEPT_INVALID_CERTS")]
    db_ssl_accept_invalid_certs: bool,

    /// CA bundle used to verify the database server certificate
    #[arg(long, env = "DB_SSL_ROOT_CERT")]
    db_ssl_root_cert: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn server_config(&self) -> ServerConfig {
        ServerConfig::with_port(self.port)
    }

    fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            database: self.db_name.clone(),
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            max_connections: self.db_max_connections,
            tls: TlsPolicy::from_flag(self.db_ssl_accept_invalid_certs),
            root_cert: self.db_ssl_root_cert.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is fine; the environment may already be set
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();
    tracing::info!("Starting Action Plan API on port {}", cli.port);

    actionplan_server::serve(cli.server_config(), cli.database_config())
        .await
        .context("Server error")?;

    Ok(())
}
