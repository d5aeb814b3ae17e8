//! CLI command implementations.

use std::net::SocketAddr;

use color_eyre::eyre::Result;

use cluebase_db::{Database, DbConfig};
use cluebase_server::{Server, ServerConfig};

use crate::config::Config;

/// Start the API server.
pub async fn serve(host: Option<String>, port: Option<u16>, cors: bool) -> Result<()> {
    let cfg = Config::load();
    let host = host.unwrap_or(cfg.server_host);
    let port = port.unwrap_or(cfg.server_port);

    // Database settings are required; refuse to serve without them.
    let db_config = DbConfig::from_env()?;
    let db = Database::connect(&db_config).await?;

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let server_config = ServerConfig::builder().addr(addr).cors(cors).build();

    Server::new(server_config, db).run().await?;

    Ok(())
}

/// Display version information.
pub fn version() {
    println!("Cluebase {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Components:");
    println!("  cluebase-core    - Shared types and errors");
    println!("  cluebase-db      - Pooled database access");
    println!("  cluebase-server  - HTTP API server");
}
