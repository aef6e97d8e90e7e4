//! Coral Bleaching API Server - Entry Point
//!
//! Serves a pre-trained coral bleaching classifier behind a small
//! authenticated HTTP API.

use log::info;

use coral_server::Server;
use coral_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    info!("Launching coral bleaching API server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => panic!("Invalid configuration: {}", e),
    };

    let server = Server::new(config).await;
    server.start().await;
}
