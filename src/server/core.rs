//! Server startup and serve loop

use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::api;
use crate::auth::{TokenIssuer, UserStore};
use crate::config::ServerConfig;
use crate::model::artifact;
use crate::server::AppState;

pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    /// Load the model, build the user store, and bind the listener.
    ///
    /// Any failure here is fatal: the process must not start serving
    /// without a model or a listener.
    pub async fn new(config: ServerConfig) -> Self {
        let model = match artifact::load_model(&config.model.paths) {
            Ok(model) => model,
            Err(e) => {
                error!("Failed to load model artifact: {}", e);
                panic!("Server startup failed: {}", e);
            }
        };

        let users = match UserStore::from_entries(&config.users) {
            Ok(users) => users,
            Err(e) => {
                error!("Failed to build user store: {}", e);
                panic!("Server startup failed: {}", e);
            }
        };

        let tokens = TokenIssuer::new(&config.auth.token_secret, config.auth.token_ttl());

        let addr = config.server.socket_addr();
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => {
                info!("Server bound to {}", addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", addr, e);
                panic!("Server startup failed on socket {}: {}", addr, e);
            }
        };

        Self {
            listener,
            state: AppState {
                users: Arc::new(users),
                tokens: Arc::new(tokens),
                model: Arc::new(model),
                recheck_user_status: config.auth.recheck_user_status,
            },
        }
    }

    /// Serve requests until the process exits
    pub async fn start(self) {
        info!(
            "Starting coral bleaching API server ({} users, {} trees)",
            self.state.users.len(),
            self.state.model.trees.len()
        );

        let app = api::router(self.state);
        if let Err(e) = axum::serve(self.listener, app).await {
            error!("Server error: {}", e);
        }
    }
}
