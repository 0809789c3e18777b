//! Server module
//!
//! Owns the listening socket and the accept loop.

mod connection;
mod listener;

pub use listener::create_listener;

use std::path::Path;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{Config, ServerState};
use crate::logger;

/// The static file server: shared state plus the accept loop.
pub struct StaticServer {
    state: Arc<ServerState>,
}

impl StaticServer {
    /// Create a server for the given configuration.
    ///
    /// Fails when the served root does not exist.
    pub fn new(config: Config) -> std::io::Result<Self> {
        Ok(Self {
            state: Arc::new(ServerState::new(config)?),
        })
    }

    /// Canonicalized served root.
    pub fn root(&self) -> &Path {
        &self.state.root
    }

    /// Accept connections until the process is terminated externally.
    ///
    /// Each connection is served on its own task; a failed accept is
    /// logged and the loop keeps going.
    pub async fn run(&self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            match listener.accept().await {
                Ok((stream, peer_addr)) => {
                    connection::accept_connection(stream, peer_addr, &self.state);
                }
                Err(e) => {
                    logger::log_error(&format!("Failed to accept connection: {e}"));
                }
            }
        }
    }
}
