// Runtime state module
// Shared state handed to every connection task

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use super::types::Config;

/// State shared by all connection tasks.
pub struct ServerState {
    pub config: Config,
    /// Canonicalized served root; every resolved request path must stay
    /// under it.
    pub root: PathBuf,
    /// Cached access-log flag for lock-free per-request reads.
    pub cached_access_log: AtomicBool,
}

impl ServerState {
    /// Build the shared state from a parsed config.
    ///
    /// Fails when the served root does not exist or cannot be
    /// canonicalized.
    pub fn new(config: Config) -> io::Result<Self> {
        let root = Path::new(&config.server.root).canonicalize()?;
        let cached_access_log = AtomicBool::new(config.logging.access_log);

        Ok(Self {
            config,
            root,
            cached_access_log,
        })
    }
}
