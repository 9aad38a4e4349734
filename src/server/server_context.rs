use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::cache::lru_store::LruStore;

/// Store and shutdown token shared by the server runtime; the store outlives
/// every session and is handed to them by reference.
pub struct ServerContext {
    cancellation_token: CancellationToken,
    store: Arc<LruStore>,
}

impl ServerContext {
    pub fn new(memory_limit: u64) -> Self {
        ServerContext {
            cancellation_token: CancellationToken::new(),
            store: Arc::new(LruStore::new(memory_limit)),
        }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn store(&self) -> Arc<LruStore> {
        self.store.clone()
    }
}
