use std::sync::Arc;

use crate::fetch::PageFetcher;

/// Shared application state passed to all handlers.
/// The fetcher is built once at startup so its connection pool is reused.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn PageFetcher>,
}

impl AppState {
    pub fn new(fetcher: impl PageFetcher + 'static) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }
}
