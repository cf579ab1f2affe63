use std::sync::Arc;

use crate::client::ShortenerClient;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn ShortenerClient>,
}

impl AppState {
    pub fn new(shortener: Arc<dyn ShortenerClient>) -> Self {
        Self { shortener }
    }

    pub fn shortener(&self) -> &dyn ShortenerClient {
        self.shortener.as_ref()
    }
}
