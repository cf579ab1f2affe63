mod health;
mod url;

pub use health::health_handler;
pub use url::{missing_code_handler, redirect_handler, resolve_handler, shorten_handler};
