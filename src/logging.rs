//! Logger setup

use env_logger::{Builder, Env};

/// Initializes the global logger.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (e.g. "info") is used.
pub fn init(default_level: &str) {
    let env = Env::default().default_filter_or(default_level);
    let mut builder = Builder::from_env(env);

    // A second call keeps the first logger
    let _ = builder.try_init();
}
