//! Unified logging init (§10). `tracing` + `tracing-subscriber` with an
//! `EnvFilter`, initialized once via [`std::sync::Once`]. `RUST_LOG`
//! takes precedence when set; otherwise defaults to `warn` so a normal
//! scan stays quiet and every skipped file/scanner still surfaces at
//! `WARN` (§7).

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize logging. Safe to call more than once — only the first call
/// takes effect.
pub fn init() {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new("warn")
        };

        tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
    });
}
