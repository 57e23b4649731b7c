//! Tracing Initialization
//!
//! Sets up the global tracing subscriber with an env-filter and a
//! formatted output layer.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter (default: `oms_order_proxy=info,tower_http=info,hyper=warn`)

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter directives when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVES: &str = "oms_order_proxy=info,tower_http=info,hyper=warn";

/// Initialize the tracing subscriber.
///
/// Call once at startup; later calls are ignored.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}
