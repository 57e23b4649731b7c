//! OMS Order Proxy Binary
//!
//! Starts the order ingestion proxy.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin oms-order-proxy
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `OMS_TOKEN`: Upstream OMS bearer token
//! - `OMS_CID`: Upstream OMS client id
//!
//! ## Optional
//! - `OMS_BASE_URL`: Order search endpoint (default: vendor production URL)
//! - `ORDER_PROXY_HTTP_PORT`: HTTP port (default: 8080)
//! - `ORDER_PROXY_CONCURRENCY`: Concurrent day-fetches (default: 5)
//! - `ORDER_PROXY_PAGE_SIZE`: Orders per pagination page (default: 100)
//! - `ORDER_PROXY_REQUEST_TIMEOUT_MS`: Upstream request timeout (default: 10000)
//! - `ORDER_PROXY_DEFAULT_DAYS`: Default day count per request (default: 1)
//! - `ORDER_PROXY_MAX_PAGES_PER_DAY`: Per-day page cap (default: 1000)
//! - `ORDER_PROXY_CACHE_PATH`: Cache file path (default: orders_data.json)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use oms_order_proxy::application::ports::{OrderSource, OrderStore};
use oms_order_proxy::application::services::{FetchPolicy, OrderFetchService};
use oms_order_proxy::infrastructure::cache::FileOrderCache;
use oms_order_proxy::infrastructure::config::ProxyConfig;
use oms_order_proxy::infrastructure::http::{AppState, OrdersServer};
use oms_order_proxy::infrastructure::oms::{OmsClient, OmsClientConfig};
use oms_order_proxy::infrastructure::telemetry;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    telemetry::init();

    tracing::info!("Starting OMS order proxy");

    let config = ProxyConfig::from_env()?;
    log_config(&config);

    let shutdown_token = CancellationToken::new();

    let source: Arc<dyn OrderSource> = Arc::new(OmsClient::new(OmsClientConfig {
        base_url: config.upstream.base_url.clone(),
        credentials: config.credentials.clone(),
        page_size: config.upstream.page_size,
        request_timeout: config.upstream.request_timeout,
    })?);

    let store: Arc<dyn OrderStore> = Arc::new(FileOrderCache::new(config.cache.path.clone()));
    store.ensure_initialized().await;

    let service = Arc::new(OrderFetchService::new(
        source,
        store,
        FetchPolicy {
            concurrency: config.fetch.concurrency,
            max_pages_per_day: config.fetch.max_pages_per_day,
        },
    ));

    let state = Arc::new(AppState {
        service,
        default_days: config.fetch.default_days,
    });

    let server = OrdersServer::new(config.server.http_port, state, shutdown_token.clone());

    // Signal handling cancels the token, which drains the server.
    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        await_shutdown(signal_token).await;
    });

    tracing::info!("Order proxy ready");
    server.run().await?;

    tracing::info!("Order proxy stopped");
    Ok(())
}

/// Log the parsed configuration.
fn log_config(config: &ProxyConfig) {
    tracing::info!(
        http_port = config.server.http_port,
        concurrency = config.fetch.concurrency,
        page_size = config.upstream.page_size,
        default_days = config.fetch.default_days,
        max_pages_per_day = config.fetch.max_pages_per_day,
        cache_path = %config.cache.path.display(),
        "Configuration loaded"
    );
    tracing::debug!(base_url = %config.upstream.base_url, "Upstream endpoint");
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT), then cancel the token.
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
