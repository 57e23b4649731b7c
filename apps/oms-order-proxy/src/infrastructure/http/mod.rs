//! Orders HTTP Endpoint
//!
//! The local surface of the proxy, consumed by the fulfillment
//! dashboard:
//!
//! - `GET /orders?startDate=YYYY-MM-DD&days=N&refresh=true|false` -
//!   `200 {total, orders, lastUpdated, message}` or
//!   `500 {error: true, message}`
//! - `GET /healthz` - liveness probe (simple OK)
//!
//! Query parameters mirror the dashboard's contract: a missing
//! `startDate` defaults to yesterday, a missing or unparseable `days`
//! falls back to the configured default, and `refresh` is true only for
//! the literal string `true`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use crate::application::services::{OrderFetchService, OrdersRequest};
use crate::domain::dates::{DateError, DateKey};
use crate::domain::orders::{ErrorResponse, OrdersResponse};

// =============================================================================
// Server State
// =============================================================================

/// Shared state for the orders server.
pub struct AppState {
    /// The fetch/caching service behind the endpoint.
    pub service: Arc<OrderFetchService>,
    /// Day count used when the request does not specify one.
    pub default_days: u32,
}

// =============================================================================
// Server
// =============================================================================

/// Orders HTTP server.
pub struct OrdersServer {
    port: u16,
    state: Arc<AppState>,
    cancel: CancellationToken,
}

impl OrdersServer {
    /// Create a new orders server.
    #[must_use]
    pub const fn new(port: u16, state: Arc<AppState>, cancel: CancellationToken) -> Self {
        Self {
            port,
            state,
            cancel,
        }
    }

    /// Build the router over the given state.
    ///
    /// The dashboard is served from a different origin, so CORS is wide
    /// open, as in the original deployment.
    #[must_use]
    pub fn router(state: Arc<AppState>) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/orders", get(orders_handler))
            .route("/healthz", get(liveness_handler))
            .layer(cors)
            .with_state(state)
    }

    /// Run the server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = Self::router(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "orders server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| ServerError::ServerFailed(e.to_string()))?;

        tracing::info!("orders server stopped");
        Ok(())
    }
}

// =============================================================================
// HTTP Handlers
// =============================================================================

/// Raw `/orders` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrdersParams {
    start_date: Option<String>,
    days: Option<String>,
    refresh: Option<String>,
}

/// Resolve raw query parameters into a service request.
fn resolve_request(params: &OrdersParams, default_days: u32) -> Result<OrdersRequest, ApiError> {
    let start = match params.start_date.as_deref() {
        Some(raw) => raw.parse::<DateKey>()?,
        None => DateKey::yesterday(),
    };

    let days = params
        .days
        .as_deref()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|days| *days >= 1)
        .unwrap_or(default_days);

    let refresh = params.refresh.as_deref() == Some("true");

    Ok(OrdersRequest {
        start,
        days,
        refresh,
    })
}

async fn orders_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OrdersParams>,
) -> Result<Json<OrdersResponse>, ApiError> {
    let request = resolve_request(&params, state.default_days)?;
    tracing::debug!(
        start = %request.start,
        days = request.days,
        refresh = request.refresh,
        "orders request"
    );
    let response = state.service.get_orders(request).await;
    Ok(Json(response))
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// =============================================================================
// Errors
// =============================================================================

/// Request-level errors surfaced through the endpoint's failure shape.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The `startDate` parameter was not a valid date.
    #[error(transparent)]
    InvalidDate(#[from] DateError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: true,
            message: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Orders server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use chrono::Utc;
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    use super::*;
    use crate::application::ports::{MockOrderSource, MockOrderStore};
    use crate::application::services::FetchPolicy;
    use crate::domain::orders::{CacheDocument, Order};

    fn state(source: MockOrderSource, store: MockOrderStore) -> Arc<AppState> {
        let service = Arc::new(OrderFetchService::new(
            Arc::new(source),
            Arc::new(store),
            FetchPolicy::default(),
        ));
        Arc::new(AppState {
            service,
            default_days: 1,
        })
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn healthz_returns_ok() {
        let router = OrdersServer::router(state(MockOrderSource::new(), MockOrderStore::new()));
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn orders_served_from_cache_with_wire_shape() {
        let mut store = MockOrderStore::new();
        let cached_at = Utc::now();
        store.expect_read().returning(move || {
            Ok(CacheDocument {
                orders: vec![Order::new(json!({"id": 1})), Order::new(json!({"id": 2}))],
                last_updated: Some(cached_at),
            })
        });

        let mut source = MockOrderSource::new();
        source.expect_fetch_page().times(0);

        let router = OrdersServer::router(state(source, store));
        let (status, body) = get_json(router, "/orders").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], json!(2));
        assert_eq!(body["orders"].as_array().unwrap().len(), 2);
        assert!(body["lastUpdated"].is_string());
        assert_eq!(body["message"], json!("Serving 2 orders from cache"));
    }

    #[tokio::test]
    async fn refresh_fetches_fresh_data() {
        let mut source = MockOrderSource::new();
        source.expect_fetch_page().returning(|_, last_id| {
            if last_id == 0 {
                Ok(vec![Order::new(json!({"id": 7}))])
            } else {
                Ok(vec![])
            }
        });

        let mut store = MockOrderStore::new();
        store.expect_read().times(0);
        store.expect_write().times(1).returning(|_| Ok(()));

        let router = OrdersServer::router(state(source, store));
        let (status, body) =
            get_json(router, "/orders?startDate=2025-07-10&days=1&refresh=true").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], json!(1));
        assert_eq!(body["message"], json!("Successfully fetched 1 orders"));
    }

    #[tokio::test]
    async fn invalid_start_date_yields_error_shape() {
        let router = OrdersServer::router(state(MockOrderSource::new(), MockOrderStore::new()));
        let (status, body) = get_json(router, "/orders?startDate=not-a-date").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], json!(true));
        assert!(body["message"].as_str().unwrap().contains("not-a-date"));
    }

    #[test]
    fn resolve_defaults_to_yesterday_and_configured_days() {
        let request = resolve_request(&OrdersParams::default(), 3).unwrap();
        assert_eq!(request.start, DateKey::yesterday());
        assert_eq!(request.days, 3);
        assert!(!request.refresh);
    }

    #[test]
    fn resolve_falls_back_on_unparseable_days() {
        for raw in ["abc", "0", "-2", ""] {
            let params = OrdersParams {
                start_date: Some("2025-07-10".to_string()),
                days: Some(raw.to_string()),
                refresh: None,
            };
            let request = resolve_request(&params, 1).unwrap();
            assert_eq!(request.days, 1, "days={raw}");
        }
    }

    #[test]
    fn resolve_refresh_only_for_literal_true() {
        for (raw, expected) in [("true", true), ("TRUE", false), ("yes", false), ("1", false)] {
            let params = OrdersParams {
                start_date: Some("2025-07-10".to_string()),
                days: None,
                refresh: Some(raw.to_string()),
            };
            assert_eq!(
                resolve_request(&params, 1).unwrap().refresh,
                expected,
                "refresh={raw}"
            );
        }
    }
}
