#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! OMS Order Proxy - Order Ingestion and Caching Service
//!
//! A thin HTTP proxy in front of a third-party Order Management System
//! (OMS): it serves e-commerce orders for a date window, pulling them
//! on demand via cursor-based pagination, batching per-day fetches for
//! bounded concurrency, and caching the merged result set in a single
//! local JSON file.
//!
//! # Layers (inside -> outside)
//!
//! - **Domain**: Pure types and date logic
//!   - `dates`: Date keys, range expansion, per-day fetch windows
//!   - `orders`: Opaque order payloads, cache document, response shapes
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Interfaces for the upstream order source and cache store
//!   - `services`: Pagination, batching, cache-or-fetch orchestration
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `oms`: Reqwest client for the vendor's order search endpoint
//!   - `cache`: JSON flat-file store with atomic writes
//!   - `http`: Axum server exposing `GET /orders`
//!   - `config`: Environment-variable configuration
//!   - `telemetry`: Tracing subscriber setup
//!
//! # Data Flow
//!
//! ```text
//! GET /orders ──► cache check ──► hit ─────────────────────► respond
//!                     │
//!                     └─ miss/refresh ──► date expansion
//!                                             │
//!                        OMS API ◄── batched cursor pagination
//!                                             │
//!                        cache file ◄── persist merged orders ──► respond
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Pure order and date types with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::dates::{DateError, DateKey, DayWindow, expand};
pub use domain::orders::{CacheDocument, ErrorResponse, Order, OrdersResponse};

// Ports
pub use application::ports::{OrderSource, OrderStore, SourceError, StoreError};

// Services
pub use application::services::{FetchPolicy, OrderFetchService, OrdersRequest};

// Infrastructure config
pub use infrastructure::config::{
    CacheSettings, ConfigError, Credentials, FetchSettings, ProxyConfig, ServerSettings,
    UpstreamSettings,
};

// Adapters (for integration tests and the binary)
pub use infrastructure::cache::FileOrderCache;
pub use infrastructure::http::{ApiError, AppState, OrdersServer, ServerError};
pub use infrastructure::oms::{OmsClient, OmsClientConfig, OmsClientError};
