//! Port Interfaces
//!
//! Defines the interfaces (ports) for external systems following the
//! Hexagonal Architecture pattern. These are the contracts that
//! infrastructure adapters must implement.
//!
//! ## Driven Ports (Outbound)
//!
//! - [`OrderSource`]: one page of the upstream OMS order search
//! - [`OrderStore`]: the persisted order cache document

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::dates::DayWindow;
use crate::domain::orders::{CacheDocument, Order};

// =============================================================================
// Errors
// =============================================================================

/// Errors from the upstream order source.
///
/// These never cross the service boundary: the paginator logs them and
/// truncates the affected day's results.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Transport-level failure (connect, timeout, etc.).
    #[error("upstream request failed: {0}")]
    Request(String),

    /// Upstream answered with a non-success HTTP status.
    #[error("upstream returned status {0}")]
    Status(u16),

    /// Response body did not match the expected envelope.
    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    /// The per-day page cap was reached before an empty page.
    #[error("pagination page cap of {0} reached before exhausting the day")]
    PaginationLimitExceeded(u32),
}

/// Errors from the order cache store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File could not be read or written.
    #[error("cache i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents are not a valid cache document.
    #[error("malformed cache document: {0}")]
    Malformed(#[from] serde_json::Error),
}

// =============================================================================
// Ports
// =============================================================================

/// One page of the upstream OMS order search.
///
/// Implementations request up to their configured page size of orders
/// whose order date falls inside `window`, starting after `last_id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Fetch a single page of orders. An empty page means the day is
    /// exhausted.
    async fn fetch_page(&self, window: DayWindow, last_id: i64) -> Result<Vec<Order>, SourceError>;
}

/// The persisted order cache document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Create the cache document if it does not exist. Idempotent and
    /// infallible: creation failure is logged and the system continues
    /// in a degraded, cache-less mode.
    async fn ensure_initialized(&self);

    /// Read the whole cache document. Failure means "no usable cache".
    async fn read(&self) -> Result<CacheDocument, StoreError>;

    /// Replace the whole cache document with `orders` and a fresh
    /// last-updated timestamp.
    async fn write(&self, orders: &[Order]) -> Result<(), StoreError>;
}
