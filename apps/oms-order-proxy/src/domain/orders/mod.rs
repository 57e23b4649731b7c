//! Order Payloads and Persistence / Response Shapes
//!
//! Orders are opaque records owned by the upstream OMS. The proxy never
//! validates or transforms their contents; the only field it relies on
//! is the integer `id`, which upstream assigns monotonically and which
//! drives cursor pagination.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Order
// =============================================================================

/// An opaque order record as returned by the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Order(Value);

impl Order {
    /// Wrap a raw JSON payload as an order.
    #[must_use]
    pub const fn new(payload: Value) -> Self {
        Self(payload)
    }

    /// The upstream order id used as the pagination cursor, if present.
    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.0.get("id").and_then(Value::as_i64)
    }

    /// The raw payload.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.0
    }
}

// =============================================================================
// Cache Document
// =============================================================================

/// The sole contents of the flat-file order cache.
///
/// `last_updated` is `null` only before the first successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheDocument {
    /// All orders persisted by the last fetch-and-save cycle.
    pub orders: Vec<Order>,
    /// When the document was last written.
    pub last_updated: Option<DateTime<Utc>>,
}

// =============================================================================
// Response Shapes
// =============================================================================

/// Successful `/orders` response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersResponse {
    /// Number of orders returned.
    pub total: usize,
    /// The order list.
    pub orders: Vec<Order>,
    /// When the returned data was produced or last persisted.
    pub last_updated: Option<DateTime<Utc>>,
    /// Human-readable status describing which path served the request.
    pub message: String,
}

/// Failed `/orders` response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always `true` for error responses.
    pub error: bool,
    /// The error message.
    pub message: String,
}

// =============================================================================
// Tests
// =============================================================================
