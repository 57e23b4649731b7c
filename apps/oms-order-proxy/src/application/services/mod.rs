//! Order Fetch Orchestration
//!
//! The core of the proxy: cursor-based pagination of one day's orders,
//! batched concurrent fan-out across a date range, and the
//! cache-or-fetch state machine behind the `/orders` endpoint.
//!
//! # Failure policy
//!
//! Per-page and per-day upstream failures are logged and swallowed; a
//! day degrades to whatever was accumulated before the failure, and no
//! day's failure aborts the rest of the range. The service always
//! prefers returning partial data over failing the whole request.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;

use crate::application::ports::{OrderSource, OrderStore, SourceError};
use crate::domain::dates::{self, DateKey, DayWindow};
use crate::domain::orders::{Order, OrdersResponse};

// =============================================================================
// Policy and Request Types
// =============================================================================

/// Tunables for the fetch pipeline.
#[derive(Debug, Clone, Copy)]
pub struct FetchPolicy {
    /// Maximum day-fetches in flight at once.
    pub concurrency: usize,
    /// Maximum pages requested for a single day before giving up.
    ///
    /// Bounds the pagination loop against an upstream that never
    /// returns an empty page.
    pub max_pages_per_day: u32,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            concurrency: 5,
            max_pages_per_day: 1_000,
        }
    }
}

/// A resolved `/orders` request.
#[derive(Debug, Clone, Copy)]
pub struct OrdersRequest {
    /// First day of the requested window.
    pub start: DateKey,
    /// Number of consecutive days to fetch, at least 1.
    pub days: u32,
    /// Bypass the cache and fetch fresh data.
    pub refresh: bool,
}

// =============================================================================
// Service
// =============================================================================

/// Orchestrates order fetching, batching, and cache persistence.
pub struct OrderFetchService {
    source: Arc<dyn OrderSource>,
    store: Arc<dyn OrderStore>,
    policy: FetchPolicy,
}

impl OrderFetchService {
    /// Create a new service over an order source and cache store.
    #[must_use]
    pub fn new(source: Arc<dyn OrderSource>, store: Arc<dyn OrderStore>, policy: FetchPolicy) -> Self {
        Self {
            source,
            store,
            policy,
        }
    }

    /// Fetch all orders for one calendar day by walking the upstream
    /// cursor until an empty page.
    ///
    /// Never fails: any upstream error truncates the day and returns
    /// whatever was accumulated so far.
    pub async fn fetch_day(&self, date: DateKey) -> Vec<Order> {
        let window = DayWindow::of(date);
        let mut accumulated: Vec<Order> = Vec::new();
        let mut cursor = 0i64;
        let mut pages = 0u32;

        loop {
            if pages >= self.policy.max_pages_per_day {
                let cap = SourceError::PaginationLimitExceeded(self.policy.max_pages_per_day);
                tracing::error!(date = %date, error = %cap, "returning partial results");
                break;
            }

            let page = match self.source.fetch_page(window, cursor).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::error!(date = %date, error = %e, "upstream fetch failed, returning partial results");
                    break;
                }
            };

            if page.is_empty() {
                break;
            }

            // The last order's id becomes the next cursor. A page without
            // ids cannot advance the cursor, so stop rather than loop on
            // the same page forever.
            let Some(last_id) = page.last().and_then(Order::id) else {
                tracing::warn!(date = %date, "page has no usable order id, stopping pagination");
                accumulated.extend(page);
                break;
            };

            accumulated.extend(page);
            cursor = last_id;
            pages += 1;
        }

        tracing::debug!(date = %date, orders = accumulated.len(), pages, "day fetch complete");
        accumulated
    }

    /// Fetch a date range in batches of at most `concurrency` days.
    ///
    /// Each batch's day-fetches run concurrently and the next batch only
    /// starts once the previous one fully completes, capping in-flight
    /// upstream work. Results are concatenated in submission (date)
    /// order, never completion order.
    pub async fn fetch_range(&self, dates: &[DateKey]) -> Vec<Order> {
        let concurrency = self.policy.concurrency.max(1);
        let mut merged: Vec<Order> = Vec::new();

        for batch in dates.chunks(concurrency) {
            let results = join_all(batch.iter().map(|date| self.fetch_day(*date))).await;
            for day_orders in results {
                merged.extend(day_orders);
            }
        }

        merged
    }

    /// Serve an `/orders` request: cache check, fetch on miss or
    /// refresh, persist, respond.
    pub async fn get_orders(&self, request: OrdersRequest) -> OrdersResponse {
        if !request.refresh {
            match self.store.read().await {
                Ok(doc) if !doc.orders.is_empty() => {
                    tracing::info!(orders = doc.orders.len(), "serving orders from cache");
                    return OrdersResponse {
                        total: doc.orders.len(),
                        message: format!("Serving {} orders from cache", doc.orders.len()),
                        orders: doc.orders,
                        last_updated: doc.last_updated,
                    };
                }
                Ok(_) => tracing::debug!("cache empty, fetching fresh data"),
                Err(e) => tracing::info!(error = %e, "cache read failed, fetching fresh data"),
            }
        }

        let dates = dates::expand(request.start, request.days.max(1));
        tracing::info!(start = %request.start, days = dates.len(), "fetching fresh orders");
        let orders = self.fetch_range(&dates).await;

        let persisted = self.store.write(&orders).await;
        if let Err(e) = &persisted {
            tracing::warn!(error = %e, "orders fetched but failed to save to cache");
        }

        let mut message = format!("Successfully fetched {} orders", orders.len());
        if persisted.is_err() {
            message.push_str(" (but failed to save to cache)");
        }

        OrdersResponse {
            total: orders.len(),
            orders,
            last_updated: Some(Utc::now()),
            message,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
