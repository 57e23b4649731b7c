//! Domain Layer - Core order-ingestion types and date logic.
//!
//! This layer contains the pure types the proxy operates on. No I/O
//! happens here; everything is plain data with serialization support.

/// Calendar date keys, range expansion, and per-day fetch windows.
pub mod dates;

/// Order payloads, the cache document, and HTTP response shapes.
pub mod orders;
