//! Application Layer - Use cases and port definitions.
//!
//! This layer contains the order-fetch orchestration and the port
//! interfaces that define how it talks to the upstream OMS and the
//! local cache.

/// Port interfaces for the upstream order source and the cache store.
pub mod ports;

/// Order fetch, batching, and cache-or-fetch orchestration.
pub mod services;
