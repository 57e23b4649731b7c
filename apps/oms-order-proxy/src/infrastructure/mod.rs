//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port
//! interfaces defined in the application layer.

/// Flat-file JSON order cache.
pub mod cache;

/// Configuration loading from environment variables.
pub mod config;

/// HTTP surface exposing the orders endpoint.
pub mod http;

/// Upstream OMS API client.
pub mod oms;

/// Tracing subscriber initialization.
pub mod telemetry;
