//! Configuration Module
//!
//! Configuration loading for the proxy service.

mod settings;

pub use settings::{
    CacheSettings, ConfigError, Credentials, FetchSettings, ProxyConfig, ServerSettings,
    UpstreamSettings,
};
