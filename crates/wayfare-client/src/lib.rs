//! Wayfare Client — the REST binding of `MarketplaceApi`.
//!
//! Bearer-token auth on every request; multipart encoding only when the
//! media diff actually uploads or deletes something, otherwise plain JSON.
//! That choice is a transport optimization, never a semantic difference.

mod config;
mod http;

pub use config::{ClientConfig, ConfigError};
pub use http::HttpMarketplaceApi;
