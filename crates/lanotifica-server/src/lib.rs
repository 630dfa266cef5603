//! Relay: notification registry, desktop backend, mDNS advertiser, HTTP routes.
//!
//! This crate provides everything the `lanotifica` binary runs:
//! - [`NotificationRegistry`] tracking which keyed notifications are on screen
//! - [`DesktopBackend`] talking to the freedesktop notification service
//! - [`Advertiser`] publishing the relay over mDNS/DNS-SD
//! - [`HttpServer`] exposing send/dismiss/health over HTTP
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use lanotifica_core::NoIcons;
//! use lanotifica_server::{AppState, DesktopBackend, HttpServer, NotificationRegistry, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let registry = NotificationRegistry::new(Arc::new(DesktopBackend::new()), Arc::new(NoIcons));
//!     let server = HttpServer::bind(config.bind_addr()?, AppState::new(registry)).await?;
//!     server.run_until_shutdown(std::future::pending()).await?;
//!     Ok(())
//! }
//! ```

mod backend;
mod config;
mod discovery;
mod error;
mod http;
mod registry;
mod signals;

#[cfg(test)]
mod testing;

pub use backend::{BackendError, DesktopBackend, NotificationBackend, NotificationId};
pub use config::{DEFAULT_LISTEN, ServerConfig, default_instance_name, local_hostname};
pub use discovery::{
    Advertiser, AdvertiserStatus, DiscoveryTransport, MdnsTransport, Publication, SERVICE_TYPE,
    ServiceRecord, parse_port,
};
pub use error::{ServerError, ServerResult};
pub use http::{AppState, HttpServer, router};
pub use registry::{NotificationRegistry, presentation_for};
pub use signals::{ShutdownSignal, SignalHandler};
