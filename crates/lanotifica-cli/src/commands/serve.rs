//! Serve command: runs the relay in the foreground.
//!
//! Startup order:
//! - signal handler (SIGTERM/SIGINT for shutdown)
//! - notification registry over the desktop backend
//! - HTTP listener
//! - mDNS advertisement of the bound port

use std::sync::Arc;

use tracing::{info, warn};

use lanotifica_core::{IconCache, IconResolver, NoIcons};
use lanotifica_server::{
    Advertiser, AppState, DesktopBackend, HttpServer, MdnsTransport, NotificationRegistry,
    ServerConfig, SignalHandler,
};

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Runs the relay until a shutdown signal is received.
pub async fn run(config: &ClientConfig) -> ClientResult<()> {
    let server_config = config.server_config();
    let bind_addr = server_config.bind_addr()?;

    // 1. Signal handler
    let signal_handler = SignalHandler::new();
    signal_handler.spawn_listener();

    // 2. Registry
    let registry = NotificationRegistry::new(Arc::new(DesktopBackend::new()), icons(&server_config));

    // 3. HTTP listener
    let server = HttpServer::bind(bind_addr, AppState::new(registry)).await?;

    // 4. Advertisement
    let advertiser = Arc::new(Advertiser::new(
        Arc::new(MdnsTransport),
        &server_config.service_type,
        &server_config.instance_name,
        &server_config.host_name,
    ));
    if server_config.advertise {
        start_advertising(&advertiser, &server_config).await;
    } else {
        info!("mDNS advertisement disabled");
    }

    let result = server.run_until_shutdown(signal_handler.shutdown().wait()).await;

    info!("Shutting down...");
    let stopping = advertiser.clone();
    match tokio::task::spawn_blocking(move || stopping.stop()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Failed to withdraw mDNS advertisement"),
        Err(e) => warn!(error = %e, "mDNS withdrawal task failed"),
    }

    result?;
    info!("Relay stopped");
    Ok(())
}

fn icons(config: &ServerConfig) -> Arc<dyn IconResolver> {
    match config.icon_dir {
        Some(ref dir) => {
            let cache = IconCache::new(dir);
            info!(dir = %cache.dir().display(), "Resolving app icons");
            Arc::new(cache)
        }
        None => Arc::new(NoIcons),
    }
}

/// A failed advertisement leaves the relay reachable by address only.
async fn start_advertising(advertiser: &Arc<Advertiser>, config: &ServerConfig) {
    let port = match config.advertised_port() {
        Ok(port) => port,
        Err(e) => {
            warn!(
                listen = %config.listen,
                error = %e,
                "Listen address is not a bare port, mDNS advertisement disabled"
            );
            return;
        }
    };

    let starting = advertiser.clone();
    match tokio::task::spawn_blocking(move || starting.start(port)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Failed to advertise relay over mDNS"),
        Err(e) => warn!(error = %e, "mDNS advertisement task failed"),
    }
}
