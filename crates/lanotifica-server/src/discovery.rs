//! mDNS/DNS-SD advertisement of the relay.
//!
//! Clients browse for [`SERVICE_TYPE`] and connect to the advertised host and
//! port. The [`Advertiser`] owns the advertisement lifecycle:
//!
//! ```text
//! Unstarted --start--> Running --stop--> Stopped
//!     |                                    ^  |
//!     +---------------stop-----------------+  +--start--> Running
//! ```
//!
//! `stop` is always safe to call, so shutdown paths call it unconditionally.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use mdns_sd::{ServiceDaemon, ServiceInfo};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::{ServerError, ServerResult};
use lanotifica_protocol::NOTIFICATION_PATH;

/// DNS-SD service type of the relay.
pub const SERVICE_TYPE: &str = "_lanotifica._tcp.local.";

/// How long to wait for the daemon to confirm an unregistration.
const UNREGISTER_TIMEOUT: Duration = Duration::from_secs(1);

/// Parses `"19420"` or `":19420"` into a port number.
///
/// A single leading colon is stripped; the rest must be base-10 digits
/// naming a port between 1 and 65535.
pub fn parse_port(spec: &str) -> ServerResult<u16> {
    let digits = spec.strip_prefix(':').unwrap_or(spec);

    if digits.is_empty() {
        return Err(ServerError::invalid_port_spec(spec, "missing port number"));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ServerError::invalid_port_spec(
            spec,
            "port must be a base-10 integer",
        ));
    }

    match digits.parse::<u16>() {
        Ok(0) | Err(_) => Err(ServerError::invalid_port_spec(
            spec,
            "port must be between 1 and 65535",
        )),
        Ok(port) => Ok(port),
    }
}

/// What gets published on the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    /// Fully qualified service type, e.g. `_lanotifica._tcp.local.`.
    pub service_type: String,
    /// Instance label shown to browsing clients.
    pub instance_name: String,
    /// Host name ending in `.local.`.
    pub host_name: String,
    /// Port the relay listens on.
    pub port: u16,
    /// TXT record entries.
    pub properties: HashMap<String, String>,
}

impl ServiceRecord {
    /// Creates a record with the default TXT entries.
    pub fn new(
        service_type: impl Into<String>,
        instance_name: impl Into<String>,
        host: &str,
        port: u16,
    ) -> Self {
        let bare = host.trim_end_matches('.');
        let bare = bare.strip_suffix(".local").unwrap_or(bare);
        let host_name = format!("{}.local.", bare);

        let properties = HashMap::from([
            ("version".to_string(), env!("CARGO_PKG_VERSION").to_string()),
            ("path".to_string(), NOTIFICATION_PATH.to_string()),
        ]);

        Self {
            service_type: service_type.into(),
            instance_name: instance_name.into(),
            host_name,
            port,
            properties,
        }
    }

    /// Converts the record to an mDNS service description with automatic
    /// interface addresses.
    pub fn to_service_info(&self) -> ServerResult<ServiceInfo> {
        let info = ServiceInfo::new(
            &self.service_type,
            &self.instance_name,
            &self.host_name,
            "",
            self.port,
            self.properties.clone(),
        )
        .map_err(|e| ServerError::discovery(format!("invalid service record: {}", e)))?;
        Ok(info.enable_addr_auto())
    }
}

/// A live advertisement.
pub trait Publication: Send {
    /// Removes the advertisement from the network.
    fn withdraw(self: Box<Self>) -> ServerResult<()>;
}

/// Publishes service records on the local network.
pub trait DiscoveryTransport: Send + Sync {
    /// Registers `record`. Returns once the record is registered; the
    /// transport keeps announcing it in the background.
    fn publish(&self, record: &ServiceRecord) -> ServerResult<Box<dyn Publication>>;
}

/// Transport backed by an `mdns-sd` daemon thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct MdnsTransport;

struct MdnsPublication {
    daemon: ServiceDaemon,
    fullname: String,
}

impl DiscoveryTransport for MdnsTransport {
    fn publish(&self, record: &ServiceRecord) -> ServerResult<Box<dyn Publication>> {
        let info = record.to_service_info()?;
        let fullname = info.get_fullname().to_string();

        let daemon = ServiceDaemon::new()
            .map_err(|e| ServerError::discovery(format!("failed to start mDNS daemon: {}", e)))?;
        if let Err(e) = daemon.register(info) {
            let _ = daemon.shutdown();
            return Err(ServerError::discovery(format!(
                "failed to register {}: {}",
                fullname, e
            )));
        }

        debug!(fullname = %fullname, "Registered mDNS service");
        Ok(Box::new(MdnsPublication { daemon, fullname }))
    }
}

impl Publication for MdnsPublication {
    fn withdraw(self: Box<Self>) -> ServerResult<()> {
        let unregistered = self
            .daemon
            .unregister(&self.fullname)
            .map_err(|e| ServerError::discovery(format!("failed to unregister: {}", e)));

        match &unregistered {
            Ok(receiver) => match receiver.recv_timeout(UNREGISTER_TIMEOUT) {
                Ok(status) => debug!(fullname = %self.fullname, ?status, "Unregistered mDNS service"),
                Err(e) => warn!(fullname = %self.fullname, error = %e, "No unregister confirmation"),
            },
            Err(e) => warn!(error = %e, "Failed to unregister mDNS service"),
        }

        self.daemon
            .shutdown()
            .map_err(|e| ServerError::discovery(format!("failed to stop mDNS daemon: {}", e)))?;
        unregistered.map(|_| ())
    }
}

/// Observable advertiser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertiserStatus {
    Unstarted,
    Running { port: u16 },
    Stopped,
}

enum AdvertiserState {
    Unstarted,
    Running {
        port: u16,
        publication: Box<dyn Publication>,
    },
    Stopped,
}

/// Advertises the relay until stopped.
pub struct Advertiser {
    transport: Arc<dyn DiscoveryTransport>,
    service_type: String,
    instance_name: String,
    host: String,
    state: Mutex<AdvertiserState>,
}

impl Advertiser {
    /// Creates an advertiser over the given transport.
    pub fn new(
        transport: Arc<dyn DiscoveryTransport>,
        service_type: impl Into<String>,
        instance_name: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            service_type: service_type.into(),
            instance_name: instance_name.into(),
            host: host.into(),
            state: Mutex::new(AdvertiserState::Unstarted),
        }
    }

    /// Creates an mDNS advertiser.
    pub fn mdns(instance_name: impl Into<String>, host: impl Into<String>) -> Self {
        Self::new(Arc::new(MdnsTransport), SERVICE_TYPE, instance_name, host)
    }

    /// Record that `start(port)` publishes.
    pub fn record(&self, port: u16) -> ServiceRecord {
        ServiceRecord::new(&self.service_type, &self.instance_name, &self.host, port)
    }

    /// Starts advertising `port`.
    ///
    /// Fails while already running; the running advertisement is kept.
    pub fn start(&self, port: u16) -> ServerResult<()> {
        let mut state = self.state.lock();
        if let AdvertiserState::Running { port: current, .. } = &*state {
            return Err(ServerError::discovery(format!(
                "already advertising on port {}",
                current
            )));
        }

        let record = self.record(port);
        let publication = self.transport.publish(&record)?;
        *state = AdvertiserState::Running { port, publication };

        info!(
            service = %record.service_type,
            instance = %record.instance_name,
            port,
            "Advertising relay on the local network"
        );
        Ok(())
    }

    /// Stops advertising. A no-op unless running.
    ///
    /// The advertiser ends up stopped even when the withdrawal fails.
    pub fn stop(&self) -> ServerResult<()> {
        let previous = std::mem::replace(&mut *self.state.lock(), AdvertiserState::Stopped);
        match previous {
            AdvertiserState::Running { port, publication } => {
                publication.withdraw()?;
                info!(port, "Stopped advertising relay");
                Ok(())
            }
            AdvertiserState::Unstarted | AdvertiserState::Stopped => Ok(()),
        }
    }

    /// Returns the current state.
    pub fn status(&self) -> AdvertiserStatus {
        match &*self.state.lock() {
            AdvertiserState::Unstarted => AdvertiserStatus::Unstarted,
            AdvertiserState::Running { port, .. } => AdvertiserStatus::Running { port: *port },
            AdvertiserState::Stopped => AdvertiserStatus::Stopped,
        }
    }
}

impl Drop for Advertiser {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!(error = %e, "Failed to withdraw advertisement on drop");
        }
    }
}
