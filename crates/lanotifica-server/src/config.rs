//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::discovery::{SERVICE_TYPE, parse_port};
use crate::error::{ServerError, ServerResult};

/// Default listen address.
pub const DEFAULT_LISTEN: &str = ":19420";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address: `":port"`, `"port"` or `"host:port"`.
    pub listen: String,

    /// Whether to advertise the relay over mDNS.
    pub advertise: bool,

    /// DNS-SD service type.
    pub service_type: String,

    /// DNS-SD instance name.
    pub instance_name: String,

    /// Host name published in the mDNS record.
    pub host_name: String,

    /// Directory holding per-package icons. `None` disables icons.
    pub icon_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let host_name = local_hostname();
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            advertise: true,
            service_type: SERVICE_TYPE.to_string(),
            instance_name: default_instance_name(&host_name),
            host_name,
            icon_dir: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new server configuration listening on `listen`.
    pub fn new(listen: impl Into<String>) -> Self {
        Self {
            listen: listen.into(),
            ..Default::default()
        }
    }

    /// Builder: enable or disable mDNS advertisement.
    pub fn with_advertise(mut self, advertise: bool) -> Self {
        self.advertise = advertise;
        self
    }

    /// Builder: set the instance name.
    pub fn with_instance_name(mut self, name: impl Into<String>) -> Self {
        self.instance_name = name.into();
        self
    }

    /// Builder: set the icon directory.
    pub fn with_icon_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.icon_dir = Some(dir.into());
        self
    }

    /// Socket address to bind. A bare or colon-prefixed port binds every
    /// IPv4 interface.
    pub fn bind_addr(&self) -> ServerResult<SocketAddr> {
        if let Ok(port) = parse_port(&self.listen) {
            return Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)));
        }
        self.listen.parse().map_err(|e| {
            ServerError::config(format!("invalid listen address '{}': {}", self.listen, e))
        })
    }

    /// Port to advertise, parsed from the listen address.
    pub fn advertised_port(&self) -> ServerResult<u16> {
        parse_port(&self.listen)
    }
}

/// Default instance name for a host.
pub fn default_instance_name(host_name: &str) -> String {
    format!("lanotifica-{}", host_name)
}

/// Returns the machine's host name, or `"lanotifica"` if it cannot be read.
pub fn local_hostname() -> String {
    #[cfg(unix)]
    {
        let mut buf = [0u8; 256];
        let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
        if rc == 0 {
            let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
            let name = String::from_utf8_lossy(&buf[..len]);
            // Only the first label; mDNS adds `.local.` itself.
            if let Some(label) = name.split('.').next().filter(|l| !l.is_empty()) {
                return label.to_string();
            }
        }
    }
    "lanotifica".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.listen, ":19420");
        assert!(config.advertise);
        assert_eq!(config.service_type, "_lanotifica._tcp.local.");
        assert!(config.instance_name.starts_with("lanotifica-"));
        assert!(config.icon_dir.is_none());
    }

    #[test]
    fn custom_config() {
        let config = ServerConfig::new("8080")
            .with_advertise(false)
            .with_instance_name("kitchen")
            .with_icon_dir("/var/lib/lanotifica/icons");

        assert_eq!(config.listen, "8080");
        assert!(!config.advertise);
        assert_eq!(config.instance_name, "kitchen");
        assert_eq!(
            config.icon_dir,
            Some(PathBuf::from("/var/lib/lanotifica/icons"))
        );
    }

    #[test]
    fn bind_addr_forms() {
        assert_eq!(
            ServerConfig::new(":19420").bind_addr().unwrap(),
            "0.0.0.0:19420".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            ServerConfig::new("8080").bind_addr().unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            ServerConfig::new("127.0.0.1:9000").bind_addr().unwrap(),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );
        assert!(matches!(
            ServerConfig::new("nowhere").bind_addr(),
            Err(ServerError::Config { .. })
        ));
    }

    #[test]
    fn host_port_listen_is_not_advertisable() {
        let config = ServerConfig::new("127.0.0.1:9000");
        assert!(config.bind_addr().is_ok());
        assert!(matches!(
            config.advertised_port(),
            Err(ServerError::InvalidPortSpec { .. })
        ));
    }

    #[test]
    fn hostname_is_a_single_label() {
        let host = local_hostname();
        assert!(!host.is_empty());
        assert!(!host.contains('.'));
    }
}
