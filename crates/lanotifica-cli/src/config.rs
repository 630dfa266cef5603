//! CLI configuration.
//!
//! Settings live in a single `config.toml` file at
//! `~/.config/lanotifica/config.toml` by default. Command-line flags
//! override file values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use lanotifica_core::{TracingConfig, TracingOutputFormat, default_icon_dir};
use lanotifica_server::{DEFAULT_LISTEN, ServerConfig};

use crate::cli::Cli;
use crate::error::{ClientError, ClientResult};

/// Configuration for the lanotifica binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Relay settings.
    pub server: ServerSettings,

    /// Icon settings.
    pub icons: IconSettings,

    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Listen address.
    pub listen: String,

    /// Advertise the relay over mDNS.
    pub advertise: bool,

    /// DNS-SD instance name. Defaults to `lanotifica-<hostname>`.
    pub instance_name: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            advertise: true,
            instance_name: None,
        }
    }
}

/// Icon settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSettings {
    /// Directory holding `<package>.png|svg|jpg` icons.
    pub dir: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Output format: pretty, compact or json.
    pub format: Option<String>,
}

impl ClientConfig {
    /// Loads configuration from the default path, or defaults if absent.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| ClientError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lanotifica")
            .join("config.toml")
    }

    /// Applies command-line overrides.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if cli.debug {
            self.debug = true;
        }
        if let Some(ref listen) = cli.listen {
            self.server.listen = listen.clone();
        }
        if cli.no_advertise {
            self.server.advertise = false;
        }
        if let Some(ref dir) = cli.icon_dir {
            self.icons.dir = Some(dir.clone());
        }
        if let Some(ref format) = cli.log_format {
            self.logging.format = Some(format.clone());
        }
    }

    /// Parsed log output format.
    pub fn log_format(&self) -> ClientResult<Option<TracingOutputFormat>> {
        self.logging
            .format
            .as_deref()
            .map(|name| {
                name.parse::<TracingOutputFormat>()
                    .map_err(|e| ClientError::Config(e.to_string()))
            })
            .transpose()
    }

    /// Tracing configuration for this run.
    pub fn tracing_config(&self) -> ClientResult<TracingConfig> {
        let base = if self.debug {
            TracingConfig::cli_debug()
        } else {
            TracingConfig::daemon()
        };
        Ok(match self.log_format()? {
            Some(format) => base.with_format(format),
            None => base,
        })
    }

    /// Server configuration for this run.
    pub fn server_config(&self) -> ServerConfig {
        let mut config = ServerConfig::new(&self.server.listen)
            .with_advertise(self.server.advertise)
            .with_icon_dir(self.icons.dir.clone().unwrap_or_else(default_icon_dir));
        if let Some(ref name) = self.server.instance_name {
            config = config.with_instance_name(name);
        }
        config
    }

    /// Checks that every value can be used to start the relay.
    pub fn validate(&self) -> ClientResult<()> {
        self.server_config().bind_addr()?;
        self.log_format()?;
        if matches!(self.server.instance_name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(ClientError::Config(
                "server.instance_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert!(!config.debug);
        assert_eq!(config.server.listen, ":19420");
        assert!(config.server.advertise);
        assert!(config.icons.dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_from_file() {
        let file = write_config(
            r#"
debug = true

[server]
listen = "127.0.0.1:9000"
advertise = false
instance_name = "desk"

[icons]
dir = "/tmp/icons"

[logging]
format = "json"
"#,
        );
        let config = ClientConfig::load_from(file.path()).unwrap();
        assert!(config.debug);
        assert_eq!(config.server.listen, "127.0.0.1:9000");
        assert!(!config.server.advertise);
        assert_eq!(config.server.instance_name.as_deref(), Some("desk"));
        assert_eq!(config.icons.dir, Some(PathBuf::from("/tmp/icons")));
        assert_eq!(config.log_format().unwrap(), Some(TracingOutputFormat::Json));

        let server = config.server_config();
        assert_eq!(server.instance_name, "desk");
        assert_eq!(server.icon_dir, Some(PathBuf::from("/tmp/icons")));
        assert_eq!(server.bind_addr().unwrap().port(), 9000);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config("[server]\nlisten = \":8080\"\n");
        let config = ClientConfig::load_from(file.path()).unwrap();
        assert_eq!(config.server.listen, ":8080");
        assert!(config.server.advertise);
        assert!(config.logging.format.is_none());
    }

    #[test]
    fn load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn malformed_file_fails() {
        let file = write_config("[server\nlisten = 1");
        assert!(matches!(
            ClientConfig::load_from(file.path()),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn cli_overrides_file_values() {
        let mut config = ClientConfig::default();
        let cli = Cli::try_parse_from([
            "lanotifica",
            "--debug",
            "--listen",
            "8081",
            "--no-advertise",
            "--icon-dir",
            "/srv/icons",
            "--log-format",
            "pretty",
        ])
        .unwrap();
        config.apply_cli(&cli);

        assert!(config.debug);
        assert_eq!(config.server.listen, "8081");
        assert!(!config.server.advertise);
        assert_eq!(config.icons.dir, Some(PathBuf::from("/srv/icons")));
        assert_eq!(config.log_format().unwrap(), Some(TracingOutputFormat::Pretty));
    }

    #[test]
    fn absent_flags_keep_file_values() {
        let mut config = ClientConfig::default();
        config.server.listen = ":7000".to_string();
        let cli = Cli::try_parse_from(["lanotifica"]).unwrap();
        config.apply_cli(&cli);
        assert_eq!(config.server.listen, ":7000");
        assert!(config.server.advertise);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = ClientConfig::default();
        config.server.listen = "not an address".to_string();
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.logging.format = Some("xml".to_string());
        assert!(matches!(config.validate(), Err(ClientError::Config(_))));

        let mut config = ClientConfig::default();
        config.server.instance_name = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn dump_round_trips_through_toml() {
        let config = ClientConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("listen = \":19420\""));
        let parsed: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.server.listen, config.server.listen);
    }
}
