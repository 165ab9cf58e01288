use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{RootError, RootResult};

/// Transport protocol for the tool server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Standard I/O transport (default).
    #[default]
    Stdio,
    /// HTTP transport with bind address and port.
    Http { bind: String, port: u16 },
}

/// Configuration for the tool server surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    /// Transport protocol to use.
    #[serde(default)]
    pub transport: Transport,

    /// Server name advertised in initialization.
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// Server version advertised in initialization.
    #[serde(default = "default_server_version")]
    pub server_version: String,
}

fn default_server_name() -> String {
    "toolgate".to_string()
}

fn default_server_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            server_name: default_server_name(),
            server_version: default_server_version(),
        }
    }
}

/// Configuration for the policy gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Permissions granted to every new session.
    #[serde(default = "default_permissions")]
    pub default_permissions: Vec<String>,

    /// Flag name set once a session views untrusted content.
    #[serde(default = "default_untrusted_flag")]
    pub untrusted_content_flag: String,

    /// Hosts external content may be fetched from.
    #[serde(default)]
    pub trusted_hosts: Option<Vec<String>>,

    /// Recipients outbound messages may be delivered to.
    #[serde(default)]
    pub approved_contacts: Option<Vec<String>>,

    /// Directory the directory-listing tool is confined to.
    #[serde(default)]
    pub files_root: Option<PathBuf>,
}

fn default_permissions() -> Vec<String> {
    vec!["read_secrets".to_string()]
}

fn default_untrusted_flag() -> String {
    "viewed_untrusted_content".to_string()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            default_permissions: default_permissions(),
            untrusted_content_flag: default_untrusted_flag(),
            trusted_hosts: None,
            approved_contacts: None,
            files_root: None,
        }
    }
}

/// Top-level configuration for the toolgate root binary.
///
/// Loaded from a TOML file (typically `~/.toolgate/config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootConfig {
    /// General data directory for toolgate state.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Tool server configuration.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Policy gate configuration.
    #[serde(default)]
    pub gate: GateConfig,
}

fn default_data_dir() -> PathBuf {
    dirs_or_default(".toolgate")
}

/// Returns `$HOME/<suffix>` if HOME is available, otherwise `./<suffix>`.
fn dirs_or_default(suffix: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(suffix))
        .unwrap_or_else(|_| PathBuf::from(suffix))
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            mcp: McpConfig::default(),
            gate: GateConfig::default(),
        }
    }
}

impl RootConfig {
    /// Load configuration from a TOML file. If the file does not exist,
    /// returns a default configuration.
    pub fn load(path: &Path) -> RootResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(RootError::Io)?;
        let config: RootConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> RootResult<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| RootError::Config(format!("TOML serialize error: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(RootError::Io)?;
        }
        std::fs::write(path, contents).map_err(RootError::Io)?;
        Ok(())
    }

    /// Validate configuration values.
    pub fn validate(&self) -> RootResult<()> {
        if self.mcp.server_name.trim().is_empty() {
            return Err(RootError::Config("server_name must not be empty".into()));
        }
        if self.gate.untrusted_content_flag.trim().is_empty() {
            return Err(RootError::Config(
                "untrusted_content_flag must not be empty".into(),
            ));
        }
        if let Some(hosts) = &self.gate.trusted_hosts {
            if hosts.iter().any(|h| h.trim().is_empty()) {
                return Err(RootError::Config(
                    "trusted_hosts must not contain empty entries".into(),
                ));
            }
        }
        Ok(())
    }

    /// Return the path to the default config file location.
    pub fn default_config_path() -> PathBuf {
        dirs_or_default(".toolgate/config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RootConfig::default();
        assert!(config.data_dir.to_str().unwrap().contains(".toolgate"));
        assert_eq!(config.mcp.transport, Transport::Stdio);
        assert_eq!(config.mcp.server_name, "toolgate");
        assert_eq!(config.gate.untrusted_content_flag, "viewed_untrusted_content");
        assert_eq!(config.gate.default_permissions, vec!["read_secrets"]);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
data_dir = "/tmp/test-toolgate"

[mcp]
server_name = "test-toolgate"

[mcp.transport]
http = { bind = "127.0.0.1", port = 8080 }

[gate]
default_permissions = ["read_secrets", "send_mail"]
untrusted_content_flag = "tainted"
trusted_hosts = ["intranet.example.com"]
files_root = "/srv/toolgate/files"
"#;
        let config: RootConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/test-toolgate"));
        assert_eq!(config.mcp.server_name, "test-toolgate");
        assert_eq!(config.gate.default_permissions.len(), 2);
        assert_eq!(config.gate.untrusted_content_flag, "tainted");
        assert_eq!(
            config.gate.trusted_hosts,
            Some(vec!["intranet.example.com".to_string()])
        );
        assert_eq!(
            config.gate.files_root,
            Some(PathBuf::from("/srv/toolgate/files"))
        );
    }

    #[test]
    fn test_config_validate_ok() {
        assert!(RootConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validate_empty_server_name() {
        let mut config = RootConfig::default();
        config.mcp.server_name = " ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validate_empty_flag() {
        let mut config = RootConfig::default();
        config.gate.untrusted_content_flag = "".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validate_blank_trusted_host() {
        let mut config = RootConfig::default();
        config.gate.trusted_hosts = Some(vec!["ok.example.com".into(), "".into()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = RootConfig::load(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.mcp.server_name, "toolgate");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = RootConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let restored: RootConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, restored.data_dir);
        assert_eq!(
            config.gate.untrusted_content_flag,
            restored.gate.untrusted_content_flag
        );
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = std::env::temp_dir().join("toolgate-test-config");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("config.toml");

        let mut config = RootConfig::default();
        config.data_dir = PathBuf::from("/tmp/data-test");
        config.gate.untrusted_content_flag = "tainted".into();

        config.save(&path).unwrap();
        let loaded = RootConfig::load(&path).unwrap();

        assert_eq!(loaded.data_dir, PathBuf::from("/tmp/data-test"));
        assert_eq!(loaded.gate.untrusted_content_flag, "tainted");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_transport_serde_http() {
        let t = Transport::Http {
            bind: "0.0.0.0".into(),
            port: 9090,
        };
        let json = serde_json::to_string(&t).unwrap();
        let restored: Transport = serde_json::from_str(&json).unwrap();
        assert_eq!(t, restored);
    }
}
