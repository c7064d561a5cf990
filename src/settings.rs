//! Connector settings: which protocol, where, and which roots.
//!
//! Loadable from a camelCase JSON document or from `RXFER_*` environment
//! variables:
//!
//! ```json
//! { "protocol": "ftp", "host": "files.example.org", "rootFolder": "Apps/HR", "ftpDomain": "eu" }
//! ```

use rxfer_core::{ConnectionConfig, TransferError, TransferResult};
use rxfer_ftp::ftp::DEFAULT_DOMAIN;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Ftp,
    Sftp,
}

impl Protocol {
    pub fn default_port(self) -> u16 {
        match self {
            Protocol::Ftp => 21,
            Protocol::Sftp => 22,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Ftp => f.write_str("ftp"),
            Protocol::Sftp => f.write_str("sftp"),
        }
    }
}

impl FromStr for Protocol {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ftp" => Ok(Protocol::Ftp),
            "sftp" => Ok(Protocol::Sftp),
            other => Err(TransferError::invalid_config(format!(
                "Unknown protocol '{}' (expected ftp or sftp)",
                other
            ))),
        }
    }
}

fn default_ftp_domain() -> Option<String> {
    Some(DEFAULT_DOMAIN.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorSettings {
    pub protocol: Protocol,
    pub host: String,
    /// Protocol default when absent.
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub root_folder: String,
    #[serde(default)]
    pub local_root: String,
    /// Login domain for FTP; `null` sends the bare username.
    #[serde(default = "default_ftp_domain")]
    pub ftp_domain: Option<String>,
}

impl ConnectorSettings {
    pub fn new(protocol: Protocol, host: impl Into<String>) -> Self {
        Self {
            protocol,
            host: host.into(),
            port: None,
            root_folder: String::new(),
            local_root: String::new(),
            ftp_domain: default_ftp_domain(),
        }
    }

    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.protocol.default_port())
    }

    pub fn from_json_str(json: &str) -> TransferResult<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| TransferError::invalid_config(format!("Invalid connector settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> TransferResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            TransferError::invalid_config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// `RXFER_PROTOCOL` (default `ftp`), `RXFER_HOST`, `RXFER_PORT`,
    /// `RXFER_ROOT_FOLDER`, `RXFER_LOCAL_ROOT`, `RXFER_FTP_DOMAIN` (empty
    /// disables the domain prefix).
    pub fn from_env() -> TransferResult<Self> {
        let var = |name: &str| std::env::var(name).ok();

        let protocol = match var("RXFER_PROTOCOL") {
            Some(p) => p.parse()?,
            None => Protocol::Ftp,
        };
        let host = var("RXFER_HOST")
            .ok_or_else(|| TransferError::invalid_config("Environment variable RXFER_HOST is not set"))?;
        let port = var("RXFER_PORT")
            .map(|p| {
                p.trim().parse::<u16>().map_err(|e| {
                    TransferError::invalid_config(format!("Invalid RXFER_PORT '{}': {}", p, e))
                })
            })
            .transpose()?;
        let ftp_domain = match var("RXFER_FTP_DOMAIN") {
            Some(d) if d.trim().is_empty() => None,
            Some(d) => Some(d),
            None => default_ftp_domain(),
        };

        let settings = Self {
            protocol,
            host,
            port,
            root_folder: var("RXFER_ROOT_FOLDER").unwrap_or_default(),
            local_root: var("RXFER_LOCAL_ROOT").unwrap_or_default(),
            ftp_domain,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> TransferResult<()> {
        if self.host.trim().is_empty() {
            return Err(TransferError::invalid_config("Host must not be empty"));
        }
        if self.port == Some(0) {
            return Err(TransferError::invalid_config("Port must not be 0"));
        }
        Ok(())
    }

    pub fn connection_config(&self) -> TransferResult<ConnectionConfig> {
        self.validate()?;
        ConnectionConfig::new(
            self.host.trim(),
            self.effective_port(),
            &self.root_folder,
            &self.local_root,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxfer_core::TransferErrorKind;

    #[test]
    fn test_minimal_json_takes_defaults() {
        let s = ConnectorSettings::from_json_str(r#"{"protocol":"sftp","host":"h"}"#).unwrap();
        assert_eq!(s.effective_port(), 22);
        assert_eq!(s.ftp_domain.as_deref(), Some("eu"));
        assert_eq!(s.root_folder, "");
    }

    #[test]
    fn test_full_json() {
        let s = ConnectorSettings::from_json_str(
            r#"{"protocol":"ftp","host":"ftp.example.org","port":2121,
                "rootFolder":"Apps/HUMAN RESOURCES","localRoot":"data","ftpDomain":null}"#,
        )
        .unwrap();
        assert_eq!(s.effective_port(), 2121);
        assert_eq!(s.ftp_domain, None);
        let cfg = s.connection_config().unwrap();
        assert_eq!(cfg.endpoint(), "ftp.example.org:2121");
        assert_eq!(cfg.remote_root(), Path::new("Apps/HUMAN RESOURCES"));
    }

    #[test]
    fn test_empty_host_is_invalid() {
        let err = ConnectorSettings::from_json_str(r#"{"protocol":"ftp","host":"  "}"#).unwrap_err();
        assert_eq!(err.kind, TransferErrorKind::InvalidConfig);
    }

    #[test]
    fn test_unknown_protocol_is_invalid() {
        assert!(ConnectorSettings::from_json_str(r#"{"protocol":"scp","host":"h"}"#).is_err());
        assert_eq!(
            "SCP".parse::<Protocol>().unwrap_err().kind,
            TransferErrorKind::InvalidConfig
        );
    }
}
