//! Shared types for the transfer layer.

use crate::transfer::error::{TransferError, TransferResult};
use crate::transfer::paths::normalize_path;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ─── Connection ──────────────────────────────────────────────────────

/// Target server plus the two root folders every relative path is resolved against.
///
/// Built once per server and never mutated; safe to share read-only between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    remote_root: PathBuf,
    local_root: PathBuf,
}

impl ConnectionConfig {
    /// Both roots are normalised here (`""` becomes `"."`).
    pub fn new(
        host: impl Into<String>,
        port: u16,
        remote_root: &str,
        local_root: &str,
    ) -> TransferResult<Self> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(TransferError::invalid_config("Host must not be empty"));
        }
        Ok(Self {
            host,
            port,
            remote_root: normalize_path(remote_root),
            local_root: normalize_path(local_root),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`, as used for socket addresses and log lines.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn remote_root(&self) -> &Path {
        &self.remote_root
    }

    pub fn local_root(&self) -> &Path {
        &self.local_root
    }
}

// ─── Credentials ─────────────────────────────────────────────────────

/// Per-call authentication fields. Never stored on a connector.
///
/// `extra` carries protocol-specific fields (SFTP key material, agent use);
/// protocols ignore the keys they do not understand.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
    #[serde(default, flatten, deserialize_with = "scalar_extras")]
    pub extra: BTreeMap<String, String>,
}

/// Extras arrive as arbitrary JSON values (`"agent": true`, `"port": 22`);
/// they are kept as text. `null` entries are dropped.
fn scalar_extras<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match value {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            Some((key, text))
        })
        .collect())
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into()),
            extra: BTreeMap::new(),
        }
    }

    /// Attach a protocol-specific field.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Read `AUTH_USERNAME` / `AUTH_PASSWORD` from the environment.
    pub fn from_env() -> TransferResult<Self> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| {
                TransferError::invalid_config(format!("Environment variable {} is not set", name))
            })
        };
        Ok(Self::new(var("AUTH_USERNAME")?, var("AUTH_PASSWORD")?))
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }

    /// Boolean extra: `"true"`, `"yes"` and `"1"` count as set.
    pub fn extra_flag(&self, key: &str) -> bool {
        matches!(
            self.extra(key).map(|v| v.trim().to_ascii_lowercase()).as_deref(),
            Some("true" | "yes" | "1")
        )
    }
}

// ─── Transfer tasks ──────────────────────────────────────────────────

/// One file movement between an absolute remote path and an absolute local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTask {
    pub remote: PathBuf,
    pub local: PathBuf,
}

impl TransferTask {
    pub fn new(remote: impl Into<PathBuf>, local: impl Into<PathBuf>) -> Self {
        Self {
            remote: remote.into(),
            local: local.into(),
        }
    }
}
