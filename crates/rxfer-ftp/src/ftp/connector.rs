//! `FtpTransferConnector`: the FTP binding of `TransferBackend`.
//!
//! Session scope equals primitive-call scope: every primitive opens its own
//! control connection and closes it before returning.

use crate::ftp::session::FtpSession;
use log::info;
use rxfer_core::paths::to_posix;
use rxfer_core::{
    run_batch, ConnectionConfig, Credentials, TransferBackend, TransferResult, TransferTask,
};
use std::path::Path;

/// Organisational domain prefixed to every login name by default.
pub const DEFAULT_DOMAIN: &str = "eu";

#[derive(Debug, Clone)]
pub struct FtpTransferConnector {
    config: ConnectionConfig,
    domain: Option<String>,
}

impl FtpTransferConnector {
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            domain: Some(DEFAULT_DOMAIN.to_string()),
        }
    }

    /// Convenience constructor from raw construction parameters.
    pub fn connect_to(
        host: &str,
        port: u16,
        remote_root: &str,
        local_root: &str,
    ) -> TransferResult<Self> {
        Ok(Self::new(ConnectionConfig::new(host, port, remote_root, local_root)?))
    }

    /// Replace the login domain; `None` sends the bare username.
    pub fn with_domain(mut self, domain: Option<String>) -> Self {
        self.domain = domain;
        self
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    fn open(&self, credentials: &Credentials) -> TransferResult<FtpSession> {
        FtpSession::open(&self.config, credentials, self.domain.as_deref())
    }
}

impl TransferBackend for FtpTransferConnector {
    fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn protocol_name(&self) -> &'static str {
        "ftp"
    }

    fn list(&self, credentials: &Credentials, remote_dir: &Path) -> TransferResult<Vec<String>> {
        let mut session = self.open(credentials)?;
        let names = session.list(&to_posix(remote_dir))?;
        session.close();
        Ok(names)
    }

    fn get_one(&self, credentials: &Credentials, remote: &Path, local: &Path) -> TransferResult<()> {
        let mut session = self.open(credentials)?;
        session.retrieve(&to_posix(remote), local)?;
        session.close();
        Ok(())
    }

    fn get_many(&self, credentials: &Credentials, tasks: &[TransferTask]) -> TransferResult<()> {
        let mut session = self.open(credentials)?;
        let count = run_batch(tasks, |t| {
            session.retrieve(&to_posix(&t.remote), &t.local).map(|_| ())
        })?;
        session.close();
        info!("Downloaded {} file(s) from {}", count, self.config.endpoint());
        Ok(())
    }

    fn put_one(&self, credentials: &Credentials, local: &Path, remote: &Path) -> TransferResult<()> {
        let mut session = self.open(credentials)?;
        session.store(local, &to_posix(remote))?;
        session.close();
        Ok(())
    }

    fn put_many(&self, credentials: &Credentials, tasks: &[TransferTask]) -> TransferResult<()> {
        let mut session = self.open(credentials)?;
        let count = run_batch(tasks, |t| {
            session.store(&t.local, &to_posix(&t.remote)).map(|_| ())
        })?;
        session.close();
        info!("Uploaded {} file(s) to {}", count, self.config.endpoint());
        Ok(())
    }

    fn make_dir(&self, credentials: &Credentials, remote_dir: &Path) -> TransferResult<()> {
        let mut session = self.open(credentials)?;
        session.mkdir(&to_posix(remote_dir))?;
        session.close();
        Ok(())
    }
}
