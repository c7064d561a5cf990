//! `SftpTransferConnector`: the SFTP binding of `TransferBackend`.
//!
//! Directory creation is not offered over SFTP; `make_dir` keeps the default
//! `Unsupported` answer, so uploads into a missing remote folder fail.

use crate::sftp::session::SftpSession;
use log::info;
use rxfer_core::paths::to_posix;
use rxfer_core::{
    run_batch, ConnectionConfig, Credentials, TransferBackend, TransferResult, TransferTask,
};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SftpTransferConnector {
    config: ConnectionConfig,
}

impl SftpTransferConnector {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    pub fn connect_to(
        host: &str,
        port: u16,
        remote_root: &str,
        local_root: &str,
    ) -> TransferResult<Self> {
        Ok(Self::new(ConnectionConfig::new(host, port, remote_root, local_root)?))
    }

    fn open(&self, credentials: &Credentials) -> TransferResult<SftpSession> {
        SftpSession::open(&self.config, credentials)
    }
}

impl TransferBackend for SftpTransferConnector {
    fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn protocol_name(&self) -> &'static str {
        "sftp"
    }

    fn list(&self, credentials: &Credentials, remote_dir: &Path) -> TransferResult<Vec<String>> {
        let mut session = self.open(credentials)?;
        let names = session.list(&to_posix(remote_dir))?;
        session.close();
        Ok(names)
    }

    fn get_one(&self, credentials: &Credentials, remote: &Path, local: &Path) -> TransferResult<()> {
        let mut session = self.open(credentials)?;
        session.download(&to_posix(remote), local)?;
        session.close();
        Ok(())
    }

    fn get_many(&self, credentials: &Credentials, tasks: &[TransferTask]) -> TransferResult<()> {
        let mut session = self.open(credentials)?;
        let count = run_batch(tasks, |t| {
            session.download(&to_posix(&t.remote), &t.local).map(|_| ())
        })?;
        session.close();
        info!("Downloaded {} file(s) from {}", count, self.config.endpoint());
        Ok(())
    }

    fn put_one(&self, credentials: &Credentials, local: &Path, remote: &Path) -> TransferResult<()> {
        let mut session = self.open(credentials)?;
        session.upload(local, &to_posix(remote))?;
        session.close();
        Ok(())
    }

    fn put_many(&self, credentials: &Credentials, tasks: &[TransferTask]) -> TransferResult<()> {
        let mut session = self.open(credentials)?;
        let count = run_batch(tasks, |t| {
            session.upload(&t.local, &to_posix(&t.remote)).map(|_| ())
        })?;
        session.close();
        info!("Uploaded {} file(s) to {}", count, self.config.endpoint());
        Ok(())
    }
}
