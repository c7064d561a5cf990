//! `rxfer`: FTP and SFTP transfers behind one contract.
//!
//! The protocol crates supply the connectors; this crate picks one from
//! [`ConnectorSettings`] and sets up logging for binaries embedding it.
//!
//! ```no_run
//! use rxfer::{connector_for, ConnectorSettings, Credentials, RemoteFileTransfer};
//!
//! let settings = ConnectorSettings::from_json_file("rxfer.json")?;
//! let connector = connector_for(&settings)?;
//! let names = connector.list_files(&Credentials::from_env()?, None)?;
//! # Ok::<(), rxfer::TransferError>(())
//! ```

pub mod logging;
pub mod settings;

pub use rxfer_core::*;
pub use rxfer_ftp::ftp::FtpTransferConnector;
pub use rxfer_reports::reports;
pub use rxfer_sftp::sftp::SftpTransferConnector;
pub use settings::{ConnectorSettings, Protocol};

use log::info;

/// Build the connector `settings` describe.
pub fn connector_for(
    settings: &ConnectorSettings,
) -> TransferResult<Box<dyn RemoteFileTransfer + Send + Sync>> {
    let config = settings.connection_config()?;
    info!(
        "Using {} connector for {} (remote root '{}')",
        settings.protocol,
        config.endpoint(),
        config.remote_root().display()
    );
    Ok(match settings.protocol {
        Protocol::Ftp => {
            Box::new(FtpTransferConnector::new(config).with_domain(settings.ftp_domain.clone()))
        }
        Protocol::Sftp => Box::new(SftpTransferConnector::new(config)),
    })
}
