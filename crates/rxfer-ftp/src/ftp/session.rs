//! Scoped FTP control connection.
//!
//! Lifecycle: `connect()` → USER/PASS → TYPE I → one or more commands → QUIT.
//! QUIT is sent from `Drop` as well, so an early `?` return still closes the
//! connection.

use crate::ftp::error::map_ftp_error;
use log::{debug, info};
use rxfer_core::{
    ConnectionConfig, Credentials, SessionLifecycle, SessionState, TransferErrorKind,
    TransferResult,
};
use std::fs::File;
use std::io;
use std::path::Path;
use suppaftp::types::FileType;
use suppaftp::FtpStream;

/// Login name sent to the server: `<domain>\<username>` when a domain is set
/// and the name is not already qualified.
pub fn login_name(domain: Option<&str>, username: &str) -> String {
    match domain {
        Some(d) if !d.is_empty() && !username.contains('\\') => format!("{}\\{}", d, username),
        _ => username.to_string(),
    }
}

pub(crate) struct FtpSession {
    stream: FtpStream,
    lifecycle: SessionLifecycle,
}

impl FtpSession {
    /// Connect, authenticate and switch to binary mode.
    pub fn open(
        config: &ConnectionConfig,
        credentials: &Credentials,
        domain: Option<&str>,
    ) -> TransferResult<Self> {
        let endpoint = config.endpoint();
        let mut lifecycle = SessionLifecycle::new(format!("ftp {}", endpoint));

        let stream = FtpStream::connect(endpoint.as_str()).map_err(|e| {
            lifecycle.fail();
            map_ftp_error(e, TransferErrorKind::ConnectionFailed, &format!("Connect to {}", endpoint))
        })?;
        lifecycle.advance(SessionState::Authenticating)?;

        // From here on the guard owns the socket; dropping it sends QUIT.
        let mut session = Self { stream, lifecycle };

        let user = login_name(domain, &credentials.username);
        let login = session
            .stream
            .login(user.as_str(), credentials.password())
            .map_err(|e| map_ftp_error(e, TransferErrorKind::AuthFailed, &format!("Login as {}", user)));
        session.lifecycle.track(login)?;

        let binary = session
            .stream
            .transfer_type(FileType::Binary)
            .map_err(|e| map_ftp_error(e, TransferErrorKind::CommandRejected, "TYPE I"));
        session.lifecycle.track(binary)?;

        session.lifecycle.advance(SessionState::Ready)?;
        debug!("FTP session to {} ready", endpoint);
        Ok(session)
    }

    /// CWD into `dir`, then NLST.
    pub fn list(&mut self, dir: &str) -> TransferResult<Vec<String>> {
        self.lifecycle.advance(SessionState::Transferring)?;
        let cwd = self
            .stream
            .cwd(dir)
            .map_err(|e| map_ftp_error(e, TransferErrorKind::NotFound, &format!("CWD {}", dir)));
        self.lifecycle.track(cwd)?;
        let names = self
            .stream
            .nlst(None)
            .map_err(|e| map_ftp_error(e, TransferErrorKind::CommandRejected, &format!("NLST {}", dir)));
        self.lifecycle.track(names)
    }

    /// RETR `remote` into `local`. The local file is only created once the
    /// server has accepted the retrieval.
    pub fn retrieve(&mut self, remote: &str, local: &Path) -> TransferResult<u64> {
        self.lifecycle.advance(SessionState::Transferring)?;
        info!("Downloading file: {}", remote);

        let outcome = self
            .stream
            .retr(remote, |reader| {
                Ok(File::create(local).and_then(|mut file| io::copy(reader, &mut file)))
            })
            .map_err(|e| map_ftp_error(e, TransferErrorKind::TransferFailed, &format!("RETR {}", remote)));

        let result = match outcome {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(io_err)) => Err(io_err.into()),
            Err(e) => Err(e),
        };
        self.lifecycle.track(result)
    }

    /// STOR `local` as `remote`.
    pub fn store(&mut self, local: &Path, remote: &str) -> TransferResult<u64> {
        self.lifecycle.advance(SessionState::Transferring)?;
        info!("Uploading file: {}", local.display());

        let mut file = match File::open(local) {
            Ok(f) => f,
            Err(e) => return self.lifecycle.track(Err(e.into())),
        };
        let stored = self
            .stream
            .put_file(remote, &mut file)
            .map_err(|e| map_ftp_error(e, TransferErrorKind::TransferFailed, &format!("STOR {}", remote)));
        self.lifecycle.track(stored)
    }

    /// MKD `dir`.
    pub fn mkdir(&mut self, dir: &str) -> TransferResult<()> {
        self.lifecycle.advance(SessionState::Transferring)?;
        let made = self
            .stream
            .mkdir(dir)
            .map_err(|e| map_ftp_error(e, TransferErrorKind::CommandRejected, &format!("MKD {}", dir)));
        self.lifecycle.track(made)
    }

    /// Close explicitly. Dropping the session does the same.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if !self.lifecycle.begin_close() {
            return;
        }
        if let Err(e) = self.stream.quit() {
            debug!("QUIT failed (connection dropped anyway): {}", e);
        }
        self.lifecycle.finish_close();
    }
}

impl Drop for FtpSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
