// ── Scoped SSH transport + SFTP sub-channel ──────────────────────────────────
//
// Opened right before a primitive does its work and released right after:
// the SFTP channel first, then the transport. Release runs from `Drop`, so it
// also happens when a step fails half-way.

use crate::sftp::auth::authenticate;
use log::{debug, info};
use rxfer_core::{
    ConnectionConfig, Credentials, SessionLifecycle, SessionState, TransferError,
    TransferErrorKind, TransferResult,
};
use ssh2::{ErrorCode, Session, Sftp};
use std::fs::File;
use std::io;
use std::net::TcpStream;
use std::path::{Path, PathBuf};

// libssh2 SFTP status codes
const FX_NO_SUCH_FILE: i32 = 2;
const FX_PERMISSION_DENIED: i32 = 3;

/// Categorise an ssh2 error raised while doing `context`.
pub fn map_ssh_error(err: ssh2::Error, fallback: TransferErrorKind, context: &str) -> TransferError {
    let kind = match err.code() {
        ErrorCode::SFTP(FX_NO_SUCH_FILE) => TransferErrorKind::NotFound,
        ErrorCode::SFTP(FX_PERMISSION_DENIED) => TransferErrorKind::PermissionDenied,
        _ => fallback,
    };
    TransferError::new(kind, format!("{}: {}", context, err))
}

/// Entry names of a `readdir` result, without `.` and `..`.
pub fn entry_names(entries: Vec<(PathBuf, ssh2::FileStat)>) -> Vec<String> {
    entries
        .into_iter()
        .filter_map(|(path, _)| {
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
        })
        .filter(|name| name != "." && name != "..")
        .collect()
}

pub(crate) struct SftpSession {
    sftp: Option<Sftp>,
    session: Session,
    lifecycle: SessionLifecycle,
    // SSH_MSG_DISCONNECT only makes sense once keys were exchanged.
    handshaken: bool,
}

impl SftpSession {
    /// TCP connect, SSH handshake, authenticate, open the SFTP channel.
    pub fn open(config: &ConnectionConfig, credentials: &Credentials) -> TransferResult<Self> {
        let endpoint = config.endpoint();
        let mut lifecycle = SessionLifecycle::new(format!("sftp {}", endpoint));
        info!("SFTP connecting to {}", endpoint);

        let tcp = TcpStream::connect(endpoint.as_str()).map_err(|e| {
            lifecycle.fail();
            TransferError::connection_failed(format!("TCP connection to {} failed: {}", endpoint, e))
        })?;
        let session = Session::new().map_err(|e| {
            lifecycle.fail();
            map_ssh_error(e, TransferErrorKind::ConnectionFailed, "Failed to create SSH session")
        })?;

        // The guard owns the transport from here on.
        let mut guard = Self {
            sftp: None,
            session,
            lifecycle,
            handshaken: false,
        };
        guard.session.set_tcp_stream(tcp);

        let handshake = guard
            .session
            .handshake()
            .map_err(|e| map_ssh_error(e, TransferErrorKind::ConnectionFailed, "SSH handshake failed"));
        guard.lifecycle.track(handshake)?;
        guard.handshaken = true;
        guard.lifecycle.advance(SessionState::Authenticating)?;

        let method = authenticate(&guard.session, credentials);
        let method = guard.lifecycle.track(method)?;
        if !guard.session.authenticated() {
            return guard.lifecycle.track(Err(TransferError::auth_failed(
                "Authentication failed: not authenticated after auth attempt",
            )));
        }
        debug!("SFTP authenticated to {} via {}", endpoint, method);

        let sftp = guard
            .session
            .sftp()
            .map_err(|e| map_ssh_error(e, TransferErrorKind::ProtocolError, "SFTP channel error"));
        guard.sftp = Some(guard.lifecycle.track(sftp)?);
        guard.lifecycle.advance(SessionState::Ready)?;
        Ok(guard)
    }

    fn channel(&self) -> TransferResult<&Sftp> {
        self.sftp
            .as_ref()
            .ok_or_else(|| TransferError::protocol_error("SFTP channel is closed"))
    }

    pub fn list(&mut self, dir: &str) -> TransferResult<Vec<String>> {
        self.lifecycle.advance(SessionState::Transferring)?;
        let listed = self.channel().and_then(|sftp| {
            sftp.readdir(Path::new(dir))
                .map_err(|e| map_ssh_error(e, TransferErrorKind::CommandRejected, &format!("readdir '{}'", dir)))
        });
        self.lifecycle.track(listed).map(entry_names)
    }

    pub fn download(&mut self, remote: &str, local: &Path) -> TransferResult<u64> {
        self.lifecycle.advance(SessionState::Transferring)?;
        info!("Downloading file: {}", remote);
        let copied = self.channel().and_then(|sftp| {
            let mut remote_file = sftp
                .open(Path::new(remote))
                .map_err(|e| map_ssh_error(e, TransferErrorKind::TransferFailed, &format!("open '{}'", remote)))?;
            let mut local_file = File::create(local)?;
            Ok(io::copy(&mut remote_file, &mut local_file)?)
        });
        self.lifecycle.track(copied)
    }

    pub fn upload(&mut self, local: &Path, remote: &str) -> TransferResult<u64> {
        self.lifecycle.advance(SessionState::Transferring)?;
        info!("Uploading file: {}", local.display());
        let copied = self.channel().and_then(|sftp| {
            let mut local_file = File::open(local)?;
            let mut remote_file = sftp
                .create(Path::new(remote))
                .map_err(|e| map_ssh_error(e, TransferErrorKind::TransferFailed, &format!("create '{}'", remote)))?;
            Ok(io::copy(&mut local_file, &mut remote_file)?)
        });
        self.lifecycle.track(copied)
    }

    /// Close explicitly. Dropping the session does the same.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if !self.lifecycle.begin_close() {
            return;
        }
        // Sub-channel before transport.
        drop(self.sftp.take());
        if self.handshaken {
            if let Err(e) = self.session.disconnect(None, "Client disconnecting", None) {
                debug!("SSH disconnect failed (socket closed anyway): {}", e);
            }
        }
        self.lifecycle.finish_close();
    }
}

impl Drop for SftpSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
