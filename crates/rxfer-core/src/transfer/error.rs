//! Transfer error type shared by every protocol backend.

use crate::transfer::types::TransferTask;
use std::fmt;

/// Categorised transfer error.
#[derive(Debug, Clone)]
pub struct TransferError {
    pub kind: TransferErrorKind,
    pub message: String,
    /// Protocol reply code that triggered the error, if any (FTP only).
    pub code: Option<u16>,
    /// Tasks of an aborted batch that completed before the failure, in order.
    pub completed: Vec<TransferTask>,
    /// The batch task that failed.
    pub failed_task: Option<TransferTask>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferErrorKind {
    /// Primitive not implemented by this protocol.
    Unsupported,
    /// TCP / DNS / handshake failure.
    ConnectionFailed,
    /// Wrong username, password or key.
    AuthFailed,
    /// Server rejected a command.
    CommandRejected,
    /// Transfer aborted or incomplete.
    TransferFailed,
    /// Server sent something we could not interpret.
    ProtocolError,
    /// Local file I/O failure.
    IoError,
    /// File or directory not found.
    NotFound,
    PermissionDenied,
    /// Config / parameter validation error.
    InvalidConfig,
    Unknown,
}

pub type TransferResult<T> = Result<T, TransferError>;

// ─── Construction helpers ────────────────────────────────────────────

impl TransferError {
    pub fn new(kind: TransferErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            code: None,
            completed: Vec::new(),
            failed_task: None,
        }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_completed(mut self, completed: Vec<TransferTask>) -> Self {
        self.completed = completed;
        self
    }

    pub fn with_failed_task(mut self, task: TransferTask) -> Self {
        self.failed_task = Some(task);
        self
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::new(TransferErrorKind::Unsupported, msg)
    }

    pub fn connection_failed(msg: impl Into<String>) -> Self {
        Self::new(TransferErrorKind::ConnectionFailed, msg)
    }

    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::new(TransferErrorKind::AuthFailed, msg)
    }

    pub fn command_rejected(code: u16, msg: impl Into<String>) -> Self {
        Self::new(TransferErrorKind::CommandRejected, msg).with_code(code)
    }

    pub fn transfer_failed(msg: impl Into<String>) -> Self {
        Self::new(TransferErrorKind::TransferFailed, msg)
    }

    pub fn protocol_error(msg: impl Into<String>) -> Self {
        Self::new(TransferErrorKind::ProtocolError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(TransferErrorKind::IoError, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(TransferErrorKind::NotFound, msg)
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(TransferErrorKind::InvalidConfig, msg)
    }

    pub fn is_unsupported(&self) -> bool {
        self.kind == TransferErrorKind::Unsupported
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.code {
            write!(f, "[{:?} {}] {}", self.kind, code, self.message)?;
        } else {
            write!(f, "[{:?}] {}", self.kind, self.message)?;
        }
        if let Some(task) = &self.failed_task {
            write!(f, " [failed on {}]", task.remote.display())?;
        }
        if !self.completed.is_empty() {
            write!(f, " ({} file(s) transferred before abort)", self.completed.len())?;
        }
        Ok(())
    }
}

impl std::error::Error for TransferError {}

impl From<std::io::Error> for TransferError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(e.to_string()),
            std::io::ErrorKind::PermissionDenied => {
                Self::new(TransferErrorKind::PermissionDenied, e.to_string())
            }
            _ => Self::io_error(e.to_string()),
        }
    }
}

impl From<TransferError> for String {
    fn from(e: TransferError) -> String {
        e.message
    }
}
