//! Translation of suppaftp errors into `TransferError`.
//!
//! The client's message text is kept verbatim; only the category is chosen
//! here, from the failing step.

use rxfer_core::{TransferError, TransferErrorKind};
use suppaftp::FtpError;

/// Categorise `err` raised while doing `context`.
///
/// Socket-level failures are always `ConnectionFailed`; anything else takes
/// the kind of the step that failed. Server replies keep their reply code.
pub fn map_ftp_error(err: FtpError, fallback: TransferErrorKind, context: &str) -> TransferError {
    let (kind, code) = match &err {
        FtpError::ConnectionError(_) => (TransferErrorKind::ConnectionFailed, None),
        FtpError::BadResponse => (TransferErrorKind::ProtocolError, None),
        FtpError::UnexpectedResponse(resp) => (fallback, u16::try_from(resp.status.code()).ok()),
        _ => (fallback, None),
    };
    let mapped = TransferError::new(kind, format!("{}: {}", context, err));
    match code {
        Some(code) => mapped.with_code(code),
        None => mapped,
    }
}
