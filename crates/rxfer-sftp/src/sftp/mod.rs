// ── rxfer-sftp / sftp module ──────────────────────────────────────────────────
//
//   • auth      – credential-driven authentication chain
//   • session   – scoped transport + SFTP channel guard
//   • connector – SftpTransferConnector (TransferBackend implementation)

pub mod auth;
pub mod session;
pub mod connector;

pub use connector::SftpTransferConnector;
