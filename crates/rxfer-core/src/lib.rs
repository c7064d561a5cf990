//! # rxfer-core
//!
//! Protocol-agnostic remote file transfer layer:
//!   • Connection configuration and per-call credentials
//!   • Root-folder path resolution and normalisation
//!   • The six-primitive `TransferBackend` trait implemented by each protocol
//!   • The high-level `RemoteFileTransfer` contract (list / download / upload, single & batch)
//!   • Session lifecycle tracking and the shared batch runner
//!   • An in-memory backend for dry runs and tests

pub mod transfer;

pub use transfer::*;
