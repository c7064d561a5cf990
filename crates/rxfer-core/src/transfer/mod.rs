//! Remote file transfer contract.
//!
//! Architecture:
//! - `types`: connection config, credentials, transfer tasks
//! - `error`: categorised transfer error
//! - `paths`: root resolution, lexical normalisation, POSIX rendering
//! - `session`: per-primitive session lifecycle state machine
//! - `backend`: the protocol primitive trait and the batch runner
//! - `contract`: high-level operations implemented once over any backend
//! - `memory`: in-memory remote side for dry runs and tests

pub mod types;
pub mod error;
pub mod paths;
pub mod session;
pub mod backend;
pub mod contract;
pub mod memory;

pub use types::*;
pub use error::{TransferError, TransferErrorKind, TransferResult};
pub use session::{SessionLifecycle, SessionState};
pub use backend::{run_batch, TransferBackend};
pub use contract::{RemoteFileTransfer, DEFAULT_DOWNLOAD_OVERWRITE, DEFAULT_UPLOAD_OVERWRITE};
pub use memory::{MemoryBackend, PrimitiveCall};
