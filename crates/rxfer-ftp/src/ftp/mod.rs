//! FTP connector.
//!
//! - `error`: suppaftp error translation
//! - `session`: scoped control connection (connect → login → work → QUIT)
//! - `connector`: `FtpTransferConnector`, the `TransferBackend` implementation

pub mod error;
pub mod session;
pub mod connector;

pub use connector::{FtpTransferConnector, DEFAULT_DOMAIN};
pub use session::login_name;
