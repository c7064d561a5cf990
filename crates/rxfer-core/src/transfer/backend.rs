//! Protocol primitives.
//!
//! A protocol binding implements [`TransferBackend`]; everything above the
//! primitives (root resolution, skip-existing, directory ensure) lives once in
//! [`crate::transfer::contract`]. All paths handed to a primitive are already
//! absolute with respect to the configured roots.
//!
//! Each primitive owns exactly one session: open, authenticate, do its unit of
//! work, close. Batch primitives reuse that one session for every task.

use crate::transfer::error::{TransferError, TransferResult};
use crate::transfer::types::{ConnectionConfig, Credentials, TransferTask};
use std::path::Path;

pub trait TransferBackend {
    fn config(&self) -> &ConnectionConfig;

    /// Short protocol name used in log lines and errors (`"ftp"`, `"sftp"`).
    fn protocol_name(&self) -> &'static str;

    /// Names of the entries in `remote_dir`, as the server reports them.
    fn list(&self, _credentials: &Credentials, _remote_dir: &Path) -> TransferResult<Vec<String>> {
        Err(self.unsupported("list"))
    }

    fn get_one(&self, _credentials: &Credentials, _remote: &Path, _local: &Path) -> TransferResult<()> {
        Err(self.unsupported("get_one"))
    }

    fn get_many(&self, _credentials: &Credentials, _tasks: &[TransferTask]) -> TransferResult<()> {
        Err(self.unsupported("get_many"))
    }

    fn put_one(&self, _credentials: &Credentials, _local: &Path, _remote: &Path) -> TransferResult<()> {
        Err(self.unsupported("put_one"))
    }

    fn put_many(&self, _credentials: &Credentials, _tasks: &[TransferTask]) -> TransferResult<()> {
        Err(self.unsupported("put_many"))
    }

    fn make_dir(&self, _credentials: &Credentials, _remote_dir: &Path) -> TransferResult<()> {
        Err(self.unsupported("make_dir"))
    }

    #[doc(hidden)]
    fn unsupported(&self, primitive: &str) -> TransferError {
        TransferError::unsupported(format!(
            "{} is not implemented for {}",
            primitive,
            self.protocol_name()
        ))
    }
}

/// Run `step` over `tasks` in order, inside the caller's session.
///
/// The first failure aborts the remaining tasks; the error comes back with the
/// tasks that completed before it and the task that failed. Nothing is rolled back.
pub fn run_batch<F>(tasks: &[TransferTask], mut step: F) -> TransferResult<usize>
where
    F: FnMut(&TransferTask) -> TransferResult<()>,
{
    for (idx, task) in tasks.iter().enumerate() {
        if let Err(e) = step(task) {
            return Err(e
                .with_completed(tasks[..idx].to_vec())
                .with_failed_task(task.clone()));
        }
    }
    Ok(tasks.len())
}
