//! High-level transfer operations, written once against [`TransferBackend`].
//!
//! Relative paths are resolved against the configured roots, the overwrite
//! policy is applied, and only then is a primitive invoked. A `false` return
//! means "nothing needed doing"; it is never used for failures.

use crate::transfer::backend::TransferBackend;
use crate::transfer::error::{TransferError, TransferResult};
use crate::transfer::paths::{file_name_of, normalize_path, parent_of, resolve};
use crate::transfer::types::{Credentials, TransferTask};
use log::{debug, info};
use std::collections::HashSet;
use std::path::Path;

/// Downloads overwrite local files unless told otherwise.
pub const DEFAULT_DOWNLOAD_OVERWRITE: bool = true;
/// Uploads never replace a remote file unless told to.
pub const DEFAULT_UPLOAD_OVERWRITE: bool = false;

pub trait RemoteFileTransfer: TransferBackend {
    /// Fetch one file. Returns `false` without touching the network when
    /// `overwrite` is off and the local file already exists.
    fn download_file(
        &self,
        credentials: &Credentials,
        remote_relpath: &str,
        local_relpath: &str,
        overwrite: bool,
    ) -> TransferResult<bool> {
        let cfg = self.config();
        let remote = resolve(cfg.remote_root(), remote_relpath);
        let local = resolve(cfg.local_root(), local_relpath);

        if !overwrite && local.exists() {
            debug!("Skipping download of {}: {} exists", remote.display(), local.display());
            return Ok(false);
        }

        info!("Connecting to {} as {}", cfg.endpoint(), credentials.username);
        self.get_one(credentials, &remote, &local)?;
        Ok(true)
    }

    /// Fetch `filenames` from one remote directory into one local directory over a
    /// single session. Returns `false` when every requested file is already present
    /// locally (and `overwrite` is off) or `filenames` is empty.
    fn download_file_list(
        &self,
        credentials: &Credentials,
        filenames: &[String],
        remote_relpath: &str,
        local_relpath: &str,
        overwrite: bool,
    ) -> TransferResult<bool> {
        let cfg = self.config();
        let remote_dir = resolve(cfg.remote_root(), remote_relpath);
        let local_dir = resolve(cfg.local_root(), local_relpath);

        let mut wanted = unique_in_order(filenames);
        if !overwrite {
            let existing = local_listing(&local_dir)?;
            wanted.retain(|name| {
                let keep = !existing.contains(name);
                if !keep {
                    debug!("Skipping {}: already in {}", name, local_dir.display());
                }
                keep
            });
        }

        if wanted.is_empty() {
            return Ok(false);
        }

        std::fs::create_dir_all(&local_dir)?;

        let tasks: Vec<TransferTask> = wanted
            .iter()
            .map(|name| TransferTask::new(remote_dir.join(name), local_dir.join(name)))
            .collect();

        info!("Connecting to {} as {}", cfg.endpoint(), credentials.username);
        self.get_many(credentials, &tasks)?;
        Ok(true)
    }

    /// Push one file. Returns `false` when `overwrite` is off and the remote
    /// directory already lists the target name.
    fn upload_file(
        &self,
        credentials: &Credentials,
        local_relpath: &str,
        remote_relpath: &str,
        overwrite: bool,
    ) -> TransferResult<bool> {
        let cfg = self.config();
        let remote = resolve(cfg.remote_root(), remote_relpath);
        let local = resolve(cfg.local_root(), local_relpath);

        info!("Connecting to {} as {}", cfg.endpoint(), credentials.username);

        if !overwrite {
            let name = file_name_of(&remote).ok_or_else(|| {
                TransferError::invalid_config(format!(
                    "Remote path '{}' has no file name",
                    remote.display()
                ))
            })?;
            let listing = self.list(credentials, &parent_of(&remote))?;
            if listing_contains(&listing, &name) {
                debug!("Skipping upload of {}: {} exists", local.display(), remote.display());
                return Ok(false);
            }
        }

        self.put_one(credentials, &local, &remote)?;
        Ok(true)
    }

    /// Push `filenames` from one local directory into one remote directory over a
    /// single session, creating the remote directory first if its parent does not
    /// list it.
    fn upload_file_list(
        &self,
        credentials: &Credentials,
        filenames: &[String],
        local_relpath: &str,
        remote_relpath: &str,
        overwrite: bool,
    ) -> TransferResult<bool> {
        let cfg = self.config();
        let remote_dir = resolve(cfg.remote_root(), remote_relpath);
        let local_dir = resolve(cfg.local_root(), local_relpath);

        info!("Connecting to {} as {}", cfg.endpoint(), credentials.username);

        let created = ensure_remote_dir(self, credentials, &remote_dir)?;

        let mut wanted = unique_in_order(filenames);
        // A directory created a moment ago is empty; no need to list it.
        if !overwrite && !created {
            let listing = self.list(credentials, &remote_dir)?;
            wanted.retain(|name| {
                let keep = !listing_contains(&listing, name);
                if !keep {
                    debug!("Skipping {}: already in {}", name, remote_dir.display());
                }
                keep
            });
        }

        if wanted.is_empty() {
            return Ok(false);
        }

        let tasks: Vec<TransferTask> = wanted
            .iter()
            .map(|name| TransferTask::new(remote_dir.join(name), local_dir.join(name)))
            .collect();

        self.put_many(credentials, &tasks)?;
        Ok(true)
    }

    /// Listing of `remote_relpath` under the remote root (the root itself when `None`),
    /// unfiltered and in server order.
    fn list_files(
        &self,
        credentials: &Credentials,
        remote_relpath: Option<&str>,
    ) -> TransferResult<Vec<String>> {
        let root = self.config().remote_root();
        let remote = match remote_relpath {
            Some(rel) => resolve(root, rel),
            None => normalize_path(root),
        };
        info!("Listing files in {}", remote.display());
        self.list(credentials, &remote)
    }
}

impl<T: TransferBackend + ?Sized> RemoteFileTransfer for T {}

// ─── Helpers ─────────────────────────────────────────────────────────

/// Create `remote_dir` if its parent does not list it. Returns whether it was created.
///
/// A directory without a final name component (`.`, `/`) is taken to exist.
fn ensure_remote_dir<B: TransferBackend + ?Sized>(
    backend: &B,
    credentials: &Credentials,
    remote_dir: &Path,
) -> TransferResult<bool> {
    let Some(name) = file_name_of(remote_dir) else {
        return Ok(false);
    };
    let listing = backend.list(credentials, &parent_of(remote_dir))?;
    if listing_contains(&listing, &name) {
        return Ok(false);
    }
    info!("Creating directory: {}", remote_dir.display());
    backend.make_dir(credentials, remote_dir)?;
    Ok(true)
}

/// Some servers answer a listing with paths rather than bare names; compare on
/// the final component.
fn listing_contains(listing: &[String], name: &str) -> bool {
    listing.iter().any(|entry| {
        entry == name || file_name_of(Path::new(entry)).as_deref() == Some(name)
    })
}

/// Names of the entries of a local directory; a missing directory is empty.
fn local_listing(dir: &Path) -> TransferResult<HashSet<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(e.into()),
    };
    let mut names = HashSet::new();
    for entry in entries {
        names.insert(entry?.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Set semantics with a deterministic order: first occurrence wins.
fn unique_in_order(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|n| seen.insert(n.as_str()))
        .cloned()
        .collect()
}
