//! In-memory remote side.
//!
//! `MemoryBackend` keeps the "server" as a directory tree in memory while the
//! local side is the real filesystem, so the full contract (skip checks,
//! directory creation, batch abort) can be exercised without a network. Every
//! primitive call counts as one session and is recorded.

use crate::transfer::backend::{run_batch, TransferBackend};
use crate::transfer::error::{TransferError, TransferResult};
use crate::transfer::paths::{file_name_of, normalize_path, parent_of, to_posix};
use crate::transfer::types::{ConnectionConfig, Credentials, TransferTask};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// A primitive invocation as seen by the backend, with POSIX-rendered paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveCall {
    List(String),
    GetOne(String),
    GetMany(Vec<String>),
    PutOne(String),
    PutMany(Vec<String>),
    MakeDir(String),
}

#[derive(Default)]
struct MemoryState {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
    calls: Vec<PrimitiveCall>,
    sessions: usize,
    transferred: Vec<String>,
    fail_on: HashSet<String>,
}

pub struct MemoryBackend {
    config: ConnectionConfig,
    make_dir_supported: bool,
    state: Mutex<MemoryState>,
}

fn key(path: &Path) -> String {
    to_posix(&normalize_path(path))
}

impl MemoryBackend {
    /// The remote root and its ancestors exist from the start.
    pub fn new(config: ConnectionConfig) -> Self {
        let backend = Self {
            config,
            make_dir_supported: true,
            state: Mutex::new(MemoryState::default()),
        };
        let root = backend.config.remote_root().to_path_buf();
        backend.add_remote_dir(&root);
        backend
    }

    /// Behave like a protocol without directory creation.
    pub fn without_make_dir(mut self) -> Self {
        self.make_dir_supported = false;
        self
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Create a remote directory and any missing ancestors.
    pub fn add_remote_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state();
        let mut current = normalize_path(path.as_ref());
        loop {
            state.dirs.insert(key(&current));
            let parent = parent_of(&current);
            if parent == current {
                break;
            }
            current = parent;
        }
    }

    /// Place a file on the "server", creating its directory chain.
    pub fn add_remote_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = normalize_path(path.as_ref());
        self.add_remote_dir(parent_of(&path));
        self.state().files.insert(key(&path), content.into());
    }

    pub fn remote_file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.state().files.get(&key(path.as_ref())).cloned()
    }

    pub fn has_remote_dir(&self, path: impl AsRef<Path>) -> bool {
        self.state().dirs.contains(&key(path.as_ref()))
    }

    /// Make every transfer touching `remote` fail.
    pub fn fail_on(&self, remote: impl AsRef<Path>) {
        self.state().fail_on.insert(key(remote.as_ref()));
    }

    pub fn calls(&self) -> Vec<PrimitiveCall> {
        self.state().calls.clone()
    }

    /// Number of sessions opened so far (one per primitive call).
    pub fn sessions_opened(&self) -> usize {
        self.state().sessions
    }

    /// Remote paths of the files moved so far, in order, both directions.
    pub fn transferred(&self) -> Vec<String> {
        self.state().transferred.clone()
    }

    fn open_session(&self, call: PrimitiveCall) {
        let mut state = self.state();
        state.sessions += 1;
        state.calls.push(call);
    }

    fn check_failure(&self, remote_key: &str) -> TransferResult<()> {
        if self.state().fail_on.contains(remote_key) {
            return Err(TransferError::transfer_failed(format!(
                "Injected failure for {}",
                remote_key
            )));
        }
        Ok(())
    }

    fn fetch(&self, remote: &Path, local: &Path) -> TransferResult<()> {
        let remote_key = key(remote);
        self.check_failure(&remote_key)?;
        let content = self
            .state()
            .files
            .get(&remote_key)
            .cloned()
            .ok_or_else(|| TransferError::not_found(format!("No such remote file: {}", remote_key)))?;
        std::fs::write(local, content)?;
        self.state().transferred.push(remote_key);
        Ok(())
    }

    fn store(&self, local: &Path, remote: &Path) -> TransferResult<()> {
        let remote_key = key(remote);
        self.check_failure(&remote_key)?;
        let content = std::fs::read(local)?;
        let mut state = self.state();
        let parent = key(&parent_of(remote));
        if !state.dirs.contains(&parent) {
            return Err(TransferError::not_found(format!(
                "No such remote directory: {}",
                parent
            )));
        }
        state.files.insert(remote_key.clone(), content);
        state.transferred.push(remote_key);
        Ok(())
    }
}

fn task_keys(tasks: &[TransferTask]) -> Vec<String> {
    tasks.iter().map(|t| key(&t.remote)).collect()
}

impl TransferBackend for MemoryBackend {
    fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn protocol_name(&self) -> &'static str {
        "memory"
    }

    fn list(&self, _credentials: &Credentials, remote_dir: &Path) -> TransferResult<Vec<String>> {
        let dir = key(remote_dir);
        self.open_session(PrimitiveCall::List(dir.clone()));

        let state = self.state();
        if !state.dirs.contains(&dir) {
            return Err(TransferError::not_found(format!("No such remote directory: {}", dir)));
        }
        let is_child = |entry: &String| {
            let path = Path::new(entry);
            entry != &dir && key(&parent_of(path)) == dir
        };
        let mut names: Vec<String> = state
            .dirs
            .iter()
            .chain(state.files.keys())
            .filter(|e| is_child(e))
            .filter_map(|e| file_name_of(Path::new(e)))
            .collect();
        names.sort();
        Ok(names)
    }

    fn get_one(&self, _credentials: &Credentials, remote: &Path, local: &Path) -> TransferResult<()> {
        self.open_session(PrimitiveCall::GetOne(key(remote)));
        self.fetch(remote, local)
    }

    fn get_many(&self, _credentials: &Credentials, tasks: &[TransferTask]) -> TransferResult<()> {
        self.open_session(PrimitiveCall::GetMany(task_keys(tasks)));
        run_batch(tasks, |t| self.fetch(&t.remote, &t.local)).map(|_| ())
    }

    fn put_one(&self, _credentials: &Credentials, local: &Path, remote: &Path) -> TransferResult<()> {
        self.open_session(PrimitiveCall::PutOne(key(remote)));
        self.store(local, remote)
    }

    fn put_many(&self, _credentials: &Credentials, tasks: &[TransferTask]) -> TransferResult<()> {
        self.open_session(PrimitiveCall::PutMany(task_keys(tasks)));
        run_batch(tasks, |t| self.store(&t.local, &t.remote)).map(|_| ())
    }

    fn make_dir(&self, _credentials: &Credentials, remote_dir: &Path) -> TransferResult<()> {
        if !self.make_dir_supported {
            return Err(self.unsupported("make_dir"));
        }
        let dir = key(remote_dir);
        self.open_session(PrimitiveCall::MakeDir(dir.clone()));
        let mut state = self.state();
        if !state.dirs.contains(&key(&parent_of(remote_dir))) {
            return Err(TransferError::not_found(format!(
                "Cannot create {}: parent does not exist",
                dir
            )));
        }
        state.dirs.insert(dir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> MemoryBackend {
        MemoryBackend::new(ConnectionConfig::new("mem", 0, "srv/root", "").unwrap())
    }

    #[test]
    fn test_root_and_ancestors_exist() {
        let b = backend();
        assert!(b.has_remote_dir("srv/root"));
        assert!(b.has_remote_dir("srv"));
    }

    #[test]
    fn test_list_children_only() {
        let b = backend();
        b.add_remote_file("srv/root/a.csv", "a");
        b.add_remote_file("srv/root/sub/b.csv", "b");
        let creds = Credentials::new("u", "p");
        let names = b.list(&creds, Path::new("srv/root")).unwrap();
        assert_eq!(names, vec!["a.csv", "sub"]);
        assert_eq!(b.sessions_opened(), 1);
    }

    #[test]
    fn test_list_missing_dir_fails() {
        let b = backend();
        let creds = Credentials::new("u", "p");
        let err = b.list(&creds, Path::new("srv/nope")).unwrap_err();
        assert_eq!(err.kind, crate::transfer::TransferErrorKind::NotFound);
    }

    #[test]
    fn test_make_dir_can_be_disabled() {
        let b = backend().without_make_dir();
        let creds = Credentials::new("u", "p");
        assert!(b.make_dir(&creds, Path::new("srv/root/x")).unwrap_err().is_unsupported());
        assert_eq!(b.sessions_opened(), 0);
    }
}
