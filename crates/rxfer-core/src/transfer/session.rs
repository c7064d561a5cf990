//! Per-primitive session lifecycle.
//!
//! Every primitive call walks one session through
//! `Unconnected → Authenticating → Ready → Transferring* → Closing → Closed`.
//! Any step may fail; a failed session still passes through `Closing` so the
//! connection is released.

use crate::transfer::error::{TransferError, TransferResult};
use log::trace;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconnected,
    Authenticating,
    Ready,
    Transferring,
    Closing,
    Closed,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    fn can_advance_to(self, next: SessionState) -> bool {
        use SessionState::*;
        match (self, next) {
            (Unconnected, Authenticating) => true,
            (Authenticating, Ready) => true,
            (Ready | Transferring, Transferring) => true,
            (Ready | Transferring, Closing) => true,
            (Failed, Closing) => true,
            (Closing, Closed) => true,
            (Closing | Closed, _) => false,
            (_, Failed) => true,
            // A connection that never authenticated can still be torn down.
            (Unconnected | Authenticating, Closing) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// State tracker owned by a connector's session guard.
#[derive(Debug)]
pub struct SessionLifecycle {
    label: String,
    state: SessionState,
    failed: bool,
}

impl SessionLifecycle {
    /// `label` identifies the session in log lines, e.g. `"sftp host:22"`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: SessionState::Unconnected,
            failed: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session went through `Failed` at some point.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn advance(&mut self, next: SessionState) -> TransferResult<()> {
        if !self.state.can_advance_to(next) {
            return Err(TransferError::protocol_error(format!(
                "{}: invalid session transition {} -> {}",
                self.label, self.state, next
            )));
        }
        trace!("{}: {} -> {}", self.label, self.state, next);
        if next == SessionState::Failed {
            self.failed = true;
        }
        self.state = next;
        Ok(())
    }

    /// Mark the session failed. No-op once closing has begun.
    pub fn fail(&mut self) {
        if !matches!(self.state, SessionState::Closing | SessionState::Closed) {
            let _ = self.advance(SessionState::Failed);
        }
    }

    /// Record an error from `result` as a failure, passing the result through.
    pub fn track<T>(&mut self, result: TransferResult<T>) -> TransferResult<T> {
        if result.is_err() {
            self.fail();
        }
        result
    }

    /// Drive the session to `Closing`. Returns `false` if it was already closing or closed,
    /// so guards release their resources exactly once.
    pub fn begin_close(&mut self) -> bool {
        if matches!(self.state, SessionState::Closing | SessionState::Closed) {
            return false;
        }
        self.advance(SessionState::Closing).is_ok()
    }

    pub fn finish_close(&mut self) {
        if self.state == SessionState::Closing {
            let _ = self.advance(SessionState::Closed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut lc = SessionLifecycle::new("test");
        lc.advance(SessionState::Authenticating).unwrap();
        lc.advance(SessionState::Ready).unwrap();
        lc.advance(SessionState::Transferring).unwrap();
        lc.advance(SessionState::Transferring).unwrap();
        assert!(lc.begin_close());
        lc.finish_close();
        assert_eq!(lc.state(), SessionState::Closed);
        assert!(lc.state().is_terminal());
        assert!(!lc.has_failed());
    }

    #[test]
    fn test_failure_still_closes() {
        let mut lc = SessionLifecycle::new("test");
        lc.advance(SessionState::Authenticating).unwrap();
        let r: TransferResult<()> = lc.track(Err(TransferError::auth_failed("bad password")));
        assert!(r.is_err());
        assert_eq!(lc.state(), SessionState::Failed);
        assert!(lc.begin_close());
        lc.finish_close();
        assert_eq!(lc.state(), SessionState::Closed);
        assert!(lc.has_failed());
    }

    #[test]
    fn test_close_happens_once() {
        let mut lc = SessionLifecycle::new("test");
        assert!(lc.begin_close());
        assert!(!lc.begin_close());
        lc.finish_close();
        assert!(!lc.begin_close());
    }

    #[test]
    fn test_rejects_skipping_authentication() {
        let mut lc = SessionLifecycle::new("test");
        assert!(lc.advance(SessionState::Transferring).is_err());
        assert_eq!(lc.state(), SessionState::Unconnected);
    }
}
