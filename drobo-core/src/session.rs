//! Command channel session state
//!
//! A session tracks:
//! - The ESA id the channel was opened for
//! - The handshake state machine (`Disconnected -> Handshaking -> Ready`)
//! - How many requests have been issued
//!
//! Any failure after I/O has started moves the session to `Failed`; a failed
//! session never becomes `Ready` again and the channel must be rebuilt.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not connected
    Disconnected,

    /// Connected, handshake sent, ack not yet received
    Handshaking,

    /// Handshake acknowledged, requests allowed
    Ready,

    /// A request or the handshake failed
    Failed,
}

/// Session manager
///
/// Thread-safe and can be cloned cheaply (Arc internally).
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    esa_id: String,

    requests: AtomicU64,

    state: parking_lot::RwLock<SessionState>,
}

impl Session {
    /// Create a disconnected session for `esa_id`
    pub fn new(esa_id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                esa_id: esa_id.into(),
                requests: AtomicU64::new(0),
                state: parking_lot::RwLock::new(SessionState::Disconnected),
            }),
        }
    }

    pub fn esa_id(&self) -> &str {
        &self.inner.esa_id
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        *self.inner.state.read()
    }

    /// Check if requests may be sent
    pub fn is_ready(&self) -> bool {
        matches!(self.state(), SessionState::Ready)
    }

    /// Mark the handshake as sent
    pub fn begin_handshake(&self) -> Result<()> {
        self.transition(SessionState::Disconnected, SessionState::Handshaking)
    }

    /// Mark the handshake as acknowledged
    pub fn complete_handshake(&self) -> Result<()> {
        self.transition(SessionState::Handshaking, SessionState::Ready)
    }

    /// Mark the session unusable after a protocol or I/O failure
    pub fn fail(&self) {
        *self.inner.state.write() = SessionState::Failed;
    }

    /// Close session
    pub fn close(&self) {
        *self.inner.state.write() = SessionState::Disconnected;
    }

    /// Check the session accepts requests
    pub fn ensure_ready(&self) -> Result<()> {
        match self.state() {
            SessionState::Ready => Ok(()),
            other => Err(Error::InvalidSessionState(format!(
                "Cannot send request in state: {:?}",
                other
            ))),
        }
    }

    /// Count a request and return its sequence number (starting at 1)
    pub fn next_request(&self) -> u64 {
        self.inner.requests.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Requests issued so far
    pub fn request_count(&self) -> u64 {
        self.inner.requests.load(Ordering::Acquire)
    }

    fn transition(&self, from: SessionState, to: SessionState) -> Result<()> {
        let mut state = self.inner.state.write();

        if *state != from {
            return Err(Error::InvalidSessionState(format!(
                "Cannot move to {:?} from state: {:?}",
                to, *state
            )));
        }

        *state = to;
        Ok(())
    }
}
