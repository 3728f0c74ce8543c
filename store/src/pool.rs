//! Admission pool for in-flight pulls and pushes.
//!
//! A key (`repo` or `repo:tag`) can be held by at most one transfer at a
//! time, whatever its kind. The pool has its own lock, separate from the
//! index lock, so a long transfer never blocks tag reads or writes.
//!
//! ```ignore
//! let signal = pool.acquire(TransferKind::Pull, "library/nginx")?;
//! // ... perform the pull ...
//! pool.release(TransferKind::Pull, "library/nginx");
//! ```

use std::collections::HashMap;

use a3s_tag_core::error::{Result, TagError};
use a3s_tag_core::event::{EventEmitter, TagEvent, TransferKind};
use parking_lot::Mutex;
use tokio::sync::watch;

/// Completion signal for one admitted transfer.
///
/// Cheap to clone; every clone observes the same single transition from
/// "in progress" to "finished".
#[derive(Debug, Clone)]
pub struct CompletionSignal {
    rx: watch::Receiver<bool>,
}

impl CompletionSignal {
    /// Whether the transfer has been released.
    pub fn is_finished(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the transfer is released.
    ///
    /// There is no timeout; wrap in `tokio::time::timeout` for a deadline.
    /// Also returns if the pool itself is dropped.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|finished| *finished).await;
    }
}

#[derive(Default)]
struct PoolState {
    pulling: HashMap<String, watch::Sender<bool>>,
    pushing: HashMap<String, watch::Sender<bool>>,
}

impl PoolState {
    fn pool_mut(&mut self, kind: TransferKind) -> &mut HashMap<String, watch::Sender<bool>> {
        match kind {
            TransferKind::Pull => &mut self.pulling,
            TransferKind::Push => &mut self.pushing,
        }
    }

    fn holder(&self, key: &str) -> Option<(TransferKind, &watch::Sender<bool>)> {
        if let Some(tx) = self.pulling.get(key) {
            return Some((TransferKind::Pull, tx));
        }
        self.pushing.get(key).map(|tx| (TransferKind::Push, tx))
    }
}

/// Per-key mutual exclusion between pulls and pushes.
#[derive(Default)]
pub struct AdmissionPool {
    state: Mutex<PoolState>,
    events: Option<EventEmitter>,
}

impl AdmissionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `TransferStarted`/`TransferFinished` events on `emitter`.
    pub fn with_events(mut self, emitter: EventEmitter) -> Self {
        self.events = Some(emitter);
        self
    }

    /// Admit a transfer of `kind` on `key`.
    ///
    /// Fails with `AlreadyInProgress`, naming the holder's kind, if any
    /// transfer already holds the key.
    pub fn acquire(&self, kind: TransferKind, key: &str) -> Result<CompletionSignal> {
        let mut state = self.state.lock();
        if let Some((held, _)) = state.holder(key) {
            return Err(TagError::AlreadyInProgress {
                kind: held.to_string(),
                key: key.to_string(),
            });
        }

        let (tx, rx) = watch::channel(false);
        state.pool_mut(kind).insert(key.to_string(), tx);
        drop(state);

        tracing::debug!(kind = %kind, key, "Transfer admitted");
        if let Some(events) = &self.events {
            events.emit(TagEvent::TransferStarted {
                kind,
                key: key.to_string(),
            });
        }
        Ok(CompletionSignal { rx })
    }

    /// Finish the transfer of `kind` on `key`, waking every waiter.
    ///
    /// Releasing a key not held under `kind` is a no-op.
    pub fn release(&self, kind: TransferKind, key: &str) {
        let removed = self.state.lock().pool_mut(kind).remove(key);
        let Some(tx) = removed else {
            return;
        };
        tx.send_replace(true);

        tracing::debug!(kind = %kind, key, "Transfer released");
        if let Some(events) = &self.events {
            events.emit(TagEvent::TransferFinished {
                kind,
                key: key.to_string(),
            });
        }
    }

    /// The transfer currently holding `key`, if any, with a signal that
    /// fires when it is released.
    pub fn in_progress(&self, key: &str) -> Option<(TransferKind, CompletionSignal)> {
        let state = self.state.lock();
        state
            .holder(key)
            .map(|(kind, tx)| (kind, CompletionSignal { rx: tx.subscribe() }))
    }

    /// Number of transfers of `kind` currently admitted.
    pub fn count(&self, kind: TransferKind) -> usize {
        let mut state = self.state.lock();
        state.pool_mut(kind).len()
    }
}

impl std::fmt::Debug for AdmissionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("AdmissionPool")
            .field("pulling", &state.pulling.keys().collect::<Vec<_>>())
            .field("pushing", &state.pushing.keys().collect::<Vec<_>>())
            .finish()
    }
}
