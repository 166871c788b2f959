use crate::game::types::SessionId;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{mpsc, Notify};

pub(crate) const OUTBOUND_HI_CAPACITY: usize = 64;
pub(crate) const OUTBOUND_LO_CAPACITY: usize = 32;

/// Single-slot mailbox for world snapshots. A newer frame replaces an unsent
/// one, so a slow socket skips ticks instead of queueing them.
#[derive(Debug)]
pub struct LatestFrame {
    frame: StdMutex<Option<Arc<str>>>,
    notify: Notify,
}

impl LatestFrame {
    pub(crate) fn new() -> Self {
        Self {
            frame: StdMutex::new(None),
            notify: Notify::new(),
        }
    }

    pub(crate) fn store(&self, payload: Arc<str>) {
        *self.frame.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload);
        self.notify.notify_one();
    }

    pub(crate) fn take_latest(&self) -> Option<Arc<str>> {
        self.frame.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    pub(crate) async fn wait_for_update(&self) {
        self.notify.notified().await;
    }
}

/// Room-side half of a session's outbox.
#[derive(Debug)]
pub(crate) struct SessionEntry {
    pub(crate) outbound_state: Arc<LatestFrame>,
    pub(crate) outbound_hi: mpsc::Sender<String>,
    pub(crate) outbound_lo: mpsc::Sender<String>,
}

/// Transport-side half of a session's outbox.
#[derive(Debug)]
pub struct SessionIo {
    pub session_id: SessionId,
    pub outbound_state: Arc<LatestFrame>,
    pub outbound_hi_rx: mpsc::Receiver<String>,
    pub outbound_lo_rx: mpsc::Receiver<String>,
}

pub(crate) fn session_pair(session_id: SessionId) -> (SessionEntry, SessionIo) {
    let outbound_state = Arc::new(LatestFrame::new());
    let (outbound_hi, outbound_hi_rx) = mpsc::channel(OUTBOUND_HI_CAPACITY);
    let (outbound_lo, outbound_lo_rx) = mpsc::channel(OUTBOUND_LO_CAPACITY);
    (
        SessionEntry {
            outbound_state: Arc::clone(&outbound_state),
            outbound_hi,
            outbound_lo,
        },
        SessionIo {
            session_id,
            outbound_state,
            outbound_hi_rx,
            outbound_lo_rx,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_frame_keeps_only_newest_payload() {
        let frame = LatestFrame::new();
        frame.store(Arc::from("first"));
        frame.store(Arc::from("second"));
        assert_eq!(frame.take_latest().as_deref(), Some("second"));
        assert!(frame.take_latest().is_none());
    }
}
