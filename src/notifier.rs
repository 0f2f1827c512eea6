//! One-shot hand-off of a confirmed selection from the filter screen to
//! the owner of the venue list.
//!
//! The notifier is consumed by [`SelectionNotifier::confirm`], so a
//! selection can be confirmed at most once. Dropping the notifier without
//! confirming (the screen was dismissed) is observed by the receiver as
//! `None`.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::time::Duration;

use tracing::debug;

use crate::selection::{Selection, SelectionState};

pub fn selection_channel() -> (SelectionNotifier, SelectionReceiver) {
    let (sender, receiver) = mpsc::sync_channel(1);
    (SelectionNotifier { sender }, SelectionReceiver { receiver })
}

#[derive(Debug)]
pub struct SelectionNotifier {
    sender: SyncSender<Selection>,
}
impl SelectionNotifier {
    /// Delivers the final selection. Returns false when nobody is listening anymore.
    pub fn confirm(self, selection: Selection) -> bool {
        debug!(
            predicate = selection.predicate().map(|p| p.name()),
            sort_key = selection.sort_key().map(|s| s.name()),
            "selection confirmed"
        );
        self.sender.send(selection).is_ok()
    }
    pub fn confirm_state(self, state: SelectionState) -> bool {
        self.confirm(state.into_selection())
    }
}

#[derive(Debug)]
pub struct SelectionReceiver {
    receiver: Receiver<Selection>,
}
impl SelectionReceiver {
    /// Blocks until the selection is confirmed, or the notifier is dropped.
    pub fn recv(self) -> Option<Selection> {
        self.receiver.recv().ok()
    }
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Selection> {
        match self.receiver.recv_timeout(timeout) {
            Ok(selection) => Some(selection),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
    /// Non-blocking poll, for owners that check once per event loop turn.
    pub fn try_recv(&self) -> Option<Selection> {
        match self.receiver.try_recv() {
            Ok(selection) => Some(selection),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
