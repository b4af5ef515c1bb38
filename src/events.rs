//! View events emitted by a chart session.
//!
//! A session pushes events into a channel; the embedding UI polls the
//! receiving end from its own loop and redraws as needed.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use crate::fetch::{FetchError, Generation};
use crate::sampling::SamplingRate;
use crate::state::{DateRange, NavigationState, Reading};

/// Something the view should react to
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEvent {
    /// The visible window moved
    RangeChanged {
        range: DateRange,
        navigation: NavigationState,
    },
    /// A finer rate fits the current window; the user may opt in
    UpgradeAvailable { rate: SamplingRate },
    /// The active rate changed
    RateChanged { rate: SamplingRate },
    /// Fresh readings for the current window, already downsampled.
    /// Shares its buffer with the session.
    ReadingsReady {
        generation: Generation,
        rate: SamplingRate,
        readings: Arc<[Reading]>,
    },
    /// The latest fetch failed; the previous readings stay on screen
    FetchFailed {
        generation: Generation,
        error: FetchError,
    },
}

/// Sending half held by a session
#[derive(Clone, Debug)]
pub struct EventSink {
    tx: Sender<ViewEvent>,
}

impl EventSink {
    /// Push an event. A disconnected receiver is not an error; the view
    /// has simply gone away.
    pub fn emit(&self, event: ViewEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("View event dropped: receiver disconnected");
        }
    }
}

/// Receiving half polled by the view
#[derive(Debug)]
pub struct EventQueue {
    rx: Receiver<ViewEvent>,
}

impl EventQueue {
    /// Check if there's a pending event and return it
    pub fn poll(&self) -> Option<ViewEvent> {
        self.rx.try_recv().ok()
    }

    /// Take every pending event
    pub fn drain(&self) -> Vec<ViewEvent> {
        self.rx.try_iter().collect()
    }
}

/// Create a connected sink/queue pair
pub fn channel() -> (EventSink, EventQueue) {
    let (tx, rx) = mpsc::channel();
    (EventSink { tx }, EventQueue { rx })
}
