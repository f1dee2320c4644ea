//! Asynchronous message loading state
//!
//! The message text arrives from the scheduling collaborator some time after
//! the game starts. The core tracks the load as an explicit state machine and
//! hands out [`MessageReady`] futures so a consumer can defer audio preloading
//! until the words exist. Everything here is single-threaded (`Rc`), matching
//! the frame-driven host.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use serde::{Deserialize, Serialize};

/// Load state of the active message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum MessageState {
    #[default]
    NotLoaded,
    Loading,
    Ready,
    /// Load failed; the core runs with an empty word sequence
    Failed(String),
}

impl MessageState {
    pub fn is_ready(&self) -> bool {
        matches!(self, MessageState::Ready)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, MessageState::Loading)
    }
}

/// Identifies one load attempt; completions carrying an old ticket are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub(crate) generation: u64,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// How a [`MessageReady`] future resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyOutcome {
    /// Text is available with this many words
    Ready { word_count: usize },
    Failed(String),
    /// The load was superseded or the core destroyed
    Cancelled,
}

#[derive(Debug, Default)]
struct SignalInner {
    outcome: Option<ReadyOutcome>,
    wakers: Vec<Waker>,
}

/// Completion side of a readiness signal, owned by the world
#[derive(Debug, Clone, Default)]
pub(crate) struct ReadySignal {
    inner: Rc<RefCell<SignalInner>>,
}

impl ReadySignal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn resolved(outcome: ReadyOutcome) -> Self {
        let signal = Self::new();
        signal.resolve(outcome);
        signal
    }

    /// Resolve once; later calls are ignored
    pub(crate) fn resolve(&self, outcome: ReadyOutcome) {
        let wakers = {
            let mut inner = self.inner.borrow_mut();
            if inner.outcome.is_some() {
                return;
            }
            inner.outcome = Some(outcome);
            std::mem::take(&mut inner.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.inner.borrow().outcome.is_some()
    }

    pub(crate) fn future(&self) -> MessageReady {
        MessageReady {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Future resolving when the message load completes, fails or is cancelled
#[derive(Debug, Clone)]
pub struct MessageReady {
    inner: Rc<RefCell<SignalInner>>,
}

impl MessageReady {
    /// Non-blocking check
    pub fn outcome(&self) -> Option<ReadyOutcome> {
        self.inner.borrow().outcome.clone()
    }
}

impl Future for MessageReady {
    type Output = ReadyOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.inner.borrow_mut();
        match &inner.outcome {
            Some(outcome) => Poll::Ready(outcome.clone()),
            None => {
                if !inner.wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    inner.wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}
