//! The playback operation handed out by `Movie::play`.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// How a playback operation finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The movie reached its end without repeat.
    Ended,
    /// `stop` was called or the movie was dropped.
    Stopped,
}

#[derive(Default)]
struct PlaybackState {
    outcome: Option<PlaybackOutcome>,
    waker: Option<Waker>,
}

/// Pending playback, resolved by the movie.
///
/// Clones observe the same operation. Await it from a single-threaded executor, or poll
/// [`Playback::outcome`] from a host loop.
#[derive(Clone, Default)]
pub struct Playback {
    state: Rc<RefCell<PlaybackState>>,
}

impl std::fmt::Debug for Playback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Playback")
            .field("outcome", &self.outcome())
            .finish()
    }
}

impl Playback {
    pub(crate) fn pending() -> Self {
        Self::default()
    }

    /// Outcome, once resolved.
    pub fn outcome(&self) -> Option<PlaybackOutcome> {
        self.state.borrow().outcome
    }

    /// Return `true` until the movie resolves the operation.
    pub fn is_pending(&self) -> bool {
        self.outcome().is_none()
    }

    /// Return `true` when `other` is a clone of this operation.
    pub fn same_operation(&self, other: &Playback) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Resolve once; later calls are ignored. Wakes and drops the stored waker.
    pub(crate) fn resolve(&self, outcome: PlaybackOutcome) -> bool {
        let waker = {
            let mut s = self.state.borrow_mut();
            if s.outcome.is_some() {
                return false;
            }
            s.outcome = Some(outcome);
            s.waker.take()
        };
        if let Some(w) = waker {
            w.wake();
        }
        true
    }
}

impl Future for Playback {
    type Output = PlaybackOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<PlaybackOutcome> {
        let mut s = self.state.borrow_mut();
        match s.outcome {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                s.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/movie/transport.rs"]
mod tests;
