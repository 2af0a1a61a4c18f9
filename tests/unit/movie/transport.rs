use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::Wake;

use super::*;

#[derive(Default)]
struct CountingWaker(AtomicUsize);

impl Wake for CountingWaker {
    fn wake(self: Arc<Self>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn pending_until_resolved_then_ready() {
    let counter = Arc::new(CountingWaker::default());
    let waker = Waker::from(Arc::clone(&counter));
    let mut cx = Context::from_waker(&waker);

    let mut op = Playback::pending();
    assert!(Pin::new(&mut op).poll(&mut cx).is_pending());

    assert!(op.resolve(PlaybackOutcome::Stopped));
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    assert_eq!(
        Pin::new(&mut op).poll(&mut cx),
        Poll::Ready(PlaybackOutcome::Stopped)
    );
}

#[test]
fn resolves_only_once() {
    let op = Playback::pending();
    let clone = op.clone();
    assert!(clone.same_operation(&op));
    assert!(op.resolve(PlaybackOutcome::Stopped));
    assert!(!clone.resolve(PlaybackOutcome::Ended));
    assert_eq!(op.outcome(), Some(PlaybackOutcome::Stopped));
    assert!(!Playback::pending().same_operation(&op));
}

#[test]
fn resolve_without_poll_does_not_need_a_waker() {
    let op = Playback::pending();
    assert!(op.is_pending());
    op.resolve(PlaybackOutcome::Ended);
    assert!(!op.is_pending());
}
