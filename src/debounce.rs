//! Cancellable quiescence timer for deferred recomputation

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Restartable delay: each trigger supersedes the previous one, so a burst
/// of events produces a single deferred delivery after one full quiet
/// window.
///
/// Inside a tokio runtime the pending timer lives in a spawned task that is
/// aborted when superseded or when the debouncer drops. Without a runtime
/// there is no timer to arm, so the event is delivered to the channel right
/// away; triggering never panics.
pub struct Debouncer<T: Send + 'static> {
    window: Duration,
    tx: UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(window: Duration, tx: UnboundedSender<T>) -> Self {
        Self {
            window,
            tx,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Restart the timer; `event` is delivered once the window elapses with
    /// no further trigger. Outside a runtime the event is delivered
    /// immediately instead of panicking.
    pub fn trigger(&mut self, event: T) {
        self.cancel();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let tx = self.tx.clone();
                let window = self.window;
                self.pending = Some(handle.spawn(async move {
                    tokio::time::sleep(window).await;
                    // Receiver may be gone during teardown
                    let _ = tx.send(event);
                }));
            }
            Err(_) => {
                let _ = self.tx.send(event);
            }
        }
    }

    /// Drop the pending delivery, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while a delivery is scheduled and has not fired
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T: Send + 'static> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
