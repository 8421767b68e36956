//! Wakeup channel for render requests.
//!
//! The runtime blocks while idle. When `State::set()` or similar is called,
//! a wakeup signal is sent through this channel so the runtime re-renders
//! the document.
//!
//! The sender lives in a process-wide slot rather than a thread-local, so
//! state changed from spawned tokio tasks also wakes the runtime.

use std::sync::{PoisonError, RwLock};

use tokio::sync::mpsc;

/// Signals the runtime that something needs rendering.
#[derive(Clone, Debug)]
pub struct WakeupSender {
    tx: mpsc::Sender<()>,
}

impl WakeupSender {
    /// Send a wakeup signal.
    ///
    /// Non-blocking. A full buffer already guarantees a pending wakeup, and a
    /// closed receiver means the runtime is shutting down.
    pub fn send(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Held by the runtime event loop.
#[derive(Debug)]
pub struct WakeupReceiver {
    rx: mpsc::Receiver<()>,
}

impl WakeupReceiver {
    /// Wait for the next signal. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Drain queued signals. Returns whether any were pending.
    pub fn drain(&mut self) -> bool {
        let mut any = false;
        while self.rx.try_recv().is_ok() {
            any = true;
        }
        any
    }
}

/// Connected sender and receiver.
pub fn channel() -> (WakeupSender, WakeupReceiver) {
    // Small buffer - one pending signal is enough to trigger a render
    let (tx, rx) = mpsc::channel(16);
    (WakeupSender { tx }, WakeupReceiver { rx })
}

static WAKEUP_SENDER: RwLock<Option<WakeupSender>> = RwLock::new(None);

/// Install the wakeup sender. Called by the runtime when it starts.
pub fn install_sender(sender: WakeupSender) {
    *WAKEUP_SENDER.write().unwrap_or_else(PoisonError::into_inner) = Some(sender);
}

/// Remove the wakeup sender. Called by the runtime when it exits.
pub fn uninstall_sender() {
    *WAKEUP_SENDER.write().unwrap_or_else(PoisonError::into_inner) = None;
}

/// Request a render if a runtime is running.
///
/// Called by `State::set()`, `State::update()`, etc. Does nothing when no
/// runtime is active.
pub fn request_render() {
    let guard = WAKEUP_SENDER.read().unwrap_or_else(PoisonError::into_inner);
    if let Some(sender) = guard.as_ref() {
        sender.send();
    }
}
