//! A single-slot notification area with timed dismissal.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Dismissed automatically after the configured delay.
    Transient,
    /// Stays until dismissed explicitly.
    Blocking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<Notification>,
    generation: u64,
}

/// Holds at most one notification. Showing a new one replaces the old
/// one and cancels its timer.
///
/// Transient notifications need a running tokio runtime.
pub struct Notifier {
    slot: Arc<Mutex<Slot>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    dismiss_after: Duration,
}

impl Notifier {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            timer: Mutex::new(None),
            dismiss_after,
        }
    }

    pub fn notify_transient<S: Into<String>>(&self, message: S) {
        let generation = self.show(message.into(), Severity::Transient);

        let slot = Arc::clone(&self.slot);
        let delay = self.dismiss_after;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut slot = lock(&slot);
            if slot.generation == generation {
                slot.current = None;
                debug!(generation, "Notification dismissed");
            }
        });
        self.replace_timer(Some(handle));
    }

    pub fn notify_blocking<S: Into<String>>(&self, message: S) {
        self.show(message.into(), Severity::Blocking);
        self.replace_timer(None);
    }

    pub fn current(&self) -> Option<Notification> {
        lock(&self.slot).current.clone()
    }

    pub fn dismiss(&self) {
        let mut slot = lock(&self.slot);
        slot.current = None;
        slot.generation += 1;
        drop(slot);
        self.replace_timer(None);
    }

    fn show(&self, message: String, severity: Severity) -> u64 {
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        slot.current = Some(Notification { message, severity });
        slot.generation
    }

    fn replace_timer(&self, handle: Option<JoinHandle<()>>) {
        let mut timer = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = std::mem::replace(&mut *timer, handle) {
            previous.abort();
        }
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}
