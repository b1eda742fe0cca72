//! Notifications and log lines emitted by contracts.

use std::cell::RefCell;
use std::rc::Rc;

use sidechain_core::UInt168;
use sidechain_vm::StackItem;

/// Raised by `Neo.Runtime.Notify`.
#[derive(Debug, Clone)]
pub struct NotifyEvent {
    /// The contract that emitted the notification.
    pub script_hash: UInt168,

    /// The item the script passed.
    pub state: StackItem,
}

/// Raised by `Neo.Runtime.Log`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub script_hash: UInt168,
    pub message: String,
}

#[derive(Debug, Default)]
struct Recorded {
    notifications: Vec<NotifyEvent>,
    logs: Vec<LogEvent>,
}

/// Collects the events of one execution. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    inner: Rc<RefCell<Recorded>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self, event: NotifyEvent) {
        self.inner.borrow_mut().notifications.push(event);
    }

    pub fn log(&self, event: LogEvent) {
        self.inner.borrow_mut().logs.push(event);
    }

    pub fn notifications(&self) -> Vec<NotifyEvent> {
        self.inner.borrow().notifications.clone()
    }

    pub fn logs(&self) -> Vec<LogEvent> {
        self.inner.borrow().logs.clone()
    }

    pub fn clear(&self) {
        let mut recorded = self.inner.borrow_mut();
        recorded.notifications.clear();
        recorded.logs.clear();
    }
}
