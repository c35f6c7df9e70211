use std::{
    fmt::Display,
    sync::{Mutex, PoisonError},
};

use log::*;
use rsk_common::OrderId;
use serde::{Deserialize, Serialize};

/// Riskified's decision on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Approved,
    Declined,
    Submitted,
    Captured,
    Error,
    /// Any status this version does not know about.
    #[serde(other)]
    Other,
}

impl Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::Submitted => "submitted",
            Self::Captured => "captured",
            Self::Error => "error",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(alias = "id")]
    pub order_id: OrderId,
    pub status: NotificationStatus,
    #[serde(default)]
    pub description: String,
}

/// Caller-supplied logic that acts on authenticated notifications.
///
/// Any `FnMut(Notification) + Send` closure is a handler.
pub trait NotificationHandler: Send {
    fn on_notification(&mut self, notification: Notification);
}

impl<F> NotificationHandler for F
where F: FnMut(Notification) + Send
{
    fn on_notification(&mut self, notification: Notification) {
        self(notification)
    }
}

/// Owns the handler and guarantees that at most one invocation runs at a time, across every server worker.
pub struct NotificationDispatcher {
    handler: Mutex<Box<dyn NotificationHandler>>,
}

impl NotificationDispatcher {
    pub fn new<H: NotificationHandler + 'static>(handler: H) -> Self {
        Self { handler: Mutex::new(Box::new(handler)) }
    }

    pub fn dispatch(&self, notification: Notification) {
        trace!("🔔️ Dispatching notification for order {}", notification.order_id);
        // A handler that panicked once is still given later notifications
        let mut handler = self.handler.lock().unwrap_or_else(PoisonError::into_inner);
        handler.on_notification(notification);
    }
}
