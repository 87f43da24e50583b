//! Transient user notifications ("toasts").

use std::time::Duration;

use crate::cart::CartEvent;

/// How long a toast stays visible unless overridden.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);

/// A short message shown to the visitor and then dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub duration: Duration,
}

impl Notification {
    /// Notification with the default duration.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    /// Toast for a cart event. Quantity tweaks in the sidebar are silent.
    #[must_use]
    pub fn for_cart_event(event: &CartEvent) -> Option<Self> {
        match event {
            CartEvent::Added { name, .. } => Some(Self::new(format!("{name} added to cart!"))),
            CartEvent::Removed { .. } => Some(Self::new("Item removed from cart")),
            CartEvent::Increased { .. } | CartEvent::Decreased { .. } => None,
        }
    }
}
