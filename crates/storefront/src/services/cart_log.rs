//! Cart store subscriber for structured logs and Sentry breadcrumbs.

use detach_core::{CartEntry, CartEvent, CartObserver};

use crate::error::add_breadcrumb;

/// Logs every cart mutation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CartObserver for TracingObserver {
    fn notify(&mut self, event: &CartEvent, entries: &[CartEntry]) {
        let entry = event.entry();
        let entry_id = entry.id().to_string();
        let title = entry.title();
        let (action, message) = match event {
            CartEvent::Added { .. } => ("added", "Added to cart"),
            CartEvent::Removed { .. } => ("removed", "Removed from cart"),
        };

        tracing::info!(
            action,
            entry_id = %entry_id,
            kind = %entry.kind(),
            title = %title,
            index = event.index(),
            cart_len = entries.len(),
            "Cart updated"
        );

        add_breadcrumb(
            "cart",
            message,
            Some(&[("entry_id", entry_id.as_str()), ("title", title.as_str())]),
        );
    }
}
