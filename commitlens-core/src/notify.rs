//! Toast notifications
//!
//! Each notification becomes its own toast element with a fixed lifetime.
//! There is no queue and no dedup, so overlapping toasts simply stack.

use crate::document::Document;
use std::time::{Duration, Instant};

/// Default toast lifetime
pub const DEFAULT_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }

    /// Background class for the toast
    pub fn css_class(&self) -> &'static str {
        match self {
            NotificationKind::Info => "bg-blue-500",
            NotificationKind::Success => "bg-green-500",
            NotificationKind::Warning => "bg-yellow-500",
            NotificationKind::Error => "bg-red-500",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    /// Lifetime the rendered page uses to remove the toast
    pub ttl: Duration,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct Notifier {
    ttl: Duration,
    next_id: u64,
    active: Vec<Toast>,
}

impl Default for Notifier {
    fn default() -> Self {
        Notifier::new(DEFAULT_TTL)
    }
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Notifier {
            ttl,
            next_id: 1,
            active: Vec::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert a toast into the document; it expires `ttl` after `now`
    pub fn notify<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        message: impl Into<String>,
        kind: NotificationKind,
        now: Instant,
    ) -> u64 {
        let message = message.into();
        match kind {
            NotificationKind::Error => tracing::error!(kind = kind.as_str(), "{}", message),
            NotificationKind::Warning => tracing::warn!(kind = kind.as_str(), "{}", message),
            NotificationKind::Info | NotificationKind::Success => {
                tracing::info!(kind = kind.as_str(), "{}", message)
            }
        }

        let toast = Toast {
            id: self.next_id,
            message,
            kind,
            ttl: self.ttl,
            expires_at: now + self.ttl,
        };
        self.next_id += 1;
        document.append_toast(&toast);
        let id = toast.id;
        self.active.push(toast);
        id
    }

    /// Remove every toast whose lifetime has elapsed; returns how many were removed
    pub fn expire<D: Document + ?Sized>(&mut self, document: &mut D, now: Instant) -> usize {
        let before = self.active.len();
        self.active.retain(|toast| {
            if toast.expires_at <= now {
                document.remove_toast(toast.id);
                false
            } else {
                true
            }
        });
        before - self.active.len()
    }

    pub fn active(&self) -> &[Toast] {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageDocument;

    #[test]
    fn test_toasts_stack_without_dedup() {
        let mut doc = PageDocument::new();
        let mut notifier = Notifier::default();
        let now = Instant::now();

        notifier.notify(&mut doc, "Saved", NotificationKind::Success, now);
        notifier.notify(&mut doc, "Saved", NotificationKind::Success, now);

        assert_eq!(notifier.active().len(), 2);
        assert_eq!(doc.toasts().len(), 2);
        assert_ne!(doc.toasts()[0].id, doc.toasts()[1].id);
    }

    #[test]
    fn test_toasts_expire_after_ttl() {
        let mut doc = PageDocument::new();
        let mut notifier = Notifier::default();
        let start = Instant::now();

        notifier.notify(&mut doc, "first", NotificationKind::Info, start);
        notifier.notify(
            &mut doc,
            "second",
            NotificationKind::Error,
            start + Duration::from_secs(2),
        );

        assert_eq!(notifier.expire(&mut doc, start + Duration::from_millis(2999)), 0);
        assert_eq!(notifier.expire(&mut doc, start + DEFAULT_TTL), 1);
        assert_eq!(doc.toasts().len(), 1);
        assert_eq!(doc.toasts()[0].message, "second");

        assert_eq!(notifier.expire(&mut doc, start + Duration::from_secs(5)), 1);
        assert!(doc.toasts().is_empty());
    }

    #[test]
    fn test_kind_classes() {
        assert_eq!(NotificationKind::Success.css_class(), "bg-green-500");
        assert_eq!(NotificationKind::Error.css_class(), "bg-red-500");
        assert_eq!(NotificationKind::Warning.css_class(), "bg-yellow-500");
        assert_eq!(NotificationKind::Info.css_class(), "bg-blue-500");
    }
}
