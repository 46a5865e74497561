//! Outcome sinks: user notification and cache invalidation.
//!
//! Both are fire-and-forget collaborators the saga calls into after it
//! settles; nothing they do feeds back into the saga result.

use std::sync::{Arc, RwLock};

use common::CourseId;

/// Tag covering any cached course listing.
pub fn course_list_tag() -> &'static str {
    "courses"
}

/// Tag covering a cached single-course lookup.
pub fn course_tag(id: CourseId) -> String {
    format!("course:{id}")
}

/// Surfaces saga outcomes to the user.
pub trait NotificationSink: Send + Sync {
    fn notify_success(&self, message: &str);
    fn notify_failure(&self, message: &str);
}

/// Invalidates cached reads by tag.
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self, tag: &str);
}

/// Notification sink that records messages, for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifications {
    successes: Arc<RwLock<Vec<String>>>,
    failures: Arc<RwLock<Vec<String>>>,
}

impl RecordingNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Success messages in emission order.
    pub fn successes(&self) -> Vec<String> {
        self.successes.read().unwrap().clone()
    }

    /// Failure messages in emission order.
    pub fn failures(&self) -> Vec<String> {
        self.failures.read().unwrap().clone()
    }
}

impl NotificationSink for RecordingNotifications {
    fn notify_success(&self, message: &str) {
        self.successes.write().unwrap().push(message.to_string());
    }

    fn notify_failure(&self, message: &str) {
        self.failures.write().unwrap().push(message.to_string());
    }
}

/// Cache invalidator that records tags, for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingInvalidations {
    tags: Arc<RwLock<Vec<String>>>,
}

impl RecordingInvalidations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidated tags in call order.
    pub fn tags(&self) -> Vec<String> {
        self.tags.read().unwrap().clone()
    }
}

impl CacheInvalidator for RecordingInvalidations {
    fn invalidate(&self, tag: &str) {
        self.tags.write().unwrap().push(tag.to_string());
    }
}

/// Notification sink that logs through `tracing`, for server wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifications;

impl NotificationSink for TracingNotifications {
    fn notify_success(&self, message: &str) {
        tracing::info!(target: "notifications", %message, "success");
    }

    fn notify_failure(&self, message: &str) {
        tracing::warn!(target: "notifications", %message, "failure");
    }
}

/// Cache invalidator that logs through `tracing`, for server wiring.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingInvalidations;

impl CacheInvalidator for TracingInvalidations {
    fn invalidate(&self, tag: &str) {
        tracing::debug!(target: "cache", %tag, "invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_messages_in_order() {
        let sink = RecordingNotifications::new();
        sink.notify_success("first");
        sink.notify_failure("second");
        sink.notify_success("third");

        assert_eq!(sink.successes(), vec!["first", "third"]);
        assert_eq!(sink.failures(), vec!["second"]);
    }

    #[test]
    fn recording_invalidator_keeps_tags_in_order() {
        let cache = RecordingInvalidations::new();
        let id = CourseId::new();
        cache.invalidate(course_list_tag());
        cache.invalidate(&course_tag(id));

        assert_eq!(cache.tags(), vec!["courses".to_string(), format!("course:{id}")]);
    }
}
