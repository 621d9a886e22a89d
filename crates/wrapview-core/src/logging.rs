//! Logging facilities for wrapview.
//!
//! Every crate in the workspace instruments itself with `tracing`. Nothing
//! here installs a subscriber; applications (and tests that want output) do
//! that themselves:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("wrapview::view=debug")
//!     .init();
//! ```

/// Span names used throughout wrapview for tracing.
pub mod span_names {
    /// One wrap-list reconciliation pass.
    pub const RECONCILE: &str = "wrapview::reconcile";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Foundation crate target.
    pub const CORE: &str = "wrapview_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "wrapview_core::signal";
    /// Idle task queue target.
    pub const TASK: &str = "wrapview_core::task";
    /// Sequence, selection and position models.
    pub const MODEL: &str = "wrapview::model";
    /// Wrap-list engine.
    pub const VIEW: &str = "wrapview::view";
    /// Item factories.
    pub const FACTORY: &str = "wrapview::factory";
    /// Configuration loading.
    pub const CONFIG: &str = "wrapview::config";
    /// Performance spans.
    pub const PERF: &str = "wrapview::perf";
}

/// A guard for timing an operation.
///
/// Enters an `info`-level span on [`targets::PERF`] for its lifetime and, on
/// drop, logs the elapsed time at `debug` level.
///
/// ```ignore
/// let _span = PerfSpan::new(span_names::RECONCILE);
/// // ... expensive work ...
/// ```
pub struct PerfSpan {
    name: &'static str,
    started: std::time::Instant,
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "wrapview::perf", "perf", operation = name);
        Self {
            name,
            started: std::time::Instant::now(),
            span: span.entered(),
        }
    }

    /// Time elapsed since the span was entered.
    pub fn elapsed(&self) -> std::time::Duration {
        self.started.elapsed()
    }
}

impl Drop for PerfSpan {
    fn drop(&mut self) {
        tracing::debug!(
            target: targets::PERF,
            operation = self.name,
            elapsed_us = self.started.elapsed().as_micros() as u64,
            "operation finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let span = PerfSpan::new("test_operation");
        assert!(span.elapsed() <= std::time::Duration::from_secs(60));
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [targets::SIGNAL, targets::TASK] {
            assert!(target.starts_with(targets::CORE));
        }
        for target in [targets::MODEL, targets::VIEW, targets::FACTORY, targets::CONFIG] {
            assert!(target.starts_with("wrapview::"));
        }
    }
}
