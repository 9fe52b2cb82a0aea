//! In-process metrics for LLM calls and debates

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Global metrics collector
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total LLM calls
    pub llm_calls: AtomicU64,
    /// Total LLM errors
    pub llm_errors: AtomicU64,
    /// Total tokens used
    pub tokens_used: AtomicU64,
    /// Batch items attempted
    pub batch_items: AtomicU64,
    /// Batch items that came back as `None`
    pub batch_failures: AtomicU64,
    /// Debates that reached a judgment
    pub debates_completed: AtomicU64,
    /// Debates aborted by an agent failure
    pub debates_failed: AtomicU64,
    /// Responses or judgments that fell back to defaults
    pub parse_degradations: AtomicU64,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an LLM call
    pub fn record_llm_call(&self, tokens: u64, error: bool) {
        self.llm_calls.fetch_add(1, Ordering::Relaxed);
        self.tokens_used.fetch_add(tokens, Ordering::Relaxed);
        if error {
            self.llm_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record one batch item outcome
    pub fn record_batch_item(&self, succeeded: bool) {
        self.batch_items.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.batch_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a finished debate
    pub fn record_debate(&self, completed: bool) {
        if completed {
            self.debates_completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.debates_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a parse fallback
    pub fn record_parse_degradation(&self) {
        self.parse_degradations.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            llm_calls: self.llm_calls.load(Ordering::Relaxed),
            llm_errors: self.llm_errors.load(Ordering::Relaxed),
            tokens_used: self.tokens_used.load(Ordering::Relaxed),
            batch_items: self.batch_items.load(Ordering::Relaxed),
            batch_failures: self.batch_failures.load(Ordering::Relaxed),
            debates_completed: self.debates_completed.load(Ordering::Relaxed),
            debates_failed: self.debates_failed.load(Ordering::Relaxed),
            parse_degradations: self.parse_degradations.load(Ordering::Relaxed),
        }
    }

    /// Get LLM error rate
    pub fn llm_error_rate(&self) -> f64 {
        let total = self.llm_calls.load(Ordering::Relaxed);
        let errors = self.llm_errors.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            errors as f64 / total as f64
        }
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub llm_calls: u64,
    pub llm_errors: u64,
    pub tokens_used: u64,
    pub batch_items: u64,
    pub batch_failures: u64,
    pub debates_completed: u64,
    pub debates_failed: u64,
    pub parse_degradations: u64,
}

impl MetricsSnapshot {
    /// Export metrics in Prometheus text format
    pub fn to_prometheus(&self) -> String {
        let counters = [
            ("dialectic_llm_calls_total", "Total number of LLM API calls", self.llm_calls),
            ("dialectic_llm_errors_total", "Total number of LLM API errors", self.llm_errors),
            ("dialectic_tokens_used_total", "Total tokens consumed by LLM calls", self.tokens_used),
            ("dialectic_batch_items_total", "Batch completion items attempted", self.batch_items),
            ("dialectic_batch_failures_total", "Batch completion items that failed", self.batch_failures),
            ("dialectic_debates_completed_total", "Debates that reached a judgment", self.debates_completed),
            ("dialectic_debates_failed_total", "Debates aborted by an agent failure", self.debates_failed),
            ("dialectic_parse_degradations_total", "Responses parsed with fallback defaults", self.parse_degradations),
        ];

        let mut output = String::new();
        for (name, help, value) in counters {
            output.push_str(&format!("# HELP {} {}\n", name, help));
            output.push_str(&format!("# TYPE {} counter\n", name));
            output.push_str(&format!("{} {}\n", name, value));
        }

        let error_rate = if self.llm_calls > 0 {
            self.llm_errors as f64 / self.llm_calls as f64
        } else {
            0.0
        };
        output.push_str("# HELP dialectic_llm_error_rate Current LLM error rate\n");
        output.push_str("# TYPE dialectic_llm_error_rate gauge\n");
        output.push_str(&format!("dialectic_llm_error_rate {:.4}\n", error_rate));

        output
    }
}

/// Global metrics instance
static GLOBAL_METRICS: std::sync::OnceLock<Arc<Metrics>> = std::sync::OnceLock::new();

/// Get or initialize global metrics
pub fn global_metrics() -> Arc<Metrics> {
    GLOBAL_METRICS
        .get_or_init(|| Arc::new(Metrics::new()))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let metrics = Metrics::new();

        metrics.record_llm_call(100, false);
        metrics.record_llm_call(50, true);
        metrics.record_batch_item(true);
        metrics.record_batch_item(false);
        metrics.record_debate(true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.llm_calls, 2);
        assert_eq!(snapshot.llm_errors, 1);
        assert_eq!(snapshot.tokens_used, 150);
        assert_eq!(snapshot.batch_items, 2);
        assert_eq!(snapshot.batch_failures, 1);
        assert_eq!(snapshot.debates_completed, 1);
        assert_eq!(metrics.llm_error_rate(), 0.5);
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = Metrics::new();
        metrics.record_llm_call(10, false);

        let text = metrics.snapshot().to_prometheus();
        assert!(text.contains("dialectic_llm_calls_total 1"));
        assert!(text.contains("# TYPE dialectic_llm_error_rate gauge"));
    }
}
