//! # Check Reporting
//!
//! The probe reports each scenario through a [`Reporter`]: one assertion on
//! the receive return value, followed by a success record when the
//! assertion held. Reporter calls return nothing to the probe.
//!
//! [`CheckLog`] is the reporter used by the harness. It logs every call via
//! `tracing` and keeps the records for the final [`CheckSummary`].

use std::fmt;
use std::sync::{Mutex, MutexGuard};

/// Assertion sink for the probe's scenarios.
pub trait Reporter: Send + Sync + 'static {
    /// Record that `actual` was required to equal `expected`.
    fn assert_eq(&self, scenario: &str, name: &str, actual: isize, expected: isize);

    /// Record that `actual` was required to differ from `expected`.
    fn assert_ne(&self, scenario: &str, name: &str, actual: isize, expected: isize);

    /// Record that `scenario` completed successfully.
    fn success(&self, scenario: &str);
}

/// Kind of a recorded check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    AssertEq,
    AssertNe,
    Success,
}

/// One reporter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    pub scenario: String,
    /// Assertion name; empty for success records.
    pub name: String,
    pub kind: CheckKind,
    pub actual: isize,
    pub expected: isize,
    pub passed: bool,
}

/// Pass/fail tally over a [`CheckLog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    /// Scenarios that recorded a success.
    pub passed: usize,
    /// Assertions that did not hold.
    pub failed: usize,
}

impl CheckSummary {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} passed, {} failed", self.passed, self.failed)
    }
}

/// Recording reporter backed by `tracing`.
#[derive(Debug, Default)]
pub struct CheckLog {
    records: Mutex<Vec<CheckRecord>>,
}

impl CheckLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, in order.
    pub fn records(&self) -> Vec<CheckRecord> {
        self.lock().clone()
    }

    pub fn summary(&self) -> CheckSummary {
        let records = self.lock();
        CheckSummary {
            passed: records
                .iter()
                .filter(|r| r.kind == CheckKind::Success)
                .count(),
            failed: records.iter().filter(|r| !r.passed).count(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CheckRecord>> {
        // A panic while holding the lock cannot leave a half-written record.
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn push_assertion(
        &self,
        scenario: &str,
        name: &str,
        kind: CheckKind,
        actual: isize,
        expected: isize,
    ) {
        let passed = match kind {
            CheckKind::AssertEq => actual == expected,
            CheckKind::AssertNe => actual != expected,
            CheckKind::Success => true,
        };
        if passed {
            tracing::debug!(scenario, name, actual, expected, ?kind, "assertion held");
        } else {
            tracing::error!(scenario, name, actual, expected, ?kind, "assertion failed");
        }
        self.lock().push(CheckRecord {
            scenario: scenario.to_owned(),
            name: name.to_owned(),
            kind,
            actual,
            expected,
            passed,
        });
    }
}

impl Reporter for CheckLog {
    fn assert_eq(&self, scenario: &str, name: &str, actual: isize, expected: isize) {
        self.push_assertion(scenario, name, CheckKind::AssertEq, actual, expected);
    }

    fn assert_ne(&self, scenario: &str, name: &str, actual: isize, expected: isize) {
        self.push_assertion(scenario, name, CheckKind::AssertNe, actual, expected);
    }

    fn success(&self, scenario: &str) {
        tracing::info!(scenario, "PASS");
        self.lock().push(CheckRecord {
            scenario: scenario.to_owned(),
            name: String::new(),
            kind: CheckKind::Success,
            actual: 0,
            expected: 0,
            passed: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_successes_and_failed_assertions() {
        let log = CheckLog::new();
        log.assert_ne("recv_connected", "recv", 20, -1);
        log.success("recv_connected");
        log.assert_eq("recv_after_close", "recv", 5, -1);

        let summary = log.summary();
        assert_eq!(summary, CheckSummary { passed: 1, failed: 1 });
        assert!(!summary.all_passed());
        assert_eq!(summary.to_string(), "1 passed, 1 failed");

        let records = log.records();
        assert_eq!(records.len(), 3);
        assert!(records[0].passed);
        assert_eq!(records[1].kind, CheckKind::Success);
        assert!(!records[2].passed);
    }
}
