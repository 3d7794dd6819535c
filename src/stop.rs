//! External stop signals shared by all runners.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Why a run ended before its iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopReason {
    Cancelled,
    TimeLimit,
}

/// Cancellation flag plus optional wall-clock budget, checked once per
/// iteration.
pub(crate) struct StopCondition {
    cancel: Option<Arc<AtomicBool>>,
    // Instant::now is only called when a limit is set; wasm32 hosts without
    // a clock never touch it.
    deadline: Option<(Instant, Duration)>,
}

impl StopCondition {
    pub(crate) fn new(cancel: Option<Arc<AtomicBool>>, time_limit_ms: Option<u64>) -> Self {
        Self {
            cancel,
            deadline: time_limit_ms.map(|ms| (Instant::now(), Duration::from_millis(ms))),
        }
    }

    pub(crate) fn check(&self) -> Option<StopReason> {
        if let Some(ref flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Some(StopReason::Cancelled);
            }
        }
        if let Some((start, limit)) = self.deadline {
            if start.elapsed() >= limit {
                return Some(StopReason::TimeLimit);
            }
        }
        None
    }
}
