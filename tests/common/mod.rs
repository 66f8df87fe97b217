//! Shared utilities for integration and load testing.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Error returned by scripted operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure(pub &'static str);

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counts how often an operation was invoked.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst)
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// An operation that always fails, counting its calls.
pub fn always_failing(
    counter: &CallCounter,
    label: &'static str,
) -> impl Fn(()) -> Result<&'static str, Failure> + Send + Sync + 'static {
    let counter = counter.clone();
    move |_| {
        counter.hit();
        Err(Failure(label))
    }
}

/// An operation that always succeeds with `value`, counting its calls.
pub fn always_succeeding(
    counter: &CallCounter,
    value: &'static str,
) -> impl Fn(()) -> Result<&'static str, Failure> + Send + Sync + 'static {
    let counter = counter.clone();
    move |_| {
        counter.hit();
        Ok(value)
    }
}

/// An operation that follows `script` ('s' = success, 'f' = failure) and
/// succeeds once the script is exhausted.
#[allow(dead_code)]
pub fn scripted(
    counter: &CallCounter,
    script: &'static str,
) -> impl Fn(()) -> Result<&'static str, Failure> + Send + Sync + 'static {
    let counter = counter.clone();
    let steps: Vec<bool> = script.chars().map(|c| c == 's').collect();
    move |_| {
        let n = counter.hit();
        match steps.get(n) {
            Some(false) => Err(Failure("scripted failure")),
            _ => Ok("primary"),
        }
    }
}
