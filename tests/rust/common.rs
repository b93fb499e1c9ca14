//! Common utilities for integration tests

use std::sync::{Arc, Mutex, Once};

use receiptvec::{VectorEvent, VectorObserver};

static INIT: Once = Once::new();

/// Initialize test logging once per test binary
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("receiptvec=debug")
            .with_test_writer()
            .try_init();
    });
}

/// Observer that keeps every event for later assertions
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<VectorEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<VectorEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, predicate: impl Fn(&VectorEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

impl VectorObserver for RecordingObserver {
    fn on_event(&self, event: &VectorEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// `n` copies of `value`
pub fn filled(n: usize, value: f64) -> Vec<f64> {
    vec![value; n]
}

/// Deterministic non-trivial vector: 0.01, -0.02, 0.03, ...
pub fn ramp(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let v = (i + 1) as f64 * 0.01;
            if i % 2 == 0 {
                v
            } else {
                -v
            }
        })
        .collect()
}

pub fn magnitude(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}
