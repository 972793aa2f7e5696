//! Diagnostics sinks for non-fatal anomalies.
//!
//! Population passes never abort on a bad reference. They report it here
//! and move on to the next one.

use crate::error::GraphError;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Receives anomalies that were skipped during population.
pub trait Diagnostics {
    fn report(&self, anomaly: &GraphError);
}

impl<T: Diagnostics + ?Sized> Diagnostics for Arc<T> {
    fn report(&self, anomaly: &GraphError) {
        (**self).report(anomaly)
    }
}

/// Default sink: one `warn!` per anomaly.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, anomaly: &GraphError) {
        warn!("{}", anomaly);
    }
}

/// Keeps every reported anomaly, in order.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    reported: Mutex<Vec<GraphError>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far.
    pub fn reported(&self) -> Vec<GraphError> {
        self.reported
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Human-readable messages for everything reported so far.
    pub fn messages(&self) -> Vec<String> {
        self.reported().iter().map(|e| e.to_string()).collect()
    }

    /// Forgets everything reported so far.
    pub fn clear(&self) {
        if let Ok(mut reported) = self.reported.lock() {
            reported.clear();
        }
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn report(&self, anomaly: &GraphError) {
        if let Ok(mut reported) = self.reported.lock() {
            reported.push(anomaly.clone());
        }
    }
}
