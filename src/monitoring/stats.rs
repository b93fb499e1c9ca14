// Copyright 2025 ProximaDB
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.

//! Per-batch vector processing counters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Counters for one batch run. Owned by a single worker; merge after fan-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total_processed: u64,
    pub valid_vectors: u64,
    pub invalid_vectors: u64,
    pub skipped_vectors: u64,
    /// Sum of dimensions over valid vectors, for the average
    pub dimension_sum: u64,
    pub started_at: DateTime<Utc>,
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            total_processed: 0,
            valid_vectors: 0,
            invalid_vectors: 0,
            skipped_vectors: 0,
            dimension_sum: 0,
            started_at: Utc::now(),
        }
    }

    pub fn record_valid(&mut self, dimensions: usize) {
        self.total_processed += 1;
        self.valid_vectors += 1;
        self.dimension_sum += dimensions as u64;
    }

    pub fn record_invalid(&mut self) {
        self.total_processed += 1;
        self.invalid_vectors += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped_vectors += 1;
    }

    /// Fold in counters from another worker's finished batch
    pub fn merge(&mut self, other: &ProcessingStats) {
        self.total_processed += other.total_processed;
        self.valid_vectors += other.valid_vectors;
        self.invalid_vectors += other.invalid_vectors;
        self.skipped_vectors += other.skipped_vectors;
        self.dimension_sum += other.dimension_sum;
        self.started_at = self.started_at.min(other.started_at);
    }

    /// Percentage of processed vectors that were valid; `None` before any were processed
    pub fn success_rate(&self) -> Option<f64> {
        if self.total_processed == 0 {
            None
        } else {
            Some(self.valid_vectors as f64 / self.total_processed as f64 * 100.0)
        }
    }

    pub fn average_dimensions(&self) -> Option<f64> {
        if self.valid_vectors == 0 {
            None
        } else {
            Some(self.dimension_sum as f64 / self.valid_vectors as f64)
        }
    }

    pub fn summary(&self) -> StatsSummary {
        let elapsed_ms = (Utc::now() - self.started_at).num_milliseconds().max(0) as u64;
        StatsSummary {
            total_processed: self.total_processed,
            valid_vectors: self.valid_vectors,
            invalid_vectors: self.invalid_vectors,
            skipped_vectors: self.skipped_vectors,
            success_rate: self.success_rate(),
            average_dimensions: self.average_dimensions(),
            elapsed_ms,
        }
    }
}

/// Snapshot emitted at the end of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_processed: u64,
    pub valid_vectors: u64,
    pub invalid_vectors: u64,
    pub skipped_vectors: u64,
    pub success_rate: Option<f64>,
    pub average_dimensions: Option<f64>,
    pub elapsed_ms: u64,
}

impl StatsSummary {
    /// `"50.00%"`, or `"0%"` when nothing was processed
    pub fn success_rate_display(&self) -> String {
        match self.success_rate {
            Some(rate) => format!("{:.2}%", rate),
            None => "0%".to_string(),
        }
    }

    pub fn average_dimensions_display(&self) -> String {
        match self.average_dimensions {
            Some(avg) => format!("{:.1}", avg),
            None => "N/A".to_string(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} valid={} invalid={} skipped={} success_rate={} avg_dimensions={} elapsed_ms={}",
            self.total_processed,
            self.valid_vectors,
            self.invalid_vectors,
            self.skipped_vectors,
            self.success_rate_display(),
            self.average_dimensions_display(),
            self.elapsed_ms
        )
    }
}
