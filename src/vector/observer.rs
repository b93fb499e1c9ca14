/*
 * Copyright 2025 Vijaykumar Singh
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Diagnostic events emitted by the vector pipeline
//!
//! The parser, normalizer and processing context never call a logging backend
//! directly. They report [`VectorEvent`]s to an injected [`VectorObserver`];
//! production wiring uses [`TracingObserver`], tests plug in a recorder.

use std::sync::Arc;

use crate::core::{ConversionError, ParseRejection};
use crate::monitoring::StatsSummary;
use crate::vector::normalizer::ReshapeStrategy;

#[derive(Debug, Clone, PartialEq)]
pub enum VectorEvent {
    /// Parser accepted a vector
    Parsed { shape: &'static str, dimensions: usize },
    /// Parser refused a vector (routine, low severity)
    ParseRejected {
        shape: &'static str,
        rejection: ParseRejection,
    },
    /// Normalizer changed the dimensionality of its input
    ConversionApplied {
        from: usize,
        to: usize,
        strategy: ReshapeStrategy,
    },
    /// Normalizer got an all-zero vector and skipped the division
    ZeroMagnitude { dimensions: usize },
    /// Normalizer scaled the vector to unit length; `magnitude` is the pre-scale norm
    Normalized { dimensions: usize, magnitude: f64 },
    /// Normalizer guard tripped (high severity)
    ConversionFailed { error: ConversionError },
    /// End-of-batch statistics from a processing context
    BatchSummary { label: String, summary: StatsSummary },
}

/// Sink for pipeline diagnostics
pub trait VectorObserver: Send + Sync {
    fn on_event(&self, event: &VectorEvent);
}

/// Routes events to `tracing` at a severity matching their operational weight
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl VectorObserver for TracingObserver {
    fn on_event(&self, event: &VectorEvent) {
        match event {
            VectorEvent::Parsed { shape, dimensions } => {
                tracing::trace!(shape = *shape, dimensions = *dimensions, "Parsed vector");
            }
            VectorEvent::ParseRejected {
                shape,
                rejection: ParseRejection::Absent,
            } => {
                tracing::debug!(shape = *shape, "No vector data, skipping");
            }
            VectorEvent::ParseRejected { shape, rejection } => {
                tracing::warn!(
                    shape = *shape,
                    reason = rejection.kind(),
                    "⚠️  Rejected vector: {}",
                    rejection
                );
            }
            VectorEvent::ConversionApplied { from, to, strategy } => {
                tracing::info!(
                    from = *from,
                    to = *to,
                    strategy = strategy.name(),
                    "🔧 Dimension mismatch detected, converted embedding {} -> {}",
                    from,
                    to
                );
            }
            VectorEvent::ZeroMagnitude { dimensions } => {
                tracing::warn!(
                    dimensions = *dimensions,
                    "⚠️  Zero-magnitude embedding, skipping normalization"
                );
            }
            VectorEvent::Normalized {
                dimensions,
                magnitude,
            } => {
                tracing::debug!(
                    dimensions = *dimensions,
                    magnitude = *magnitude,
                    "Normalized embedding (magnitude before scaling: {:.6})",
                    magnitude
                );
            }
            VectorEvent::ConversionFailed { error } => {
                tracing::error!(guard = error.kind(), "❌ Embedding conversion failed: {}", error);
            }
            VectorEvent::BatchSummary { label, summary } => {
                tracing::info!(batch = %label, "📊 Vector processing stats: {}", summary);
            }
        }
    }
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl VectorObserver for NoopObserver {
    fn on_event(&self, _event: &VectorEvent) {}
}

pub(crate) fn default_observer() -> Arc<dyn VectorObserver> {
    Arc::new(TracingObserver)
}
