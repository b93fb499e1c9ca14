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

//! Batch wrapper that counts outcomes without changing them
//!
//! One context per batch run. Counters are plain fields behind `&mut self`;
//! parallel workers each own a context and merge [`ProcessingStats`] afterwards.

use std::sync::Arc;

use crate::core::{ConversionError, ParseRejection, RawVector, Vector};
use crate::monitoring::{ProcessingStats, StatsSummary};
use crate::vector::normalizer::EmbeddingNormalizer;
use crate::vector::observer::{default_observer, VectorEvent, VectorObserver};
use crate::vector::parser::VectorParser;

pub struct VectorProcessingContext {
    label: String,
    parser: VectorParser,
    observer: Arc<dyn VectorObserver>,
    stats: ProcessingStats,
}

impl VectorProcessingContext {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_observer(label, default_observer())
    }

    /// Context whose parser and summary share one observer
    pub fn with_observer(label: impl Into<String>, observer: Arc<dyn VectorObserver>) -> Self {
        Self {
            label: label.into(),
            parser: VectorParser::with_observer(observer.clone()),
            observer,
            stats: ProcessingStats::new(),
        }
    }

    pub fn with_parser(
        label: impl Into<String>,
        parser: VectorParser,
        observer: Arc<dyn VectorObserver>,
    ) -> Self {
        Self {
            label: label.into(),
            parser,
            observer,
            stats: ProcessingStats::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parse one vector, counting the outcome; returns exactly what the parser returns
    pub fn process_vector(
        &mut self,
        raw: impl Into<RawVector>,
        expected_dimensions: usize,
    ) -> Option<Vector> {
        self.process_vector_detailed(raw, expected_dimensions).ok()
    }

    /// [`process_vector`](Self::process_vector) keeping the rejection reason
    pub fn process_vector_detailed(
        &mut self,
        raw: impl Into<RawVector>,
        expected_dimensions: usize,
    ) -> Result<Vector, ParseRejection> {
        let result = self.parser.try_parse(raw, expected_dimensions);
        match &result {
            Ok(vector) => self.stats.record_valid(vector.len()),
            Err(_) => self.stats.record_invalid(),
        }
        result
    }

    /// Run one vector through the normalizer, counting the outcome
    pub fn convert_vector(
        &mut self,
        embedding: &[f64],
        normalizer: &EmbeddingNormalizer,
    ) -> Result<Vector, ConversionError> {
        let result = normalizer.convert(embedding);
        match &result {
            Ok(vector) => self.stats.record_valid(vector.len()),
            Err(_) => self.stats.record_invalid(),
        }
        result
    }

    /// Count a vector the caller chose not to attempt
    pub fn skip_vector(&mut self) {
        self.stats.record_skipped();
    }

    /// Emit the batch summary and return it
    pub fn log_stats(&self) -> StatsSummary {
        let summary = self.stats.summary();
        self.observer.on_event(&VectorEvent::BatchSummary {
            label: self.label.clone(),
            summary: summary.clone(),
        });
        summary
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    pub fn into_stats(self) -> ProcessingStats {
        self.stats
    }
}
