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

//! Line-oriented batch audit over JSON Lines input
//!
//! Each call owns one [`VectorProcessingContext`]; the `vector-audit` binary
//! runs one call per worker and merges the returned stats.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::{RawVector, Vector};
use crate::monitoring::ProcessingStats;
use crate::vector::context::VectorProcessingContext;
use crate::vector::normalizer::EmbeddingNormalizer;
use crate::vector::observer::VectorObserver;
use crate::vector::parser::read_values;

/// Which trust path the batch takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditMode {
    /// Reject anything malformed or mis-sized
    Parse,
    /// Repair dimensions and normalize
    Convert,
}

/// Result for one input line, written as one JSON Lines record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineOutcome {
    /// 1-based line number in the input
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LineOutcome {
    fn accepted(line: usize, vector: Vector) -> Self {
        Self {
            line,
            vector: Some(vector),
            error: None,
        }
    }

    fn failed(line: usize, error: impl ToString) -> Self {
        Self {
            line,
            vector: None,
            error: Some(error.to_string()),
        }
    }
}

/// Audit `(line_number, text)` pairs with a fresh context.
///
/// Blank lines are skipped. Invalid JSON is handed to the parser as an
/// unsupported shape so it is counted like any other bad vector. In convert
/// mode, lines that cannot be lifted into numbers are skipped, since there is
/// nothing for the normalizer to repair.
pub fn audit_lines(
    label: &str,
    lines: Vec<(usize, String)>,
    mode: AuditMode,
    normalizer: &EmbeddingNormalizer,
    observer: Arc<dyn VectorObserver>,
) -> (Vec<LineOutcome>, ProcessingStats) {
    let mut ctx = VectorProcessingContext::with_observer(label, observer);
    let expected = normalizer.config().target_dimensions;
    let mut outcomes = Vec::with_capacity(lines.len());

    for (line, text) in lines {
        if text.trim().is_empty() {
            ctx.skip_vector();
            continue;
        }

        let raw = serde_json::from_str::<RawVector>(&text).unwrap_or_else(|e| {
            tracing::debug!("Line {} is not valid JSON: {}", line, e);
            RawVector::Unsupported("malformed_json")
        });

        match mode {
            AuditMode::Parse => match ctx.process_vector_detailed(raw, expected) {
                Ok(vector) => outcomes.push(LineOutcome::accepted(line, vector)),
                Err(rejection) => outcomes.push(LineOutcome::failed(line, rejection)),
            },
            AuditMode::Convert => match read_values(raw) {
                Ok(values) => match ctx.convert_vector(&values, normalizer) {
                    Ok(vector) => outcomes.push(LineOutcome::accepted(line, vector)),
                    Err(e) => outcomes.push(LineOutcome::failed(line, e)),
                },
                Err(rejection) => {
                    tracing::warn!("Line {} skipped, not a numeric vector: {}", line, rejection);
                    ctx.skip_vector();
                    outcomes.push(LineOutcome::failed(line, rejection));
                }
            },
        }
    }

    ctx.log_stats();
    (outcomes, ctx.into_stats())
}

/// Split numbered lines into at most `workers` contiguous chunks, preserving order
pub fn chunk_lines(lines: Vec<(usize, String)>, workers: usize) -> Vec<Vec<(usize, String)>> {
    if lines.is_empty() {
        return Vec::new();
    }
    let workers = workers.max(1);
    let chunk_size = (lines.len() + workers - 1) / workers;

    let mut chunks = Vec::with_capacity(workers);
    let mut iter = lines.into_iter().peekable();
    while iter.peek().is_some() {
        chunks.push(iter.by_ref().take(chunk_size).collect());
    }
    chunks
}
