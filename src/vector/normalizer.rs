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

//! Embedding dimension repair and L2 normalization
//!
//! Used once the caller already trusts a vector enough to store it: guard
//! violations are hard errors ([`ConversionError`]) so corruption halts the
//! enclosing write instead of being skipped. Reshaping is deterministic:
//! - `n == t`: passthrough
//! - `n == legacy && t == 2 * legacy`: duplicate each element adjacently
//! - other `n < t`: scale by `sqrt(t / n)` and zero-pad
//! - `n == 2t`: average adjacent pairs
//! - other `n > t`: truncate
//!
//! The result is always L2-normalized, except for all-zero vectors which are
//! returned unchanged with a warning.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::core::{
    ConversionError, Vector, EMBEDDING_DIMENSIONS, LEGACY_EMBEDDING_DIMENSIONS,
    SUSPICIOUS_SIZE_FACTOR,
};
use crate::vector::observer::{default_observer, VectorEvent, VectorObserver};

type Result<T> = std::result::Result<T, ConversionError>;

/// Tunable constants for the normalizer.
///
/// The defaults are empirically chosen, not derived; keep them for
/// compatibility with vectors already in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    pub target_dimensions: usize,
    pub suspicious_size_factor: usize,
    pub legacy_dimensions: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            target_dimensions: EMBEDDING_DIMENSIONS,
            suspicious_size_factor: SUSPICIOUS_SIZE_FACTOR,
            legacy_dimensions: LEGACY_EMBEDDING_DIMENSIONS,
        }
    }
}

/// How an input of length `n` is reconciled with target `t`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReshapeStrategy {
    Passthrough,
    /// `[v0, v0, v1, v1, ...]`
    InterleaveDuplicate,
    /// Multiply by `scale`, then append zeros
    ScaledZeroPad { scale: f64 },
    /// `[(v0+v1)/2, (v2+v3)/2, ...]`
    PairAverage,
    /// Keep the first `t` elements
    Truncate,
}

impl ReshapeStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ReshapeStrategy::Passthrough => "passthrough",
            ReshapeStrategy::InterleaveDuplicate => "interleave_duplicate",
            ReshapeStrategy::ScaledZeroPad { .. } => "scaled_zero_pad",
            ReshapeStrategy::PairAverage => "pair_average",
            ReshapeStrategy::Truncate => "truncate",
        }
    }
}

/// Result of a conversion with the diagnostics callers may want to persist
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub vector: Vector,
    pub strategy: ReshapeStrategy,
    pub input_dimensions: usize,
    /// L2 magnitude after reshaping, before division
    pub magnitude: f64,
}

impl ConversionReport {
    pub fn is_zero_magnitude(&self) -> bool {
        self.magnitude == 0.0
    }
}

#[derive(Clone)]
pub struct EmbeddingNormalizer {
    config: NormalizerConfig,
    observer: Arc<dyn VectorObserver>,
}

impl Default for EmbeddingNormalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl std::fmt::Debug for EmbeddingNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingNormalizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EmbeddingNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self::with_observer(config, default_observer())
    }

    pub fn with_observer(config: NormalizerConfig, observer: Arc<dyn VectorObserver>) -> Self {
        Self { config, observer }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Reshape to the configured target and normalize
    pub fn convert(&self, embedding: &[f64]) -> Result<Vector> {
        self.convert_to(embedding, self.config.target_dimensions)
    }

    /// Reshape to `target_dimensions` and normalize
    pub fn convert_to(&self, embedding: &[f64], target_dimensions: usize) -> Result<Vector> {
        self.convert_detailed(embedding, target_dimensions)
            .map(|report| report.vector)
    }

    pub fn convert_detailed(
        &self,
        embedding: &[f64],
        target_dimensions: usize,
    ) -> Result<ConversionReport> {
        let result = self.run(embedding, target_dimensions);
        if let Err(error) = &result {
            self.observer.on_event(&VectorEvent::ConversionFailed {
                error: error.clone(),
            });
        }
        result
    }

    /// Pick the reshape path for an `n`-element input and target `t`
    pub fn plan(&self, n: usize, t: usize) -> ReshapeStrategy {
        if n == t {
            ReshapeStrategy::Passthrough
        } else if n < t {
            if n == self.config.legacy_dimensions && t == 2 * self.config.legacy_dimensions {
                ReshapeStrategy::InterleaveDuplicate
            } else {
                ReshapeStrategy::ScaledZeroPad {
                    scale: padding_scale(n, t),
                }
            }
        } else if n == 2 * t {
            ReshapeStrategy::PairAverage
        } else {
            ReshapeStrategy::Truncate
        }
    }

    fn run(&self, embedding: &[f64], target_dimensions: usize) -> Result<ConversionReport> {
        self.check_guards(embedding, target_dimensions)?;

        let n = embedding.len();
        let strategy = self.plan(n, target_dimensions);
        let mut vector = reshape(embedding, target_dimensions, strategy);

        if strategy != ReshapeStrategy::Passthrough {
            self.observer.on_event(&VectorEvent::ConversionApplied {
                from: n,
                to: vector.len(),
                strategy,
            });
        }

        if vector.len() != target_dimensions {
            return Err(ConversionError::PostConversionLengthMismatch {
                expected: target_dimensions,
                actual: vector.len(),
            });
        }
        if let Some(index) = vector.iter().position(|v| !v.is_finite()) {
            return Err(ConversionError::NonFiniteAfterConversion { index });
        }

        let largest = vector
            .iter()
            .enumerate()
            .fold((0, 0.0f64), |(best, max), (i, v)| {
                if v.abs() > max {
                    (i, v.abs())
                } else {
                    (best, max)
                }
            })
            .0;
        let magnitude = l2_normalize_in_place(&mut vector);
        // magnitude overflows only when the largest component is close to f64::MAX
        if !magnitude.is_finite() {
            return Err(ConversionError::NonFiniteAfterConversion { index: largest });
        }
        if magnitude > 0.0 {
            self.observer.on_event(&VectorEvent::Normalized {
                dimensions: vector.len(),
                magnitude,
            });
        } else {
            self.observer.on_event(&VectorEvent::ZeroMagnitude {
                dimensions: vector.len(),
            });
        }

        Ok(ConversionReport {
            vector,
            strategy,
            input_dimensions: n,
            magnitude,
        })
    }

    fn check_guards(&self, embedding: &[f64], target_dimensions: usize) -> Result<()> {
        if embedding.is_empty() {
            return Err(ConversionError::EmptyInput);
        }

        let limit = target_dimensions.saturating_mul(self.config.suspicious_size_factor);
        if embedding.len() > limit {
            return Err(ConversionError::SuspiciousSize {
                actual: embedding.len(),
                limit,
            });
        }

        if let Some(index) = embedding.iter().position(|v| !v.is_finite()) {
            return Err(ConversionError::NonFiniteInput { index });
        }

        Ok(())
    }
}

fn padding_scale(n: usize, t: usize) -> f64 {
    (t as f64 / n as f64).sqrt()
}

fn reshape(embedding: &[f64], t: usize, strategy: ReshapeStrategy) -> Vector {
    match strategy {
        ReshapeStrategy::Passthrough => embedding.to_vec(),
        ReshapeStrategy::InterleaveDuplicate => {
            embedding.iter().flat_map(|&v| [v, v]).collect()
        }
        ReshapeStrategy::ScaledZeroPad { scale } => {
            let mut out = Vec::with_capacity(t);
            out.extend(embedding.iter().map(|v| v * scale));
            out.resize(t, 0.0);
            out
        }
        ReshapeStrategy::PairAverage => embedding
            .chunks_exact(2)
            .map(|pair| (pair[0] + pair[1]) / 2.0)
            .collect(),
        ReshapeStrategy::Truncate => embedding[..t.min(embedding.len())].to_vec(),
    }
}

fn max_abs(vector: &[f64]) -> f64 {
    vector.iter().fold(0.0, |acc, v| acc.max(v.abs()))
}

/// `sqrt(sum((v / scale)^2))`; components are at most 1 so the sum stays in range
fn scaled_root(vector: &[f64], scale: f64) -> f64 {
    vector
        .iter()
        .map(|v| {
            let x = v / scale;
            x * x
        })
        .sum::<f64>()
        .sqrt()
}

/// Euclidean norm, computed relative to the largest component so that
/// very large or very small finite values neither overflow nor flush to zero
pub fn l2_magnitude(vector: &[f64]) -> f64 {
    let scale = max_abs(vector);
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    scale * scaled_root(vector, scale)
}

/// Scale to unit length unless every component is zero; returns the pre-scale magnitude.
///
/// The magnitude itself may be infinite for vectors near `f64::MAX` even though
/// the normalized components are still exact.
pub fn l2_normalize_in_place(vector: &mut [f64]) -> f64 {
    let scale = max_abs(vector);
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let root = scaled_root(vector, scale);
    vector.iter_mut().for_each(|v| *v = (*v / scale) / root);
    scale * root
}

/// Repair and normalize with the default configuration and tracing observer
pub fn validate_and_convert_embedding(
    embedding: &[f64],
    target_dimensions: usize,
) -> Result<Vector> {
    EmbeddingNormalizer::default().convert_to(embedding, target_dimensions)
}
