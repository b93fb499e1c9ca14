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

//! Embedding vector validation pipeline
//!
//! Two entry points with deliberately different failure styles:
//! - [`parse_and_validate_vector`]: reject-on-anything, returns `None`
//! - [`validate_and_convert_embedding`]: repair and normalize, returns an error on corruption
//!
//! Callers pick one; the two are not chained automatically.

pub mod audit;
pub mod context;
pub mod normalizer;
pub mod observer;
pub mod parser;

pub use audit::{audit_lines, chunk_lines, AuditMode, LineOutcome};
pub use context::VectorProcessingContext;
pub use normalizer::{
    l2_magnitude, l2_normalize_in_place, validate_and_convert_embedding, ConversionReport,
    EmbeddingNormalizer, NormalizerConfig, ReshapeStrategy,
};
pub use observer::{NoopObserver, TracingObserver, VectorEvent, VectorObserver};
pub use parser::{parse_and_validate_vector, parse_embedding, read_values, VectorParser};
