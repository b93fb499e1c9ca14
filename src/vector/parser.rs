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

//! First-contact vector parsing
//!
//! Malformed vectors are routine here: every refusal is a [`ParseRejection`]
//! value (or `None` through [`VectorParser::parse`]), never a panic. The parser
//! never repairs dimensions; callers that want repair use the normalizer.

use std::sync::Arc;

use crate::core::{ParseRejection, RawElement, RawVector, Vector, EMBEDDING_DIMENSIONS};
use crate::vector::observer::{default_observer, VectorEvent, VectorObserver};

#[derive(Clone)]
pub struct VectorParser {
    observer: Arc<dyn VectorObserver>,
}

impl Default for VectorParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VectorParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorParser").finish_non_exhaustive()
    }
}

impl VectorParser {
    pub fn new() -> Self {
        Self::with_observer(default_observer())
    }

    pub fn with_observer(observer: Arc<dyn VectorObserver>) -> Self {
        Self { observer }
    }

    /// Parse and validate, collapsing any rejection to `None`
    pub fn parse(&self, raw: impl Into<RawVector>, expected_dimensions: usize) -> Option<Vector> {
        self.try_parse(raw, expected_dimensions).ok()
    }

    /// Parse and validate, keeping the rejection reason
    ///
    /// A returned vector always has exactly `expected_dimensions` finite elements.
    pub fn try_parse(
        &self,
        raw: impl Into<RawVector>,
        expected_dimensions: usize,
    ) -> Result<Vector, ParseRejection> {
        let raw = raw.into();
        let shape = raw.shape();

        let result = parse_shape(raw).and_then(|values| validate(values, expected_dimensions));

        match &result {
            Ok(values) => self.observer.on_event(&VectorEvent::Parsed {
                shape,
                dimensions: values.len(),
            }),
            Err(rejection) => self.observer.on_event(&VectorEvent::ParseRejected {
                shape,
                rejection: rejection.clone(),
            }),
        }

        result
    }
}

fn parse_shape(raw: RawVector) -> Result<Vector, ParseRejection> {
    if raw.is_absent() {
        return Err(ParseRejection::Absent);
    }

    match raw {
        RawVector::Absent => Err(ParseRejection::Absent),
        RawVector::Sequence(elements) => elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| parse_element(index, element))
            .collect(),
        RawVector::Delimited(text) => parse_delimited(&text),
        RawVector::Unsupported(shape) => Err(ParseRejection::UnsupportedShape { shape }),
    }
}

fn parse_element(index: usize, element: RawElement) -> Result<f64, ParseRejection> {
    match element {
        RawElement::Number(value) => Ok(value),
        RawElement::Text(text) => parse_token(index, &text),
        RawElement::Other(shape) => Err(ParseRejection::UnparseableElement {
            index,
            token: shape.to_string(),
        }),
    }
}

/// `[v1,v2,...]` with optional brackets, as written by PostgreSQL's vector type
fn parse_delimited(text: &str) -> Result<Vector, ParseRejection> {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix('[').unwrap_or(trimmed);
    let body = body.strip_suffix(']').unwrap_or(body);

    body.split(',')
        .enumerate()
        .map(|(index, token)| parse_token(index, token))
        .collect()
}

fn parse_token(index: usize, token: &str) -> Result<f64, ParseRejection> {
    let token = token.trim();
    token
        .parse::<f64>()
        .map_err(|_| ParseRejection::UnparseableElement {
            index,
            token: token.to_string(),
        })
}

fn validate(values: Vector, expected_dimensions: usize) -> Result<Vector, ParseRejection> {
    if values.len() != expected_dimensions {
        return Err(ParseRejection::DimensionMismatch {
            expected: expected_dimensions,
            actual: values.len(),
        });
    }

    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(ParseRejection::NonFinite { index });
    }

    Ok(values)
}

/// Lift a raw vector into numbers without any dimension or finiteness check.
///
/// For callers headed to the normalizer, which applies its own guards.
pub fn read_values(raw: impl Into<RawVector>) -> Result<Vector, ParseRejection> {
    parse_shape(raw.into())
}

/// Parse a raw vector with the default tracing observer
pub fn parse_and_validate_vector(
    raw: impl Into<RawVector>,
    expected_dimensions: usize,
) -> Option<Vector> {
    VectorParser::new().parse(raw, expected_dimensions)
}

/// Same as [`parse_and_validate_vector`] with the canonical 1536 dimensions
pub fn parse_embedding(raw: impl Into<RawVector>) -> Option<Vector> {
    parse_and_validate_vector(raw, EMBEDDING_DIMENSIONS)
}
