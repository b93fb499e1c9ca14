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

//! Raw vector shapes accepted at the parsing boundary
//!
//! Upstream producers hand us vectors as JSON arrays, arrays of numeric strings,
//! or PostgreSQL-style `[v1,v2,...]` literals. [`RawVector`] is the closed set of
//! shapes the parser knows how to sniff; anything else lands in `Unsupported`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Dimensionality required by the storage and comparison layer
pub const EMBEDDING_DIMENSIONS: usize = 1536;

/// Native output size of the older embedding model (half of [`EMBEDDING_DIMENSIONS`])
pub const LEGACY_EMBEDDING_DIMENSIONS: usize = 768;

/// Inputs longer than `target * SUSPICIOUS_SIZE_FACTOR` are treated as corrupt
pub const SUSPICIOUS_SIZE_FACTOR: usize = 50;

/// A vector that passed validation: exact length, finite values only
pub type Vector = Vec<f64>;

/// Untyped vector input as it arrives from storage or a generation call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RawVector {
    /// null, missing, empty string or empty sequence
    Absent,
    /// Array-like input; elements may be numbers or numeric strings
    Sequence(Vec<RawElement>),
    /// Single string, optionally bracketed: `[0.1,0.2,0.3]`
    Delimited(String),
    /// Any other shape (object, boolean, bare number); carries the shape name
    Unsupported(&'static str),
}

/// One element of a [`RawVector::Sequence`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RawElement {
    Number(f64),
    Text(String),
    Other(&'static str),
}

impl RawVector {
    /// Shape name used in diagnostics
    pub fn shape(&self) -> &'static str {
        match self {
            RawVector::Absent => "absent",
            RawVector::Sequence(_) => "sequence",
            RawVector::Delimited(_) => "string",
            RawVector::Unsupported(shape) => shape,
        }
    }

    /// True for the "nothing there" case, which the parser treats as routine
    pub fn is_absent(&self) -> bool {
        match self {
            RawVector::Absent => true,
            RawVector::Sequence(elements) => elements.is_empty(),
            RawVector::Delimited(text) => text.trim().is_empty(),
            RawVector::Unsupported(_) => false,
        }
    }
}

fn json_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<Value> for RawElement {
    fn from(value: Value) -> Self {
        match value {
            // as_f64 only fails for arbitrary-precision numbers, which we do not enable
            Value::Number(n) => match n.as_f64() {
                Some(v) => RawElement::Number(v),
                None => RawElement::Other("number"),
            },
            Value::String(s) => RawElement::Text(s),
            other => RawElement::Other(json_shape(&other)),
        }
    }
}

impl From<Value> for RawVector {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawVector::Absent,
            Value::Array(items) => {
                if items.is_empty() {
                    RawVector::Absent
                } else {
                    RawVector::Sequence(items.into_iter().map(RawElement::from).collect())
                }
            }
            Value::String(s) => {
                if s.trim().is_empty() {
                    RawVector::Absent
                } else {
                    RawVector::Delimited(s)
                }
            }
            other => RawVector::Unsupported(json_shape(&other)),
        }
    }
}

impl<'de> Deserialize<'de> for RawVector {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(RawVector::from)
    }
}

impl From<Vec<f64>> for RawVector {
    fn from(values: Vec<f64>) -> Self {
        RawVector::from(values.as_slice())
    }
}

impl From<&[f64]> for RawVector {
    fn from(values: &[f64]) -> Self {
        if values.is_empty() {
            return RawVector::Absent;
        }
        RawVector::Sequence(values.iter().copied().map(RawElement::Number).collect())
    }
}

impl From<Vec<f32>> for RawVector {
    fn from(values: Vec<f32>) -> Self {
        if values.is_empty() {
            return RawVector::Absent;
        }
        RawVector::Sequence(
            values
                .into_iter()
                .map(|v| RawElement::Number(f64::from(v)))
                .collect(),
        )
    }
}

impl From<Vec<String>> for RawVector {
    fn from(values: Vec<String>) -> Self {
        if values.is_empty() {
            return RawVector::Absent;
        }
        RawVector::Sequence(values.into_iter().map(RawElement::Text).collect())
    }
}

impl From<Vec<RawElement>> for RawVector {
    fn from(elements: Vec<RawElement>) -> Self {
        if elements.is_empty() {
            RawVector::Absent
        } else {
            RawVector::Sequence(elements)
        }
    }
}

impl From<&str> for RawVector {
    fn from(text: &str) -> Self {
        RawVector::from(text.to_string())
    }
}

impl From<String> for RawVector {
    fn from(text: String) -> Self {
        if text.trim().is_empty() {
            RawVector::Absent
        } else {
            RawVector::Delimited(text)
        }
    }
}

impl<T: Into<RawVector>> From<Option<T>> for RawVector {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => RawVector::Absent,
        }
    }
}

impl From<f64> for RawElement {
    fn from(value: f64) -> Self {
        RawElement::Number(value)
    }
}

impl From<&str> for RawElement {
    fn from(value: &str) -> Self {
        RawElement::Text(value.to_string())
    }
}
