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

//! # receiptvec - Embedding Vector Validation
//!
//! Receipt embeddings arrive from storage rows and model calls in several
//! shapes and sizes. This crate is the gate they pass before being stored or
//! compared:
//!
//! - **Parsing**: raw arrays, numeric strings and `[v1,v2,...]` literals become
//!   a finite `Vec<f64>` of the expected dimensionality, or `None`
//! - **Repair**: vectors from differently-sized models are reshaped to the
//!   target dimensionality and L2-normalized, with corruption guards
//! - **Batch stats**: a per-batch context counts valid, invalid and skipped vectors

pub mod core;
pub mod monitoring;
pub mod vector;

pub use crate::core::*;
pub use monitoring::{ProcessingStats, StatsSummary};
pub use vector::*;

pub type Result<T> = std::result::Result<T, ReceiptVecError>;
