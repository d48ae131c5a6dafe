//! Lowering of NumPy-style indexing into veil IR.
//!
//! The entry point is [`lower_indexing`], which takes a source value, the
//! declared result type and an index tuple, and emits the primitive operations
//! computing the selected sub-value into a [`Context`](veil_ir::Context).
//!
//! # Strategies
//!
//! Exactly one strategy is chosen per call (see [`IndexingMode`]):
//!
//! - **Gather** - any axis is indexed by an array; one `fancy_index` op
//! - **Extract** - every axis is indexed by a point; one `extract` op
//! - **Slice** - strided `extract_slice`, followed by `collapse_shape` when
//!   point-indexed axes have to disappear from the result
//!
//! # Module Organization
//!
//! - [`index`] - Index items and the [`idx!`] macro
//! - [`slice`] - NumPy slice arithmetic
//! - [`normalize`] - Per-axis index normalization and bounds diagnostics
//! - [`infer`] - Result type inference
//! - [`dispatch`] - Strategy selection and emission
//! - [`config`] - Lowering configuration
//! - [`error`] - Error types and result handling

pub mod config;
pub mod dispatch;
pub mod error;
pub mod index;
pub mod infer;
pub mod normalize;
pub mod slice;


pub use config::IndexingConfig;
pub use dispatch::{AxisPlan, IndexingMode, classify, lower_indexing, reassociation};
pub use error::{Error, Result};
pub use index::{AxisIndex, AxisScalar, FancyIndex, IndexArray, IndexSpec, SliceSpec};
pub use infer::indexing_result_type;
pub use normalize::{NormalizedIndex, normalize_constant, normalize_index};
pub use slice::ResolvedSlice;
