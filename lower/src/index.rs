//! Index items for NumPy-style indexing.
//!
//! An indexing expression `x[a, b:c, [0, 2]]` is an [`IndexSpec`]: one
//! [`AxisIndex`] per leading axis of the source. Missing trailing axes behave
//! like full slices. The [`idx!`](crate::idx) macro builds single items.

use snafu::ensure;
use veil_ir::{Shape, ValueRef, shape};

use crate::error::*;

/// Index tuple applied to a value, one item per leading axis.
pub type IndexSpec = Vec<AxisIndex>;

/// A scalar that is either known at compile time or produced at run time.
#[derive(Debug, Clone)]
pub enum AxisScalar {
    Constant(i64),
    /// Plain scalar integer value.
    Runtime(ValueRef),
}

impl From<i64> for AxisScalar {
    fn from(value: i64) -> Self {
        Self::Constant(value)
    }
}

impl From<ValueRef> for AxisScalar {
    fn from(value: ValueRef) -> Self {
        Self::Runtime(value)
    }
}

impl From<&ValueRef> for AxisScalar {
    fn from(value: &ValueRef) -> Self {
        Self::Runtime(value.clone())
    }
}

/// `start:stop:step` slice. Omitted bounds default to the axis ends.
#[derive(Debug, Clone)]
pub struct SliceSpec {
    pub start: Option<AxisScalar>,
    pub stop: Option<AxisScalar>,
    pub step: i64,
}

impl SliceSpec {
    /// The `:` slice selecting the whole axis.
    pub fn full() -> Self {
        Self { start: None, stop: None, step: 1 }
    }

    pub fn new(start: Option<AxisScalar>, stop: Option<AxisScalar>, step: i64) -> Self {
        Self { start, stop, step }
    }

    pub fn is_full(&self) -> bool {
        self.start.is_none() && self.stop.is_none() && self.step == 1
    }
}

impl Default for SliceSpec {
    fn default() -> Self {
        Self::full()
    }
}

/// Compile-time array of indices, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexArray {
    shape: Shape,
    values: Vec<i64>,
}

impl IndexArray {
    pub fn new(shape: &[usize], values: Vec<i64>) -> Result<Self> {
        let expected = shape::num_elements(shape);
        ensure!(
            values.len() == expected,
            IndexArraySizeSnafu { shape: Shape::from_slice(shape), expected, actual: values.len() }
        );
        Ok(Self { shape: Shape::from_slice(shape), values })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

impl From<Vec<i64>> for IndexArray {
    fn from(values: Vec<i64>) -> Self {
        Self { shape: Shape::from_slice(&[values.len()]), values }
    }
}

/// Array-valued index selecting elements along an axis.
#[derive(Debug, Clone)]
pub enum FancyIndex {
    Literal(IndexArray),
    /// Plain integer tensor produced at run time.
    Value(ValueRef),
}

impl FancyIndex {
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Literal(array) => array.shape(),
            Self::Value(value) => value.shape(),
        }
    }
}

/// One item of an index tuple.
#[derive(Debug, Clone)]
pub enum AxisIndex {
    /// Compile-time point index, may be negative.
    Constant(i64),
    /// Run-time point index. A tensor-valued operand indexes like [`AxisIndex::Fancy`].
    Runtime(ValueRef),
    Slice(SliceSpec),
    Fancy(FancyIndex),
}

impl AxisIndex {
    pub fn full() -> Self {
        Self::Slice(SliceSpec::full())
    }

    /// Whether this item selects elements with an array of indices.
    pub fn is_fancy(&self) -> bool {
        match self {
            Self::Fancy(_) => true,
            Self::Runtime(value) => value.is_tensor(),
            Self::Constant(_) | Self::Slice(_) => false,
        }
    }

    /// Whether this item removes its axis from the result.
    pub fn is_point(&self) -> bool {
        match self {
            Self::Constant(_) => true,
            Self::Runtime(value) => value.is_scalar(),
            Self::Slice(_) | Self::Fancy(_) => false,
        }
    }
}

impl From<i64> for AxisIndex {
    fn from(value: i64) -> Self {
        Self::Constant(value)
    }
}

impl From<ValueRef> for AxisIndex {
    fn from(value: ValueRef) -> Self {
        Self::Runtime(value)
    }
}

impl From<&ValueRef> for AxisIndex {
    fn from(value: &ValueRef) -> Self {
        Self::Runtime(value.clone())
    }
}

impl From<SliceSpec> for AxisIndex {
    fn from(slice: SliceSpec) -> Self {
        Self::Slice(slice)
    }
}

impl From<IndexArray> for AxisIndex {
    fn from(array: IndexArray) -> Self {
        Self::Fancy(FancyIndex::Literal(array))
    }
}

impl From<Vec<i64>> for AxisIndex {
    fn from(values: Vec<i64>) -> Self {
        Self::Fancy(FancyIndex::Literal(values.into()))
    }
}

/// Index item macro.
///
/// # Syntax
/// - `idx![..]` → full slice `:`
/// - `idx![..; step]` → `::step`
/// - `idx![start, ..]` → `start:`
/// - `idx![.., stop]` → `:stop`
/// - `idx![start, stop]` → `start:stop`
/// - `idx![start, stop; step]` → `start:stop:step`
/// - `idx![i]` → point index, runtime value or index array, via `From`
///
/// Slice bounds accept anything convertible into [`AxisScalar`].
///
/// # Example
/// ```
/// use veil_lower::{AxisIndex, idx};
///
/// let index: Vec<AxisIndex> = vec![idx![-1], idx![1, ..], idx![..; -1], idx![vec![0, 2]]];
/// assert!(index[0].is_point());
/// assert!(index[3].is_fancy());
/// ```
#[macro_export]
macro_rules! idx {
    (..) => {
        $crate::index::AxisIndex::full()
    };

    (..; $step:expr) => {
        $crate::index::AxisIndex::Slice($crate::index::SliceSpec::new(None, None, $step))
    };

    (.., $stop:expr) => {
        $crate::index::AxisIndex::Slice($crate::index::SliceSpec::new(
            None,
            Some($crate::index::AxisScalar::from($stop)),
            1,
        ))
    };

    ($start:expr, ..) => {
        $crate::index::AxisIndex::Slice($crate::index::SliceSpec::new(
            Some($crate::index::AxisScalar::from($start)),
            None,
            1,
        ))
    };

    ($start:expr, $stop:expr) => {
        $crate::index::AxisIndex::Slice($crate::index::SliceSpec::new(
            Some($crate::index::AxisScalar::from($start)),
            Some($crate::index::AxisScalar::from($stop)),
            1,
        ))
    };

    ($start:expr, $stop:expr; $step:expr) => {
        $crate::index::AxisIndex::Slice($crate::index::SliceSpec::new(
            Some($crate::index::AxisScalar::from($start)),
            Some($crate::index::AxisScalar::from($stop)),
            $step,
        ))
    };

    ($idx:expr) => {
        $crate::index::AxisIndex::from($idx)
    };
}
