//! NumPy slice arithmetic.

use snafu::ensure;

use crate::error::*;
use crate::index::{AxisScalar, SliceSpec};

/// A slice resolved against a concrete axis size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSlice {
    /// Clamped start position.
    pub start: i64,
    /// Clamped exclusive stop position.
    pub stop: i64,
    pub step: i64,
    /// Number of selected elements.
    pub len: usize,
}

impl ResolvedSlice {
    /// Position of the first selected element, or 0 for an empty selection.
    pub fn offset(&self) -> i64 {
        if self.len == 0 { 0 } else { self.start }
    }
}

impl SliceSpec {
    /// Resolve against an axis of `dimension_size` elements.
    ///
    /// Follows Python's slice semantics: negative bounds count from the end,
    /// out-of-range bounds are clamped and omitted bounds default to the axis
    /// ends in the direction of `step`. Bounds must be compile-time constants.
    pub fn resolve(&self, dimension_size: usize) -> Result<ResolvedSlice> {
        let step = self.step;
        ensure!(step != 0, ZeroSliceStepSnafu);

        let size = dimension_size as i64;
        let (lower, upper) = if step > 0 { (0, size) } else { (-1, size - 1) };
        let clamp = |bound: i64| {
            if bound < 0 { (bound + size).max(lower) } else { bound.min(upper) }
        };

        let start = match constant_bound(&self.start)? {
            Some(bound) => clamp(bound),
            None if step > 0 => lower,
            None => upper,
        };
        let stop = match constant_bound(&self.stop)? {
            Some(bound) => clamp(bound),
            None if step > 0 => upper,
            None => lower,
        };

        // `start` and `stop` lie in `[-1, size]`, so the span never overflows.
        let span = match step > 0 {
            true if start < stop => Some(stop - start - 1),
            false if stop < start => Some(start - stop - 1),
            _ => None,
        };
        let len = span.map_or(0, |span| span as u64 / step.unsigned_abs() + 1);

        Ok(ResolvedSlice { start, stop, step, len: len as usize })
    }
}

fn constant_bound(bound: &Option<AxisScalar>) -> Result<Option<i64>> {
    match bound {
        None => Ok(None),
        Some(AxisScalar::Constant(value)) => Ok(Some(*value)),
        Some(AxisScalar::Runtime(value)) => UnsupportedSnafu {
            detail: format!("slice bound {} is only known at run time", value.name()),
        }
        .fail(),
    }
}
