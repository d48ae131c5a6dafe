//! Per-axis index normalization.
//!
//! Turns one point index into an offset in `[0, dimension_size)`. Constants
//! are folded and checked at compile time. Runtime indices get IR that wraps
//! negative values around and, when enabled, emits non-fatal bounds warnings.

use snafu::{ResultExt, ensure};
use veil_dtype::DType;
use veil_ir::{CmpPredicate, Context, ValueRef, ValueType};

use crate::config::IndexingConfig;
use crate::error::*;
use crate::index::AxisScalar;

/// A normalized axis offset.
#[derive(Debug, Clone)]
pub enum NormalizedIndex {
    /// Offset known at compile time, always in range.
    Static(i64),
    /// Index-typed runtime value.
    Dynamic(ValueRef),
}

impl NormalizedIndex {
    pub fn as_static(&self) -> Option<i64> {
        match self {
            Self::Static(offset) => Some(*offset),
            Self::Dynamic(_) => None,
        }
    }

    /// Materialize as an index-typed value, emitting a constant if needed.
    pub fn into_value(self, ctx: &mut Context) -> ValueRef {
        match self {
            Self::Static(offset) => ctx.const_index(offset),
            Self::Dynamic(value) => value,
        }
    }
}

/// Wrap a negative constant index and check it against the axis.
pub fn normalize_constant(index: i64, dimension_size: usize, axis: usize) -> Result<i64> {
    let size = dimension_size as i64;
    let offset = if index < 0 { index + size } else { index };
    ensure!((0..size).contains(&offset), IndexOutOfRangeSnafu { index, axis, dimension_size });
    Ok(offset)
}

/// Normalize one point index on `axis`.
pub fn normalize_index(
    ctx: &mut Context,
    config: &IndexingConfig,
    index: &AxisScalar,
    dimension_size: usize,
    axis: usize,
) -> Result<NormalizedIndex> {
    match index {
        AxisScalar::Constant(value) => normalize_constant(*value, dimension_size, axis).map(NormalizedIndex::Static),
        AxisScalar::Runtime(value) => {
            normalize_runtime(ctx, config, value, dimension_size, axis).map(NormalizedIndex::Dynamic)
        }
    }
}

fn normalize_runtime(
    ctx: &mut Context,
    config: &IndexingConfig,
    index: &ValueRef,
    dimension_size: usize,
    axis: usize,
) -> Result<ValueRef> {
    ensure!(!index.is_secured(), SecuredDynamicIndexSnafu { axis });
    ensure!(
        index.is_scalar(),
        UnsupportedSnafu { detail: format!("tensor {} used where a scalar index is required", index.ty()) }
    );
    let dtype = index.dtype();
    ensure!(
        dtype.is_integer(),
        InvalidIndexOperandSnafu { axis, detail: format!("expected an integer index, got {dtype}") }
    );

    let signed = dtype.is_signed();
    let check = config.dynamic_indexing_check_out_of_bound;
    let mut index = index.clone();

    if signed || check {
        // Wide enough for every index value and for `dimension_size` as a signed integer.
        let bit_width = (DType::that_can_represent(dimension_size as i64).bit_width() + 1)
            .max(dtype.bit_width() + u32::from(!signed))
            .min(veil_dtype::MAX_BIT_WIDTH);
        let widen = bit_width > dtype.bit_width();
        let working = if widen { DType::int(bit_width) } else { dtype };
        tracing::trace!(axis, dimension_size, %dtype, %working, check, "normalizing runtime index");

        if widen {
            let widened = if signed { ctx.sign_extend(&index, working) } else { ctx.zero_extend(&index, working) };
            index = widened.context(IrSnafu)?;
        }
        let size = ctx.const_int(working, dimension_size as i64).context(IrSnafu)?;
        let zero = ctx.const_int(working, 0).context(IrSnafu)?;

        if signed {
            let negative = ctx.cmp(CmpPredicate::Slt, &index, &zero).context(IrSnafu)?;
            index = ctx
                .conditional(
                    ValueType::scalar(working),
                    &negative,
                    |ctx| ctx.add(&index, &size),
                    |_| Ok(index.clone()),
                )
                .context(IrSnafu)?;
        }

        if check {
            let message = out_of_range_message(ctx, &index);
            let too_large = ctx.cmp(CmpPredicate::Sge, &index, &size).context(IrSnafu)?;
            warn_if(ctx, &too_large, &message)?;
            let too_small = ctx.cmp(CmpPredicate::Slt, &index, &zero).context(IrSnafu)?;
            warn_if(ctx, &too_small, &message)?;
        }
    }

    ctx.index_cast(&index).context(IrSnafu)
}

fn out_of_range_message(ctx: &Context, index: &ValueRef) -> String {
    let label = match ctx.converting() {
        Some(label) => label.to_string(),
        None => index.name(),
    };
    format!("Runtime Warning: Index out of range on \"{label}\"\n")
}

fn warn_if(ctx: &mut Context, condition: &ValueRef, message: &str) -> Result<()> {
    ctx.conditional_effect(condition, |ctx| {
        ctx.trace(message);
        Ok(())
    })
    .context(IrSnafu)?;
    Ok(())
}
