//! Indexing strategy selection and emission.
//!
//! [`lower_indexing`] classifies an index tuple once and emits one of three
//! operation sequences:
//!
//! ```text
//! Gather   x[[0, 2], [1, 3]]   -> concat(reshape(broadcast(i))...) -> fancy_index
//! Extract  x[i, -1]            -> normalize each axis -> extract
//! Slice    x[i, 1:4]           -> extract_slice -> collapse_shape (if any point axis)
//! ```

use smallvec::{SmallVec, smallvec};
use snafu::{ResultExt, ensure};
use veil_ir::{Context, DYNAMIC, Shape, ValueRef, ValueType};

use crate::config::IndexingConfig;
use crate::error::*;
use crate::index::{AxisIndex, AxisScalar, FancyIndex};
use crate::infer::indexing_result_type;
use crate::normalize::{NormalizedIndex, normalize_constant, normalize_index};

/// Lowering strategy for one indexing expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum IndexingMode {
    /// At least one array-valued index: one gather over a coordinate tensor.
    Gather,
    /// Every axis reduced to a point: one element extraction.
    Extract,
    /// Strided slice, collapsing point-indexed axes afterwards.
    Slice,
}

/// Pick the strategy for `index` producing a result of `resulting_shape`.
pub fn classify(index: &[AxisIndex], resulting_shape: &[usize]) -> IndexingMode {
    if index.iter().any(AxisIndex::is_fancy) {
        IndexingMode::Gather
    } else if resulting_shape.is_empty() {
        IndexingMode::Extract
    } else {
        IndexingMode::Slice
    }
}

/// Per-axis slice parameters.
#[derive(Debug, Clone)]
pub struct AxisPlan {
    pub offset: NormalizedIndex,
    pub size: i64,
    pub stride: i64,
    /// The axis was indexed by a point and disappears from the result.
    pub destroyed: bool,
}

/// Group intermediate axes into result axes.
///
/// Each result axis takes the destroyed (unit) axes preceding its retained
/// axis. Destroyed axes after the last retained one join the last group.
pub fn reassociation(destroyed: &[bool], result_rank: usize) -> Vec<SmallVec<[usize; 4]>> {
    let mut groups: Vec<SmallVec<[usize; 4]>> = Vec::with_capacity(result_rank);
    let mut current = 0;
    for _ in 0..result_rank {
        let mut group = smallvec![current];
        while destroyed.get(current).copied().unwrap_or(false) {
            current += 1;
            group.push(current);
        }
        groups.push(group);
        current += 1;
    }
    if let Some(last) = groups.last_mut() {
        last.extend(current..destroyed.len());
    }
    groups
}

/// Lower `source[index]` into `ctx`, producing a value of `resulting_type`.
///
/// `index` may be shorter than the source rank; missing trailing axes are
/// taken whole. The declared type must have the source's element type and
/// security and the shape NumPy assigns to the expression.
pub fn lower_indexing(
    ctx: &mut Context,
    config: &IndexingConfig,
    source: &ValueRef,
    resulting_type: &ValueType,
    index: &[AxisIndex],
) -> Result<ValueRef> {
    ensure!(
        resulting_type.security == source.ty().security,
        ResultSecurityMismatchSnafu { expected: source.ty().security, actual: resulting_type.security }
    );
    ensure!(
        resulting_type.dtype == source.dtype(),
        ResultDTypeMismatchSnafu { expected: source.dtype(), actual: resulting_type.dtype }
    );
    let inferred = indexing_result_type(source.ty(), index)?;
    ensure!(
        inferred.shape == resulting_type.shape,
        ResultShapeMismatchSnafu { expected: inferred.shape, actual: resulting_type.shape.clone() }
    );

    let mode = classify(index, &resulting_type.shape);
    tracing::debug!(
        source = %source.name(),
        source_type = %source.ty(),
        result_type = %resulting_type,
        indices = index.len(),
        mode = mode.as_ref(),
        "lowering indexing"
    );

    match mode {
        IndexingMode::Gather => lower_gather(ctx, config, source, resulting_type, index),
        IndexingMode::Extract => lower_extract(ctx, config, source, resulting_type, index),
        IndexingMode::Slice => lower_slice(ctx, config, source, resulting_type, index),
    }
}

fn lower_gather(
    ctx: &mut Context,
    config: &IndexingConfig,
    source: &ValueRef,
    resulting_type: &ValueType,
    index: &[AxisIndex],
) -> Result<ValueRef> {
    let mut operands = Vec::with_capacity(index.len());
    for (axis, (item, &dimension_size)) in index.iter().zip(source.shape()).enumerate() {
        let operand = match item {
            AxisIndex::Constant(value) => ctx.const_index(normalize_constant(*value, dimension_size, axis)?),
            AxisIndex::Runtime(value) if value.is_scalar() => {
                normalize_index(ctx, config, &AxisScalar::Runtime(value.clone()), dimension_size, axis)?
                    .into_value(ctx)
            }
            AxisIndex::Runtime(value) | AxisIndex::Fancy(FancyIndex::Value(value)) => {
                gather_operand(ctx, value, axis)?
            }
            AxisIndex::Fancy(FancyIndex::Literal(array)) => {
                let values = array
                    .values()
                    .iter()
                    .map(|&value| normalize_constant(value, dimension_size, axis))
                    .collect::<Result<Vec<_>>>()?;
                ctx.const_index_tensor(array.shape(), values).context(IrSnafu)?
            }
            AxisIndex::Slice(_) => {
                return InvalidIndexOperandSnafu { axis, detail: "slices cannot be mixed with array indices" }.fail();
            }
        };
        operands.push(operand);
    }

    let shape = &resulting_type.shape;
    let trailing = &source.shape()[index.len()..];
    let indexed_rank = shape.len() - trailing.len();

    let coordinates = match operands.as_slice() {
        [single] if trailing.is_empty() => single.clone(),
        _ => {
            let mut column_shape = shape.clone();
            column_shape.push(1);
            // Array operands vary along the leading axes only.
            let mut leading_shape = Shape::from_slice(&shape[..indexed_rank]);
            leading_shape.resize(shape.len(), 1);

            let mut columns = Vec::with_capacity(source.rank());
            for operand in &operands {
                let mut column = ctx.broadcast_to(operand, &shape[..indexed_rank]).context(IrSnafu)?;
                if !trailing.is_empty() {
                    column = ctx.reshape(&column, &leading_shape).context(IrSnafu)?;
                    column = ctx.broadcast_to(&column, shape).context(IrSnafu)?;
                }
                columns.push(ctx.reshape(&column, &column_shape).context(IrSnafu)?);
            }
            for (position, &dimension_size) in trailing.iter().enumerate() {
                let mut axis_shape: Shape = smallvec![1; shape.len()];
                axis_shape[indexed_rank + position] = dimension_size;
                let positions = (0..dimension_size as i64).collect();
                let axis_range = ctx.const_index_tensor(&axis_shape, positions).context(IrSnafu)?;
                let column = ctx.broadcast_to(&axis_range, shape).context(IrSnafu)?;
                columns.push(ctx.reshape(&column, &column_shape).context(IrSnafu)?);
            }
            ctx.concat(&columns, shape.len()).context(IrSnafu)?
        }
    };
    tracing::trace!(coordinates = %coordinates.ty(), "gather coordinates");

    ctx.fancy_index(resulting_type.clone(), source, &coordinates).context(IrSnafu)
}

/// Cast a runtime index tensor to the index type.
fn gather_operand(ctx: &mut Context, value: &ValueRef, axis: usize) -> Result<ValueRef> {
    ensure!(!value.is_secured(), SecuredDynamicIndexSnafu { axis });
    if value.dtype().is_index() {
        return Ok(value.clone());
    }
    ensure!(
        value.dtype().is_integer(),
        InvalidIndexOperandSnafu { axis, detail: format!("expected integer indices, got {}", value.dtype()) }
    );
    ctx.index_cast(value).context(IrSnafu)
}

fn lower_extract(
    ctx: &mut Context,
    config: &IndexingConfig,
    source: &ValueRef,
    resulting_type: &ValueType,
    index: &[AxisIndex],
) -> Result<ValueRef> {
    let mut offsets = Vec::with_capacity(source.rank());
    for (axis, &dimension_size) in source.shape().iter().enumerate() {
        let scalar = match index.get(axis) {
            Some(AxisIndex::Constant(value)) => AxisScalar::Constant(*value),
            Some(AxisIndex::Runtime(value)) => AxisScalar::Runtime(value.clone()),
            _ => {
                return InvalidIndexOperandSnafu { axis, detail: "scalar extraction needs a point index on every axis" }
                    .fail();
            }
        };
        offsets.push(normalize_index(ctx, config, &scalar, dimension_size, axis)?.into_value(ctx));
    }

    ctx.extract(resulting_type.clone(), source, &offsets).context(IrSnafu)
}

fn lower_slice(
    ctx: &mut Context,
    config: &IndexingConfig,
    source: &ValueRef,
    resulting_type: &ValueType,
    index: &[AxisIndex],
) -> Result<ValueRef> {
    let plans = plan_axes(ctx, config, source, index)?;

    let dynamic_offsets: Vec<ValueRef> = plans
        .iter()
        .filter_map(|plan| match &plan.offset {
            NormalizedIndex::Dynamic(value) => Some(value.clone()),
            NormalizedIndex::Static(_) => None,
        })
        .collect();
    let static_offsets: Vec<i64> = plans.iter().map(|plan| plan.offset.as_static().unwrap_or(DYNAMIC)).collect();
    let static_sizes: Vec<i64> = plans.iter().map(|plan| plan.size).collect();
    let static_strides: Vec<i64> = plans.iter().map(|plan| plan.stride).collect();
    let destroyed: Vec<bool> = plans.iter().map(|plan| plan.destroyed).collect();

    if !destroyed.contains(&true) {
        return ctx
            .extract_slice(
                resulting_type.clone(),
                source,
                &dynamic_offsets,
                &static_offsets,
                &static_sizes,
                &static_strides,
            )
            .context(IrSnafu);
    }

    let intermediate_shape: Shape = static_sizes.iter().map(|&size| size as usize).collect();
    let intermediate = ctx
        .extract_slice(
            resulting_type.with_shape(&intermediate_shape),
            source,
            &dynamic_offsets,
            &static_offsets,
            &static_sizes,
            &static_strides,
        )
        .context(IrSnafu)?;

    let groups = reassociation(&destroyed, resulting_type.rank());
    tracing::trace!(?destroyed, ?groups, "collapsing point-indexed axes");
    ctx.collapse_shape(resulting_type.clone(), &intermediate, groups).context(IrSnafu)
}

fn plan_axes(
    ctx: &mut Context,
    config: &IndexingConfig,
    source: &ValueRef,
    index: &[AxisIndex],
) -> Result<Vec<AxisPlan>> {
    let mut plans = Vec::with_capacity(source.rank());
    for (axis, &dimension_size) in source.shape().iter().enumerate() {
        let plan = match index.get(axis) {
            None => AxisPlan {
                offset: NormalizedIndex::Static(0),
                size: dimension_size as i64,
                stride: 1,
                destroyed: false,
            },
            Some(AxisIndex::Slice(slice)) => {
                let resolved = slice.resolve(dimension_size)?;
                AxisPlan {
                    offset: NormalizedIndex::Static(resolved.offset()),
                    size: resolved.len as i64,
                    stride: resolved.step,
                    destroyed: false,
                }
            }
            Some(AxisIndex::Constant(value)) => {
                point_plan(ctx, config, &AxisScalar::Constant(*value), dimension_size, axis)?
            }
            Some(AxisIndex::Runtime(value)) => {
                point_plan(ctx, config, &AxisScalar::Runtime(value.clone()), dimension_size, axis)?
            }
            Some(AxisIndex::Fancy(_)) => {
                return InvalidIndexOperandSnafu { axis, detail: "array index outside gather lowering" }.fail();
            }
        };
        tracing::trace!(
            axis,
            offset = ?plan.offset.as_static(),
            size = plan.size,
            stride = plan.stride,
            destroyed = plan.destroyed,
            "axis plan"
        );
        plans.push(plan);
    }
    Ok(plans)
}

fn point_plan(
    ctx: &mut Context,
    config: &IndexingConfig,
    index: &AxisScalar,
    dimension_size: usize,
    axis: usize,
) -> Result<AxisPlan> {
    let offset = normalize_index(ctx, config, index, dimension_size, axis)?;
    Ok(AxisPlan { offset, size: 1, stride: 1, destroyed: true })
}
