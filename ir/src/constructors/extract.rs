//! Element, slice and gather extraction.

use snafu::ensure;
use veil_dtype::DType;

use super::{check_declared, check_index_operand};
use crate::context::Context;
use crate::error::*;
use crate::op::{DYNAMIC, Op};
use crate::shape::Shape;
use crate::types::ValueType;
use crate::value::ValueRef;
use crate::Result;

impl Context {
    /// Extract one element at a full multi-dimensional position.
    ///
    /// `indices` holds one plain scalar index per source axis.
    pub fn extract(&mut self, ty: ValueType, src: &ValueRef, indices: &[ValueRef]) -> Result<ValueRef> {
        ensure!(
            indices.len() == src.rank(),
            RankMismatchSnafu { operation: "extract", expected: src.rank(), actual: indices.len() }
        );
        for index in indices {
            check_index_operand("extract", index)?;
        }
        check_declared("extract", &ty, src.ty().with_shape(&[]))?;

        let indices = indices.iter().cloned().collect();
        Ok(self.emit(Op::Extract { src: src.clone(), indices }, ty))
    }

    /// Extract a strided, rank-preserving slice.
    ///
    /// Each axis reads `static_sizes[d]` elements starting at `static_offsets[d]`
    /// with step `static_strides[d]`. An offset equal to [`DYNAMIC`] is taken
    /// from `dynamic_offsets`, consumed in axis order.
    pub fn extract_slice(
        &mut self,
        ty: ValueType,
        src: &ValueRef,
        dynamic_offsets: &[ValueRef],
        static_offsets: &[i64],
        static_sizes: &[i64],
        static_strides: &[i64],
    ) -> Result<ValueRef> {
        let rank = src.rank();
        for actual in [static_offsets.len(), static_sizes.len(), static_strides.len()] {
            ensure!(actual == rank, RankMismatchSnafu { operation: "extract_slice", expected: rank, actual });
        }
        let sentinels = static_offsets.iter().filter(|&&offset| offset == DYNAMIC).count();
        ensure!(
            sentinels == dynamic_offsets.len(),
            DynamicOffsetCountSnafu { sentinels, operands: dynamic_offsets.len() }
        );
        for offset in dynamic_offsets {
            check_index_operand("extract_slice", offset)?;
        }

        for (dim, ((&offset, &size), &stride)) in static_offsets.iter().zip(static_sizes).zip(static_strides).enumerate()
        {
            ensure!(stride != 0, ZeroStrideSnafu { dim });
            ensure!(size >= 0, NegativeSizeSnafu { dim, size });
            if offset == DYNAMIC || size == 0 {
                continue;
            }
            let dim_size = src.shape()[dim];
            let last = (size - 1).checked_mul(stride).and_then(|span| offset.checked_add(span));
            let in_bounds = |position: i64| 0 <= position && position < dim_size as i64;
            ensure!(
                in_bounds(offset) && last.is_some_and(in_bounds),
                SliceOutOfBoundsSnafu { dim, offset, size, stride, dim_size }
            );
        }

        let shape: Shape = static_sizes.iter().map(|&size| size as usize).collect();
        check_declared("extract_slice", &ty, src.ty().with_shape(&shape))?;

        Ok(self.emit(
            Op::ExtractSlice {
                src: src.clone(),
                dynamic_offsets: dynamic_offsets.iter().cloned().collect(),
                static_offsets: static_offsets.to_vec(),
                static_sizes: static_sizes.to_vec(),
                static_strides: static_strides.to_vec(),
            },
            ty,
        ))
    }

    /// Gather elements addressed by a coordinate tensor.
    ///
    /// For a rank-1 source, `indices` holds positions and the result has the
    /// shape of `indices`. Otherwise the trailing axis of `indices` holds one
    /// coordinate per source axis and the result has the leading shape.
    pub fn fancy_index(&mut self, ty: ValueType, src: &ValueRef, indices: &ValueRef) -> Result<ValueRef> {
        ensure!(indices.dtype() == DType::Index, IndexTypeMismatchSnafu { actual: indices.dtype() });
        ensure!(!indices.is_secured(), SecuredOperandSnafu { operation: "fancy_index" });

        let coordinates = indices.shape();
        let result_shape = if src.rank() == 1 {
            coordinates
        } else {
            ensure!(
                coordinates.last() == Some(&src.rank()),
                FancyIndexShapeMismatchSnafu { indices: indices.ty().shape.clone(), source_rank: src.rank() }
            );
            &coordinates[..coordinates.len() - 1]
        };
        check_declared("fancy_index", &ty, src.ty().with_shape(result_shape))?;

        Ok(self.emit(Op::FancyIndex { src: src.clone(), indices: indices.clone() }, ty))
    }
}
