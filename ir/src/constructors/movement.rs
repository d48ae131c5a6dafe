//! Shape manipulation: collapse, broadcast, reshape, concatenate.

use smallvec::SmallVec;
use snafu::ensure;

use super::check_declared;
use crate::context::Context;
use crate::error::*;
use crate::op::Op;
use crate::shape::{self, Shape};
use crate::value::ValueRef;
use crate::types::ValueType;
use crate::Result;

impl Context {
    /// Merge groups of adjacent source axes into single result axes.
    ///
    /// `reassociation[g]` lists the consecutive source axes collapsing into
    /// result axis `g`. The groups, concatenated, must be exactly
    /// `0..src.rank()`. An empty reassociation collapses an all-ones source to
    /// a scalar.
    pub fn collapse_shape(
        &mut self,
        ty: ValueType,
        src: &ValueRef,
        reassociation: Vec<SmallVec<[usize; 4]>>,
    ) -> Result<ValueRef> {
        let rank = src.rank();
        let flattened: Vec<usize> = reassociation.iter().flatten().copied().collect();
        let partitions = if reassociation.is_empty() {
            src.shape().iter().all(|&dim| dim == 1)
        } else {
            reassociation.iter().all(|group| !group.is_empty()) && flattened.iter().copied().eq(0..rank)
        };
        ensure!(
            partitions,
            InvalidReassociationSnafu {
                reassociation: reassociation.iter().map(|group| group.to_vec()).collect::<Vec<_>>(),
                rank,
            }
        );

        let collapsed: Shape =
            reassociation.iter().map(|group| group.iter().map(|&axis| src.shape()[axis]).product()).collect();
        ensure!(
            collapsed.len() == ty.rank(),
            RankMismatchSnafu { operation: "collapse_shape", expected: ty.rank(), actual: collapsed.len() }
        );
        for (group, (&actual, &expected)) in collapsed.iter().zip(ty.shape.iter()).enumerate() {
            ensure!(actual == expected, CollapseSizeMismatchSnafu { group, expected, actual });
        }
        check_declared("collapse_shape", &ty, src.ty().with_shape(&collapsed))?;

        Ok(self.emit(Op::CollapseShape { src: src.clone(), reassociation }, ty))
    }

    /// NumPy-broadcast `src` to `shape`.
    pub fn broadcast_to(&mut self, src: &ValueRef, shape: &[usize]) -> Result<ValueRef> {
        if src.shape() == shape {
            return Ok(src.clone());
        }
        ensure!(
            shape::is_broadcastable_to(src.shape(), shape),
            BroadcastShapeMismatchSnafu { from: src.ty().shape.clone(), to: Shape::from_slice(shape) }
        );
        let ty = src.ty().with_shape(shape);
        Ok(self.emit(Op::Broadcast { src: src.clone() }, ty))
    }

    /// Reinterpret `src` with a new shape of the same element count.
    pub fn reshape(&mut self, src: &ValueRef, shape: &[usize]) -> Result<ValueRef> {
        let input_size = src.ty().num_elements();
        let output_size = shape::num_elements(shape);
        ensure!(input_size == output_size, ReshapeSizeMismatchSnafu { input_size, output_size });
        let ty = src.ty().with_shape(shape);
        Ok(self.emit(Op::Reshape { src: src.clone() }, ty))
    }

    /// Concatenate values along `axis`.
    pub fn concat(&mut self, sources: &[ValueRef], axis: usize) -> Result<ValueRef> {
        let Some(first) = sources.first() else {
            return ConcatEmptySnafu.fail();
        };
        let rank = first.rank();
        ensure!(axis < rank, ConcatAxisOutOfRangeSnafu { axis, rank });

        let mut shape: Shape = first.ty().shape.clone();
        shape[axis] = 0;
        let mut security = first.ty().security;
        for source in sources {
            ensure!(
                source.dtype() == first.dtype(),
                DTypeMismatchSnafu { operation: "concat", lhs: first.dtype(), rhs: source.dtype() }
            );
            let matches = source.rank() == rank
                && source.shape().iter().zip(first.shape()).enumerate().all(|(d, (a, b))| d == axis || a == b);
            ensure!(
                matches,
                ConcatShapeMismatchSnafu { lhs: first.ty().shape.clone(), rhs: source.ty().shape.clone(), axis }
            );
            shape[axis] += source.shape()[axis];
            security = security.join(source.ty().security);
        }

        let ty = ValueType { dtype: first.dtype(), shape, security };
        Ok(self.emit(Op::Concat { sources: sources.iter().cloned().collect(), axis }, ty))
    }
}
