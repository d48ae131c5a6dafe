//! Result type inference for indexing expressions.

use snafu::{OptionExt, ensure};
use veil_ir::{Shape, ValueType, shape};

use crate::error::*;
use crate::index::AxisIndex;

/// Type of `source[index]` under NumPy semantics.
///
/// Point indices drop their axis, slices keep it with the selected length and
/// missing trailing axes are kept whole. If any item is array-valued the
/// result has the broadcast shape of all items followed by the missing
/// trailing axes.
pub fn indexing_result_type(source: &ValueType, index: &[AxisIndex]) -> Result<ValueType> {
    let rank = source.rank();
    ensure!(index.len() <= rank, TooManyIndicesSnafu { count: index.len(), rank });

    let shape = if index.iter().any(AxisIndex::is_fancy) {
        let mut shape = gather_shape(index)?;
        shape.extend_from_slice(&source.shape[index.len()..]);
        shape
    } else {
        let mut shape = Shape::new();
        for (axis, &dimension_size) in source.shape.iter().enumerate() {
            match index.get(axis) {
                None => shape.push(dimension_size),
                Some(AxisIndex::Slice(slice)) => shape.push(slice.resolve(dimension_size)?.len),
                Some(_) => {}
            }
        }
        shape
    };

    Ok(source.with_shape(&shape))
}

/// Broadcast shape of the items of a gather index.
pub(crate) fn gather_shape(index: &[AxisIndex]) -> Result<Shape> {
    let mut shapes: Vec<&[usize]> = Vec::with_capacity(index.len());
    for (axis, item) in index.iter().enumerate() {
        let item_shape: &[usize] = match item {
            AxisIndex::Constant(_) => &[],
            AxisIndex::Runtime(value) => value.shape(),
            AxisIndex::Fancy(fancy) => fancy.shape(),
            AxisIndex::Slice(_) => {
                return InvalidIndexOperandSnafu { axis, detail: "slices cannot be mixed with array indices" }.fail();
            }
        };
        shapes.push(item_shape);
    }

    shape::broadcast_shapes(&shapes).context(IndexBroadcastMismatchSnafu {
        shapes: shapes.iter().map(|s| Shape::from_slice(s)).collect::<Vec<_>>(),
    })
}
