//! Index items and the `idx!` macro.

use veil_dtype::DType;
use veil_ir::{Context, ValueType};

use crate::{AxisIndex, AxisScalar, Error, FancyIndex, IndexArray, SliceSpec, idx};

fn slice(item: &AxisIndex) -> &SliceSpec {
    match item {
        AxisIndex::Slice(slice) => slice,
        other => panic!("expected a slice, got {other:?}"),
    }
}

fn constant(bound: &Option<AxisScalar>) -> Option<i64> {
    match bound {
        Some(AxisScalar::Constant(value)) => Some(*value),
        Some(AxisScalar::Runtime(_)) => panic!("expected a constant bound"),
        None => None,
    }
}

#[test]
fn test_macro_slices() {
    assert!(slice(&idx![..]).is_full());

    let item = idx![..; -1];
    let reversed = slice(&item);
    assert_eq!((constant(&reversed.start), constant(&reversed.stop), reversed.step), (None, None, -1));

    let item = idx![.., 2];
    let head = slice(&item);
    assert_eq!((constant(&head.start), constant(&head.stop), head.step), (None, Some(2), 1));

    let item = idx![-2, ..];
    let tail = slice(&item);
    assert_eq!((constant(&tail.start), constant(&tail.stop), tail.step), (Some(-2), None, 1));

    let item = idx![1, 5];
    let range = slice(&item);
    assert_eq!((constant(&range.start), constant(&range.stop), range.step), (Some(1), Some(5), 1));

    let item = idx![5, 1; -2];
    let stepped = slice(&item);
    assert_eq!((constant(&stepped.start), constant(&stepped.stop), stepped.step), (Some(5), Some(1), -2));
}

#[test]
fn test_macro_points_and_arrays() {
    assert!(matches!(idx![3], AxisIndex::Constant(3)));
    assert!(matches!(idx![vec![0, 1]], AxisIndex::Fancy(FancyIndex::Literal(_))));

    let mut ctx = Context::default();
    let y = ctx.input("y", ValueType::scalar(DType::int(3)));
    let t = ctx.input("t", ValueType::tensor(DType::int(3), &[2]));
    assert!(idx![&y].is_point());
    assert!(!idx![&y].is_fancy());
    assert!(idx![&t].is_fancy());
    assert!(!idx![&t].is_point());
    assert!(matches!(idx![&y, ..], AxisIndex::Slice(SliceSpec { start: Some(AxisScalar::Runtime(_)), .. })));
}

#[test]
fn test_index_array_size_checked() {
    assert!(matches!(
        IndexArray::new(&[2, 2], vec![0, 1, 2]),
        Err(Error::IndexArraySize { expected: 4, actual: 3, .. })
    ));
    let array = IndexArray::from(vec![4, 5, 6]);
    assert_eq!(array.shape(), &[3]);
    assert_eq!(array.values(), &[4, 5, 6]);
}
