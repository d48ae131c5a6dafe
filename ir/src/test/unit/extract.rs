//! Extraction construction and validation tests.

use std::sync::Arc;

use test_case::test_case;
use veil_dtype::DType;

use crate::{Context, DYNAMIC, Op, ValueType, error::Error};

fn source(ctx: &mut Context, shape: &[usize]) -> (ValueType, crate::ValueRef) {
    let ty = ValueType::tensor(DType::uint(4), shape).secured();
    let x = ctx.input("x", ty.clone());
    (ty, x)
}

// =========================================================================
// extract
// =========================================================================

#[test]
fn test_extract_scalar_type() {
    let mut ctx = Context::default();
    let (ty, x) = source(&mut ctx, &[3, 4]);
    let i = ctx.const_index(1);
    let j = ctx.const_index(2);
    let y = ctx.extract(ty.with_shape(&[]), &x, &[i.clone(), j.clone()]).unwrap();
    assert!(y.is_scalar());
    assert!(y.is_secured());

    let Op::Extract { indices, .. } = y.op() else { unreachable!() };
    assert_eq!(indices.len(), 2);
    assert!(Arc::ptr_eq(&indices[0], &i) && Arc::ptr_eq(&indices[1], &j));
}

#[test]
fn test_extract_needs_one_index_per_axis() {
    let mut ctx = Context::default();
    let (ty, x) = source(&mut ctx, &[3, 4]);
    let i = ctx.const_index(1);
    let result = ctx.extract(ty.with_shape(&[]), &x, &[i]);
    assert!(matches!(result, Err(Error::RankMismatch { expected: 2, actual: 1, .. })));
}

#[test]
fn test_extract_rejects_integer_index() {
    let mut ctx = Context::default();
    let (ty, x) = source(&mut ctx, &[3]);
    let i = ctx.const_int(DType::int(3), 1).unwrap();
    let result = ctx.extract(ty.with_shape(&[]), &x, &[i]);
    assert!(matches!(result, Err(Error::IndexTypeMismatch { .. })));
}

#[test]
fn test_extract_declared_type_checked() {
    let mut ctx = Context::default();
    let (ty, x) = source(&mut ctx, &[3]);
    let i = ctx.const_index(1);
    let plain = ValueType::scalar(ty.dtype);
    let result = ctx.extract(plain, &x, &[i]);
    assert!(matches!(result, Err(Error::ResultTypeMismatch { operation: "extract", .. })));
}

// =========================================================================
// extract_slice
// =========================================================================

#[test]
fn test_extract_slice_with_dynamic_offset() {
    let mut ctx = Context::default();
    let (ty, x) = source(&mut ctx, &[3, 4]);
    let offset = ctx.const_index(2);
    let y = ctx
        .extract_slice(ty.with_shape(&[1, 4]), &x, std::slice::from_ref(&offset), &[DYNAMIC, 0], &[1, 4], &[1, 1])
        .unwrap();
    assert_eq!(y.shape(), &[1, 4]);
    let Op::ExtractSlice { dynamic_offsets, .. } = y.op() else { unreachable!() };
    assert_eq!(dynamic_offsets.len(), 1);
    assert!(Arc::ptr_eq(&dynamic_offsets[0], &offset));
}

#[test]
fn test_extract_slice_negative_stride() {
    let mut ctx = Context::default();
    let (ty, x) = source(&mut ctx, &[5]);
    let y = ctx.extract_slice(ty.with_shape(&[3]), &x, &[], &[4], &[3], &[-2]).unwrap();
    assert_eq!(y.shape(), &[3]);
}

#[test]
fn test_extract_slice_empty_axis() {
    let mut ctx = Context::default();
    let (ty, x) = source(&mut ctx, &[5]);
    let y = ctx.extract_slice(ty.with_shape(&[0]), &x, &[], &[0], &[0], &[1]).unwrap();
    assert_eq!(y.ty().num_elements(), 0);
}

#[test_case(&[0], &[6], &[1] ; "too long")]
#[test_case(&[4], &[3], &[1] ; "past the end")]
#[test_case(&[1], &[3], &[-1] ; "before the start")]
#[test_case(&[0], &[3], &[i64::MAX] ; "overflowing stride")]
fn test_extract_slice_out_of_bounds(offsets: &[i64], sizes: &[i64], strides: &[i64]) {
    let mut ctx = Context::default();
    let (ty, x) = source(&mut ctx, &[5]);
    let shape = [sizes[0] as usize];
    let result = ctx.extract_slice(ty.with_shape(&shape), &x, &[], offsets, sizes, strides);
    assert!(matches!(result, Err(Error::SliceOutOfBounds { dim: 0, .. })));
}

#[test]
fn test_extract_slice_zero_stride() {
    let mut ctx = Context::default();
    let (ty, x) = source(&mut ctx, &[5]);
    let result = ctx.extract_slice(ty.with_shape(&[1]), &x, &[], &[0], &[1], &[0]);
    assert!(matches!(result, Err(Error::ZeroStride { dim: 0 })));
}

#[test]
fn test_extract_slice_sentinel_count() {
    let mut ctx = Context::default();
    let (ty, x) = source(&mut ctx, &[3, 4]);
    let result = ctx.extract_slice(ty.with_shape(&[1, 4]), &x, &[], &[DYNAMIC, 0], &[1, 4], &[1, 1]);
    assert!(matches!(result, Err(Error::DynamicOffsetCount { sentinels: 1, operands: 0 })));
}

// =========================================================================
// fancy_index
// =========================================================================

#[test]
fn test_fancy_index_rank_one_source() {
    let mut ctx = Context::default();
    let (ty, x) = source(&mut ctx, &[5]);
    let indices = ctx.const_index_tensor(&[2, 2], vec![0, 1, 2, 3]).unwrap();
    let y = ctx.fancy_index(ty.with_shape(&[2, 2]), &x, &indices).unwrap();
    assert_eq!(y.shape(), &[2, 2]);
}

#[test]
fn test_fancy_index_coordinate_axis() {
    let mut ctx = Context::default();
    let (ty, x) = source(&mut ctx, &[3, 4]);
    let indices = ctx.const_index_tensor(&[2, 2], vec![0, 1, 2, 3]).unwrap();
    let y = ctx.fancy_index(ty.with_shape(&[2]), &x, &indices).unwrap();
    assert_eq!(y.shape(), &[2]);

    let bad = ctx.const_index_tensor(&[2, 3], vec![0; 6]).unwrap();
    let result = ctx.fancy_index(ty.with_shape(&[2]), &x, &bad);
    assert!(matches!(result, Err(Error::FancyIndexShapeMismatch { source_rank: 2, .. })));
}
