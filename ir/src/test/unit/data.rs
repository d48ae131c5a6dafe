//! Constant construction tests.

use veil_dtype::DType;

use crate::{ConstValue, Context, ValueType, error::Error};

#[test]
fn test_const_int_in_range() {
    let mut ctx = Context::default();
    let c = ctx.const_int(DType::int(3), -4).unwrap();
    assert_eq!(c.as_const(), Some(-4));
    assert_eq!(c.dtype(), DType::int(3));
    assert!(c.is_scalar());
}

#[test]
fn test_const_int_out_of_range() {
    let mut ctx = Context::default();
    let result = ctx.const_int(DType::uint(2), 4);
    assert!(matches!(result, Err(Error::ConstOutOfRange { value: 4, .. })));
}

#[test]
fn test_const_invalid_bit_width() {
    let mut ctx = Context::default();
    let result = ctx.const_int(DType::int(65), 0);
    assert!(matches!(result, Err(Error::InvalidBitWidth { bit_width: 65 })));
}

#[test]
fn test_dense_size_mismatch() {
    let mut ctx = Context::default();
    let result = ctx.const_index_tensor(&[2, 2], vec![0, 1, 2]);
    assert!(matches!(result, Err(Error::ConstSizeMismatch { expected: 4, actual: 3 })));
}

#[test]
fn test_scalar_payload_needs_scalar_type() {
    let mut ctx = Context::default();
    let result = ctx.constant(ValueType::tensor(DType::Index, &[2]), ConstValue::Scalar(1));
    assert!(matches!(result, Err(Error::ConstSizeMismatch { expected: 2, actual: 1 })));
}

#[test]
fn test_const_index_is_plain_scalar() {
    let mut ctx = Context::default();
    let c = ctx.const_index(7);
    assert_eq!(c.dtype(), DType::Index);
    assert!(!c.is_secured());
    assert_eq!(ctx.current_block().len(), 1);
}

#[test]
fn test_ids_are_unique_and_increasing() {
    let mut ctx = Context::default();
    let x = ctx.input("x", ValueType::scalar(DType::Int8));
    let a = ctx.const_index(0);
    let b = ctx.const_index(0);
    assert!(x.id < a.id && a.id < b.id);
    assert_eq!(ctx.current_block().len(), 2, "inputs are not block operations");
}
