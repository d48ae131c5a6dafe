//! End-to-end indexing scenarios.

use veil_dtype::DType;
use veil_ir::{Array, Context, Op, ValueType};

use crate::test::harness::*;
use crate::{AxisIndex, IndexingConfig, IndexingMode, classify, idx};

#[test]
fn test_runtime_index_on_vector() {
    let mut ctx = Context::default();
    let x = secured_source(&mut ctx, &[3]);
    let y = ctx.input("y", ValueType::scalar(DType::int(3)));
    let index = vec![idx![&y]];
    let result = lower(&mut ctx, &IndexingConfig::default(), &x, &index).unwrap();
    assert_eq!(classify(&index, result.shape()), IndexingMode::Extract);
    assert!(result.is_scalar());
    assert!(result.is_secured());
    let function = ctx.finish(vec![result]);

    assert_eq!(count_ops(&function, "extract"), 1);
    assert_eq!(count_ops(&function, "extract_slice"), 0);
    assert_eq!(count_ops(&function, "collapse_shape"), 0);

    let data = Array::from_vec(vec![10, 20, 30]);
    for (y, expected) in [(-3, 10), (-2, 20), (-1, 30), (0, 10), (1, 20), (2, 30)] {
        let (out, traces) = run(&function, &[data.clone(), Array::scalar(y)]);
        assert_eq!(out.unwrap().as_scalar(), Some(expected), "y = {y}");
        assert!(traces.is_empty());
    }
}

#[test]
fn test_runtime_row_constant_column() {
    let mut ctx = Context::default();
    let x = secured_source(&mut ctx, &[3, 4]);
    let y = ctx.input("y", ValueType::scalar(DType::uint(2)));
    let index = vec![idx![&y], idx![0]];
    let result = lower(&mut ctx, &IndexingConfig::default(), &x, &index).unwrap();
    assert!(result.is_scalar());
    let function = ctx.finish(vec![result]);

    let extract = find_op(&function, "extract");
    let Op::Extract { indices, .. } = extract.op() else { unreachable!() };
    assert_eq!(indices.len(), 2);
    assert_eq!(indices[0].as_const(), None);
    assert_eq!(indices[1].as_const(), Some(0));
    // Unsigned runtime indices need no wraparound.
    assert_eq!(count_ops(&function, "if"), 0);

    for y in 0..3 {
        let (out, _) = run(&function, &[source_data(&[3, 4]), Array::scalar(y)]);
        assert_eq!(out.unwrap().as_scalar(), Some(y * 4));
    }
}

#[test]
fn test_runtime_index_on_long_vector() {
    let mut ctx = Context::default();
    let x = secured_source(&mut ctx, &[31]);
    let y = ctx.input("y", ValueType::scalar(DType::int(3)));
    let result = lower(&mut ctx, &IndexingConfig::default(), &x, &[idx![&y]]).unwrap();
    let function = ctx.finish(vec![result]);

    assert_eq!(count_ops(&function, "extract"), 1);
    // Index widened so that 31 fits a signed working type.
    let widened = function.body.iter().find(|value| matches!(value.op(), Op::Cast { .. })).unwrap();
    assert_eq!(widened.dtype(), DType::int(6));

    for (y, expected) in [(-3, 28), (-1, 30), (0, 0), (2, 2)] {
        let (out, _) = run(&function, &[source_data(&[31]), Array::scalar(y)]);
        assert_eq!(out.unwrap().as_scalar(), Some(expected), "y = {y}");
    }
}

#[test]
fn test_two_runtime_indices() {
    let mut ctx = Context::default();
    let x = secured_source(&mut ctx, &[3, 4]);
    let y = ctx.input("y", ValueType::scalar(DType::int(3)));
    let z = ctx.input("z", ValueType::scalar(DType::int(4)));
    let index = vec![idx![&y], idx![&z]];
    let result = lower(&mut ctx, &IndexingConfig::default(), &x, &index).unwrap();
    assert_eq!(classify(&index, result.shape()), IndexingMode::Extract);
    let function = ctx.finish(vec![result]);

    let extract = find_op(&function, "extract");
    let Op::Extract { indices, .. } = extract.op() else { unreachable!() };
    assert!(indices.iter().all(|index| index.as_const().is_none()));
    assert_eq!(count_ops(&function, "extract_slice"), 0);

    let (out, _) = run(&function, &[source_data(&[3, 4]), Array::scalar(-1), Array::scalar(-3)]);
    assert_eq!(out.unwrap().as_scalar(), Some(2 * 4 + 1));
}

#[test]
fn test_fancy_pairs() {
    let mut ctx = Context::default();
    let x = secured_source(&mut ctx, &[4, 4]);
    let index: Vec<AxisIndex> = vec![idx![vec![0, 2]], idx![vec![1, 3]]];
    let result = lower(&mut ctx, &IndexingConfig::default(), &x, &index).unwrap();
    assert_eq!(classify(&index, result.shape()), IndexingMode::Gather);
    assert_eq!(result.shape(), &[2]);
    let function = ctx.finish(vec![result]);

    let gather = find_op(&function, "fancy_index");
    let Op::FancyIndex { indices, .. } = gather.op() else { unreachable!() };
    assert_eq!(indices.shape(), &[2, 2]);

    let (out, _) = run(&function, &[source_data(&[4, 4])]);
    assert_eq!(out.unwrap(), Array::from_vec(vec![1, 11]));
}
