//! Textual rendering tests.

use veil_dtype::DType;

use crate::{CmpPredicate, Context, ValueType};

#[test]
fn test_function_rendering() {
    let mut ctx = Context::default();
    let x = ctx.input("x", ValueType::tensor(DType::uint(4), &[3]).secured());
    let i = ctx.input("i", ValueType::scalar(DType::int(3)));
    let wide = ctx.sign_extend(&i, DType::int(4)).unwrap();
    let zero = ctx.const_int(DType::int(4), 0).unwrap();
    let negative = ctx.cmp(CmpPredicate::Slt, &wide, &zero).unwrap();
    let positive = ctx
        .conditional(
            ValueType::scalar(DType::int(4)),
            &negative,
            |ctx| {
                let three = ctx.const_int(DType::int(4), 3)?;
                ctx.add(&wide, &three)
            },
            |_| Ok(wide.clone()),
        )
        .unwrap();
    let index = ctx.index_cast(&positive).unwrap();
    let y = ctx.extract(ValueType::scalar(DType::uint(4)).secured(), &x, &[index]).unwrap();
    let function = ctx.finish(vec![y]);

    let expected = "\
func @main(%0: tensor<3x!secured<u4>>, %1: i3) {
  %2 = cast sign_extend %1 : i3 -> i4
  %3 = const 0 : i4
  %4 = cmp slt %2, %3 : i4
  %7 = if %4 -> i4 {
    %5 = const 3 : i4
    %6 = add %2, %5 : i4
    yield %6
  } else {
    yield %2
  }
  %8 = cast index_cast %7 : i4 -> index
  %9 = extract %0[%8] : !secured<u4>
  return %9
}
";
    assert_eq!(function.to_string(), expected);
}

#[test]
fn test_void_if_and_trace_rendering() {
    let mut ctx = Context::default();
    let cond = ctx.const_int(DType::Bool, 1).unwrap();
    ctx.conditional_effect(&cond, |ctx| {
        ctx.trace("oops\n");
        Ok(())
    })
    .unwrap();

    let expected = "%0 = const 1 : u1\nif %0 {\n  trace \"oops\\n\"\n}\n";
    assert_eq!(ctx.current_block().to_string(), expected);
}

#[test]
fn test_slice_rendering_marks_dynamic_offsets() {
    let mut ctx = Context::default();
    let x = ctx.input("x", ValueType::tensor(DType::Int8, &[3, 4]));
    let offset = ctx.const_index(1);
    let y = ctx
        .extract_slice(
            ValueType::tensor(DType::Int8, &[1, 2]),
            &x,
            std::slice::from_ref(&offset),
            &[crate::DYNAMIC, 0],
            &[1, 2],
            &[1, 2],
        )
        .unwrap();
    assert_eq!(
        crate::printer::format_operation(&y),
        "extract_slice %0[%1, 0] [1, 2] [1, 2] : tensor<3x4xi8> to tensor<1x2xi8>"
    );
}
