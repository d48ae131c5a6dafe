//! Semantic properties of indexing lowering.

use proptest::prelude::*;
use veil_dtype::DType;
use veil_ir::{Array, Context, ValueType};

use super::generators::*;
use crate::test::harness::*;
use crate::{AxisIndex, IndexingConfig, IndexingMode, classify, idx, indexing_result_type};

fn config(check: bool) -> IndexingConfig {
    IndexingConfig::builder().dynamic_indexing_check_out_of_bound(check).build()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Lowered point and slice indexing agrees with NumPy, including the
    /// values of collapsed results.
    #[test]
    fn matches_numpy((shape, items) in indexing_case(), check in any::<bool>()) {
        let (function, args) = lower_items(&shape, &items, &config(check)).unwrap();
        let (out, traces) = run(&function, &args);
        prop_assert_eq!(out.unwrap(), reference(&args[0], &items));
        prop_assert!(traces.is_empty());
    }

    /// `x[i]` and `x[i + d]` select the same element for `-d <= i < 0`.
    #[test]
    fn negative_index_equivalence(d in 1usize..=40, offset in 0usize..40, runtime in any::<bool>()) {
        let i = -((offset % d) as i64) - 1;
        let negative = [Item::Point { value: i, runtime }];
        let positive = [Item::Point { value: i + d as i64, runtime: false }];

        let config = IndexingConfig::default();
        let (negative_fn, negative_args) = lower_items(&[d], &negative, &config).unwrap();
        let (positive_fn, positive_args) = lower_items(&[d], &positive, &config).unwrap();
        let (lhs, _) = run(&negative_fn, &negative_args);
        let (rhs, _) = run(&positive_fn, &positive_args);
        prop_assert_eq!(lhs.unwrap(), rhs.unwrap());
    }

    /// Omitted trailing axes behave like explicit full slices.
    #[test]
    fn padding_law((shape, items) in indexing_case()) {
        let mut padded = items.clone();
        padded.resize(shape.len(), Item::Slice { start: None, stop: None, step: 1 });

        let (short_fn, short_args) = lower_items(&shape, &items, &IndexingConfig::default()).unwrap();
        let (padded_fn, padded_args) = lower_items(&shape, &padded, &IndexingConfig::default()).unwrap();
        let (short, _) = run(&short_fn, &short_args);
        let (long, _) = run(&padded_fn, &padded_args);
        prop_assert_eq!(short.unwrap(), long.unwrap());
        prop_assert_eq!(count_ops(&short_fn, "collapse_shape"), count_ops(&padded_fn, "collapse_shape"));
    }

    /// Collapsing keeps the declared shape and emits a collapse exactly when
    /// some axis is point-indexed and the result is not a scalar.
    #[test]
    fn collapse_shape_law((shape, items) in indexing_case()) {
        let (function, _) = lower_items(&shape, &items, &IndexingConfig::default()).unwrap();
        let points = items.iter().filter(|item| matches!(item, Item::Point { .. })).count();
        let result = &function.outputs[0];
        let expected_rank = shape.len() - points;
        prop_assert_eq!(result.rank(), expected_rank);

        let collapses = count_ops(&function, "collapse_shape");
        if expected_rank == 0 {
            prop_assert_eq!(count_ops(&function, "extract"), 1);
            prop_assert_eq!(collapses, 0);
        } else {
            prop_assert_eq!(collapses, usize::from(points > 0));
            prop_assert_eq!(count_ops(&function, "extract_slice"), 1);
        }
    }

    /// Any array-valued item sends the whole expression down the gather path.
    #[test]
    fn array_index_forces_gather(
        (shape, values) in runtime_points(),
        array_axis in 0usize..3,
        as_tensor in any::<bool>(),
    ) {
        let array_axis = array_axis % shape.len();
        let mut ctx = Context::default();
        let x = secured_source(&mut ctx, &shape);
        let mut args = vec![source_data(&shape)];

        let mut index: Vec<AxisIndex> = values.iter().map(|&v| idx![v]).collect();
        let d = shape[array_axis] as i64;
        index[array_axis] = if as_tensor {
            let ty = ValueType::tensor(DType::uint(3), &[2]);
            args.push(Array::from_vec(vec![0, d - 1]));
            idx![ctx.input("t", ty)]
        } else {
            idx![vec![0, -1]]
        };

        let resulting_type = indexing_result_type(x.ty(), &index).unwrap();
        prop_assert_eq!(classify(&index, &resulting_type.shape), IndexingMode::Gather);
        let result = lower(&mut ctx, &IndexingConfig::default(), &x, &index).unwrap();
        let function = ctx.finish(vec![result]);
        prop_assert_eq!(count_ops(&function, "fancy_index"), 1);
        prop_assert_eq!(count_ops(&function, "extract_slice"), 0);
        prop_assert_eq!(count_ops(&function, "extract"), 0);

        let (out, _) = run(&function, &args);
        let out = out.unwrap();
        prop_assert_eq!(out.shape.as_slice(), &[2]);
        let mut position: Vec<usize> = values
            .iter()
            .zip(&shape)
            .map(|(&v, &d)| if v < 0 { (v + d as i64) as usize } else { v as usize })
            .collect();
        for (k, picked) in [0, d - 1].into_iter().enumerate() {
            position[array_axis] = picked as usize;
            prop_assert_eq!(out.data[k], args[0].get(&position));
        }
    }

    /// Enabling bounds diagnostics never changes an in-range result.
    #[test]
    fn diagnostics_are_transparent((shape, values) in runtime_points()) {
        let items: Vec<Item> = values.iter().map(|&value| Item::Point { value, runtime: true }).collect();
        let (plain_fn, args) = lower_items(&shape, &items, &config(false)).unwrap();
        let (checked_fn, _) = lower_items(&shape, &items, &config(true)).unwrap();

        let (plain, plain_traces) = run(&plain_fn, &args);
        let (checked, checked_traces) = run(&checked_fn, &args);
        prop_assert_eq!(plain.unwrap(), checked.unwrap());
        prop_assert!(plain_traces.is_empty() && checked_traces.is_empty());
        prop_assert!(count_ops(&checked_fn, "trace") >= 2 * shape.len());
        prop_assert_eq!(count_ops(&plain_fn, "trace"), 0);
    }
}
