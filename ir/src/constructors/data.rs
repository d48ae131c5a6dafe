//! Constants.

use snafu::ensure;
use veil_dtype::DType;

use super::check_dtype;
use crate::context::Context;
use crate::error::*;
use crate::op::Op;
use crate::types::{ConstValue, ValueType};
use crate::value::ValueRef;
use crate::Result;

impl Context {
    /// Create a constant of the given type.
    ///
    /// Scalar payloads need a rank-0 type; dense payloads must have exactly one
    /// value per element. Every value must lie inside the dtype's range.
    pub fn constant(&mut self, ty: ValueType, value: ConstValue) -> Result<ValueRef> {
        check_dtype(ty.dtype)?;
        match &value {
            ConstValue::Scalar(_) => {
                ensure!(ty.is_scalar(), ConstSizeMismatchSnafu { expected: ty.num_elements(), actual: 1usize })
            }
            ConstValue::Dense(values) => {
                ensure!(
                    values.len() == ty.num_elements(),
                    ConstSizeMismatchSnafu { expected: ty.num_elements(), actual: values.len() }
                )
            }
        }
        if let Some(&bad) = value.values().iter().find(|&&v| !ty.dtype.contains(v)) {
            return ConstOutOfRangeSnafu { value: bad, dtype: ty.dtype }.fail();
        }

        Ok(self.emit(Op::Const(value), ty))
    }

    /// Plain scalar integer constant.
    pub fn const_int(&mut self, dtype: DType, value: i64) -> Result<ValueRef> {
        self.constant(ValueType::scalar(dtype), ConstValue::Scalar(value))
    }

    /// Plain scalar index constant.
    pub fn const_index(&mut self, value: i64) -> ValueRef {
        self.emit(Op::Const(ConstValue::Scalar(value)), ValueType::scalar(DType::Index))
    }

    /// Plain dense index tensor, row-major.
    pub fn const_index_tensor(&mut self, shape: &[usize], values: Vec<i64>) -> Result<ValueRef> {
        self.constant(ValueType::tensor(DType::Index, shape), ConstValue::Dense(values))
    }
}
