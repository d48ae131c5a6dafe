//! Arithmetic, comparisons and integer casts.

use snafu::ensure;
use veil_dtype::DType;

use super::check_dtype;
use crate::context::Context;
use crate::error::*;
use crate::op::Op;
use crate::types::{CastKind, CmpPredicate, ValueType};
use crate::value::ValueRef;
use crate::Result;

impl Context {
    /// Elementwise wrapping integer addition.
    pub fn add(&mut self, lhs: &ValueRef, rhs: &ValueRef) -> Result<ValueRef> {
        let ty = binary_result_type("add", lhs, rhs)?;
        ensure!(ty.dtype.is_integer(), IntegerRequiredSnafu { operation: "add", dtype: ty.dtype });
        Ok(self.emit(Op::Add { lhs: lhs.clone(), rhs: rhs.clone() }, ty))
    }

    /// Elementwise comparison producing booleans.
    pub fn cmp(&mut self, predicate: CmpPredicate, lhs: &ValueRef, rhs: &ValueRef) -> Result<ValueRef> {
        let ty = binary_result_type("cmp", lhs, rhs)?;
        ensure!(ty.dtype.is_int(), IntegerRequiredSnafu { operation: "cmp", dtype: ty.dtype });
        let ty = ty.with_dtype(DType::Bool);
        Ok(self.emit(Op::Cmp { predicate, lhs: lhs.clone(), rhs: rhs.clone() }, ty))
    }

    /// Widen an integer, replicating its sign bit.
    pub fn sign_extend(&mut self, src: &ValueRef, to: DType) -> Result<ValueRef> {
        self.extend(src, to, CastKind::SignExtend)
    }

    /// Widen an integer, filling with zero bits.
    pub fn zero_extend(&mut self, src: &ValueRef, to: DType) -> Result<ValueRef> {
        self.extend(src, to, CastKind::ZeroExtend)
    }

    /// Convert a plain integer to the index type, extending by the source's signedness.
    pub fn index_cast(&mut self, src: &ValueRef) -> Result<ValueRef> {
        ensure!(src.dtype().is_integer(), IntegerRequiredSnafu { operation: "index_cast", dtype: src.dtype() });
        ensure!(!src.is_secured(), SecuredOperandSnafu { operation: "index_cast" });
        let ty = src.ty().with_dtype(DType::Index);
        Ok(self.emit(Op::Cast { src: src.clone(), kind: CastKind::IndexCast }, ty))
    }

    fn extend(&mut self, src: &ValueRef, to: DType, kind: CastKind) -> Result<ValueRef> {
        check_dtype(to)?;
        let from = src.dtype();
        ensure!(
            from.is_integer()
                && to.is_integer()
                && to.bit_width() > from.bit_width()
                && DType::can_safe_cast(from, to),
            InvalidExtensionSnafu { from, to }
        );
        let ty = src.ty().with_dtype(to);
        Ok(self.emit(Op::Cast { src: src.clone(), kind }, ty))
    }
}

fn binary_result_type(operation: &'static str, lhs: &ValueRef, rhs: &ValueRef) -> Result<ValueType> {
    ensure!(lhs.dtype() == rhs.dtype(), DTypeMismatchSnafu { operation, lhs: lhs.dtype(), rhs: rhs.dtype() });
    ensure!(
        lhs.shape() == rhs.shape(),
        ShapeMismatchSnafu { operation, lhs: lhs.ty().shape.clone(), rhs: rhs.ty().shape.clone() }
    );
    let security = lhs.ty().security.join(rhs.ty().security);
    Ok(ValueType { dtype: lhs.dtype(), shape: lhs.ty().shape.clone(), security })
}
