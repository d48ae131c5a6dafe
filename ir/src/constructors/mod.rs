//! Constructor methods on [`Context`](crate::Context), organized by semantic category.
//!
//! - [`data`] - Constants
//! - [`compute`] - Arithmetic, comparisons and integer casts
//! - [`control`] - Structured conditionals and runtime traces
//! - [`extract`] - Element, slice and gather extraction
//! - [`movement`] - Collapse, broadcast, reshape, concatenate
//!
//! Every constructor validates its operands, appends exactly one operation to
//! the innermost open block and returns the new value. Constructors that
//! receive a declared result type check it against what the operands imply.

pub mod compute;
pub mod control;
pub mod data;
pub mod extract;
pub mod movement;

use snafu::ensure;
use veil_dtype::DType;

use crate::Result;
use crate::error::*;
use crate::types::ValueType;
use crate::value::ValueRef;

/// Reject integer widths the type system cannot represent.
pub(crate) fn check_dtype(dtype: DType) -> Result<()> {
    if let DType::Int { bit_width, .. } = dtype {
        ensure!((1..=veil_dtype::MAX_BIT_WIDTH).contains(&bit_width), InvalidBitWidthSnafu { bit_width });
    }
    Ok(())
}

/// Check that a caller-declared result type is the one the operands imply.
pub(crate) fn check_declared(operation: &'static str, declared: &ValueType, inferred: ValueType) -> Result<()> {
    ensure!(
        *declared == inferred,
        ResultTypeMismatchSnafu { operation, declared: declared.clone(), inferred }
    );
    Ok(())
}

/// Operands used for addressing must be plain scalar indices.
pub(crate) fn check_index_operand(operation: &'static str, index: &ValueRef) -> Result<()> {
    ensure!(index.is_scalar(), ScalarRequiredSnafu { operation, shape: index.ty().shape.clone() });
    ensure!(index.dtype() == DType::Index, IndexTypeMismatchSnafu { actual: index.dtype() });
    ensure!(!index.is_secured(), SecuredOperandSnafu { operation });
    Ok(())
}
