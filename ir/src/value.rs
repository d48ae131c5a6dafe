//! Core Value struct.
//!
//! A [`Value`] is the single result of one operation. Values are created only
//! through [`Context`](crate::Context) constructors, shared as [`ValueRef`]
//! and never mutated afterwards.

use std::sync::Arc;

use crate::op::Op;
use crate::types::ValueType;
use veil_dtype::DType;

/// Shared handle to a value node.
pub type ValueRef = Arc<Value>;

/// Node in the operation graph.
///
/// Values form a DAG where operations reference their inputs through the
/// [`Op`] enum. Identity is the `id`, unique within the context that created
/// the value.
pub struct Value {
    pub id: u64,
    pub(crate) op: Op,
    pub(crate) ty: ValueType,
}

// Shows only the node header, avoiding recursive printing of operands
impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{} = {} : {}", self.id, self.op.name(), self.ty)
    }
}

impl Value {
    /// Get the operation.
    pub fn op(&self) -> &Op {
        &self.op
    }

    /// Get the declared type.
    pub fn ty(&self) -> &ValueType {
        &self.ty
    }

    /// Get the element data type.
    pub fn dtype(&self) -> DType {
        self.ty.dtype
    }

    pub fn shape(&self) -> &[usize] {
        &self.ty.shape
    }

    pub fn rank(&self) -> usize {
        self.ty.rank()
    }

    pub fn is_scalar(&self) -> bool {
        self.ty.is_scalar()
    }

    pub fn is_tensor(&self) -> bool {
        self.ty.is_tensor()
    }

    pub fn is_secured(&self) -> bool {
        self.ty.is_secured()
    }

    /// Constant integer payload if this is a scalar `Const`.
    pub fn as_const(&self) -> Option<i64> {
        match &self.op {
            Op::Const(crate::ConstValue::Scalar(v)) => Some(*v),
            _ => None,
        }
    }

    /// SSA name of this value, e.g. `%7`.
    pub fn name(&self) -> String {
        format!("%{}", self.id)
    }
}
