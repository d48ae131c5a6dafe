//! Type definitions for IR values and operations.
//!
//! This module contains the value type triple (dtype, shape, security) and the
//! small enums parameterizing operations: constant payloads, cast kinds and
//! comparison predicates.

use std::fmt;

use smallvec::SmallVec;
use veil_dtype::DType;

use crate::shape::{self, Shape};

/// Whether a value's content is observable by runtime control flow.
///
/// Secured values are opaque: they can be computed on and extracted from, but
/// never branched on or used to address memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Security {
    #[default]
    Plain,
    Secured,
}

impl Security {
    /// The stricter of two security levels.
    pub fn join(self, other: Self) -> Self {
        self.max(other)
    }
}

/// Type of an IR value: element type, static shape and security level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueType {
    pub dtype: DType,
    pub shape: Shape,
    pub security: Security,
}

impl ValueType {
    pub fn new(dtype: DType, shape: &[usize], security: Security) -> Self {
        Self { dtype, shape: SmallVec::from_slice(shape), security }
    }

    /// Plain rank-0 value.
    pub fn scalar(dtype: DType) -> Self {
        Self::new(dtype, &[], Security::Plain)
    }

    /// Plain tensor value.
    pub fn tensor(dtype: DType, shape: &[usize]) -> Self {
        Self::new(dtype, shape, Security::Plain)
    }

    /// Result type of side-effect-only operations.
    pub fn void() -> Self {
        Self::scalar(DType::Void)
    }

    pub fn secured(mut self) -> Self {
        self.security = Security::Secured;
        self
    }

    pub fn with_shape(&self, shape: &[usize]) -> Self {
        Self { dtype: self.dtype, shape: SmallVec::from_slice(shape), security: self.security }
    }

    pub fn with_dtype(&self, dtype: DType) -> Self {
        Self { dtype, shape: self.shape.clone(), security: self.security }
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    pub fn is_tensor(&self) -> bool {
        !self.shape.is_empty()
    }

    pub fn is_secured(&self) -> bool {
        self.security == Security::Secured
    }

    pub fn is_plain(&self) -> bool {
        self.security == Security::Plain
    }

    pub fn num_elements(&self) -> usize {
        shape::num_elements(&self.shape)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let element = match self.security {
            Security::Plain => self.dtype.to_string(),
            Security::Secured => format!("!secured<{}>", self.dtype),
        };
        if self.shape.is_empty() {
            return f.write_str(&element);
        }

        f.write_str("tensor<")?;
        for dim in &self.shape {
            write!(f, "{dim}x")?;
        }
        write!(f, "{element}>")
    }
}

/// Payload of a `Const` operation. Values are stored already wrapped to the
/// constant's dtype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstValue {
    Scalar(i64),
    /// Row-major dense tensor contents.
    Dense(Vec<i64>),
}

impl ConstValue {
    pub fn values(&self) -> &[i64] {
        match self {
            Self::Scalar(v) => std::slice::from_ref(v),
            Self::Dense(values) => values,
        }
    }
}

/// Integer conversion performed by a `Cast` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CastKind {
    /// Widen, replicating the source sign bit.
    SignExtend,
    /// Widen, filling with zero bits.
    ZeroExtend,
    /// Integer to [`DType::Index`], extending according to the source signedness.
    IndexCast,
}

/// Integer comparison predicate. Ordering predicates are signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum CmpPredicate {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
}

impl CmpPredicate {
    pub fn evaluate(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Slt => lhs < rhs,
            Self::Sle => lhs <= rhs,
            Self::Sgt => lhs > rhs,
            Self::Sge => lhs >= rhs,
        }
    }
}
