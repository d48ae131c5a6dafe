//! Common imports for building and inspecting IR:
//!
//! ```rust,ignore
//! use veil_ir::prelude::*;
//! ```

pub use crate::context::{Block, Context, Function, NodeLabel};
pub use crate::op::{DYNAMIC, Op, Region};
pub use crate::shape::Shape;
pub use crate::types::{CastKind, CmpPredicate, ConstValue, Security, ValueType};
pub use crate::value::{Value, ValueRef};

pub use veil_dtype::DType;
