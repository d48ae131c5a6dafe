//! Intermediate Representation (IR) for the veil compiler.
//!
//! This crate is the operation-graph side of the compiler: every lowering pass
//! builds its output through a [`Context`], which hands out immutable
//! [`Value`] nodes and records them in ordered blocks.
//!
//! # Module Organization
//!
//! - [`types`] - Value types, security levels, constants, predicates
//! - [`shape`] - Static shapes and row-major/broadcast helpers
//! - [`op`] - Operation enum defining all IR operations
//! - [`value`] - The `Value` node and its accessors
//! - [`context`] - Builder context, blocks, functions
//! - [`constructors`] - Validated constructor methods by semantic category
//! - [`printer`] - Textual rendering of functions
//! - [`interp`] - Reference interpreter over plain integer arrays
//! - [`error`] - Error types and result handling

pub mod constructors;
pub mod context;
pub mod error;
pub mod interp;
pub mod op;
pub mod prelude;
pub mod printer;
pub mod shape;
pub mod types;
pub mod value;

#[cfg(any(test, feature = "proptest"))]
pub mod test;

pub use context::{Block, Context, Function, NodeLabel};
pub use error::{Error, Result};
pub use interp::{Array, EvalError, Interpreter};
pub use op::{DYNAMIC, Op, Region};
pub use shape::Shape;
pub use types::{CastKind, CmpPredicate, ConstValue, Security, ValueType};
pub use value::{Value, ValueRef};

pub use veil_dtype::DType;
