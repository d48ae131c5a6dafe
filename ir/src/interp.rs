//! Reference interpreter for lowered functions.
//!
//! Executes a [`Function`] over plain `i64` arrays. Security levels are type
//! tags only here: secured values are computed on in the clear, which makes
//! the interpreter the oracle for testing lowering passes.
//!
//! # Semantics
//!
//! - Values are always stored wrapped into their dtype's range
//! - Integer arithmetic wraps at the result's bit width
//! - Ordering comparisons are signed: unsigned operands are reinterpreted as
//!   signed integers of the same width
//! - `trace` records its message and execution continues
//! - Reading outside a source shape is an [`EvalError::OutOfBounds`]; traces
//!   recorded before the failure remain available through [`Interpreter::traces`]

use std::collections::HashMap;

use smallvec::SmallVec;
use snafu::{OptionExt, Snafu, ensure};
use veil_dtype::DType;

use crate::context::{Block, Function};
use crate::op::{DYNAMIC, Op};
use crate::shape::{self, Shape};
use crate::types::{CastKind, CmpPredicate};
use crate::value::ValueRef;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum EvalError {
    #[snafu(display("function expects {expected} arguments, got {actual}"))]
    ArgumentCount { expected: usize, actual: usize },

    #[snafu(display("argument {position} has shape {actual:?}, expected {expected:?}"))]
    ArgumentShape { position: usize, expected: Shape, actual: Shape },

    #[snafu(display("argument {position} holds {value}, outside the range of {dtype}"))]
    ArgumentOutOfRange { position: usize, value: i64, dtype: DType },

    #[snafu(display("array data has {actual} elements but shape {shape:?} needs {expected}"))]
    DataSizeMismatch { shape: Shape, expected: usize, actual: usize },

    #[snafu(display("%{value_id} reads position {position:?} outside shape {shape:?}"))]
    OutOfBounds { value_id: u64, position: Vec<i64>, shape: Shape },

    #[snafu(display("%{value_id} is used before it is defined"))]
    Undefined { value_id: u64 },
}

pub type Result<T, E = EvalError> = std::result::Result<T, E>;

/// Dense row-major integer array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array {
    pub shape: Shape,
    pub data: Vec<i64>,
}

impl Array {
    pub fn new(shape: &[usize], data: Vec<i64>) -> Result<Self> {
        let expected = shape::num_elements(shape);
        ensure!(
            data.len() == expected,
            DataSizeMismatchSnafu { shape: Shape::from_slice(shape), expected, actual: data.len() }
        );
        Ok(Self { shape: Shape::from_slice(shape), data })
    }

    pub fn scalar(value: i64) -> Self {
        Self { shape: Shape::new(), data: vec![value] }
    }

    /// Rank-1 array.
    pub fn from_vec(data: Vec<i64>) -> Self {
        Self { shape: SmallVec::from_slice(&[data.len()]), data }
    }

    /// Array of the given shape holding `0, 1, 2, ...` in row-major order.
    pub fn iota(shape: &[usize]) -> Self {
        let len = shape::num_elements(shape);
        Self { shape: Shape::from_slice(shape), data: (0..len as i64).collect() }
    }

    pub fn as_scalar(&self) -> Option<i64> {
        self.shape.is_empty().then(|| self.data[0])
    }

    pub fn get(&self, position: &[usize]) -> i64 {
        self.data[shape::ravel(position, &self.shape)]
    }

    fn map(&self, f: impl Fn(i64) -> i64) -> Self {
        Self { shape: self.shape.clone(), data: self.data.iter().copied().map(f).collect() }
    }
}

/// Tree-walking interpreter.
#[derive(Debug, Default)]
pub struct Interpreter {
    env: HashMap<u64, Array>,
    traces: Vec<String>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trace messages recorded by the last run, in execution order.
    pub fn traces(&self) -> &[String] {
        &self.traces
    }

    /// Execute `function` on `args` and return its outputs.
    pub fn run(&mut self, function: &Function, args: &[Array]) -> Result<Vec<Array>> {
        self.env.clear();
        self.traces.clear();

        ensure!(
            args.len() == function.inputs.len(),
            ArgumentCountSnafu { expected: function.inputs.len(), actual: args.len() }
        );
        for (position, (input, arg)) in function.inputs.iter().zip(args).enumerate() {
            ensure!(
                arg.shape.as_slice() == input.shape(),
                ArgumentShapeSnafu { position, expected: input.ty().shape.clone(), actual: arg.shape.clone() }
            );
            let dtype = input.dtype();
            if let Some(&value) = arg.data.iter().find(|&&v| !dtype.contains(v)) {
                return ArgumentOutOfRangeSnafu { position, value, dtype }.fail();
            }
            self.env.insert(input.id, arg.clone());
        }

        self.run_block(&function.body)?;
        function.outputs.iter().map(|output| self.lookup(output).cloned()).collect()
    }

    fn lookup(&self, value: &ValueRef) -> Result<&Array> {
        self.env.get(&value.id).context(UndefinedSnafu { value_id: value.id })
    }

    fn scalar(&self, value: &ValueRef) -> Result<i64> {
        let array = self.lookup(value)?;
        Ok(array.data[0])
    }

    fn run_block(&mut self, block: &Block) -> Result<()> {
        for value in block {
            if let Some(result) = self.eval(value)? {
                self.env.insert(value.id, result);
            }
        }
        Ok(())
    }

    fn eval(&mut self, value: &ValueRef) -> Result<Option<Array>> {
        let ty = value.ty();
        let result = match value.op() {
            Op::Input { .. } => return Ok(None),
            Op::Const(constant) => Array { shape: ty.shape.clone(), data: constant.values().to_vec() },
            Op::Cast { src, kind } => {
                let from = src.dtype();
                let to = ty.dtype;
                self.lookup(src)?.map(|v| match kind {
                    CastKind::SignExtend => to.sign_extend(v, from),
                    CastKind::ZeroExtend => to.zero_extend(v, from),
                    CastKind::IndexCast => to.cast_from(v, from),
                })
            }
            Op::Add { lhs, rhs } => {
                let (a, b) = (self.lookup(lhs)?, self.lookup(rhs)?);
                let data = a.data.iter().zip(&b.data).map(|(&x, &y)| ty.dtype.wrap(x.wrapping_add(y))).collect();
                Array { shape: ty.shape.clone(), data }
            }
            Op::Cmp { predicate, lhs, rhs } => {
                let operand = lhs.dtype();
                let view = |v: i64| match predicate {
                    CmpPredicate::Eq | CmpPredicate::Ne => v,
                    _ if operand.is_unsigned() => DType::int(operand.bit_width()).wrap(v),
                    _ => v,
                };
                let (a, b) = (self.lookup(lhs)?, self.lookup(rhs)?);
                let data =
                    a.data.iter().zip(&b.data).map(|(&x, &y)| predicate.evaluate(view(x), view(y)) as i64).collect();
                Array { shape: ty.shape.clone(), data }
            }
            Op::If { condition, then_region, else_region } => {
                let region = if self.scalar(condition)? != 0 { then_region } else { else_region };
                self.run_block(&region.block)?;
                match &region.yielded {
                    Some(yielded) => self.lookup(yielded)?.clone(),
                    None => return Ok(None),
                }
            }
            Op::Trace { message } => {
                tracing::warn!(value.id = value.id, message = %message.trim_end(), "runtime trace");
                self.traces.push(message.clone());
                return Ok(None);
            }
            Op::Extract { src, indices } => {
                let position = indices.iter().map(|index| self.scalar(index)).collect::<Result<Vec<_>>>()?;
                let source = self.lookup(src)?;
                let position = checked_position(value.id, &position, &source.shape)?;
                Array::scalar(source.get(&position))
            }
            Op::ExtractSlice { src, dynamic_offsets, static_offsets, static_sizes, static_strides } => {
                let mut dynamic = dynamic_offsets.iter().peekable();
                let mut offsets = Vec::with_capacity(static_offsets.len());
                for &offset in static_offsets {
                    match dynamic.next_if(|_| offset == DYNAMIC) {
                        Some(operand) => offsets.push(self.scalar(operand)?),
                        None => offsets.push(offset),
                    }
                }

                let source = self.lookup(src)?;
                let sizes: Shape = static_sizes.iter().map(|&size| size as usize).collect();
                let mut data = Vec::with_capacity(shape::num_elements(&sizes));
                for flat in 0..shape::num_elements(&sizes) {
                    let local = shape::unravel(flat, &sizes);
                    let position: Vec<i64> = local
                        .iter()
                        .zip(offsets.iter().zip(static_strides))
                        .map(|(&p, (&offset, &stride))| offset + p as i64 * stride)
                        .collect();
                    let position = checked_position(value.id, &position, &source.shape)?;
                    data.push(source.get(&position));
                }
                Array { shape: ty.shape.clone(), data }
            }
            Op::FancyIndex { src, indices } => {
                let (source, coordinates) = (self.lookup(src)?, self.lookup(indices)?);
                let width = source.shape.len().max(1);
                let mut data = Vec::with_capacity(ty.num_elements());
                for position in coordinates.data.chunks(width) {
                    let position = checked_position(value.id, position, &source.shape)?;
                    data.push(source.get(&position));
                }
                Array { shape: ty.shape.clone(), data }
            }
            Op::CollapseShape { src, .. } | Op::Reshape { src } => {
                Array { shape: ty.shape.clone(), data: self.lookup(src)?.data.clone() }
            }
            Op::Broadcast { src } => {
                let source = self.lookup(src)?;
                let data = (0..ty.num_elements())
                    .map(|flat| {
                        let position = shape::unravel(flat, &ty.shape);
                        source.get(&shape::broadcast_source_position(&position, &source.shape))
                    })
                    .collect();
                Array { shape: ty.shape.clone(), data }
            }
            Op::Concat { sources, axis } => {
                let parts = sources.iter().map(|source| self.lookup(source)).collect::<Result<Vec<_>>>()?;
                let data = (0..ty.num_elements())
                    .map(|flat| {
                        let mut position = shape::unravel(flat, &ty.shape);
                        let mut element = 0;
                        for part in &parts {
                            if position[*axis] < part.shape[*axis] {
                                element = part.get(&position);
                                break;
                            }
                            position[*axis] -= part.shape[*axis];
                        }
                        element
                    })
                    .collect();
                Array { shape: ty.shape.clone(), data }
            }
        };
        Ok(Some(result))
    }
}

/// Validate a signed position against `shape`.
fn checked_position(value_id: u64, position: &[i64], shape: &[usize]) -> Result<Shape> {
    let in_bounds = position.len() == shape.len()
        && position.iter().zip(shape).all(|(&p, &dim)| 0 <= p && (p as u64) < dim as u64);
    ensure!(
        in_bounds,
        OutOfBoundsSnafu { value_id, position: position.to_vec(), shape: Shape::from_slice(shape) }
    );
    Ok(position.iter().map(|&p| p as usize).collect())
}
