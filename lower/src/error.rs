use snafu::Snafu;
use veil_dtype::DType;
use veil_ir::{Security, Shape};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("IR construction failed"))]
    Ir { source: veil_ir::Error },

    #[snafu(display("index {index} is out of range for axis {axis} with size {dimension_size}"))]
    IndexOutOfRange { index: i64, axis: usize, dimension_size: usize },

    #[snafu(display("secured value used as a dynamic index on axis {axis}"))]
    SecuredDynamicIndex { axis: usize },

    #[snafu(display("not implemented: {detail}"))]
    Unsupported { detail: String },

    #[snafu(display("invalid index operand on axis {axis}: {detail}"))]
    InvalidIndexOperand { axis: usize, detail: String },

    #[snafu(display("too many indices: {count} given for a value of rank {rank}"))]
    TooManyIndices { count: usize, rank: usize },

    #[snafu(display("slice step cannot be zero"))]
    ZeroSliceStep,

    #[snafu(display("index array has {actual} values but shape {shape:?} needs {expected}"))]
    IndexArraySize { shape: Shape, expected: usize, actual: usize },

    #[snafu(display("gather index shapes {shapes:?} cannot be broadcast together"))]
    IndexBroadcastMismatch { shapes: Vec<Shape> },

    #[snafu(display("result must have the security of the indexed value: expected {expected:?}, declared {actual:?}"))]
    ResultSecurityMismatch { expected: Security, actual: Security },

    #[snafu(display("result must have the element type of the indexed value: expected {expected}, declared {actual}"))]
    ResultDTypeMismatch { expected: DType, actual: DType },

    #[snafu(display("declared result shape {actual:?} does not match the indexed shape {expected:?}"))]
    ResultShapeMismatch { expected: Shape, actual: Shape },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
