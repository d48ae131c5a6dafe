use snafu::Snafu;
use veil_dtype::DType;

use crate::shape::Shape;
use crate::types::ValueType;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// DType mismatch in binary operation.
    #[snafu(display("dtype mismatch: cannot perform {operation} on {lhs} and {rhs}"))]
    DTypeMismatch { operation: &'static str, lhs: DType, rhs: DType },

    /// Shape mismatch in elementwise operation.
    #[snafu(display("shape mismatch: cannot perform {operation} on shapes {lhs:?} and {rhs:?}"))]
    ShapeMismatch { operation: &'static str, lhs: Shape, rhs: Shape },

    /// Operation requires a plain integer operand.
    #[snafu(display("{operation} requires an integer operand, got {dtype}"))]
    IntegerRequired { operation: &'static str, dtype: DType },

    /// Integer width outside the supported range.
    #[snafu(display("unsupported bit width {bit_width}: must be within 1..=64"))]
    InvalidBitWidth { bit_width: u32 },

    /// Index parameter must have Index dtype.
    #[snafu(display("index parameter must have index dtype, got {actual}"))]
    IndexTypeMismatch { actual: DType },

    /// Operand must be rank 0.
    #[snafu(display("{operation} requires a scalar operand, got shape {shape:?}"))]
    ScalarRequired { operation: &'static str, shape: Shape },

    /// Secured values cannot steer control flow or addressing.
    #[snafu(display("{operation} cannot take a secured operand"))]
    SecuredOperand { operation: &'static str },

    /// Extension must strictly widen without losing values.
    #[snafu(display("invalid extension from {from} to {to}: target must be a wider integer holding every value"))]
    InvalidExtension { from: DType, to: DType },

    /// Constant does not fit its dtype.
    #[snafu(display("constant {value} is outside the range of {dtype}"))]
    ConstOutOfRange { value: i64, dtype: DType },

    /// Dense constant has the wrong number of elements.
    #[snafu(display("dense constant has {actual} elements but its type needs {expected}"))]
    ConstSizeMismatch { expected: usize, actual: usize },

    /// Wrong number of per-axis operands or attributes.
    #[snafu(display("{operation} expects {expected} entries (one per source axis), got {actual}"))]
    RankMismatch { operation: &'static str, expected: usize, actual: usize },

    /// Number of dynamic offsets does not match the DYNAMIC sentinels.
    #[snafu(display("extract_slice has {sentinels} dynamic offset slots but {operands} dynamic offset operands"))]
    DynamicOffsetCount { sentinels: usize, operands: usize },

    /// Zero stride in a slice.
    #[snafu(display("extract_slice stride on dimension {dim} must be non-zero"))]
    ZeroStride { dim: usize },

    /// Negative slice size.
    #[snafu(display("extract_slice size on dimension {dim} is negative: {size}"))]
    NegativeSize { dim: usize, size: i64 },

    /// Static slice reads outside its source dimension.
    #[snafu(display(
        "extract_slice bounds violation: dimension {dim} reads offset {offset}, size {size}, stride {stride} from size {dim_size}"
    ))]
    SliceOutOfBounds { dim: usize, offset: i64, size: i64, stride: i64, dim_size: usize },

    /// Reassociation does not partition the source axes.
    #[snafu(display("invalid reassociation {reassociation:?} for source of rank {rank}"))]
    InvalidReassociation { reassociation: Vec<Vec<usize>>, rank: usize },

    /// Collapsed group size does not match the result dimension.
    #[snafu(display("collapse group {group} has {actual} elements but result dimension is {expected}"))]
    CollapseSizeMismatch { group: usize, expected: usize, actual: usize },

    /// Broadcasting shape mismatch.
    #[snafu(display("cannot broadcast shape {from:?} to {to:?}"))]
    BroadcastShapeMismatch { from: Shape, to: Shape },

    /// Reshape size mismatch.
    #[snafu(display("reshape size mismatch: input size {input_size} != output size {output_size}"))]
    ReshapeSizeMismatch { input_size: usize, output_size: usize },

    /// Concatenation without inputs.
    #[snafu(display("concat requires at least one source"))]
    ConcatEmpty,

    /// Concatenation axis out of range.
    #[snafu(display("concat axis {axis} is invalid for rank {rank}"))]
    ConcatAxisOutOfRange { axis: usize, rank: usize },

    /// Concatenation sources disagree outside the concatenation axis.
    #[snafu(display("concat sources {lhs:?} and {rhs:?} differ outside axis {axis}"))]
    ConcatShapeMismatch { lhs: Shape, rhs: Shape, axis: usize },

    /// Declared result type is not what the operation produces.
    #[snafu(display("{operation} cannot produce {declared}; operands imply {inferred}"))]
    ResultTypeMismatch { operation: &'static str, declared: Box<ValueType>, inferred: Box<ValueType> },

    /// Conditional branches yield a type different from the declared one.
    #[snafu(display("conditional branch yields {actual} but the conditional declares {expected}"))]
    BranchTypeMismatch { expected: Box<ValueType>, actual: Box<ValueType> },

    /// Conditions must be plain booleans.
    #[snafu(display("condition must be a plain scalar bool, got {actual}"))]
    ConditionNotBool { actual: Box<ValueType> },

    /// Coordinate tensor does not match the gathered source.
    #[snafu(display("fancy index coordinates of shape {indices:?} cannot address a source of rank {source_rank}"))]
    FancyIndexShapeMismatch { indices: Shape, source_rank: usize },
}
