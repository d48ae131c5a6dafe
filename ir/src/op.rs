//! Operation enum and implementation.
//!
//! The [`Op`] enum defines every primitive the lowering passes may emit. Each
//! variant encodes its operand structure directly; region-carrying operations
//! own the [`Block`]s of their branches.

use smallvec::SmallVec;

use crate::context::Block;
use crate::types::{CastKind, CmpPredicate, ConstValue};
use crate::value::ValueRef;

/// Sentinel in `ExtractSlice::static_offsets` meaning "supplied by the next
/// dynamic offset operand".
pub const DYNAMIC: i64 = i64::MIN;

/// Branch of a structured conditional.
#[derive(Debug, Clone, Default)]
pub struct Region {
    pub block: Block,
    /// Value produced by the branch, `None` for effect-only conditionals.
    pub yielded: Option<ValueRef>,
}

/// Operation type with typed operands.
///
/// Design choices:
/// - Variable-arity operands use SmallVec (≤4 inline, the common tensor ranks)
/// - Attributes that the printer and interpreter need (offsets, reassociation)
///   are stored inline as plain integers
/// - The declared result type lives on the [`Value`](crate::Value), not here
#[derive(Debug, Clone, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Op {
    // Leaves
    Input {
        name: String,
        position: usize,
    },
    Const(ConstValue),

    // Scalar/elementwise arithmetic
    Cast {
        src: ValueRef,
        kind: CastKind,
    },
    Add {
        lhs: ValueRef,
        rhs: ValueRef,
    },
    Cmp {
        predicate: CmpPredicate,
        lhs: ValueRef,
        rhs: ValueRef,
    },

    // Control flow and diagnostics
    If {
        condition: ValueRef,
        then_region: Region,
        else_region: Region,
    },
    Trace {
        message: String,
    },

    // Extraction
    Extract {
        src: ValueRef,
        indices: SmallVec<[ValueRef; 4]>,
    },
    ExtractSlice {
        src: ValueRef,
        dynamic_offsets: SmallVec<[ValueRef; 4]>,
        static_offsets: Vec<i64>,
        static_sizes: Vec<i64>,
        static_strides: Vec<i64>,
    },
    FancyIndex {
        src: ValueRef,
        indices: ValueRef,
    },

    // Shape manipulation
    CollapseShape {
        src: ValueRef,
        reassociation: Vec<SmallVec<[usize; 4]>>,
    },
    Broadcast {
        src: ValueRef,
    },
    Reshape {
        src: ValueRef,
    },
    Concat {
        sources: SmallVec<[ValueRef; 4]>,
        axis: usize,
    },
}

impl Op {
    /// Snake-case operation name, e.g. `extract_slice`.
    pub fn name(&self) -> &str {
        self.as_ref()
    }

    /// Direct operands of this operation, in order.
    ///
    /// Values referenced only from inside a region are not included.
    pub fn sources(&self) -> SmallVec<[&ValueRef; 4]> {
        let mut sources = SmallVec::new();
        match self {
            Self::Input { .. } | Self::Const(_) | Self::Trace { .. } => {}
            Self::Cast { src, .. }
            | Self::CollapseShape { src, .. }
            | Self::Broadcast { src }
            | Self::Reshape { src } => sources.push(src),
            Self::Add { lhs, rhs } | Self::Cmp { lhs, rhs, .. } => {
                sources.push(lhs);
                sources.push(rhs);
            }
            Self::If { condition, .. } => sources.push(condition),
            Self::Extract { src, indices } => {
                sources.push(src);
                sources.extend(indices.iter());
            }
            Self::ExtractSlice { src, dynamic_offsets, .. } => {
                sources.push(src);
                sources.extend(dynamic_offsets.iter());
            }
            Self::FancyIndex { src, indices } => {
                sources.push(src);
                sources.push(indices);
            }
            Self::Concat { sources: srcs, .. } => sources.extend(srcs.iter()),
        }
        sources
    }

    /// Regions owned by this operation.
    pub fn regions(&self) -> SmallVec<[&Region; 2]> {
        match self {
            Self::If { then_region, else_region, .. } => SmallVec::from_buf([then_region, else_region]),
            _ => SmallVec::new(),
        }
    }

    /// Whether the operation exists for its side effect rather than a result.
    pub fn has_side_effects(&self) -> bool {
        match self {
            Self::Trace { .. } => true,
            Self::If { then_region, else_region, .. } => {
                then_region.block.iter().chain(else_region.block.iter()).any(|v| v.op().has_side_effects())
            }
            _ => false,
        }
    }
}
