//! Builder context, blocks and functions.
//!
//! A [`Context`] owns the operation-graph region of one function under
//! construction. It is the single writer of that region: every constructor
//! takes `&mut Context`, appends the new operation to the innermost open
//! block and returns the resulting [`ValueRef`].

use derive_more::Display;

use crate::op::Op;
use crate::types::ValueType;
use crate::value::{Value, ValueRef};

/// Identity of the source-level computation currently being lowered.
///
/// Runtime diagnostics embed this label so a warning can be traced back to
/// the expression that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{id} = {operation}")]
pub struct NodeLabel {
    /// Node identifier, e.g. `%3`.
    pub id: String,
    /// Rendered operation with its operands, e.g. `%0[%1, 0]`.
    pub operation: String,
}

impl NodeLabel {
    pub fn new(id: impl Into<String>, operation: impl Into<String>) -> Self {
        Self { id: id.into(), operation: operation.into() }
    }
}

/// Ordered list of operations.
#[derive(Debug, Clone, Default)]
pub struct Block {
    ops: Vec<ValueRef>,
}

impl Block {
    pub fn ops(&self) -> &[ValueRef] {
        &self.ops
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValueRef> {
        self.ops.iter()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Pre-order walk over this block and every nested region.
    pub fn walk(&self) -> Vec<ValueRef> {
        let mut out = Vec::new();
        self.walk_into(&mut out);
        out
    }

    fn walk_into(&self, out: &mut Vec<ValueRef>) {
        for value in &self.ops {
            out.push(value.clone());
            for region in value.op().regions() {
                region.block.walk_into(out);
            }
        }
    }
}

/// A finished function: inputs, body and returned values.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<ValueRef>,
    pub body: Block,
    pub outputs: Vec<ValueRef>,
}

/// Builder for one function's operation graph.
#[derive(Debug)]
pub struct Context {
    name: String,
    next_id: u64,
    inputs: Vec<ValueRef>,
    body: Block,
    /// Stack of open region blocks nested inside `body`.
    nested: Vec<Block>,
    converting: Option<NodeLabel>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new("main")
    }
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            next_id: 0,
            inputs: Vec::new(),
            body: Block::default(),
            nested: Vec::new(),
            converting: None,
        }
    }

    /// Declare a function argument.
    pub fn input(&mut self, name: impl Into<String>, ty: ValueType) -> ValueRef {
        let position = self.inputs.len();
        let value = self.allocate(Op::Input { name: name.into(), position }, ty);
        self.inputs.push(value.clone());
        value
    }

    /// Label of the computation node currently being lowered.
    pub fn converting(&self) -> Option<&NodeLabel> {
        self.converting.as_ref()
    }

    /// Set the label reported by runtime diagnostics emitted from now on.
    pub fn set_converting(&mut self, label: Option<NodeLabel>) {
        self.converting = label;
    }

    /// The innermost open block.
    pub fn current_block(&self) -> &Block {
        self.nested.last().unwrap_or(&self.body)
    }

    /// Nesting depth of the innermost open block; 0 at function level.
    pub fn depth(&self) -> usize {
        self.nested.len()
    }

    /// Close the function.
    pub fn finish(self, outputs: Vec<ValueRef>) -> Function {
        debug_assert!(self.nested.is_empty(), "unbalanced region nesting");
        Function { name: self.name, inputs: self.inputs, body: self.body, outputs }
    }

    fn allocate(&mut self, op: Op, ty: ValueType) -> ValueRef {
        let id = self.next_id;
        self.next_id += 1;
        ValueRef::new(Value { id, op, ty })
    }

    /// Append a new operation to the innermost open block.
    pub(crate) fn emit(&mut self, op: Op, ty: ValueType) -> ValueRef {
        let value = self.allocate(op, ty);
        tracing::trace!(value.id = value.id, op = value.op().name(), ty = %value.ty(), depth = self.depth(), "emit");
        self.nested.last_mut().unwrap_or(&mut self.body).ops.push(value.clone());
        value
    }

    /// Run `body` with a fresh block open and return that block.
    ///
    /// The block is closed even if `body` fails.
    pub(crate) fn with_block<T, E>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<(Block, T), E> {
        self.nested.push(Block::default());
        let result = body(self);
        let block = self.nested.pop().unwrap_or_default();
        result.map(|value| (block, value))
    }
}
