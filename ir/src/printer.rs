//! Textual rendering of functions.
//!
//! The format is line-oriented and close to MLIR's generic syntax:
//!
//! ```text
//! func @main(%0: tensor<3x!secured<u4>>, %1: i3) {
//!   %2 = cast sign_extend %1 : i3 -> i4
//!   %6 = if %4 -> i4 {
//!     %5 = add %2, %3 : i4
//!     yield %5
//!   } else {
//!     yield %2
//!   }
//!   %8 = extract %0[%7] : !secured<u4>
//!   return %8
//! }
//! ```

use std::fmt::{self, Write};

use crate::context::{Block, Function};
use crate::op::{DYNAMIC, Op, Region};
use crate::value::{Value, ValueRef};

const INDENT: &str = "  ";

fn names<'a>(values: impl IntoIterator<Item = &'a ValueRef>) -> String {
    values.into_iter().map(|v| v.name()).collect::<Vec<_>>().join(", ")
}

/// Render the operation part of a value (everything right of `=`).
pub fn format_operation(value: &Value) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_operation(&mut out, value);
    out
}

fn write_operation(out: &mut String, value: &Value) -> fmt::Result {
    let ty = value.ty();
    match value.op() {
        Op::Input { name, position } => write!(out, "input {position} \"{name}\" : {ty}"),
        Op::Const(constant) => {
            let values = constant.values();
            if ty.is_scalar() {
                write!(out, "const {} : {ty}", values[0])
            } else {
                write!(out, "const dense<{values:?}> : {ty}")
            }
        }
        Op::Cast { src, kind } => write!(out, "cast {} {} : {} -> {ty}", kind.as_ref(), src.name(), src.ty()),
        Op::Add { lhs, rhs } => write!(out, "add {}, {} : {ty}", lhs.name(), rhs.name()),
        Op::Cmp { predicate, lhs, rhs } => {
            write!(out, "cmp {} {}, {} : {}", predicate.as_ref(), lhs.name(), rhs.name(), lhs.ty())
        }
        Op::If { condition, .. } => write!(out, "if {}", condition.name()),
        Op::Trace { message } => write!(out, "trace {message:?}"),
        Op::Extract { src, indices } => write!(out, "extract {}[{}] : {ty}", src.name(), names(indices)),
        Op::ExtractSlice { src, dynamic_offsets, static_offsets, static_sizes, static_strides } => {
            let mut dynamic = dynamic_offsets.iter();
            let offsets: Vec<String> = static_offsets
                .iter()
                .map(|&offset| match offset {
                    DYNAMIC => dynamic.next().map(|v| v.name()).unwrap_or_else(|| "?".into()),
                    _ => offset.to_string(),
                })
                .collect();
            write!(
                out,
                "extract_slice {}[{}] [{}] [{}] : {} to {ty}",
                src.name(),
                offsets.join(", "),
                static_sizes.iter().map(i64::to_string).collect::<Vec<_>>().join(", "),
                static_strides.iter().map(i64::to_string).collect::<Vec<_>>().join(", "),
                src.ty(),
            )
        }
        Op::FancyIndex { src, indices } => write!(out, "fancy_index {}[{}] : {ty}", src.name(), indices.name()),
        Op::CollapseShape { src, reassociation } => {
            write!(out, "collapse_shape {} {reassociation:?} : {} into {ty}", src.name(), src.ty())
        }
        Op::Broadcast { src } => write!(out, "broadcast {} : {} to {ty}", src.name(), src.ty()),
        Op::Reshape { src } => write!(out, "reshape {} : {} to {ty}", src.name(), src.ty()),
        Op::Concat { sources, axis } => write!(out, "concat {} axis {axis} : {ty}", names(sources)),
    }
}

fn write_region(f: &mut fmt::Formatter<'_>, region: &Region, depth: usize) -> fmt::Result {
    write_block(f, &region.block, depth)?;
    if let Some(yielded) = &region.yielded {
        writeln!(f, "{}yield {}", INDENT.repeat(depth), yielded.name())?;
    }
    Ok(())
}

fn write_block(f: &mut fmt::Formatter<'_>, block: &Block, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    for value in block {
        match value.op() {
            Op::If { condition, then_region, else_region } => {
                if value.dtype().is_void() {
                    writeln!(f, "{pad}if {} {{", condition.name())?;
                } else {
                    writeln!(f, "{pad}{} = if {} -> {} {{", value.name(), condition.name(), value.ty())?;
                }
                write_region(f, then_region, depth + 1)?;
                if !else_region.block.is_empty() || else_region.yielded.is_some() {
                    writeln!(f, "{pad}}} else {{")?;
                    write_region(f, else_region, depth + 1)?;
                }
                writeln!(f, "{pad}}}")?;
            }
            _ if value.dtype().is_void() => writeln!(f, "{pad}{}", format_operation(value))?,
            _ => writeln!(f, "{pad}{} = {}", value.name(), format_operation(value))?,
        }
    }
    Ok(())
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a ValueRef;
    type IntoIter = std::slice::Iter<'a, ValueRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_block(f, self, 0)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.inputs.iter().map(|input| format!("{}: {}", input.name(), input.ty())).collect();
        writeln!(f, "func @{}({}) {{", self.name, params.join(", "))?;
        write_block(f, &self.body, 1)?;
        writeln!(f, "{INDENT}return {}", names(&self.outputs))?;
        writeln!(f, "}}")
    }
}
