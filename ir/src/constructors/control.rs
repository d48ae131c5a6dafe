//! Structured conditionals and runtime traces.
//!
//! Branch bodies are supplied as producer closures. Each closure runs with a
//! fresh block open, so every operation it emits lands inside that branch.

use snafu::ensure;
use veil_dtype::DType;

use crate::context::Context;
use crate::error::*;
use crate::op::{Op, Region};
use crate::types::ValueType;
use crate::value::ValueRef;
use crate::Result;

impl Context {
    /// Two-way conditional yielding a value of type `ty`.
    ///
    /// Exactly one of the branches runs at execution time; both are built now.
    pub fn conditional<T, E>(
        &mut self,
        ty: ValueType,
        condition: &ValueRef,
        then_branch: T,
        else_branch: E,
    ) -> Result<ValueRef>
    where
        T: FnOnce(&mut Self) -> Result<ValueRef>,
        E: FnOnce(&mut Self) -> Result<ValueRef>,
    {
        check_condition(condition)?;
        let then_region = self.region(&ty, then_branch)?;
        let else_region = self.region(&ty, else_branch)?;
        Ok(self.emit(Op::If { condition: condition.clone(), then_region, else_region }, ty))
    }

    /// One-armed conditional run only for its side effects.
    pub fn conditional_effect<T>(&mut self, condition: &ValueRef, then_branch: T) -> Result<ValueRef>
    where
        T: FnOnce(&mut Self) -> Result<()>,
    {
        check_condition(condition)?;
        let (block, ()) = self.with_block(then_branch)?;
        let then_region = Region { block, yielded: None };
        Ok(self.emit(
            Op::If { condition: condition.clone(), then_region, else_region: Region::default() },
            ValueType::void(),
        ))
    }

    /// Emit a runtime trace message. Execution continues after the message is recorded.
    pub fn trace(&mut self, message: impl Into<String>) -> ValueRef {
        self.emit(Op::Trace { message: message.into() }, ValueType::void())
    }

    fn region<F>(&mut self, ty: &ValueType, branch: F) -> Result<Region>
    where
        F: FnOnce(&mut Self) -> Result<ValueRef>,
    {
        let (block, yielded) = self.with_block(branch)?;
        ensure!(
            yielded.ty() == ty,
            BranchTypeMismatchSnafu { expected: ty.clone(), actual: yielded.ty().clone() }
        );
        Ok(Region { block, yielded: Some(yielded) })
    }
}

fn check_condition(condition: &ValueRef) -> Result<()> {
    let ty = condition.ty();
    ensure!(
        ty.dtype == DType::Bool && ty.is_scalar() && ty.is_plain(),
        ConditionNotBoolSnafu { actual: ty.clone() }
    );
    Ok(())
}
