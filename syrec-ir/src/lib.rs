//! The SyReC intermediate representation.
//!
//! This crate has no parser and no analyzer logic of its own — it is the
//! data model that [`syrec-analyzer`](../syrec_analyzer/index.html) builds
//! and validates. Every node type is a plain sum type (an `enum` or a
//! `struct` wrapping one), never a trait object: pattern matching over the
//! tags plays the role that a visitor hierarchy would play in an
//! object-oriented rendition.
//!
//! Ownership follows the rules laid out in the project's design notes:
//! [`Variable`]s and [`Module`]s are reference-counted and shared between
//! their declaring site and every reference to them; a [`Module`] never
//! owns the [`ModuleRef`] handles used by its own `Call`/`Uncall`
//! statements, which instead index into the owning [`Program`].

pub mod display;
pub mod expression;
pub mod module;
pub mod number;
pub mod ops;
pub mod program;
pub mod statement;
pub mod variable;

pub use expression::Expression;
pub use module::{Module, ModuleRef};
pub use number::Number;
pub use ops::{
    eval_binary, eval_shift, truncate_constant_to_bitwidth, AssignOperation, BinaryOperation,
    IntegerConstantTruncationMode, OperationError, ShiftOperation, UnaryStatementOperation,
    MAX_SUPPORTED_BITWIDTH,
};
pub use program::Program;
pub use statement::Statement;
pub use syrec_symbol::Symbol;
pub use variable::{Variable, VariableAccess, VariableKind};
