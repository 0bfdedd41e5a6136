//! Statements: the SyReC IR's unit of control flow and mutation.

use std::{fmt, rc::Rc};

use syrec_symbol::Symbol;

use crate::{
    expression::Expression,
    module::ModuleRef,
    number::Number,
    ops::{AssignOperation, UnaryStatementOperation},
    variable::VariableAccess,
};

/// A SyReC statement.
///
/// Every variant carries the source line it was built from, for use in
/// diagnostics raised later against the already-built IR (e.g. by a
/// downstream synthesis pass).
#[derive(Debug, Clone)]
pub enum Statement {
    Assign {
        target: Rc<VariableAccess>,
        op: AssignOperation,
        rhs: Rc<Expression>,
        line: u32,
    },
    UnaryAssign {
        op: UnaryStatementOperation,
        target: Rc<VariableAccess>,
        line: u32,
    },
    Swap {
        lhs: Rc<VariableAccess>,
        rhs: Rc<VariableAccess>,
        line: u32,
    },
    If {
        guard: Rc<Expression>,
        then_body: Vec<Rc<Statement>>,
        else_body: Vec<Rc<Statement>>,
        fi_guard: Rc<Expression>,
        line: u32,
    },
    For {
        /// The fresh binding introduced for the body's scope, if the
        /// `for` declared one (`for $i = ... do ... rof` vs. the bare
        /// `for n to m do ... rof` form).
        loop_variable: Option<Symbol>,
        from: Rc<Number>,
        to: Rc<Number>,
        step: Rc<Number>,
        body: Vec<Rc<Statement>>,
        line: u32,
    },
    Call {
        target: ModuleRef,
        target_identifier: Symbol,
        arguments: Vec<Symbol>,
        line: u32,
    },
    Uncall {
        target: ModuleRef,
        target_identifier: Symbol,
        arguments: Vec<Symbol>,
        line: u32,
    },
    Skip {
        line: u32,
    },
}

impl Statement {
    pub const fn line(&self) -> u32 {
        match self {
            Statement::Assign { line, .. }
            | Statement::UnaryAssign { line, .. }
            | Statement::Swap { line, .. }
            | Statement::If { line, .. }
            | Statement::For { line, .. }
            | Statement::Call { line, .. }
            | Statement::Uncall { line, .. }
            | Statement::Skip { line } => *line,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assign { target, op, rhs, .. } => {
                write!(f, "{target} {} {rhs}", op.symbol())
            }
            Statement::UnaryAssign { op, target, .. } => write!(f, "{} {target}", op.symbol()),
            Statement::Swap { lhs, rhs, .. } => write!(f, "{lhs} <=> {rhs}"),
            Statement::If { guard, fi_guard, .. } => {
                write!(f, "if {guard} then ... else ... fi {fi_guard}")
            }
            Statement::For {
                loop_variable,
                from,
                to,
                step,
                ..
            } => {
                write!(f, "for ")?;
                if let Some(v) = loop_variable {
                    write!(f, "{v} = ")?;
                }
                write!(f, "{from} to {to} step {step} do ... rof")
            }
            Statement::Call {
                target_identifier,
                arguments,
                ..
            } => write!(f, "call {target_identifier}({})", format_args_list(arguments)),
            Statement::Uncall {
                target_identifier,
                arguments,
                ..
            } => write!(f, "uncall {target_identifier}({})", format_args_list(arguments)),
            Statement::Skip { .. } => write!(f, "skip"),
        }
    }
}

fn format_args_list(args: &[Symbol]) -> String {
    args.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
