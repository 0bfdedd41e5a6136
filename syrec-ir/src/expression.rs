//! Expressions: the value-producing IR nodes that appear on the
//! right-hand side of assignments, inside index expressions, and as
//! `if`/`for` guards.

use std::{fmt, rc::Rc};

use crate::{
    number::Number,
    ops::{BinaryOperation, ShiftOperation},
    variable::VariableAccess,
};

/// A SyReC expression.
///
/// `Numeric`, `Binary`, and `Shift` carry their own bit-width, established
/// once at construction time by the expression builder (see the analyzer's
/// expression visitor), so [`Expression::bitwidth`] is a plain field
/// projection for them. `Variable` carries none of its own — its width is
/// the access's, including any narrowing from a bit range — so it defers
/// to [`VariableAccess::bitwidth`].
#[derive(Debug, Clone)]
pub enum Expression {
    Numeric(Rc<Number>, u32),
    Variable(Rc<VariableAccess>),
    Binary(Rc<Expression>, BinaryOperation, Rc<Expression>, u32),
    Shift(Rc<Expression>, ShiftOperation, Rc<Number>, u32),
}

impl Expression {
    /// The bit-width this expression evaluates to.
    pub fn bitwidth(&self) -> u32 {
        match self {
            Expression::Numeric(_, bw) => *bw,
            Expression::Variable(access) => access
                .bitwidth()
                .expect("Expression::Variable only ever wraps an access with a decidable bitwidth"),
            Expression::Binary(_, _, _, bw) => *bw,
            Expression::Shift(_, _, _, bw) => *bw,
        }
    }

    /// If this expression is a [`Expression::Numeric`] whose value is a
    /// plain constant, returns that constant.
    pub fn constant_value(&self) -> Option<u32> {
        match self {
            Expression::Numeric(n, _) => match n.as_ref() {
                Number::Constant(v) => Some(*v),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Numeric(n, _) => write!(f, "{n}"),
            Expression::Variable(access) => write!(f, "{access}"),
            Expression::Binary(lhs, op, rhs, _) => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Expression::Shift(lhs, op, rhs, _) => write!(f, "({lhs} {} {rhs})", op.symbol()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::{Variable, VariableKind};
    use syrec_symbol::Symbol;

    #[test]
    fn binary_expression_reports_its_own_bitwidth() {
        let lhs = Rc::new(Expression::Numeric(Number::constant(3), 8));
        let rhs = Rc::new(Expression::Numeric(Number::constant(5), 8));
        let expr = Expression::Binary(lhs, BinaryOperation::Add, rhs, 8);
        assert_eq!(expr.bitwidth(), 8);
    }

    #[test]
    fn relational_expression_is_single_bit_by_construction() {
        let lhs = Rc::new(Expression::Numeric(Number::constant(3), 8));
        let rhs = Rc::new(Expression::Numeric(Number::constant(5), 8));
        let expr = Expression::Binary(lhs, BinaryOperation::LessThan, rhs, 1);
        assert_eq!(expr.bitwidth(), 1);
    }

    #[test]
    fn variable_expression_takes_access_bitwidth() {
        let var = Variable::new(VariableKind::Wire, Symbol::intern("a"), vec![1], 12);
        let access = VariableAccess::whole(var);
        let expr = Expression::Variable(access);
        assert_eq!(expr.bitwidth(), 12);
    }
}
