//! The SyReC `Number` model: a constant, a reference to a loop variable, or
//! a small constant-expression tree over the two (e.g. `(n + $i)`).

use std::{collections::HashMap, fmt, rc::Rc};

use syrec_symbol::Symbol;

/// The operator allowed inside a parenthesized `(n op n)` number literal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConstExprOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ConstExprOperation {
    pub const fn symbol(self) -> &'static str {
        match self {
            ConstExprOperation::Add => "+",
            ConstExprOperation::Subtract => "-",
            ConstExprOperation::Multiply => "*",
            ConstExprOperation::Divide => "/",
        }
    }

    fn eval(self, a: u32, b: Option<u32>) -> Option<u32> {
        let b = b?;
        match self {
            ConstExprOperation::Add => Some(a.wrapping_add(b)),
            ConstExprOperation::Subtract => Some(a.wrapping_sub(b)),
            ConstExprOperation::Multiply => Some(a.wrapping_mul(b)),
            ConstExprOperation::Divide => (b != 0).then(|| a / b),
        }
    }
}

/// A SyReC number: a plain constant, a reference to a loop variable by
/// name, or a constant-expression tree combining two numbers.
///
/// Construction eagerly folds a `ConstExpr` whose both sides are already
/// known constants (see [`Number::constant_expr`]); a `Number` observed
/// anywhere downstream with an `Expr` tag therefore always has at least one
/// loop-variable reference somewhere in its operands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Number {
    Constant(u32),
    LoopVariable(Symbol),
    Expr(Rc<Number>, ConstExprOperation, Rc<Number>),
}

impl Number {
    pub fn constant(value: u32) -> Rc<Self> {
        Rc::new(Number::Constant(value))
    }

    /// Construct a reference to loop variable `name`.
    ///
    /// `name` must carry the loop-variable sigil already; this constructor
    /// does not validate that (validation of loop-variable references
    /// against the symbol table happens in the analyzer).
    pub fn loop_variable(name: Symbol) -> Rc<Self> {
        Rc::new(Number::LoopVariable(name))
    }

    /// Build a constant-expression number, folding eagerly to a single
    /// [`Number::Constant`] if both `lhs` and `rhs` are already constant
    /// and the operation can be evaluated (division by a constant zero
    /// leaves the node unfolded rather than failing loudly — `Number`s
    /// appear in contexts, like dimension and bit-width declarations,
    /// where there is no expression-level diagnostic position to attach an
    /// error to).
    pub fn constant_expr(lhs: Rc<Number>, op: ConstExprOperation, rhs: Rc<Number>) -> Rc<Self> {
        if let (Number::Constant(a), Number::Constant(b)) = (lhs.as_ref(), rhs.as_ref()) {
            if let Some(folded) = op.eval(*a, Some(*b)) {
                return Number::constant(folded);
            }
        }
        Rc::new(Number::Expr(lhs, op, rhs))
    }

    pub const fn is_constant(&self) -> bool {
        matches!(self, Number::Constant(_))
    }

    pub const fn is_loop_variable(&self) -> bool {
        matches!(self, Number::LoopVariable(_))
    }

    /// Attempt to evaluate this number to a concrete `u32`, consulting
    /// `loop_variable_values` for any loop-variable references. Returns
    /// `None` if a referenced loop variable has no currently-known value,
    /// or if a nested constant-expression division has a zero divisor.
    pub fn try_evaluate(&self, loop_variable_values: &HashMap<Symbol, u32>) -> Option<u32> {
        match self {
            Number::Constant(v) => Some(*v),
            Number::LoopVariable(name) => loop_variable_values.get(name).copied(),
            Number::Expr(lhs, op, rhs) => {
                let a = lhs.try_evaluate(loop_variable_values)?;
                let b = rhs.try_evaluate(loop_variable_values);
                op.eval(a, b)
            }
        }
    }

    /// Returns the loop variable this number refers to, if it is exactly a
    /// bare [`Number::LoopVariable`] reference (not nested inside an
    /// `Expr`).
    pub const fn as_loop_variable(&self) -> Option<Symbol> {
        match self {
            Number::LoopVariable(name) => Some(*name),
            _ => None,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Constant(v) => write!(f, "{v}"),
            Number::LoopVariable(name) => write!(f, "{name}"),
            Number::Expr(lhs, op, rhs) => write!(f, "({lhs} {} {rhs})", op.symbol()),
        }
    }
}
