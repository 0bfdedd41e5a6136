//! Declared variables and the accesses that reference them.

use std::{fmt, rc::Rc};

use syrec_symbol::Symbol;

use crate::{expression::Expression, number::Number};

/// The declared kind of a SyReC variable, fixing whether it may be written
/// to and how overload resolution treats it as a caller argument.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Input,
    Output,
    Inout,
    Wire,
    State,
}

impl VariableKind {
    /// Returns true if a variable of this kind may appear as an assignment
    /// or swap target. `Input` and `State` variables are read-only from the
    /// perspective of the module that declares them.
    pub const fn is_writable(self) -> bool {
        !matches!(self, VariableKind::Input | VariableKind::State)
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            VariableKind::Input => "in",
            VariableKind::Output => "out",
            VariableKind::Inout => "inout",
            VariableKind::Wire => "wire",
            VariableKind::State => "state",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A declared variable: a module parameter or local.
///
/// `Variable`s are always held behind an `Rc` once declared, so that every
/// [`VariableAccess`] referencing them can share ownership with the
/// declaring [`crate::Module`] without cloning the declaration.
#[derive(Debug, PartialEq, Eq)]
pub struct Variable {
    pub kind: VariableKind,
    pub identifier: Symbol,
    /// Extents of each dimension, in declaration order. A scalar ("atom")
    /// variable is encoded as a single dimension of extent 1.
    pub dimensions: Vec<u32>,
    pub bitwidth: u32,
}

impl Variable {
    pub fn new(kind: VariableKind, identifier: Symbol, dimensions: Vec<u32>, bitwidth: u32) -> Rc<Self> {
        debug_assert!(!dimensions.is_empty(), "a variable always has at least one dimension");
        debug_assert!(dimensions.iter().all(|&d| d >= 1));
        Rc::new(Self {
            kind,
            identifier,
            dimensions,
            bitwidth,
        })
    }

    /// Returns true if `lhs` and `rhs` describe variables with the same
    /// name, bit-width, and dimensions — the "same declared variable"
    /// notion used by overlap analysis and overload-signature comparison.
    pub fn structurally_matches(lhs: &Variable, rhs: &Variable) -> bool {
        lhs.identifier == rhs.identifier && lhs.bitwidth == rhs.bitwidth && lhs.dimensions == rhs.dimensions
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        if self.dimensions != [1] {
            for d in &self.dimensions {
                write!(f, "[{d}]")?;
            }
        }
        write!(f, "({})", self.bitwidth)
    }
}

/// A reference to some sub-region of a declared variable: a choice of
/// index per dimension, and an optional bit range.
#[derive(Debug, Clone)]
pub struct VariableAccess {
    pub var: Rc<Variable>,
    /// One index expression per accessed dimension, in order. May be
    /// shorter than `var.dimensions` (trailing dimensions are then
    /// unindexed, denoting the whole of those dimensions).
    pub indexes: Vec<Rc<Expression>>,
    /// The optional `.start:end` suffix. Absent means "the whole
    /// bit-width".
    pub range: Option<(Rc<Number>, Rc<Number>)>,
}

/// The bit-width of a [`VariableAccess`] could not be statically decided —
/// its range endpoints reference two different loop variables (or one
/// endpoint is a form more general than a bare constant or loop-variable
/// reference).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UndecidableBitWidth;

impl VariableAccess {
    pub fn new(var: Rc<Variable>, indexes: Vec<Rc<Expression>>, range: Option<(Rc<Number>, Rc<Number>)>) -> Rc<Self> {
        Rc::new(Self { var, indexes, range })
    }

    /// Returns the whole-variable access to `var` (no indexes, no bit
    /// range).
    pub fn whole(var: Rc<Variable>) -> Rc<Self> {
        Self::new(var, Vec::new(), None)
    }

    /// The bit-width this access denotes.
    ///
    /// Absent range ⇒ the variable's full bit-width. A present range's
    /// width is only statically decidable when both endpoints are
    /// constants, or both are a reference to the *same* loop variable (in
    /// which case they are necessarily equal at runtime, regardless of its
    /// value, so the width is trivially 1). Any other shape — including
    /// endpoints referencing two different loop variables — is
    /// undecidable.
    pub fn bitwidth(&self) -> Result<u32, UndecidableBitWidth> {
        let Some((start, end)) = &self.range else {
            return Ok(self.var.bitwidth);
        };

        match (start.as_ref(), end.as_ref()) {
            (Number::Constant(s), Number::Constant(e)) => Ok(s.abs_diff(*e) + 1),
            (Number::LoopVariable(a), Number::LoopVariable(b)) if a == b => Ok(1),
            _ => Err(UndecidableBitWidth),
        }
    }
}

impl fmt::Display for VariableAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.var.identifier)?;
        for idx in &self.indexes {
            write!(f, "[{idx}]")?;
        }
        if let Some((start, end)) = &self.range {
            if start == end {
                write!(f, ".{start}")?;
            } else {
                write!(f, ".{start}:{end}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(bitwidth: u32) -> Rc<Variable> {
        Variable::new(VariableKind::Wire, Symbol::intern("v"), vec![1], bitwidth)
    }

    #[test]
    fn absent_range_is_full_bitwidth() {
        let access = VariableAccess::whole(var(16));
        assert_eq!(access.bitwidth(), Ok(16));
    }

    #[test]
    fn constant_range_computes_width() {
        let access = VariableAccess::new(
            var(16),
            Vec::new(),
            Some((Number::constant(3), Number::constant(7))),
        );
        assert_eq!(access.bitwidth(), Ok(5));
    }

    #[test]
    fn single_bit_range_has_width_one() {
        let endpoint = Number::constant(5);
        let access = VariableAccess::new(var(16), Vec::new(), Some((endpoint.clone(), endpoint)));
        assert_eq!(access.bitwidth(), Ok(1));
    }

    #[test]
    fn same_loop_variable_range_is_one_bit() {
        let i = Symbol::intern("$i");
        let access = VariableAccess::new(
            var(16),
            Vec::new(),
            Some((Number::loop_variable(i), Number::loop_variable(i))),
        );
        assert_eq!(access.bitwidth(), Ok(1));
    }

    #[test]
    fn different_loop_variables_are_undecidable() {
        let i = Symbol::intern("$i");
        let j = Symbol::intern("$j");
        let access = VariableAccess::new(
            var(16),
            Vec::new(),
            Some((Number::loop_variable(i), Number::loop_variable(j))),
        );
        assert_eq!(access.bitwidth(), Err(UndecidableBitWidth));
    }
}
