//! The `Analyzer`: shared state for the module/statement/expression
//! sub-visitors, plus number, expression, and variable-access construction.
//!
//! Every sub-visitor owns a cursor into its own piece of the parse tree but
//! shares one `Analyzer` — in particular one [`SymbolTable`] and one
//! [`Diagnostics`] sink — exactly as the design calls for.

use std::rc::Rc;

use syrec_ir::{
    number::ConstExprOperation, BinaryOperation, Expression, Module, Number, Program, Variable, VariableAccess,
    MAX_SUPPORTED_BITWIDTH,
};
use syrec_symbol::Symbol;

use crate::{
    config::ReadProgramSettings,
    diagnostics::{Diagnostics, SemanticErrorKind, Severity},
    index_validator::{self, Classification},
    overlap::{self, OverlapOutcome},
    parse_tree::{ParseExpression, ParseExpressionKind, ParseNumber, ParseNumberKind, ParseNumberOperation, ParseUnaryOperation, ParseVariableAccess},
    symbol_table::SymbolTable,
};

/// Shared state threaded through module/statement/expression construction.
pub struct Analyzer<'a> {
    pub(crate) symbols: SymbolTable,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) settings: &'a ReadProgramSettings,
    /// The access a `SelfAssignmentOverlap` check is currently guarding
    /// against, while building the right-hand side of an assignment/swap.
    forbidden_access: Option<Rc<VariableAccess>>,
    /// The loop variable whose own initializer range is currently being
    /// built — references to it inside that range are forbidden.
    loop_self_reference: Option<Symbol>,
}

impl<'a> Analyzer<'a> {
    pub fn new(settings: &'a ReadProgramSettings) -> Self {
        Self {
            symbols: SymbolTable::new(),
            diagnostics: Diagnostics::new(),
            settings,
            forbidden_access: None,
            loop_self_reference: None,
        }
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    pub(crate) fn error(&mut self, kind: SemanticErrorKind, line: u32, column: u32) {
        self.diagnostics.emit(kind, Severity::Error, line, column);
    }

    // --- restriction registry --------------------------------------------

    pub(crate) fn with_forbidden_access<T>(&mut self, target: Rc<VariableAccess>, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.forbidden_access.replace(target);
        let result = f(self);
        self.forbidden_access = previous;
        result
    }

    pub(crate) fn with_loop_self_reference<T>(&mut self, name: Symbol, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.loop_self_reference.replace(name);
        let result = f(self);
        self.loop_self_reference = previous;
        result
    }

    // --- numbers -----------------------------------------------------------

    pub(crate) fn build_number(&mut self, parse: &ParseNumber) -> Option<Rc<Number>> {
        match &parse.kind {
            ParseNumberKind::Literal(v) => Some(Number::constant(*v)),
            ParseNumberKind::BitwidthOfSignal(identifier) => {
                let symbol = Symbol::intern(identifier);
                match self.symbols.lookup_signal(symbol) {
                    Some(var) => Some(Number::constant(var.bitwidth)),
                    None => {
                        self.error(
                            SemanticErrorKind::NoVariableMatchingIdentifier { identifier: symbol },
                            parse.line,
                            parse.column,
                        );
                        None
                    }
                }
            }
            ParseNumberKind::LoopVariable(name) => {
                let symbol = Symbol::intern(name);
                if self.loop_self_reference == Some(symbol) {
                    self.error(
                        SemanticErrorKind::LoopVariableSelfReference { identifier: symbol },
                        parse.line,
                        parse.column,
                    );
                    return None;
                }
                if !self.symbols.is_loop_variable_in_scope(symbol) {
                    self.error(
                        SemanticErrorKind::NoVariableMatchingIdentifier { identifier: symbol },
                        parse.line,
                        parse.column,
                    );
                    return None;
                }
                Some(Number::loop_variable(symbol))
            }
            ParseNumberKind::Expr(lhs, op, rhs) => {
                let lhs = self.build_number(lhs)?;
                let rhs = self.build_number(rhs)?;
                let op = match op {
                    ParseNumberOperation::Add => ConstExprOperation::Add,
                    ParseNumberOperation::Subtract => ConstExprOperation::Subtract,
                    ParseNumberOperation::Multiply => ConstExprOperation::Multiply,
                    ParseNumberOperation::Divide => ConstExprOperation::Divide,
                };
                Some(Number::constant_expr(lhs, op, rhs))
            }
        }
    }

    // --- variable accesses ---------------------------------------------------

    pub(crate) fn build_variable_access(&mut self, parse: &ParseVariableAccess) -> Option<Rc<VariableAccess>> {
        let identifier = Symbol::intern(&parse.identifier);
        let Some(var) = self.symbols.lookup_signal(identifier).cloned() else {
            self.error(
                SemanticErrorKind::NoVariableMatchingIdentifier { identifier },
                parse.line,
                parse.column,
            );
            return None;
        };

        if parse.indexes.len() > var.dimensions.len() {
            self.error(
                SemanticErrorKind::DimensionCountMismatch {
                    expected: var.dimensions.len(),
                    actual: parse.indexes.len(),
                },
                parse.line,
                parse.column,
            );
        }

        let indexes: Vec<Rc<Expression>> = parse
            .indexes
            .iter()
            .filter_map(|index_expr| self.build_expression(index_expr, None))
            .collect();
        if indexes.len() != parse.indexes.len() {
            return None;
        }

        let range = match &parse.range {
            Some((start, end)) => {
                let start = self.build_number(start)?;
                let end = self.build_number(end)?;
                Some((start, end))
            }
            None => None,
        };

        let access = VariableAccess::new(var, indexes, range);

        let validation = index_validator::validate(&access);
        for (i, dim) in validation.dimensions.iter().enumerate() {
            if dim.classification == Classification::OutOfRange {
                self.error(
                    SemanticErrorKind::IndexOutOfRange {
                        index: dim.value.unwrap_or_default(),
                        extent: access.var.dimensions.get(i).copied().unwrap_or_default(),
                    },
                    parse.line,
                    parse.column,
                );
            }
        }
        if let Some((start, end)) = &validation.bit_range {
            if start.classification == Classification::OutOfRange {
                self.error(
                    SemanticErrorKind::BitIndexOutOfRange {
                        index: start.value.unwrap_or_default(),
                        bitwidth: access.var.bitwidth,
                    },
                    parse.line,
                    parse.column,
                );
            }
            if end.classification == Classification::OutOfRange {
                self.error(
                    SemanticErrorKind::BitIndexOutOfRange {
                        index: end.value.unwrap_or_default(),
                        bitwidth: access.var.bitwidth,
                    },
                    parse.line,
                    parse.column,
                );
            }
        }

        if let Some(forbidden) = self.forbidden_access.clone() {
            if matches!(overlap::check_overlap(&access, &forbidden), OverlapOutcome::Overlapping { .. }) {
                self.error(
                    SemanticErrorKind::SelfAssignmentOverlap {
                        identifier: access.var.identifier,
                    },
                    parse.line,
                    parse.column,
                );
            }
        }

        Some(access)
    }

    // --- expressions ------------------------------------------------------

    /// Build `parse` into an IR expression. `expected_bitwidth` is the
    /// bit-width a `Numeric` leaf should adopt when no better information
    /// is available (e.g. not yet unified against a sibling operand).
    pub(crate) fn build_expression(&mut self, parse: &ParseExpression, expected_bitwidth: Option<u32>) -> Option<Rc<Expression>> {
        match &parse.kind {
            ParseExpressionKind::Number(number) => {
                let value = self.build_number(number)?;
                let bitwidth = expected_bitwidth.unwrap_or(MAX_SUPPORTED_BITWIDTH);
                Some(Rc::new(Expression::Numeric(value, bitwidth)))
            }
            ParseExpressionKind::Signal(access) => {
                let access = self.build_variable_access(access)?;
                match access.bitwidth() {
                    Ok(_) => Some(Rc::new(Expression::Variable(access))),
                    Err(_) => {
                        self.error(SemanticErrorKind::UndecidableBitWidth, parse.line, parse.column);
                        None
                    }
                }
            }
            ParseExpressionKind::Binary(lhs, op, rhs) => {
                let lhs = self.build_expression(lhs, None)?;
                let rhs = self.build_expression(rhs, None)?;
                self.build_binary(lhs, *op, rhs, parse.line, parse.column)
            }
            ParseExpressionKind::Unary(op, inner) => {
                let inner = self.build_expression(inner, expected_bitwidth)?;
                let bitwidth = inner.bitwidth();
                let (op, mask) = match op {
                    ParseUnaryOperation::LogicalNot => (BinaryOperation::Equals, 0),
                    ParseUnaryOperation::BitwiseNot => (
                        BinaryOperation::Exor,
                        syrec_ir::truncate_constant_to_bitwidth(u32::MAX, bitwidth, self.settings.integer_constant_truncation_mode),
                    ),
                };
                let rhs = Rc::new(Expression::Numeric(Number::constant(mask), bitwidth));
                self.build_binary(inner, op, rhs, parse.line, parse.column)
            }
            ParseExpressionKind::Shift(lhs, op, amount) => {
                let lhs = self.build_expression(lhs, None)?;
                let amount = self.build_number(amount)?;
                let bitwidth = lhs.bitwidth();

                let folded = match (lhs.constant_value(), amount.as_ref()) {
                    (Some(value), Number::Constant(shift_amount)) => Some(syrec_ir::eval_shift(*op, value, *shift_amount)),
                    _ => None,
                };

                Some(Rc::new(match folded {
                    Some(value) => Expression::Numeric(Number::constant(value), bitwidth),
                    None => Expression::Shift(lhs, *op, amount, bitwidth),
                }))
            }
        }
    }

    /// Shared construction path for `Binary`, also used to lower the
    /// IR-less unary operators (see the open question in the design
    /// notes): unify bit-widths, apply §4.1's folding rules, and report a
    /// residual mismatch.
    fn build_binary(&mut self, lhs: Rc<Expression>, op: BinaryOperation, rhs: Rc<Expression>, line: u32, column: u32) -> Option<Rc<Expression>> {
        let (lhs, rhs) = self.unify_operand_bitwidths(lhs, rhs);

        if lhs.bitwidth() != rhs.bitwidth() {
            self.error(
                SemanticErrorKind::BitWidthMismatch {
                    lhs: lhs.bitwidth(),
                    rhs: rhs.bitwidth(),
                },
                line,
                column,
            );
        }

        let result_bitwidth = if op.is_relational_or_logical() { 1 } else { lhs.bitwidth() };

        if let (Some(a), Some(b)) = (lhs.constant_value(), rhs.constant_value()) {
            if op.is_division_class() && b == 0 {
                self.error(SemanticErrorKind::DivisionByZero, line, column);
                return Some(Rc::new(Expression::Binary(lhs, op, rhs, result_bitwidth)));
            }
            if let Ok(value) = syrec_ir::eval_binary(op, a, b) {
                return Some(Rc::new(Expression::Numeric(Number::constant(value), result_bitwidth)));
            }
        } else if op.is_division_class() && rhs.constant_value() == Some(0) {
            self.error(SemanticErrorKind::DivisionByZero, line, column);
            return Some(Rc::new(Expression::Binary(lhs, op, rhs, result_bitwidth)));
        }

        if let Some(a) = lhs.constant_value() {
            if op.is_identity_element(a, false) {
                return Some(rhs);
            }
        }
        if let Some(b) = rhs.constant_value() {
            if op.is_identity_element(b, true) {
                return Some(lhs);
            }
        }

        Some(Rc::new(Expression::Binary(lhs, op, rhs, result_bitwidth)))
    }

    /// If exactly one side is a `Numeric` with a known constant value,
    /// retroactively adopt the other side's bit-width (truncating the
    /// constant to fit).
    fn unify_operand_bitwidths(&self, lhs: Rc<Expression>, rhs: Rc<Expression>) -> (Rc<Expression>, Rc<Expression>) {
        let mode = self.settings.integer_constant_truncation_mode;
        match (lhs.constant_value(), rhs.constant_value()) {
            (Some(value), None) => {
                let bw = rhs.bitwidth();
                let truncated = syrec_ir::truncate_constant_to_bitwidth(value, bw, mode);
                (Rc::new(Expression::Numeric(Number::constant(truncated), bw)), rhs)
            }
            (None, Some(value)) => {
                let bw = lhs.bitwidth();
                let truncated = syrec_ir::truncate_constant_to_bitwidth(value, bw, mode);
                (lhs, Rc::new(Expression::Numeric(Number::constant(truncated), bw)))
            }
            _ => (lhs, rhs),
        }
    }
}

/// Structural equality between two expressions that ignores the incidental
/// computed bit-width annotation each node carries — the notion the
/// if/fi guard-matching rule needs. Equivalent to flattening both
/// expressions into a sequence of atoms (identifier, constant, operator,
/// bracket) and comparing pairwise, but expressed as a direct recursive
/// comparison since this IR's nodes carry no incidental state beyond the
/// bit-width field to strip out.
pub(crate) fn expressions_structurally_equal(a: &Expression, b: &Expression) -> bool {
    match (a, b) {
        (Expression::Numeric(na, _), Expression::Numeric(nb, _)) => na == nb,
        (Expression::Variable(va), Expression::Variable(vb)) => accesses_structurally_equal(va, vb),
        (Expression::Binary(la, opa, ra, _), Expression::Binary(lb, opb, rb, _)) => {
            opa == opb && expressions_structurally_equal(la, lb) && expressions_structurally_equal(ra, rb)
        }
        (Expression::Shift(la, opa, na, _), Expression::Shift(lb, opb, nb, _)) => {
            opa == opb && expressions_structurally_equal(la, lb) && na == nb
        }
        _ => false,
    }
}

fn accesses_structurally_equal(a: &VariableAccess, b: &VariableAccess) -> bool {
    Variable::structurally_matches(&a.var, &b.var)
        && a.indexes.len() == b.indexes.len()
        && a.indexes
            .iter()
            .zip(b.indexes.iter())
            .all(|(x, y)| expressions_structurally_equal(x, y))
        && a.range == b.range
}

/// Register `module`'s shape under its identifier, returning the handle to
/// use for self-calls, or `None` if an indistinguishable overload already
/// exists.
pub(crate) fn declare_module_shell(
    program: &mut Program,
    symbols: &mut SymbolTable,
    identifier: Symbol,
    parameters: Vec<Rc<Variable>>,
) -> Option<syrec_ir::ModuleRef> {
    let module_ref = program.push_module(Module::new(identifier, parameters.clone(), Vec::new(), Vec::new()));
    if symbols.insert_module(identifier, module_ref, parameters) {
        Some(module_ref)
    } else {
        None
    }
}
