//! The parse-tree contract an external SyReC parser must produce.
//!
//! Nodes here correspond one-for-one with the grammar productions listed in
//! the external-interfaces section of the design: this module is never
//! populated by this crate except in its own tests, and never reparses a
//! string — every leaf that would otherwise require re-lexing (an operator,
//! a keyword) is already a tagged enum value, reusing the same operation
//! tables [`syrec_ir`] uses for the IR itself.

use syrec_ir::{AssignOperation, BinaryOperation, ShiftOperation, UnaryStatementOperation};

/// The `in`/`out`/`inout` parameter-kind keyword.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseParameterKind {
    In,
    Out,
    Inout,
}

/// The `state`/`wire` local-declaration keyword.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseLocalKind {
    State,
    Wire,
}

/// One `ident dim-list (bw)` declaration, shared by parameter lists and
/// local-variable groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVariableDecl {
    pub identifier: String,
    pub dimensions: Vec<u32>,
    /// Absent when the declaration omits `(bw)`, in which case the
    /// analyzer falls back to `ReadProgramSettings::default_bitwidth`.
    pub bitwidth: Option<u32>,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseParameter {
    pub kind: ParseParameterKind,
    pub decl: ParseVariableDecl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLocalGroup {
    pub kind: ParseLocalKind,
    pub decls: Vec<ParseVariableDecl>,
}

/// `$name = number op number`: the unary `!`/`~` prefix an expression may
/// carry. The IR has no standalone unary node (see the open question in
/// the design notes) — the expression builder lowers these at IR-build
/// time instead of at parse time, so the parse tree preserves them
/// verbatim.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseUnaryOperation {
    /// `!e` — logical not.
    LogicalNot,
    /// `~e` — bitwise complement.
    BitwiseNot,
}

/// `n op n` inside a parenthesized number literal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ParseNumberOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseNumberKind {
    /// A bare integer literal.
    Literal(u32),
    /// `#var` — the declared bit-width of a signal.
    BitwidthOfSignal(String),
    /// `$name` — a loop-variable reference.
    LoopVariable(String),
    /// `(n op n)`.
    Expr(Box<ParseNumber>, ParseNumberOperation, Box<ParseNumber>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNumber {
    pub kind: ParseNumberKind,
    pub line: u32,
    pub column: u32,
}

/// `ident([expr])* ('.' num (':' num)?)?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVariableAccess {
    pub identifier: String,
    pub indexes: Vec<ParseExpression>,
    pub range: Option<(ParseNumber, ParseNumber)>,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseExpressionKind {
    Number(ParseNumber),
    Signal(ParseVariableAccess),
    Binary(Box<ParseExpression>, BinaryOperation, Box<ParseExpression>),
    Unary(ParseUnaryOperation, Box<ParseExpression>),
    Shift(Box<ParseExpression>, ShiftOperation, ParseNumber),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseExpression {
    pub kind: ParseExpressionKind,
    pub line: u32,
    pub column: u32,
}

/// The optional `[step [-] s]` clause of a `for` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseForStep {
    pub negative: bool,
    pub value: ParseNumber,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStatementKind {
    Assign {
        target: ParseVariableAccess,
        op: AssignOperation,
        rhs: ParseExpression,
    },
    UnaryAssign {
        op: UnaryStatementOperation,
        target: ParseVariableAccess,
    },
    Swap {
        lhs: ParseVariableAccess,
        rhs: ParseVariableAccess,
    },
    If {
        condition: ParseExpression,
        then_body: Vec<ParseStatement>,
        else_body: Vec<ParseStatement>,
        fi_condition: ParseExpression,
    },
    For {
        /// `$x` in `for $x = n to m ...`; absent in the bare `for n to m`
        /// form.
        loop_variable: Option<String>,
        /// Absent when the `from` clause was omitted (`from = to`).
        from: Option<ParseNumber>,
        to: ParseNumber,
        step: Option<ParseForStep>,
        body: Vec<ParseStatement>,
    },
    Call {
        module_identifier: String,
        arguments: Vec<String>,
    },
    Uncall {
        module_identifier: String,
        arguments: Vec<String>,
    },
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatement {
    pub kind: ParseStatementKind,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModule {
    pub identifier: String,
    pub parameters: Vec<ParseParameter>,
    pub locals: Vec<ParseLocalGroup>,
    pub statements: Vec<ParseStatement>,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseProgram {
    pub modules: Vec<ParseModule>,
}
