//! The error taxonomy and the diagnostic sink it feeds.
//!
//! [`SemanticErrorKind`] is a `thiserror`-derived enum: its `Display` impl
//! *is* the formatted message carried by a [`Diagnostic`] — there is no
//! separate formatting layer to keep in sync with the taxonomy.

use std::fmt;

use syrec_symbol::Symbol;

/// How severe a recorded [`Diagnostic`] is.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// Every semantic error this analyzer can raise, grouped the way §7 of the
/// design groups them. Each variant carries exactly the data its message
/// needs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticErrorKind {
    // IdentifierScope
    #[error("no variable found matching identifier '{identifier}'")]
    NoVariableMatchingIdentifier { identifier: Symbol },
    #[error("variable '{identifier}' is already declared in this scope")]
    DuplicateVariableDeclaration { identifier: Symbol },
    #[error("a module with the same signature as '{identifier}' is already declared")]
    DuplicateModuleSignature { identifier: Symbol },
    #[error("no module named '{identifier}' is declared")]
    UnknownModule { identifier: Symbol },
    #[error("no overload of '{identifier}' matches the given arguments")]
    NoMatchingOverload { identifier: Symbol },
    #[error("call to '{identifier}' is ambiguous between multiple overloads")]
    AmbiguousOverload { identifier: Symbol },

    // TypeAndShape
    #[error("operands have mismatched bit-widths: {lhs} vs {rhs}")]
    BitWidthMismatch { lhs: u32, rhs: u32 },
    #[error("the bit-width of this access cannot be statically determined")]
    UndecidableBitWidth,
    #[error("expected {expected} index expressions, found {actual}")]
    DimensionCountMismatch { expected: usize, actual: usize },
    #[error("index {index} is out of range for a dimension of extent {extent}")]
    IndexOutOfRange { index: u32, extent: u32 },
    #[error("bit index {index} is out of range for a {bitwidth}-bit variable")]
    BitIndexOutOfRange { index: u32, bitwidth: u32 },
    #[error("'{identifier}' is read-only and cannot be assigned to")]
    AssignmentToReadonlyVariable { identifier: Symbol },

    // Arithmetic
    #[error("division by zero")]
    DivisionByZero,
    #[error("constant value overflows a {bitwidth}-bit integer")]
    IntegerConstantOverflow { bitwidth: u32 },

    // ControlFlow
    #[error("the 'if' guard and the matching 'fi' guard must be structurally identical")]
    IfGuardExpressionMismatch,
    #[error("a negative step is not allowed; the step of a 'for' loop is always positive")]
    NegativeStepNotAllowed,
    #[error("loop variable '{identifier}' cannot be used in its own range expression")]
    LoopVariableSelfReference { identifier: Symbol },

    // Aliasing
    #[error("the right-hand side overlaps the assignment target '{identifier}'")]
    SelfAssignmentOverlap { identifier: Symbol },
}

/// A single recorded diagnostic: a source position, a severity, and a
/// formatted message produced from a [`SemanticErrorKind`] at `emit` time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{tag}: {}:{}: {}", self.line, self.column, self.message)
    }
}

/// An append-only diagnostic sink for a single analyzer invocation.
///
/// Diagnostics are never removed or mutated once recorded (see the
/// "diagnostic monotonicity" testable property) — `Diagnostics` exposes no
/// method that would allow it.
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
    has_errors: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic at `(line, column)`, formatting its message from
    /// `kind`'s `Display` impl.
    pub fn emit(&mut self, kind: SemanticErrorKind, severity: Severity, line: u32, column: u32) {
        log::debug!("diagnostic: {severity:?} {kind} at {line}:{column}");
        if severity == Severity::Error {
            self.has_errors = true;
        }
        self.records.push(Diagnostic {
            severity,
            line,
            column,
            message: kind.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emitting_an_error_sets_the_has_errors_flag() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_errors());
        diagnostics.emit(SemanticErrorKind::DivisionByZero, Severity::Error, 3, 7);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.records().len(), 1);
        assert_eq!(diagnostics.records()[0].message, "division by zero");
    }

    #[test]
    fn warnings_do_not_set_the_has_errors_flag() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.emit(SemanticErrorKind::UndecidableBitWidth, Severity::Warning, 1, 1);
        assert!(!diagnostics.has_errors());
    }
}
