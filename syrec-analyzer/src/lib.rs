//! Semantic analysis for the SyReC reversible hardware description
//! language: converts a parse tree into a validated [`syrec_ir::Program`],
//! accumulating diagnostics rather than aborting on the first error.
//!
//! The entry point is [`analyze_program`]; [`parse_tree`] documents the
//! contract an external parser must satisfy to drive it.

mod analyzer;
pub mod config;
pub mod diagnostics;
pub mod index_validator;
mod modules;
pub mod overlap;
pub mod parse_tree;
mod statements;
pub mod symbol_table;

pub use analyzer::Analyzer;
pub use config::ReadProgramSettings;
pub use diagnostics::{Diagnostic, Diagnostics, SemanticErrorKind, Severity};
pub use modules::analyze_program;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_tree::*;
    use syrec_ir::{AssignOperation, BinaryOperation, VariableKind};

    fn num(v: u32) -> ParseNumber {
        ParseNumber {
            kind: ParseNumberKind::Literal(v),
            line: 1,
            column: 1,
        }
    }

    fn access(identifier: &str) -> ParseVariableAccess {
        ParseVariableAccess {
            identifier: identifier.to_string(),
            indexes: Vec::new(),
            range: None,
            line: 1,
            column: 1,
        }
    }

    fn decl(identifier: &str, bitwidth: u32) -> ParseVariableDecl {
        ParseVariableDecl {
            identifier: identifier.to_string(),
            dimensions: Vec::new(),
            bitwidth: Some(bitwidth),
            line: 1,
            column: 1,
        }
    }

    #[test]
    fn a_simple_module_with_one_assignment_analyzes_cleanly() {
        let program = ParseProgram {
            modules: vec![ParseModule {
                identifier: "main".into(),
                parameters: vec![ParseParameter {
                    kind: ParseParameterKind::Inout,
                    decl: decl("a", 8),
                }],
                locals: vec![],
                statements: vec![ParseStatement {
                    kind: ParseStatementKind::Assign {
                        target: access("a"),
                        op: AssignOperation::Exor,
                        rhs: ParseExpression {
                            kind: ParseExpressionKind::Number(num(3)),
                            line: 1,
                            column: 1,
                        },
                    },
                    line: 1,
                    column: 1,
                }],
                line: 1,
                column: 1,
            }],
        };

        let settings = ReadProgramSettings::default();
        let (built, diagnostics) = analyze_program(&program, &settings);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.records());
        assert_eq!(built.len(), 1);
        let module = built.module(built.find_by_identifier(syrec_symbol::Symbol::intern("main")).unwrap());
        assert_eq!(module.parameters[0].kind, VariableKind::Inout);
        assert_eq!(module.statements.len(), 1);
    }

    #[test]
    fn assigning_to_an_input_parameter_is_rejected() {
        let program = ParseProgram {
            modules: vec![ParseModule {
                identifier: "main".into(),
                parameters: vec![ParseParameter {
                    kind: ParseParameterKind::In,
                    decl: decl("a", 8),
                }],
                locals: vec![],
                statements: vec![ParseStatement {
                    kind: ParseStatementKind::Assign {
                        target: access("a"),
                        op: AssignOperation::Exor,
                        rhs: ParseExpression {
                            kind: ParseExpressionKind::Number(num(3)),
                            line: 2,
                            column: 1,
                        },
                    },
                    line: 2,
                    column: 1,
                }],
                line: 1,
                column: 1,
            }],
        };

        let settings = ReadProgramSettings::default();
        let (_, diagnostics) = analyze_program(&program, &settings);
        assert!(diagnostics.has_errors());
        assert!(diagnostics
            .records()
            .iter()
            .any(|d| d.message.contains("read-only")));
    }

    #[test]
    fn calling_an_undeclared_module_is_reported() {
        let program = ParseProgram {
            modules: vec![ParseModule {
                identifier: "main".into(),
                parameters: vec![],
                locals: vec![],
                statements: vec![ParseStatement {
                    kind: ParseStatementKind::Call {
                        module_identifier: "missing".into(),
                        arguments: vec![],
                    },
                    line: 1,
                    column: 1,
                }],
                line: 1,
                column: 1,
            }],
        };

        let settings = ReadProgramSettings::default();
        let (_, diagnostics) = analyze_program(&program, &settings);
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn constant_folding_collapses_a_binary_expression_of_two_literals() {
        let program = ParseProgram {
            modules: vec![ParseModule {
                identifier: "main".into(),
                parameters: vec![ParseParameter {
                    kind: ParseParameterKind::Inout,
                    decl: decl("a", 8),
                }],
                locals: vec![],
                statements: vec![ParseStatement {
                    kind: ParseStatementKind::Assign {
                        target: access("a"),
                        op: AssignOperation::Exor,
                        rhs: ParseExpression {
                            kind: ParseExpressionKind::Binary(
                                Box::new(ParseExpression {
                                    kind: ParseExpressionKind::Number(num(2)),
                                    line: 1,
                                    column: 1,
                                }),
                                BinaryOperation::Add,
                                Box::new(ParseExpression {
                                    kind: ParseExpressionKind::Number(num(3)),
                                    line: 1,
                                    column: 1,
                                }),
                            ),
                            line: 1,
                            column: 1,
                        },
                    },
                    line: 1,
                    column: 1,
                }],
                line: 1,
                column: 1,
            }],
        };

        let settings = ReadProgramSettings::default();
        let (built, diagnostics) = analyze_program(&program, &settings);
        assert!(!diagnostics.has_errors(), "{:?}", diagnostics.records());
        let module = built.module(built.find_by_identifier(syrec_symbol::Symbol::intern("main")).unwrap());
        let syrec_ir::Statement::Assign { rhs, .. } = module.statements[0].as_ref() else {
            panic!("expected an assign statement");
        };
        assert_eq!(rhs.constant_value(), Some(5));
    }
}
