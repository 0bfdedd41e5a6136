//! The statement visitor: `impl Analyzer` methods building every
//! [`Statement`] variant, with the assignability, scoping, and structural
//! if/fi-guard rules from the design.

use std::rc::Rc;

use syrec_ir::{Number, Statement};
use syrec_symbol::Symbol;

use crate::{
    analyzer::{expressions_structurally_equal, Analyzer},
    diagnostics::SemanticErrorKind,
    overlap::{self, OverlapOutcome},
    parse_tree::{ParseStatement, ParseStatementKind},
    symbol_table::ModuleOverloadResolution,
};

impl<'a> Analyzer<'a> {
    pub(crate) fn build_statement_list(&mut self, parse: &[ParseStatement]) -> Vec<Rc<Statement>> {
        parse.iter().filter_map(|s| self.build_statement(s)).collect()
    }

    pub(crate) fn build_statement(&mut self, parse: &ParseStatement) -> Option<Rc<Statement>> {
        let line = parse.line;
        match &parse.kind {
            ParseStatementKind::Assign { target, op, rhs } => {
                let target_access = self.build_variable_access(target)?;
                let target_bitwidth = self.access_bitwidth_or_diagnose(&target_access, parse.line, parse.column)?;

                if !target_access.var.kind.is_writable() {
                    self.error(
                        SemanticErrorKind::AssignmentToReadonlyVariable {
                            identifier: target_access.var.identifier,
                        },
                        parse.line,
                        parse.column,
                    );
                    return None;
                }

                let rhs_expr =
                    self.with_forbidden_access(target_access.clone(), |slf| slf.build_expression(rhs, Some(target_bitwidth)))?;

                if rhs_expr.bitwidth() != target_bitwidth {
                    self.error(
                        SemanticErrorKind::BitWidthMismatch {
                            lhs: target_bitwidth,
                            rhs: rhs_expr.bitwidth(),
                        },
                        parse.line,
                        parse.column,
                    );
                }

                Some(Rc::new(Statement::Assign {
                    target: target_access,
                    op: *op,
                    rhs: rhs_expr,
                    line,
                }))
            }
            ParseStatementKind::UnaryAssign { op, target } => {
                let target_access = self.build_variable_access(target)?;
                if !target_access.var.kind.is_writable() {
                    self.error(
                        SemanticErrorKind::AssignmentToReadonlyVariable {
                            identifier: target_access.var.identifier,
                        },
                        parse.line,
                        parse.column,
                    );
                    return None;
                }
                Some(Rc::new(Statement::UnaryAssign {
                    op: *op,
                    target: target_access,
                    line,
                }))
            }
            ParseStatementKind::Swap { lhs, rhs } => {
                let lhs_access = self.build_variable_access(lhs)?;
                let rhs_access = self.build_variable_access(rhs)?;
                let lhs_bitwidth = self.access_bitwidth_or_diagnose(&lhs_access, parse.line, parse.column)?;
                let rhs_bitwidth = self.access_bitwidth_or_diagnose(&rhs_access, parse.line, parse.column)?;

                for access in [&lhs_access, &rhs_access] {
                    if !access.var.kind.is_writable() {
                        self.error(
                            SemanticErrorKind::AssignmentToReadonlyVariable {
                                identifier: access.var.identifier,
                            },
                            parse.line,
                            parse.column,
                        );
                    }
                }

                if lhs_bitwidth != rhs_bitwidth {
                    self.error(
                        SemanticErrorKind::BitWidthMismatch {
                            lhs: lhs_bitwidth,
                            rhs: rhs_bitwidth,
                        },
                        parse.line,
                        parse.column,
                    );
                }

                if matches!(overlap::check_overlap(&lhs_access, &rhs_access), OverlapOutcome::Overlapping { .. }) {
                    self.error(
                        SemanticErrorKind::SelfAssignmentOverlap {
                            identifier: lhs_access.var.identifier,
                        },
                        parse.line,
                        parse.column,
                    );
                }

                Some(Rc::new(Statement::Swap {
                    lhs: lhs_access,
                    rhs: rhs_access,
                    line,
                }))
            }
            ParseStatementKind::If {
                condition,
                then_body,
                else_body,
                fi_condition,
            } => {
                let guard = self.build_expression(condition, Some(1))?;
                let then_body = self.build_statement_list(then_body);
                let else_body = self.build_statement_list(else_body);
                let fi_guard = self.build_expression(fi_condition, Some(1))?;

                if !expressions_structurally_equal(&guard, &fi_guard) {
                    self.error(SemanticErrorKind::IfGuardExpressionMismatch, parse.line, parse.column);
                }

                Some(Rc::new(Statement::If {
                    guard,
                    then_body,
                    else_body,
                    fi_guard,
                    line,
                }))
            }
            ParseStatementKind::For {
                loop_variable,
                from,
                to,
                step,
                body,
            } => self.build_for(loop_variable.as_deref(), from.as_ref(), to, step.as_ref(), body, parse.line),
            ParseStatementKind::Call {
                module_identifier,
                arguments,
            } => self.build_call(module_identifier, arguments, line, parse.column, false),
            ParseStatementKind::Uncall {
                module_identifier,
                arguments,
            } => self.build_call(module_identifier, arguments, line, parse.column, true),
            ParseStatementKind::Skip => Some(Rc::new(Statement::Skip { line })),
        }
    }

    fn access_bitwidth_or_diagnose(&mut self, access: &syrec_ir::VariableAccess, line: u32, column: u32) -> Option<u32> {
        match access.bitwidth() {
            Ok(bw) => Some(bw),
            Err(_) => {
                self.error(SemanticErrorKind::UndecidableBitWidth, line, column);
                None
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn build_for(
        &mut self,
        loop_variable: Option<&str>,
        from: Option<&crate::parse_tree::ParseNumber>,
        to: &crate::parse_tree::ParseNumber,
        step: Option<&crate::parse_tree::ParseForStep>,
        body: &[ParseStatement],
        line: u32,
    ) -> Option<Rc<Statement>> {
        let loop_symbol = loop_variable.map(Symbol::intern);

        self.symbols.push_scope();

        let build_with_self_restriction = |slf: &mut Self, number: &crate::parse_tree::ParseNumber| match loop_symbol {
            Some(sym) => slf.with_loop_self_reference(sym, |slf| slf.build_number(number)),
            None => slf.build_number(number),
        };

        let to_number = build_with_self_restriction(self, to);
        let from_number = from.map(|n| build_with_self_restriction(self, n)).unwrap_or_else(|| to_number.clone());

        let step_number = match step {
            Some(step) => {
                if step.negative {
                    self.error(SemanticErrorKind::NegativeStepNotAllowed, line, 0);
                }
                build_with_self_restriction(self, &step.value)
            }
            None => Some(Number::constant(1)),
        };

        if let Some(sym) = loop_symbol {
            let known_value = match (from_number.as_deref(), to_number.as_deref()) {
                (Some(Number::Constant(a)), Some(Number::Constant(b))) if a == b => Some(*a),
                _ => None,
            };
            self.symbols.insert_loop_variable(sym, known_value);
        }

        let body_statements = self.build_statement_list(body);

        self.symbols.pop_scope();

        Some(Rc::new(Statement::For {
            loop_variable: loop_symbol,
            from: from_number?,
            to: to_number?,
            step: step_number?,
            body: body_statements,
            line,
        }))
    }

    fn build_call(
        &mut self,
        module_identifier: &str,
        arguments: &[String],
        line: u32,
        column: u32,
        is_uncall: bool,
    ) -> Option<Rc<Statement>> {
        let module_symbol = Symbol::intern(module_identifier);
        let argument_symbols: Vec<Symbol> = arguments.iter().map(|a| Symbol::intern(a)).collect();

        let mut caller_args = Vec::with_capacity(argument_symbols.len());
        let mut all_resolved = true;
        for &arg in &argument_symbols {
            match self.symbols.lookup_signal(arg).cloned() {
                Some(var) => caller_args.push(var),
                None => {
                    self.error(SemanticErrorKind::NoVariableMatchingIdentifier { identifier: arg }, line, column);
                    all_resolved = false;
                }
            }
        }
        if !all_resolved {
            return None;
        }

        match self.symbols.resolve_call(module_symbol, &caller_args) {
            ModuleOverloadResolution::SingleMatchFound(target) => {
                let kind = if is_uncall {
                    Statement::Uncall {
                        target,
                        target_identifier: module_symbol,
                        arguments: argument_symbols,
                        line,
                    }
                } else {
                    Statement::Call {
                        target,
                        target_identifier: module_symbol,
                        arguments: argument_symbols,
                        line,
                    }
                };
                Some(Rc::new(kind))
            }
            ModuleOverloadResolution::MultipleMatchesFound => {
                self.error(SemanticErrorKind::AmbiguousOverload { identifier: module_symbol }, line, column);
                None
            }
            ModuleOverloadResolution::NoMatchFound | ModuleOverloadResolution::CallerArgumentsInvalid => {
                let kind = if self.symbols.exists_module_named(module_symbol) {
                    SemanticErrorKind::NoMatchingOverload { identifier: module_symbol }
                } else {
                    SemanticErrorKind::UnknownModule { identifier: module_symbol }
                };
                self.error(kind, line, column);
                None
            }
        }
    }
}
