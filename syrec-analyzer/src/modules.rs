//! The module visitor and the `analyze_program` entry point.
//!
//! Modules are built in two passes so that a `call`/`uncall` may reference
//! a module declared later in the same file (or itself): the first pass
//! declares every module's shell and registers its signature, the second
//! fills in locals and statements.

use std::rc::Rc;

use syrec_ir::{Program, Variable, VariableKind};
use syrec_symbol::Symbol;

use crate::{
    analyzer::{declare_module_shell, Analyzer},
    config::ReadProgramSettings,
    diagnostics::{Diagnostics, SemanticErrorKind},
    parse_tree::{ParseLocalKind, ParseModule, ParseParameterKind, ParseProgram, ParseVariableDecl},
};

fn variable_decl(decl: &ParseVariableDecl, kind: VariableKind, settings: &ReadProgramSettings) -> Rc<Variable> {
    let dimensions = if decl.dimensions.is_empty() { vec![1] } else { decl.dimensions.clone() };
    let bitwidth = decl.bitwidth.unwrap_or(settings.default_bitwidth);
    Variable::new(kind, Symbol::intern(&decl.identifier), dimensions, bitwidth)
}

impl<'a> Analyzer<'a> {
    fn build_parameters(&mut self, parse: &ParseModule) -> Vec<Rc<Variable>> {
        let mut seen = std::collections::HashSet::new();
        let mut parameters = Vec::with_capacity(parse.parameters.len());
        for param in &parse.parameters {
            let kind = match param.kind {
                ParseParameterKind::In => VariableKind::Input,
                ParseParameterKind::Out => VariableKind::Output,
                ParseParameterKind::Inout => VariableKind::Inout,
            };
            let variable = variable_decl(&param.decl, kind, self.settings);
            if !seen.insert(variable.identifier) {
                self.error(
                    SemanticErrorKind::DuplicateVariableDeclaration {
                        identifier: variable.identifier,
                    },
                    param.decl.line,
                    param.decl.column,
                );
                continue;
            }
            parameters.push(variable);
        }
        parameters
    }

    /// Insert `parameters` into the active scope and build+insert every
    /// declared local, reporting a collision against either set.
    fn build_locals(&mut self, parse: &ParseModule, parameters: &[Rc<Variable>]) -> Vec<Rc<Variable>> {
        for param in parameters {
            self.symbols.insert_signal(param.identifier, param.clone());
        }

        let mut locals = Vec::new();
        for group in &parse.locals {
            let kind = match group.kind {
                ParseLocalKind::State => VariableKind::State,
                ParseLocalKind::Wire => VariableKind::Wire,
            };
            for decl in &group.decls {
                let variable = variable_decl(decl, kind, self.settings);
                if !self.symbols.insert_signal(variable.identifier, variable.clone()) {
                    self.error(
                        SemanticErrorKind::DuplicateVariableDeclaration {
                            identifier: variable.identifier,
                        },
                        decl.line,
                        decl.column,
                    );
                    continue;
                }
                locals.push(variable);
            }
        }
        locals
    }
}

/// Analyze a whole parse tree, producing the built [`Program`] alongside
/// every diagnostic raised while doing so. Always returns a `Program`, even
/// when `diagnostics.has_errors()` — callers that care should check that
/// flag before trusting the result.
pub fn analyze_program(parse: &ParseProgram, settings: &ReadProgramSettings) -> (Program, Diagnostics) {
    let mut program = Program::new();
    let mut analyzer = Analyzer::new(settings);

    let mut declared = Vec::with_capacity(parse.modules.len());
    for module in &parse.modules {
        let identifier = Symbol::intern(&module.identifier);
        let parameters = analyzer.build_parameters(module);
        match declare_module_shell(&mut program, &mut analyzer.symbols, identifier, parameters.clone()) {
            Some(module_ref) => declared.push(Some((module_ref, parameters))),
            None => {
                analyzer.error(
                    SemanticErrorKind::DuplicateModuleSignature { identifier },
                    module.line,
                    module.column,
                );
                declared.push(None);
            }
        }
    }

    for (module, declaration) in parse.modules.iter().zip(declared) {
        let Some((module_ref, parameters)) = declaration else {
            continue;
        };

        analyzer.symbols.push_scope();
        let locals = analyzer.build_locals(module, &parameters);
        let statements = analyzer.build_statement_list(&module.statements);
        analyzer.symbols.pop_scope();

        let built = program.module_mut(module_ref);
        built.locals = locals;
        built.statements = statements;
    }

    (program, analyzer.into_diagnostics())
}
