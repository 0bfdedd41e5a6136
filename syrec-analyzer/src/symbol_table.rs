//! Identifier resolution: a module registry with overload resolution, and a
//! scope stack of signal/loop-variable bindings.
//!
//! Two independent stores, as in the design: [`SymbolTable::modules`] never
//! changes once a module is registered, while the scope stack is pushed and
//! popped as the analyzer descends into module bodies and `for` loops.

use rustc_hash::FxHashMap;
use std::rc::Rc;

use syrec_ir::{Module, ModuleRef, Variable, VariableKind};
use syrec_symbol::Symbol;

/// The parameter shape of a registered module, kept alongside its
/// [`ModuleRef`] so overload resolution never needs to borrow the module's
/// full body out of the [`syrec_ir::Program`].
#[derive(Debug, Clone)]
struct ModuleSignature {
    module_ref: ModuleRef,
    parameters: Vec<Rc<Variable>>,
}

/// Two parameter kinds at the same position are ambiguous for the purposes
/// of rejecting a duplicate overload on insertion — i.e. no caller argument
/// vector could distinguish between them.
fn positions_ambiguous(a: VariableKind, b: VariableKind) -> bool {
    use VariableKind::*;
    matches!(
        (a, b),
        (Input, Input) | (Output, Output) | (Inout, Inout) | (Output, Inout) | (Inout, Output)
    )
}

/// Whether a caller argument of kind `caller` may be passed to a parameter
/// of kind `param`.
fn caller_assignable_to_parameter(caller: VariableKind, param: VariableKind) -> bool {
    use VariableKind::*;
    match caller {
        Input => matches!(param, Input),
        Output | Inout | Wire => matches!(param, Input | Output | Inout),
        State => false,
    }
}

fn signature_shape_matches(a: &Variable, b: &Variable) -> bool {
    a.dimensions == b.dimensions && a.bitwidth == b.bitwidth
}

/// The outcome of [`SymbolTable::resolve_call`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleOverloadResolution {
    CallerArgumentsInvalid,
    SingleMatchFound(ModuleRef),
    MultipleMatchesFound,
    NoMatchFound,
}

/// A signal binding or a loop-variable binding recorded in a [`Scope`].
#[derive(Debug, Clone)]
enum ScopeEntry {
    Signal(Rc<Variable>),
    LoopVariable {
        /// The value this loop variable is statically known to hold for
        /// the whole body being analyzed — only ever `Some` when the
        /// `for`'s range is a single known iteration (`from == to`);
        /// this analyzer does not unroll general loops.
        known_value: Option<u32>,
    },
}

/// One lexical scope: a module body or a `for` body.
#[derive(Debug, Default)]
pub struct Scope {
    entries: FxHashMap<Symbol, ScopeEntry>,
}

impl Scope {
    fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, identifier: Symbol) -> bool {
        self.entries.contains_key(&identifier)
    }

    /// The identifiers currently bound in this scope — used by the
    /// "scope discipline" testable property to compare a scope's
    /// contents before and after visiting a body.
    pub fn identifiers(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.entries.keys().copied()
    }
}

/// The module registry plus scope stack shared by every sub-visitor of a
/// single analyzer invocation.
#[derive(Debug, Default)]
pub struct SymbolTable {
    modules: FxHashMap<Symbol, Vec<ModuleSignature>>,
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    // --- module registry -------------------------------------------------

    /// Register `module_ref`'s signature under `identifier`, rejecting it
    /// if an indistinguishable overload is already present.
    pub fn insert_module(&mut self, identifier: Symbol, module_ref: ModuleRef, parameters: Vec<Rc<Variable>>) -> bool {
        if identifier.as_str().is_empty() {
            return false;
        }
        let overloads = self.modules.entry(identifier).or_default();
        let is_duplicate = overloads.iter().any(|existing| {
            existing.parameters.len() == parameters.len()
                && existing
                    .parameters
                    .iter()
                    .zip(parameters.iter())
                    .all(|(a, b)| positions_ambiguous(a.kind, b.kind) && signature_shape_matches(a, b))
        });
        if is_duplicate {
            log::debug!("rejected duplicate overload of '{identifier}'");
            return false;
        }
        overloads.push(ModuleSignature { module_ref, parameters });
        log::debug!(
            "registered overload #{} of '{identifier}'",
            overloads.len()
        );
        true
    }

    pub fn exists_module_named(&self, identifier: Symbol) -> bool {
        self.modules.get(&identifier).is_some_and(|v| !v.is_empty())
    }

    /// Resolve a call to `identifier` given the caller's argument
    /// variables, in declaration order.
    pub fn resolve_call(&self, identifier: Symbol, caller_arguments: &[Rc<Variable>]) -> ModuleOverloadResolution {
        let Some(overloads) = self.modules.get(&identifier) else {
            log::debug!("call to unknown module '{identifier}'");
            return ModuleOverloadResolution::NoMatchFound;
        };

        let matches: Vec<ModuleRef> = overloads
            .iter()
            .filter(|candidate| candidate.parameters.len() == caller_arguments.len())
            .filter(|candidate| {
                candidate
                    .parameters
                    .iter()
                    .zip(caller_arguments.iter())
                    .all(|(param, arg)| {
                        caller_assignable_to_parameter(arg.kind, param.kind) && signature_shape_matches(param, arg)
                    })
            })
            .map(|candidate| candidate.module_ref)
            .collect();

        let outcome = match matches.len() {
            0 => ModuleOverloadResolution::NoMatchFound,
            1 => ModuleOverloadResolution::SingleMatchFound(matches[0]),
            _ => ModuleOverloadResolution::MultipleMatchesFound,
        };
        log::debug!("resolved call to '{identifier}' -> {outcome:?}");
        outcome
    }

    // --- scope stack -------------------------------------------------------

    pub fn push_scope(&mut self) {
        log::trace!("push scope (depth {})", self.scopes.len() + 1);
        self.scopes.push(Scope::new());
    }

    pub fn pop_scope(&mut self) -> Option<Scope> {
        log::trace!("pop scope (depth {})", self.scopes.len());
        self.scopes.pop()
    }

    pub fn active_scope(&self) -> Option<&Scope> {
        self.scopes.last()
    }

    /// Insert a signal binding into the topmost scope. Fails if there is no
    /// active scope, the identifier is empty, or it already exists in that
    /// scope.
    pub fn insert_signal(&mut self, identifier: Symbol, variable: Rc<Variable>) -> bool {
        if identifier.as_str().is_empty() {
            return false;
        }
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.entries.contains_key(&identifier) {
            return false;
        }
        scope.entries.insert(identifier, ScopeEntry::Signal(variable));
        true
    }

    /// Insert a loop-variable binding into the topmost scope. Fails if
    /// there is no active scope, the identifier is empty or is not
    /// sigil-prefixed, or it already exists in that scope.
    pub fn insert_loop_variable(&mut self, identifier: Symbol, known_value: Option<u32>) -> bool {
        if identifier.as_str().is_empty() || !identifier.is_loop_variable() {
            return false;
        }
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.entries.contains_key(&identifier) {
            return false;
        }
        scope.entries.insert(identifier, ScopeEntry::LoopVariable { known_value });
        true
    }

    pub fn remove(&mut self, identifier: Symbol) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        scope.entries.remove(&identifier).is_some()
    }

    /// Look up `identifier` starting from the topmost scope. Does not
    /// strip the loop-variable sigil — pass it already present in
    /// `identifier` when looking for a loop variable.
    pub fn lookup_signal(&self, identifier: Symbol) -> Option<&Rc<Variable>> {
        self.scopes.iter().rev().find_map(|scope| match scope.entries.get(&identifier) {
            Some(ScopeEntry::Signal(variable)) => Some(variable),
            _ => None,
        })
    }

    pub fn lookup_loop_variable_value(&self, identifier: Symbol) -> Option<u32> {
        self.scopes.iter().rev().find_map(|scope| match scope.entries.get(&identifier) {
            Some(ScopeEntry::LoopVariable { known_value }) => *known_value,
            _ => None,
        })
    }

    pub fn is_loop_variable_in_scope(&self, identifier: Symbol) -> bool {
        self.scopes
            .iter()
            .rev()
            .any(|scope| matches!(scope.entries.get(&identifier), Some(ScopeEntry::LoopVariable { .. })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syrec_ir::Program;

    fn var(kind: VariableKind, bitwidth: u32) -> Rc<Variable> {
        Variable::new(kind, Symbol::intern("a"), vec![2], bitwidth)
    }

    #[test]
    fn duplicate_overload_is_rejected() {
        let mut program = Program::new();
        let r1 = program.push_module(Module::new(Symbol::intern("m"), vec![], vec![], vec![]));
        let r2 = program.push_module(Module::new(Symbol::intern("m"), vec![], vec![], vec![]));

        let mut table = SymbolTable::new();
        let m = Symbol::intern("m");
        assert!(table.insert_module(m, r1, vec![var(VariableKind::Input, 16)]));
        assert!(!table.insert_module(m, r2, vec![var(VariableKind::Input, 16)]));
        assert_eq!(table.modules.get(&m).unwrap().len(), 1);
    }

    #[test]
    fn distinguishable_overload_is_accepted() {
        let mut program = Program::new();
        let r1 = program.push_module(Module::new(Symbol::intern("m"), vec![], vec![], vec![]));
        let r2 = program.push_module(Module::new(Symbol::intern("m"), vec![], vec![], vec![]));

        let mut table = SymbolTable::new();
        let m = Symbol::intern("m");
        assert!(table.insert_module(m, r1, vec![var(VariableKind::Input, 16)]));
        assert!(table.insert_module(m, r2, vec![var(VariableKind::Output, 16)]));
    }

    #[test]
    fn resolve_call_picks_the_single_assignable_overload() {
        let mut program = Program::new();
        let r1 = program.push_module(Module::new(Symbol::intern("m"), vec![], vec![], vec![]));

        let mut table = SymbolTable::new();
        let m = Symbol::intern("m");
        table.insert_module(m, r1, vec![var(VariableKind::Inout, 16)]);

        let caller_args = vec![var(VariableKind::Wire, 16)];
        assert_eq!(
            table.resolve_call(m, &caller_args),
            ModuleOverloadResolution::SingleMatchFound(r1)
        );
    }

    #[test]
    fn resolve_call_rejects_readonly_caller_into_inout_parameter() {
        let mut program = Program::new();
        let r1 = program.push_module(Module::new(Symbol::intern("m"), vec![], vec![], vec![]));

        let mut table = SymbolTable::new();
        let m = Symbol::intern("m");
        table.insert_module(m, r1, vec![var(VariableKind::Inout, 16)]);

        let caller_args = vec![var(VariableKind::Input, 16)];
        assert_eq!(table.resolve_call(m, &caller_args), ModuleOverloadResolution::NoMatchFound);
    }

    #[test]
    fn scope_lifecycle_round_trips() {
        let mut table = SymbolTable::new();
        table.push_scope();
        let i = Symbol::intern("$i");
        assert!(table.insert_loop_variable(i, Some(0)));
        assert_eq!(table.lookup_loop_variable_value(i), Some(0));
        table.pop_scope();
        assert_eq!(table.lookup_loop_variable_value(i), None);
    }

    #[test]
    fn signal_and_loop_variable_namespaces_are_disjoint_for_insertion() {
        let mut table = SymbolTable::new();
        table.push_scope();
        let x = Symbol::intern("x");
        let dollar_x = Symbol::intern("$x");
        assert!(table.insert_signal(x, var(VariableKind::Wire, 8)));
        assert!(table.insert_loop_variable(dollar_x, None));
        assert!(table.lookup_signal(x).is_some());
        assert!(table.is_loop_variable_in_scope(dollar_x));
    }
}
