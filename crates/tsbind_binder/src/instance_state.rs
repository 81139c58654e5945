//! Module instantiation classification.
//!
//! A namespace whose body contains only types needs no runtime object and
//! is erased at emit. Classification folds over the body's statements:
//! anything value-producing makes the module `Instantiated` and stops the
//! walk immediately; a `const enum` alone yields `ConstEnumOnly`, which
//! keeps scanning in case something later upgrades the result.
//!
//! Results are memoized per module node. Because `Instantiated`
//! short-circuits, nested modules past the deciding statement never get a
//! cache entry.

use rustc_hash::FxHashMap;
use tsbind_ast::{Ast, ModifierFlags, NodeFlags, NodeId, NodeKind};

/// Whether a module needs a runtime object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleInstanceState {
    /// Types only; fully erasable.
    NonInstantiated,
    /// Contains runtime code.
    Instantiated,
    /// Only `const enum` declarations; erasable unless const enums are
    /// preserved.
    ConstEnumOnly,
}

impl ModuleInstanceState {
    /// Fold another statement's state into this one. `Instantiated` is
    /// absorbing; callers should stop folding once they see it.
    fn join(self, other: ModuleInstanceState) -> ModuleInstanceState {
        match (self, other) {
            (ModuleInstanceState::Instantiated, _) | (_, ModuleInstanceState::Instantiated) => {
                ModuleInstanceState::Instantiated
            }
            (ModuleInstanceState::ConstEnumOnly, _) | (_, ModuleInstanceState::ConstEnumOnly) => {
                ModuleInstanceState::ConstEnumOnly
            }
            _ => ModuleInstanceState::NonInstantiated,
        }
    }
}

/// Classify a module declaration, memoizing per module node.
pub fn module_instance_state(
    ast: &Ast,
    module: NodeId,
    cache: &mut FxHashMap<NodeId, ModuleInstanceState>,
) -> ModuleInstanceState {
    if let Some(&state) = cache.get(&module) {
        return state;
    }
    let state = compute_module_state(ast, module, cache);
    cache.insert(module, state);
    state
}

fn compute_module_state(
    ast: &Ast,
    module: NodeId,
    cache: &mut FxHashMap<NodeId, ModuleInstanceState>,
) -> ModuleInstanceState {
    let body = match &ast.node(module).kind {
        NodeKind::ModuleDeclaration(m) => m.body,
        // Non-module nodes classify as their statement disposition.
        _ => return statement_state(ast, module, cache),
    };
    let body = match body {
        Some(body) => body,
        // Bodiless ambient shorthand declares nothing at runtime.
        None => return ModuleInstanceState::NonInstantiated,
    };
    match &ast.node(body).kind {
        // Dotted shorthand: the outer segment's state is the inner's.
        NodeKind::ModuleDeclaration(_) => module_instance_state(ast, body, cache),
        NodeKind::ModuleBlock(block) => {
            let mut state = ModuleInstanceState::NonInstantiated;
            for &statement in &block.statements {
                state = state.join(statement_state(ast, statement, cache));
                if state == ModuleInstanceState::Instantiated {
                    return state;
                }
            }
            state
        }
        _ => ModuleInstanceState::Instantiated,
    }
}

fn statement_state(
    ast: &Ast,
    statement: NodeId,
    cache: &mut FxHashMap<NodeId, ModuleInstanceState>,
) -> ModuleInstanceState {
    // Ambient declarations assert existence without emitting anything.
    if ast.is_ambient(statement) {
        return ModuleInstanceState::NonInstantiated;
    }
    match &ast.node(statement).kind {
        NodeKind::InterfaceDeclaration(_)
        | NodeKind::TypeAliasDeclaration(_)
        | NodeKind::EmptyStatement => ModuleInstanceState::NonInstantiated,
        NodeKind::EnumDeclaration(_) => {
            if ast
                .data(statement)
                .modifier_flags
                .contains(ModifierFlags::CONST)
            {
                ModuleInstanceState::ConstEnumOnly
            } else {
                ModuleInstanceState::Instantiated
            }
        }
        NodeKind::ModuleDeclaration(_) => module_instance_state(ast, statement, cache),
        // A `const` list is fully evaluable at compile time; `var` and
        // `let` need storage.
        NodeKind::VariableStatement(_) => {
            if ast.data(statement).flags.contains(NodeFlags::CONST) {
                ModuleInstanceState::NonInstantiated
            } else {
                ModuleInstanceState::Instantiated
            }
        }
        NodeKind::ImportDeclaration(i) => {
            if i.is_type_only {
                ModuleInstanceState::NonInstantiated
            } else {
                ModuleInstanceState::Instantiated
            }
        }
        _ => ModuleInstanceState::Instantiated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsbind_ast::AstBuilder;

    fn classify(ast: &Ast, module: NodeId) -> ModuleInstanceState {
        let mut cache = FxHashMap::default();
        module_instance_state(ast, module, &mut cache)
    }

    #[test]
    fn empty_module_is_non_instantiated() {
        let mut b = AstBuilder::new();
        let ns = b.namespace("N", vec![]);
        let sf = b.source_file("t.ts", vec![ns]);
        let ast = b.finish(sf);
        assert_eq!(classify(&ast, ns), ModuleInstanceState::NonInstantiated);
    }

    #[test]
    fn type_only_body_is_non_instantiated() {
        let mut b = AstBuilder::new();
        let i = b.interface_declaration("I", vec![]);
        let t = b.type_alias_declaration("T");
        let ns = b.namespace("N", vec![i, t]);
        let sf = b.source_file("t.ts", vec![ns]);
        let ast = b.finish(sf);
        assert_eq!(classify(&ast, ns), ModuleInstanceState::NonInstantiated);
    }

    #[test]
    fn variable_instantiates() {
        let mut b = AstBuilder::new();
        let d = b.variable_declaration("x", false);
        let s = b.variable_statement(tsbind_ast::NodeFlags::NONE, vec![d]);
        let ns = b.namespace("N", vec![s]);
        let sf = b.source_file("t.ts", vec![ns]);
        let ast = b.finish(sf);
        assert_eq!(classify(&ast, ns), ModuleInstanceState::Instantiated);
    }

    #[test]
    fn const_variables_do_not_instantiate() {
        let mut b = AstBuilder::new();
        let d = b.variable_declaration("x", true);
        let s = b.variable_statement(tsbind_ast::NodeFlags::CONST, vec![d]);
        let ns = b.namespace("N", vec![s]);
        let sf = b.source_file("t.ts", vec![ns]);
        let ast = b.finish(sf);
        assert_eq!(classify(&ast, ns), ModuleInstanceState::NonInstantiated);
    }

    #[test]
    fn const_enum_only_does_not_short_circuit() {
        let mut b = AstBuilder::new();
        let m = b.enum_member("A");
        let e = b.enum_declaration("E", true, vec![m]);
        let i = b.interface_declaration("I", vec![]);
        let ns = b.namespace("N", vec![e, i]);
        let sf = b.source_file("t.ts", vec![ns]);
        let ast = b.finish(sf);
        assert_eq!(classify(&ast, ns), ModuleInstanceState::ConstEnumOnly);
    }

    #[test]
    fn const_enum_then_variable_upgrades() {
        let mut b = AstBuilder::new();
        let m = b.enum_member("A");
        let e = b.enum_declaration("E", true, vec![m]);
        let d = b.variable_declaration("x", false);
        let s = b.variable_statement(tsbind_ast::NodeFlags::NONE, vec![d]);
        let ns = b.namespace("N", vec![e, s]);
        let sf = b.source_file("t.ts", vec![ns]);
        let ast = b.finish(sf);
        assert_eq!(classify(&ast, ns), ModuleInstanceState::Instantiated);
    }

    #[test]
    fn non_instantiated_inner_namespace_stays_erasable() {
        let mut b = AstBuilder::new();
        let i = b.interface_declaration("I", vec![]);
        let inner = b.namespace("Inner", vec![i]);
        let outer = b.namespace("Outer", vec![inner]);
        let sf = b.source_file("t.ts", vec![outer]);
        let ast = b.finish(sf);
        assert_eq!(classify(&ast, outer), ModuleInstanceState::NonInstantiated);
    }

    #[test]
    fn ambient_statements_do_not_instantiate() {
        let mut b = AstBuilder::new();
        let d = b.variable_declaration("x", false);
        let s = b.variable_statement(tsbind_ast::NodeFlags::NONE, vec![d]);
        b.ambient(s);
        let ns = b.namespace("N", vec![s]);
        let sf = b.source_file("t.ts", vec![ns]);
        let ast = b.finish(sf);
        assert_eq!(classify(&ast, ns), ModuleInstanceState::NonInstantiated);
    }

    #[test]
    fn instantiated_short_circuits_nested_modules() {
        let mut b = AstBuilder::new();
        let d = b.variable_declaration("x", false);
        let s = b.variable_statement(tsbind_ast::NodeFlags::NONE, vec![d]);
        let skipped: Vec<NodeId> = (0..8)
            .map(|n| {
                let i = b.interface_declaration("I", vec![]);
                b.namespace(&format!("Skipped{}", n), vec![i])
            })
            .collect();
        let mut statements = vec![s];
        statements.extend(skipped.iter().copied());
        let ns = b.namespace("N", statements);
        let sf = b.source_file("t.ts", vec![ns]);
        let ast = b.finish(sf);

        let mut cache = FxHashMap::default();
        assert_eq!(
            module_instance_state(&ast, ns, &mut cache),
            ModuleInstanceState::Instantiated
        );
        // The walk stopped at the variable statement, so none of the
        // trailing namespaces were classified.
        assert_eq!(cache.len(), 1);
        for module in skipped {
            assert!(!cache.contains_key(&module));
        }
    }

    #[test]
    fn classification_is_memoized() {
        let mut b = AstBuilder::new();
        let i = b.interface_declaration("I", vec![]);
        let inner = b.namespace("Inner", vec![i]);
        let outer = b.namespace("Outer", vec![inner]);
        let sf = b.source_file("t.ts", vec![outer]);
        let ast = b.finish(sf);

        let mut cache = FxHashMap::default();
        module_instance_state(&ast, outer, &mut cache);
        assert_eq!(cache.get(&inner), Some(&ModuleInstanceState::NonInstantiated));
        assert_eq!(
            module_instance_state(&ast, inner, &mut cache),
            ModuleInstanceState::NonInstantiated
        );
        assert_eq!(cache.len(), 2);
    }
}
