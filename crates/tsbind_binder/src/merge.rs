//! Declaration merging.
//!
//! Each declaration contributes an includes/excludes flag pair. Merging a
//! declaration into an existing symbol is a conflict when the symbol's
//! accumulated flags intersect the declaration's excludes, or the
//! declaration's includes intersect the symbol's accumulated excludes.
//! Checking both directions keeps the outcome independent of the order
//! declarations are seen in.
//!
//! Conflicts are reported and then merged anyway, so downstream phases see
//! one symbol per name regardless of how broken the input is.

use crate::binder::BinderOptions;
use crate::diagnostics::{BindDiagnostic, BindDiagnosticKind};
use crate::symbol::{Symbol, SymbolArena, SymbolTable};
use tsbind_ast::{Ast, NodeId, NodeKind, SymbolFlags};
use tsbind_core::intern::InternedString;
use tsbind_diagnostics::{messages, DiagnosticCategory};

/// One declaration ready to merge: the node, its name, and the meanings it
/// contributes and forbids.
#[derive(Debug, Clone, Copy)]
pub struct DeclarationEntry {
    pub node: NodeId,
    pub name: InternedString,
    pub includes: SymbolFlags,
    pub excludes: SymbolFlags,
}

/// Merge a declaration into the given table, creating the symbol on first
/// sight and folding into the existing symbol otherwise. Conflicts append
/// to `diagnostics`; the returned symbol is valid either way.
pub fn merge_declaration(
    arena: &mut SymbolArena,
    table: &mut SymbolTable,
    ast: &Ast,
    entry: DeclarationEntry,
    options: &BinderOptions,
    diagnostics: &mut Vec<BindDiagnostic>,
) -> tsbind_ast::SymbolId {
    let symbol_id = match table.get(entry.name) {
        Some(existing) => {
            if let Some(symbol) = arena.get(existing) {
                if let Some(diagnostic) = check_conflict(ast, symbol, &entry, options) {
                    diagnostics.push(diagnostic);
                }
            }
            existing
        }
        None => {
            let id = arena.alloc(entry.name);
            table.set(entry.name, id);
            id
        }
    };
    if let Some(symbol) = arena.get_mut(symbol_id) {
        add_declaration(symbol, ast, &entry, options);
    }
    symbol_id
}

fn check_conflict(
    ast: &Ast,
    existing: &Symbol,
    entry: &DeclarationEntry,
    options: &BinderOptions,
) -> Option<BindDiagnostic> {
    let name = ast.interner().resolve(entry.name).to_string();
    let mut nodes = vec![entry.node];
    nodes.extend(existing.declarations.iter().copied());

    let forbidden = existing.flags.intersects(entry.excludes)
        || entry.includes.intersects(existing.excludes);
    if forbidden {
        // Enum-vs-enum mismatches get the dedicated merge message; a
        // block-scoped name in the mix gets the redeclaration message,
        // downgradable by the host; everything else is a plain duplicate.
        if entry.includes.intersects(SymbolFlags::ENUM)
            && existing.flags.intersects(SymbolFlags::ENUM)
        {
            return Some(BindDiagnostic::new(
                BindDiagnosticKind::InvalidMerge,
                &messages::ENUM_DECLARATIONS_CAN_ONLY_MERGE_WITH_NAMESPACE_OR_OTHER_ENUM_DECLARATIONS,
                Vec::new(),
                nodes,
            ));
        }
        if entry.includes.intersects(SymbolFlags::BLOCK_SCOPED_VARIABLE)
            || existing.flags.intersects(SymbolFlags::BLOCK_SCOPED_VARIABLE)
        {
            let category = if options.strict_binding_conflicts {
                DiagnosticCategory::Error
            } else {
                DiagnosticCategory::Warning
            };
            return Some(
                BindDiagnostic::new(
                    BindDiagnosticKind::DuplicateIdentifier,
                    &messages::CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE_0,
                    vec![name],
                    nodes,
                )
                .with_category(category),
            );
        }
        return Some(BindDiagnostic::new(
            BindDiagnosticKind::DuplicateIdentifier,
            &messages::DUPLICATE_IDENTIFIER_0,
            vec![name],
            nodes,
        ));
    }

    // Function-with-function passes the flag check so overload signatures
    // merge silently, but two implementations of one name are still a
    // conflict.
    if entry.includes.intersects(SymbolFlags::FUNCTION | SymbolFlags::METHOD)
        && has_body(ast, entry.node)
        && existing.declarations.iter().any(|&d| has_body(ast, d))
    {
        return Some(BindDiagnostic::new(
            BindDiagnosticKind::DuplicateIdentifier,
            &messages::DUPLICATE_FUNCTION_IMPLEMENTATION,
            Vec::new(),
            nodes,
        ));
    }

    None
}

fn add_declaration(symbol: &mut Symbol, ast: &Ast, entry: &DeclarationEntry, options: &BinderOptions) {
    symbol.flags |= entry.includes;
    symbol.excludes |= entry.excludes;
    symbol.declarations.push(entry.node);

    // Ambient declarations assert existence without defining runtime
    // code, so they never become the value declaration; in a fully
    // ambient file nothing has a runtime shape.
    if options.ambient_context
        || ast.is_ambient(entry.node)
        || !entry.includes.intersects(SymbolFlags::VALUE)
    {
        return;
    }
    let precedence = value_precedence(ast, entry.node);
    if precedence == 0 {
        return;
    }
    match symbol.value_declaration {
        None => symbol.value_declaration = Some(entry.node),
        Some(current) => {
            let current_precedence = value_precedence(ast, current);
            let replace = precedence > current_precedence
                || (precedence == current_precedence
                    && ast.data(entry.node).span.start < ast.data(current).span.start);
            if replace {
                symbol.value_declaration = Some(entry.node);
            }
        }
    }
}

/// Rank of a declaration as the symbol's runtime definition. Zero means the
/// declaration never defines a runtime shape (overload signatures included).
fn value_precedence(ast: &Ast, node: NodeId) -> u8 {
    match &ast.node(node).kind {
        NodeKind::ClassDeclaration(_) => 5,
        NodeKind::FunctionDeclaration(f) => {
            if f.body.is_some() {
                4
            } else {
                0
            }
        }
        NodeKind::MethodDeclaration(m) => {
            if m.body.is_some() {
                4
            } else {
                0
            }
        }
        NodeKind::EnumDeclaration(_) => 3,
        NodeKind::ModuleDeclaration(_) => 2,
        NodeKind::VariableDeclaration(_)
        | NodeKind::Parameter(_)
        | NodeKind::PropertyDeclaration(_)
        | NodeKind::EnumMember(_) => 1,
        _ => 0,
    }
}

fn has_body(ast: &Ast, node: NodeId) -> bool {
    match &ast.node(node).kind {
        NodeKind::FunctionDeclaration(f) => f.body.is_some(),
        NodeKind::MethodDeclaration(m) => m.body.is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsbind_ast::AstBuilder;

    fn entry(ast: &Ast, node: NodeId, includes: SymbolFlags, excludes: SymbolFlags) -> DeclarationEntry {
        DeclarationEntry {
            node,
            name: ast.name_of(node).unwrap(),
            includes,
            excludes,
        }
    }

    fn merge_all(
        ast: &Ast,
        entries: &[DeclarationEntry],
    ) -> (SymbolArena, SymbolTable, Vec<BindDiagnostic>) {
        let mut arena = SymbolArena::new();
        let mut table = SymbolTable::new();
        let mut diagnostics = Vec::new();
        let options = BinderOptions::default();
        for &e in entries {
            merge_declaration(&mut arena, &mut table, ast, e, &options, &mut diagnostics);
        }
        (arena, table, diagnostics)
    }

    #[test]
    fn interface_interface_merges_silently() {
        let mut b = AstBuilder::new();
        let i1 = b.interface_declaration("Box", vec![]);
        let i2 = b.interface_declaration("Box", vec![]);
        let sf = b.source_file("t.ts", vec![i1, i2]);
        let ast = b.finish(sf);

        let e1 = entry(&ast, i1, SymbolFlags::INTERFACE, SymbolFlags::INTERFACE_EXCLUDES);
        let e2 = entry(&ast, i2, SymbolFlags::INTERFACE, SymbolFlags::INTERFACE_EXCLUDES);
        let (arena, table, diagnostics) = merge_all(&ast, &[e1, e2]);

        assert!(diagnostics.is_empty());
        assert_eq!(table.len(), 1);
        let symbol = arena.get(table.get(e1.name).unwrap()).unwrap();
        assert_eq!(symbol.declarations.len(), 2);
        assert!(symbol.value_declaration.is_none());
    }

    #[test]
    fn class_class_conflicts_but_still_merges() {
        let mut b = AstBuilder::new();
        let c1 = b.class_declaration("C", vec![]);
        let c2 = b.class_declaration("C", vec![]);
        let sf = b.source_file("t.ts", vec![c1, c2]);
        let ast = b.finish(sf);

        let e1 = entry(&ast, c1, SymbolFlags::CLASS, SymbolFlags::CLASS_EXCLUDES);
        let e2 = entry(&ast, c2, SymbolFlags::CLASS, SymbolFlags::CLASS_EXCLUDES);
        let (arena, table, diagnostics) = merge_all(&ast, &[e1, e2]);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, BindDiagnosticKind::DuplicateIdentifier);
        assert_eq!(diagnostics[0].code(), 2300);
        let symbol = arena.get(table.get(e1.name).unwrap()).unwrap();
        assert_eq!(symbol.declarations.len(), 2);
    }

    #[test]
    fn var_var_merges_and_earliest_wins_value_declaration() {
        let mut b = AstBuilder::new();
        let v1 = b.variable_declaration("x", true);
        let v2 = b.variable_declaration("x", true);
        let sf = b.source_file("t.ts", vec![v1, v2]);
        let ast = b.finish(sf);

        let e1 = entry(
            &ast,
            v1,
            SymbolFlags::FUNCTION_SCOPED_VARIABLE,
            SymbolFlags::FUNCTION_SCOPED_VARIABLE_EXCLUDES,
        );
        let e2 = entry(
            &ast,
            v2,
            SymbolFlags::FUNCTION_SCOPED_VARIABLE,
            SymbolFlags::FUNCTION_SCOPED_VARIABLE_EXCLUDES,
        );
        let (arena, table, diagnostics) = merge_all(&ast, &[e2, e1]);

        assert!(diagnostics.is_empty());
        let symbol = arena.get(table.get(e1.name).unwrap()).unwrap();
        assert_eq!(symbol.value_declaration, Some(v1));
    }

    #[test]
    fn overload_signatures_merge_one_implementation_allowed() {
        let mut b = AstBuilder::new();
        let sig1 = b.function_declaration("f", vec![], None);
        let sig2 = b.function_declaration("f", vec![], None);
        let body = b.block(vec![]);
        let implementation = b.function_declaration("f", vec![], Some(body));
        let sf = b.source_file("t.ts", vec![sig1, sig2, implementation]);
        let ast = b.finish(sf);

        let entries: Vec<_> = [sig1, sig2, implementation]
            .iter()
            .map(|&n| entry(&ast, n, SymbolFlags::FUNCTION, SymbolFlags::FUNCTION_EXCLUDES))
            .collect();
        let (arena, table, diagnostics) = merge_all(&ast, &entries);

        assert!(diagnostics.is_empty());
        let symbol = arena.get(table.get(entries[0].name).unwrap()).unwrap();
        assert_eq!(symbol.declarations.len(), 3);
        assert_eq!(symbol.value_declaration, Some(implementation));
    }

    #[test]
    fn two_function_implementations_conflict() {
        let mut b = AstBuilder::new();
        let body1 = b.block(vec![]);
        let f1 = b.function_declaration("f", vec![], Some(body1));
        let body2 = b.block(vec![]);
        let f2 = b.function_declaration("f", vec![], Some(body2));
        let sf = b.source_file("t.ts", vec![f1, f2]);
        let ast = b.finish(sf);

        let e1 = entry(&ast, f1, SymbolFlags::FUNCTION, SymbolFlags::FUNCTION_EXCLUDES);
        let e2 = entry(&ast, f2, SymbolFlags::FUNCTION, SymbolFlags::FUNCTION_EXCLUDES);
        let (_, _, diagnostics) = merge_all(&ast, &[e1, e2]);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), 2393);
    }

    #[test]
    fn const_enum_regular_enum_is_invalid_merge() {
        let mut b = AstBuilder::new();
        let e1 = b.enum_declaration("E", true, vec![]);
        let e2 = b.enum_declaration("E", false, vec![]);
        let sf = b.source_file("t.ts", vec![e1, e2]);
        let ast = b.finish(sf);

        let c = entry(&ast, e1, SymbolFlags::CONST_ENUM, SymbolFlags::CONST_ENUM_EXCLUDES);
        let r = entry(&ast, e2, SymbolFlags::REGULAR_ENUM, SymbolFlags::REGULAR_ENUM_EXCLUDES);
        let (_, _, diagnostics) = merge_all(&ast, &[c, r]);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, BindDiagnosticKind::InvalidMerge);
        assert_eq!(diagnostics[0].code(), 2567);
    }

    #[test]
    fn class_beats_namespace_for_value_declaration() {
        let mut b = AstBuilder::new();
        let ns = b.namespace("Pair", vec![]);
        let class = b.class_declaration("Pair", vec![]);
        let sf = b.source_file("t.ts", vec![ns, class]);
        let ast = b.finish(sf);

        let n = entry(&ast, ns, SymbolFlags::VALUE_MODULE, SymbolFlags::VALUE_MODULE_EXCLUDES);
        let c = entry(&ast, class, SymbolFlags::CLASS, SymbolFlags::CLASS_EXCLUDES);
        let (arena, table, diagnostics) = merge_all(&ast, &[n, c]);

        assert!(diagnostics.is_empty());
        let symbol = arena.get(table.get(n.name).unwrap()).unwrap();
        assert_eq!(symbol.value_declaration, Some(class));
        assert!(symbol.flags.contains(SymbolFlags::CLASS | SymbolFlags::VALUE_MODULE));
    }

    #[test]
    fn sole_ambient_declaration_yields_no_value_declaration() {
        let mut b = AstBuilder::new();
        let class = b.class_declaration("C", vec![]);
        b.ambient(class);
        let sf = b.source_file("t.ts", vec![class]);
        let ast = b.finish(sf);

        let ce = entry(&ast, class, SymbolFlags::CLASS, SymbolFlags::CLASS_EXCLUDES);
        let (arena, table, _) = merge_all(&ast, &[ce]);

        let symbol = arena.get(table.get(ce.name).unwrap()).unwrap();
        assert!(symbol.flags.contains(SymbolFlags::CLASS));
        assert_eq!(symbol.value_declaration, None);
    }

    #[test]
    fn ambient_declaration_never_displaces_a_real_one() {
        let mut b = AstBuilder::new();
        let body = b.block(vec![]);
        let f = b.function_declaration("g", vec![], Some(body));
        let class = b.class_declaration("g", vec![]);
        b.ambient(class);
        let sf = b.source_file("t.ts", vec![f, class]);
        let ast = b.finish(sf);

        let fe = entry(&ast, f, SymbolFlags::FUNCTION, SymbolFlags::FUNCTION_EXCLUDES);
        let ce = entry(&ast, class, SymbolFlags::CLASS, SymbolFlags::CLASS_EXCLUDES);
        let (arena, table, _) = merge_all(&ast, &[fe, ce]);

        let symbol = arena.get(table.get(fe.name).unwrap()).unwrap();
        // Class outranks function, but the class is ambient.
        assert_eq!(symbol.value_declaration, Some(f));
    }

    #[test]
    fn merge_outcome_is_order_independent() {
        let mut b = AstBuilder::new();
        let ns = b.namespace("N", vec![]);
        let body = b.block(vec![]);
        let f = b.function_declaration("N", vec![], Some(body));
        let i = b.interface_declaration("N", vec![]);
        let sf = b.source_file("t.ts", vec![ns, f, i]);
        let ast = b.finish(sf);

        let entries = [
            entry(&ast, ns, SymbolFlags::VALUE_MODULE, SymbolFlags::VALUE_MODULE_EXCLUDES),
            entry(&ast, f, SymbolFlags::FUNCTION, SymbolFlags::FUNCTION_EXCLUDES),
            entry(&ast, i, SymbolFlags::INTERFACE, SymbolFlags::INTERFACE_EXCLUDES),
        ];
        let forward = merge_all(&ast, &entries);
        let mut reversed = entries;
        reversed.reverse();
        let backward = merge_all(&ast, &reversed);

        let sf_sym = |out: &(SymbolArena, SymbolTable, Vec<BindDiagnostic>)| {
            let symbol = out.0.get(out.1.get(entries[0].name).unwrap()).unwrap();
            (
                symbol.flags,
                symbol.excludes,
                symbol.value_declaration,
                {
                    let mut d = symbol.declarations.clone();
                    d.sort();
                    d
                },
            )
        };
        assert_eq!(sf_sym(&forward), sf_sym(&backward));
        assert_eq!(forward.2.len(), backward.2.len());
    }
}
