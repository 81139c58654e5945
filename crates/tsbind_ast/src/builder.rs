//! Programmatic tree construction.
//!
//! Stands in for the external parser: hosts and tests assemble trees with
//! an `AstBuilder`, then `finish` seals them into an immutable `Ast`.
//! Nodes are given synthetic one-byte spans in creation order, so creation
//! order doubles as source order unless a span is set explicitly.

use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use crate::types::{ModifierFlags, NodeFlags, NodeId};
use tsbind_core::intern::{InternedString, StringInterner};
use tsbind_core::text::TextSpan;

pub struct AstBuilder {
    nodes: Vec<Node>,
    interner: StringInterner,
    next_pos: u32,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            interner: StringInterner::new(),
            next_pos: 0,
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn intern(&self, text: &str) -> InternedString {
        self.interner.intern(text)
    }

    fn ident(&self, text: &str) -> Identifier {
        Identifier {
            text: self.interner.intern(text),
        }
    }

    fn alloc(&mut self, kind: SyntaxKind, payload: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let span = TextSpan::new(self.next_pos, 1);
        self.next_pos += 1;
        self.nodes.push(Node {
            data: NodeData {
                id,
                kind,
                span,
                flags: NodeFlags::NONE,
                modifier_flags: ModifierFlags::NONE,
            },
            kind: payload,
        });
        id
    }

    // ------------------------------------------------------------------
    // Statements and declarations
    // ------------------------------------------------------------------

    pub fn variable_declaration(&mut self, name: &str, has_initializer: bool) -> NodeId {
        let name = self.ident(name);
        self.alloc(
            SyntaxKind::VariableDeclaration,
            NodeKind::VariableDeclaration(VariableDeclaration {
                name,
                has_initializer,
            }),
        )
    }

    /// A variable statement; pass `NodeFlags::LET`, `NodeFlags::CONST`, or
    /// `NodeFlags::NONE` for `var`.
    pub fn variable_statement(&mut self, flags: NodeFlags, declarations: Vec<NodeId>) -> NodeId {
        let id = self.alloc(
            SyntaxKind::VariableStatement,
            NodeKind::VariableStatement(VariableStatement { declarations }),
        );
        self.add_flags(id, flags);
        id
    }

    pub fn parameter(&mut self, name: &str) -> NodeId {
        let name = self.ident(name);
        self.alloc(SyntaxKind::Parameter, NodeKind::Parameter(Parameter { name }))
    }

    pub fn function_declaration(
        &mut self,
        name: &str,
        parameters: Vec<NodeId>,
        body: Option<NodeId>,
    ) -> NodeId {
        let name = self.ident(name);
        self.alloc(
            SyntaxKind::FunctionDeclaration,
            NodeKind::FunctionDeclaration(FunctionDeclaration {
                name,
                parameters,
                body,
            }),
        )
    }

    pub fn block(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.alloc(SyntaxKind::Block, NodeKind::Block(Block { statements }))
    }

    pub fn class_declaration(&mut self, name: &str, members: Vec<NodeId>) -> NodeId {
        let name = self.ident(name);
        self.alloc(
            SyntaxKind::ClassDeclaration,
            NodeKind::ClassDeclaration(ClassDeclaration { name, members }),
        )
    }

    pub fn property_declaration(&mut self, name: &str) -> NodeId {
        let name = self.ident(name);
        self.alloc(
            SyntaxKind::PropertyDeclaration,
            NodeKind::PropertyDeclaration(PropertyDeclaration { name }),
        )
    }

    pub fn method_declaration(
        &mut self,
        name: &str,
        parameters: Vec<NodeId>,
        body: Option<NodeId>,
    ) -> NodeId {
        let name = self.ident(name);
        self.alloc(
            SyntaxKind::MethodDeclaration,
            NodeKind::MethodDeclaration(MethodDeclaration {
                name,
                parameters,
                body,
            }),
        )
    }

    pub fn interface_declaration(&mut self, name: &str, members: Vec<NodeId>) -> NodeId {
        let name = self.ident(name);
        self.alloc(
            SyntaxKind::InterfaceDeclaration,
            NodeKind::InterfaceDeclaration(InterfaceDeclaration { name, members }),
        )
    }

    pub fn property_signature(&mut self, name: &str) -> NodeId {
        let name = self.ident(name);
        self.alloc(
            SyntaxKind::PropertySignature,
            NodeKind::PropertySignature(PropertySignature { name }),
        )
    }

    pub fn method_signature(&mut self, name: &str) -> NodeId {
        let name = self.ident(name);
        self.alloc(
            SyntaxKind::MethodSignature,
            NodeKind::MethodSignature(MethodSignature { name }),
        )
    }

    pub fn type_alias_declaration(&mut self, name: &str) -> NodeId {
        let name = self.ident(name);
        self.alloc(
            SyntaxKind::TypeAliasDeclaration,
            NodeKind::TypeAliasDeclaration(TypeAliasDeclaration { name }),
        )
    }

    pub fn enum_member(&mut self, name: &str) -> NodeId {
        let name = self.ident(name);
        self.alloc(SyntaxKind::EnumMember, NodeKind::EnumMember(EnumMember { name }))
    }

    pub fn enum_declaration(&mut self, name: &str, is_const: bool, members: Vec<NodeId>) -> NodeId {
        let name = self.ident(name);
        let id = self.alloc(
            SyntaxKind::EnumDeclaration,
            NodeKind::EnumDeclaration(EnumDeclaration { name, members }),
        );
        if is_const {
            self.add_modifiers(id, ModifierFlags::CONST);
        }
        id
    }

    pub fn module_block(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.alloc(
            SyntaxKind::ModuleBlock,
            NodeKind::ModuleBlock(ModuleBlock { statements }),
        )
    }

    pub fn module_declaration(&mut self, name: &str, body: Option<NodeId>) -> NodeId {
        let name = self.ident(name);
        let id = self.alloc(
            SyntaxKind::ModuleDeclaration,
            NodeKind::ModuleDeclaration(ModuleDeclaration { name, body }),
        );
        self.add_flags(id, NodeFlags::NAMESPACE);
        // Dotted shorthand: mark the inner segment.
        if let Some(body) = body {
            if self.nodes[body.index()].data.kind == SyntaxKind::ModuleDeclaration {
                self.add_flags(body, NodeFlags::NESTED_NAMESPACE);
            }
        }
        id
    }

    /// `namespace <name> { <statements> }` in one step.
    pub fn namespace(&mut self, name: &str, statements: Vec<NodeId>) -> NodeId {
        let block = self.module_block(statements);
        self.module_declaration(name, Some(block))
    }

    pub fn import_specifier(&mut self, name: &str) -> NodeId {
        let name = self.ident(name);
        self.alloc(
            SyntaxKind::ImportSpecifier,
            NodeKind::ImportSpecifier(ImportSpecifier { name }),
        )
    }

    pub fn import_declaration(
        &mut self,
        module_specifier: &str,
        default_name: Option<&str>,
        namespace_name: Option<&str>,
        named_bindings: Vec<NodeId>,
        is_type_only: bool,
    ) -> NodeId {
        let module_specifier = self.interner.intern(module_specifier);
        let default_name = default_name.map(|n| self.ident(n));
        let namespace_name = namespace_name.map(|n| self.ident(n));
        self.alloc(
            SyntaxKind::ImportDeclaration,
            NodeKind::ImportDeclaration(ImportDeclaration {
                module_specifier,
                default_name,
                namespace_name,
                named_bindings,
                is_type_only,
            }),
        )
    }

    pub fn export_assignment(&mut self, is_export_equals: bool) -> NodeId {
        self.alloc(
            SyntaxKind::ExportAssignment,
            NodeKind::ExportAssignment(ExportAssignment { is_export_equals }),
        )
    }

    pub fn expression_statement(&mut self) -> NodeId {
        self.alloc(
            SyntaxKind::ExpressionStatement,
            NodeKind::ExpressionStatement(ExpressionStatement),
        )
    }

    pub fn empty_statement(&mut self) -> NodeId {
        self.alloc(SyntaxKind::EmptyStatement, NodeKind::EmptyStatement)
    }

    pub fn source_file(&mut self, file_name: &str, statements: Vec<NodeId>) -> NodeId {
        self.alloc(
            SyntaxKind::SourceFile,
            NodeKind::SourceFile(SourceFile {
                statements,
                file_name: file_name.to_string(),
                is_declaration_file: file_name.ends_with(".d.ts"),
            }),
        )
    }

    // ------------------------------------------------------------------
    // Node adjustments
    // ------------------------------------------------------------------

    pub fn add_modifiers(&mut self, id: NodeId, modifiers: ModifierFlags) {
        self.nodes[id.index()].data.modifier_flags |= modifiers;
    }

    pub fn add_flags(&mut self, id: NodeId, flags: NodeFlags) {
        self.nodes[id.index()].data.flags |= flags;
    }

    /// Mark a declaration exported. Returns the id for chaining into
    /// statement lists.
    pub fn exported(&mut self, id: NodeId) -> NodeId {
        self.add_modifiers(id, ModifierFlags::EXPORT);
        id
    }

    /// Mark a declaration ambient (`declare`).
    pub fn ambient(&mut self, id: NodeId) -> NodeId {
        self.add_modifiers(id, ModifierFlags::AMBIENT);
        id
    }

    /// Override the synthetic span, e.g. to model a source order different
    /// from construction order.
    pub fn set_span(&mut self, id: NodeId, span: TextSpan) {
        self.nodes[id.index()].data.span = span;
    }

    /// Seal the tree. The root must be a source file node.
    pub fn finish(self, root: NodeId) -> Ast {
        debug_assert_eq!(self.nodes[root.index()].data.kind, SyntaxKind::SourceFile);
        Ast::new(self.nodes, root, self.interner)
    }
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_source_file() {
        let mut b = AstBuilder::new();
        let decl = b.variable_declaration("x", true);
        let stmt = b.variable_statement(NodeFlags::CONST, vec![decl]);
        let sf = b.source_file("test.ts", vec![stmt]);
        let ast = b.finish(sf);

        assert_eq!(ast.kind(sf), SyntaxKind::SourceFile);
        assert_eq!(ast.statements_of(sf), Some(&[stmt][..]));
        assert_eq!(ast.name_text_of(decl), Some("x"));
        assert!(ast.data(stmt).flags.contains(NodeFlags::CONST));
    }

    #[test]
    fn dotted_namespace_marks_the_inner_segment() {
        let mut b = AstBuilder::new();
        let inner = b.namespace("B", vec![]);
        let outer = b.module_declaration("A", Some(inner));
        let sf = b.source_file("test.ts", vec![outer]);
        let ast = b.finish(sf);

        assert!(ast.data(inner).flags.contains(NodeFlags::NESTED_NAMESPACE));
        assert!(!ast.data(outer).flags.contains(NodeFlags::NESTED_NAMESPACE));
    }

    #[test]
    fn spans_follow_creation_order() {
        let mut b = AstBuilder::new();
        let a = b.type_alias_declaration("A");
        let c = b.type_alias_declaration("B");
        let sf = b.source_file("test.ts", vec![a, c]);
        let ast = b.finish(sf);
        assert!(ast.data(a).span.start < ast.data(c).span.start);
    }

    #[test]
    fn namespace_shorthand_wraps_a_block() {
        let mut b = AstBuilder::new();
        let ns = b.namespace("N", vec![]);
        let sf = b.source_file("test.ts", vec![ns]);
        let ast = b.finish(sf);

        assert!(ast.data(ns).flags.contains(NodeFlags::NAMESPACE));
        match &ast.node(ns).kind {
            NodeKind::ModuleDeclaration(m) => {
                let body = m.body.expect("namespace body");
                assert_eq!(ast.kind(body), SyntaxKind::ModuleBlock);
            }
            other => panic!("expected module declaration, got {:?}", other),
        }
    }
}
