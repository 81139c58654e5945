//! Node definitions and the index-addressed tree arena.
//!
//! Children are referenced by `NodeId` into the owning `Ast`. A container's
//! exports table and the symbol graph can both point at the same node
//! without any shared-ownership plumbing.

use crate::syntax_kind::SyntaxKind;
use crate::types::{ModifierFlags, NodeFlags, NodeId};
use tsbind_core::intern::{InternedString, StringInterner};
use tsbind_core::text::TextSpan;

/// Data common to every node.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub id: NodeId,
    pub kind: SyntaxKind,
    pub span: TextSpan,
    pub flags: NodeFlags,
    pub modifier_flags: ModifierFlags,
}

/// A declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier {
    pub text: InternedString,
}

/// One node in the tree: common data plus a kind-specific payload.
#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    pub kind: NodeKind,
}

/// Kind-specific node payloads.
#[derive(Debug, Clone)]
pub enum NodeKind {
    SourceFile(SourceFile),
    Block(Block),
    VariableStatement(VariableStatement),
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(FunctionDeclaration),
    Parameter(Parameter),
    ClassDeclaration(ClassDeclaration),
    PropertyDeclaration(PropertyDeclaration),
    MethodDeclaration(MethodDeclaration),
    InterfaceDeclaration(InterfaceDeclaration),
    PropertySignature(PropertySignature),
    MethodSignature(MethodSignature),
    TypeAliasDeclaration(TypeAliasDeclaration),
    EnumDeclaration(EnumDeclaration),
    EnumMember(EnumMember),
    ModuleDeclaration(ModuleDeclaration),
    ModuleBlock(ModuleBlock),
    ImportDeclaration(ImportDeclaration),
    ImportSpecifier(ImportSpecifier),
    ExportAssignment(ExportAssignment),
    ExpressionStatement(ExpressionStatement),
    EmptyStatement,
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub statements: Vec<NodeId>,
    pub file_name: String,
    pub is_declaration_file: bool,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub statements: Vec<NodeId>,
}

/// A `var`/`let`/`const` statement; the list flavor is carried in
/// `NodeFlags` on the statement node.
#[derive(Debug, Clone)]
pub struct VariableStatement {
    pub declarations: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub name: Identifier,
    pub has_initializer: bool,
}

/// A function declaration. `body: None` is an overload signature.
#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
    pub name: Identifier,
    pub parameters: Vec<NodeId>,
    pub body: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: Identifier,
}

#[derive(Debug, Clone)]
pub struct ClassDeclaration {
    pub name: Identifier,
    pub members: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct PropertyDeclaration {
    pub name: Identifier,
}

#[derive(Debug, Clone)]
pub struct MethodDeclaration {
    pub name: Identifier,
    pub parameters: Vec<NodeId>,
    pub body: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct InterfaceDeclaration {
    pub name: Identifier,
    pub members: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct PropertySignature {
    pub name: Identifier,
}

#[derive(Debug, Clone)]
pub struct MethodSignature {
    pub name: Identifier,
}

#[derive(Debug, Clone)]
pub struct TypeAliasDeclaration {
    pub name: Identifier,
}

/// An enum declaration; `const enum` carries `ModifierFlags::CONST`.
#[derive(Debug, Clone)]
pub struct EnumDeclaration {
    pub name: Identifier,
    pub members: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct EnumMember {
    pub name: Identifier,
}

/// A module or namespace declaration. The body is either a `ModuleBlock`
/// or, for dotted `namespace A.B` shorthand, a nested `ModuleDeclaration`.
/// An ambient shorthand (`declare module "m";`) has no body.
#[derive(Debug, Clone)]
pub struct ModuleDeclaration {
    pub name: Identifier,
    pub body: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ModuleBlock {
    pub statements: Vec<NodeId>,
}

/// An import declaration. Each binding becomes an alias symbol; a
/// type-only import is fully erasable at emit.
#[derive(Debug, Clone)]
pub struct ImportDeclaration {
    pub module_specifier: InternedString,
    pub default_name: Option<Identifier>,
    pub namespace_name: Option<Identifier>,
    pub named_bindings: Vec<NodeId>,
    pub is_type_only: bool,
}

#[derive(Debug, Clone)]
pub struct ImportSpecifier {
    pub name: Identifier,
}

/// `export =` or `export default <expression>`.
#[derive(Debug, Clone)]
pub struct ExportAssignment {
    pub is_export_equals: bool,
}

/// An opaque executable statement. Binding does not look inside it; the
/// instantiation classifier treats it as value-producing.
#[derive(Debug, Clone)]
pub struct ExpressionStatement;

/// The tree arena: all nodes for one source unit, addressed by `NodeId`,
/// plus the interner its identifiers were created with. Immutable after
/// construction.
#[derive(Debug)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
    interner: StringInterner,
}

impl Ast {
    pub(crate) fn new(nodes: Vec<Node>, root: NodeId, interner: StringInterner) -> Self {
        Self {
            nodes,
            root,
            interner,
        }
    }

    /// The source file node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()].data
    }

    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.nodes[id.index()].data.kind
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The declared name of a node, if its kind has one.
    pub fn name_of(&self, id: NodeId) -> Option<InternedString> {
        let ident = match &self.node(id).kind {
            NodeKind::VariableDeclaration(n) => n.name,
            NodeKind::FunctionDeclaration(n) => n.name,
            NodeKind::Parameter(n) => n.name,
            NodeKind::ClassDeclaration(n) => n.name,
            NodeKind::PropertyDeclaration(n) => n.name,
            NodeKind::MethodDeclaration(n) => n.name,
            NodeKind::InterfaceDeclaration(n) => n.name,
            NodeKind::PropertySignature(n) => n.name,
            NodeKind::MethodSignature(n) => n.name,
            NodeKind::TypeAliasDeclaration(n) => n.name,
            NodeKind::EnumDeclaration(n) => n.name,
            NodeKind::EnumMember(n) => n.name,
            NodeKind::ModuleDeclaration(n) => n.name,
            NodeKind::ImportSpecifier(n) => n.name,
            _ => return None,
        };
        Some(ident.text)
    }

    /// The declared name of a node as source text.
    pub fn name_text_of(&self, id: NodeId) -> Option<&str> {
        self.name_of(id).map(|name| self.interner.resolve(name))
    }

    /// The direct statement list of a statement-owning container
    /// (source file, block, module block).
    pub fn statements_of(&self, id: NodeId) -> Option<&[NodeId]> {
        match &self.node(id).kind {
            NodeKind::SourceFile(n) => Some(&n.statements),
            NodeKind::Block(n) => Some(&n.statements),
            NodeKind::ModuleBlock(n) => Some(&n.statements),
            _ => None,
        }
    }

    /// Whether a declaration is in an ambient (`declare`) context.
    pub fn is_ambient(&self, id: NodeId) -> bool {
        self.data(id).modifier_flags.contains(ModifierFlags::AMBIENT)
    }
}
