//! Syntax kinds for the node set the binder operates on.

use std::fmt;

/// The kind of a syntax node. A closed set: the binder's statement and
/// declaration classification is an exhaustive match over these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    SourceFile,
    Block,
    VariableStatement,
    VariableDeclaration,
    FunctionDeclaration,
    Parameter,
    ClassDeclaration,
    PropertyDeclaration,
    MethodDeclaration,
    InterfaceDeclaration,
    PropertySignature,
    MethodSignature,
    TypeAliasDeclaration,
    EnumDeclaration,
    EnumMember,
    ModuleDeclaration,
    ModuleBlock,
    ImportDeclaration,
    ImportSpecifier,
    ExportAssignment,
    ExpressionStatement,
    EmptyStatement,
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
