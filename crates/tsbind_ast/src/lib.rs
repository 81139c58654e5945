//! tsbind_ast: The syntax tree the binder consumes.
//!
//! Nodes live in an index-addressed arena (`Ast`) and reference each other
//! by `NodeId`, never by pointer. A parsed tree is immutable once built:
//! binding only reads it, and all binder output (symbols, diagnostics,
//! instantiation states) is keyed by `NodeId` on the side.
//!
//! There is no parser here; an `AstBuilder` constructs trees
//! programmatically, standing in for the external parser that normally
//! supplies them.

pub mod builder;
pub mod node;
pub mod syntax_kind;
pub mod types;

pub use builder::AstBuilder;
pub use node::{Ast, Node, NodeData, NodeKind};
pub use syntax_kind::SyntaxKind;
pub use types::{ModifierFlags, NodeFlags, NodeId, SymbolFlags, SymbolId};
