//! Scope frames for the binding walk.
//!
//! The binder keeps a stack of frames, one per open container or block.
//! Frames that belong to a container symbol (a module, function, class,
//! interface, or enum) borrow that symbol's tables for the duration of the
//! visit, so a later declaration of the same container keeps adding to the
//! tables the first one started.

use crate::symbol::SymbolTable;
use tsbind_ast::SymbolId;

/// What kind of scope a frame represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    SourceFile,
    Module,
    Function,
    Block,
    Class,
    Interface,
    Enum,
}

impl ScopeKind {
    /// Whether `var` and function declarations hoist to this frame.
    pub(crate) fn is_hoist_target(self) -> bool {
        matches!(
            self,
            ScopeKind::SourceFile | ScopeKind::Module | ScopeKind::Function
        )
    }
}

/// One open scope.
#[derive(Debug)]
pub(crate) struct ScopeFrame {
    pub(crate) kind: ScopeKind,
    /// The symbol whose tables this frame holds, absent for the source file
    /// and plain blocks.
    pub(crate) symbol: Option<SymbolId>,
    pub(crate) locals: SymbolTable,
    pub(crate) exports: Option<SymbolTable>,
    pub(crate) members: Option<SymbolTable>,
}

impl ScopeFrame {
    pub(crate) fn new(kind: ScopeKind, symbol: Option<SymbolId>) -> Self {
        Self {
            kind,
            symbol,
            locals: SymbolTable::new(),
            exports: None,
            members: None,
        }
    }
}
