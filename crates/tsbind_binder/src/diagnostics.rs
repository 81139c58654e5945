//! Binder diagnostics.
//!
//! The binder never aborts on a conflict; it records one of these and
//! keeps merging. Each diagnostic carries the offending nodes so a host
//! can point at every declaration involved, and realizes into a
//! `tsbind_diagnostics::Diagnostic` on demand.

use tsbind_ast::{Ast, NodeId};
use tsbind_diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage};

/// Classification of a binding conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindDiagnosticKind {
    /// Two declarations of one name whose meanings cannot coexist.
    DuplicateIdentifier,
    /// A merge the compatibility rules reject outright, e.g. a const enum
    /// with a regular enum.
    InvalidMerge,
    /// Two distinct symbols registered under one export name.
    AmbiguousExport,
}

/// One conflict found while binding.
#[derive(Debug, Clone)]
pub struct BindDiagnostic {
    pub kind: BindDiagnosticKind,
    pub message: &'static DiagnosticMessage,
    pub category: DiagnosticCategory,
    pub args: Vec<String>,
    /// The declarations involved, newest first.
    pub nodes: Vec<NodeId>,
}

impl BindDiagnostic {
    pub fn new(
        kind: BindDiagnosticKind,
        message: &'static DiagnosticMessage,
        args: Vec<String>,
        nodes: Vec<NodeId>,
    ) -> Self {
        Self {
            kind,
            message,
            category: message.category,
            args,
            nodes,
        }
    }

    pub fn with_category(mut self, category: DiagnosticCategory) -> Self {
        self.category = category;
        self
    }

    pub fn code(&self) -> u32 {
        self.message.code
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// Primary node, the declaration that triggered the report.
    pub fn primary_node(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Realize into a located diagnostic against the given tree.
    pub fn to_diagnostic(&self, ast: &Ast, file_name: &str) -> Diagnostic {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let diagnostic = match self.primary_node() {
            Some(node) => Diagnostic::with_location(
                file_name.to_string(),
                ast.data(node).span,
                self.message,
                &args,
            ),
            None => Diagnostic::new(self.message, &args),
        };
        diagnostic.with_category(self.category)
    }
}
