//! tsbind_binder: Symbol table construction for one source file.
//!
//! The binder walks a parsed tree and produces a `BoundFile`: every declared
//! name resolved to a merged symbol, per-scope locals/exports/members tables,
//! binder diagnostics, and the module instantiation classification the
//! emitter uses to decide which namespaces need a runtime object.
//!
//! Binding is total: conflicts are reported as diagnostics and merged
//! best-effort, never surfaced as errors from `bind` itself.

mod binder;
mod diagnostics;
mod instance_state;
mod merge;
mod scope;
mod symbol;

pub use binder::{Binder, BinderOptions, BoundFile};
pub use diagnostics::{BindDiagnostic, BindDiagnosticKind};
pub use instance_state::{module_instance_state, ModuleInstanceState};
pub use merge::{merge_declaration, DeclarationEntry};
pub use symbol::{Symbol, SymbolArena, SymbolTable};
