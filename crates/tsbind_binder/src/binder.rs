//! The binding walk.
//!
//! One pass over the tree: every declaration is merged into the symbol
//! table of the scope it belongs to. `var` and function declarations land
//! in the nearest enclosing function, module, or source file frame;
//! block-scoped declarations land in the innermost frame. Containers
//! (modules, functions, classes, interfaces, enums) carry their tables on
//! their symbol, and a later declaration of a merged container reopens the
//! tables its first declaration started.

use crate::diagnostics::{BindDiagnostic, BindDiagnosticKind};
use crate::instance_state::{module_instance_state, ModuleInstanceState};
use crate::merge::{merge_declaration, DeclarationEntry};
use crate::scope::{ScopeFrame, ScopeKind};
use crate::symbol::{Symbol, SymbolArena, SymbolTable};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use tsbind_ast::{Ast, ModifierFlags, NodeFlags, NodeId, NodeKind, SymbolFlags, SymbolId};
use tsbind_core::intern::InternedString;
use tsbind_diagnostics::{messages, DiagnosticCollection};

/// Host-controlled binding behavior.
#[derive(Debug, Clone)]
pub struct BinderOptions {
    /// Report block-scoped redeclarations as errors rather than warnings.
    pub strict_binding_conflicts: bool,
    /// Treat `const enum` declarations as requiring a runtime object.
    pub preserve_const_enums: bool,
    /// Bind the whole file as ambient: no declaration defines a runtime
    /// shape. Set automatically for declaration files.
    pub ambient_context: bool,
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self {
            strict_binding_conflicts: true,
            preserve_const_enums: false,
            ambient_context: false,
        }
    }
}

/// Which of a frame's tables a declaration lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableTarget {
    Locals,
    Exports,
    Members,
}

/// The result of binding one source file.
#[derive(Debug)]
pub struct BoundFile {
    options: BinderOptions,
    symbols: SymbolArena,
    file_locals: SymbolTable,
    file_exports: SymbolTable,
    node_symbols: FxHashMap<NodeId, SymbolId>,
    diagnostics: Vec<BindDiagnostic>,
    instance_states: RefCell<FxHashMap<NodeId, ModuleInstanceState>>,
}

impl BoundFile {
    pub fn symbols(&self) -> &SymbolArena {
        &self.symbols
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Top-level names of the file.
    pub fn file_locals(&self) -> &SymbolTable {
        &self.file_locals
    }

    /// Names the file exports.
    pub fn file_exports(&self) -> &SymbolTable {
        &self.file_exports
    }

    pub fn diagnostics(&self) -> &[BindDiagnostic] {
        &self.diagnostics
    }

    pub fn options(&self) -> &BinderOptions {
        &self.options
    }

    /// The symbol a declaration node was bound to.
    pub fn symbol_for_node(&self, node: NodeId) -> Option<SymbolId> {
        self.node_symbols.get(&node).copied()
    }

    /// Resolve a top-level name carrying one of the requested meanings.
    pub fn resolve_name(
        &self,
        name: InternedString,
        meaning: SymbolFlags,
    ) -> Option<SymbolId> {
        self.symbols.resolve(&self.file_locals, name, meaning)
    }

    /// Convenience lookup of a top-level name by text.
    pub fn local_by_name(&self, ast: &Ast, text: &str) -> Option<SymbolId> {
        let name = ast.interner().get(text)?;
        self.file_locals.get(name)
    }

    /// Resolve an exported name of a container symbol.
    pub fn resolve_export(
        &self,
        container: SymbolId,
        name: InternedString,
        meaning: SymbolFlags,
    ) -> Option<SymbolId> {
        let exports = self.symbols.get(container)?.exports.as_ref()?;
        self.symbols.resolve(exports, name, meaning)
    }

    /// Resolve a member name of a class or interface symbol.
    pub fn resolve_member(
        &self,
        container: SymbolId,
        name: InternedString,
        meaning: SymbolFlags,
    ) -> Option<SymbolId> {
        let members = self.symbols.get(container)?.members.as_ref()?;
        self.symbols.resolve(members, name, meaning)
    }

    /// Instantiation state of a module declaration. States computed while
    /// binding are reused; anything else is classified on demand.
    pub fn module_instance_state(&self, ast: &Ast, module: NodeId) -> ModuleInstanceState {
        let mut cache = self.instance_states.borrow_mut();
        module_instance_state(ast, module, &mut cache)
    }

    /// Whether a classification means the module needs a runtime object
    /// under the current options.
    pub fn requires_instantiation(&self, state: ModuleInstanceState) -> bool {
        match state {
            ModuleInstanceState::Instantiated => true,
            ModuleInstanceState::ConstEnumOnly => self.options.preserve_const_enums,
            ModuleInstanceState::NonInstantiated => false,
        }
    }

    /// Realize all binder diagnostics against the tree, sorted by position.
    pub fn collect_diagnostics(&self, ast: &Ast) -> DiagnosticCollection {
        let file_name = match &ast.node(ast.root()).kind {
            NodeKind::SourceFile(f) => f.file_name.clone(),
            _ => String::new(),
        };
        let mut collection = DiagnosticCollection::new();
        for diagnostic in &self.diagnostics {
            collection.add(diagnostic.to_diagnostic(ast, &file_name));
        }
        collection.sort();
        collection
    }
}

/// Binds one source file.
pub struct Binder<'a> {
    ast: &'a Ast,
    options: BinderOptions,
    symbols: SymbolArena,
    scopes: Vec<ScopeFrame>,
    diagnostics: Vec<BindDiagnostic>,
    node_symbols: FxHashMap<NodeId, SymbolId>,
    instance_states: FxHashMap<NodeId, ModuleInstanceState>,
}

impl<'a> Binder<'a> {
    pub fn bind(ast: &'a Ast, options: BinderOptions) -> BoundFile {
        let mut binder = Self {
            ast,
            options,
            symbols: SymbolArena::new(),
            scopes: Vec::new(),
            diagnostics: Vec::new(),
            node_symbols: FxHashMap::default(),
            instance_states: FxHashMap::default(),
        };
        binder.bind_source_file();
        binder.finish()
    }

    fn bind_source_file(&mut self) {
        let ast = self.ast;
        let root = ast.root();
        if let NodeKind::SourceFile(file) = &ast.node(root).kind {
            if file.is_declaration_file {
                self.options.ambient_context = true;
            }
        }
        let mut frame = ScopeFrame::new(ScopeKind::SourceFile, None);
        frame.exports = Some(SymbolTable::new());
        self.scopes.push(frame);
        if let Some(statements) = ast.statements_of(root) {
            for &statement in statements {
                self.bind_statement(statement);
            }
        }
    }

    fn finish(mut self) -> BoundFile {
        let (file_locals, file_exports) = match self.scopes.pop() {
            Some(frame) => (frame.locals, frame.exports.unwrap_or_default()),
            None => (SymbolTable::new(), SymbolTable::new()),
        };
        BoundFile {
            options: self.options,
            symbols: self.symbols,
            file_locals,
            file_exports,
            node_symbols: self.node_symbols,
            diagnostics: self.diagnostics,
            instance_states: RefCell::new(self.instance_states),
        }
    }

    // ------------------------------------------------------------------
    // Statement dispatch
    // ------------------------------------------------------------------

    fn bind_statement(&mut self, statement: NodeId) {
        let ast = self.ast;
        match &ast.node(statement).kind {
            NodeKind::VariableStatement(v) => {
                for &declaration in &v.declarations {
                    self.bind_variable_declaration(statement, declaration);
                }
            }
            NodeKind::FunctionDeclaration(_) => self.bind_function_declaration(statement),
            NodeKind::ClassDeclaration(_) => self.bind_class_declaration(statement),
            NodeKind::InterfaceDeclaration(_) => self.bind_interface_declaration(statement),
            NodeKind::TypeAliasDeclaration(_) => self.bind_type_alias_declaration(statement),
            NodeKind::EnumDeclaration(_) => self.bind_enum_declaration(statement),
            NodeKind::ModuleDeclaration(_) => self.bind_module_declaration(statement),
            NodeKind::ImportDeclaration(_) => self.bind_import_declaration(statement),
            NodeKind::Block(b) => {
                let statements = b.statements.clone();
                self.scopes.push(ScopeFrame::new(ScopeKind::Block, None));
                for s in statements {
                    self.bind_statement(s);
                }
                self.scopes.pop();
            }
            NodeKind::ExportAssignment(_)
            | NodeKind::ExpressionStatement(_)
            | NodeKind::EmptyStatement => {}
            _ => {}
        }
    }

    fn bind_variable_declaration(&mut self, statement: NodeId, declaration: NodeId) {
        let ast = self.ast;
        let Some(name) = ast.name_of(declaration) else {
            return;
        };
        let block_scoped = ast
            .data(statement)
            .flags
            .intersects(NodeFlags::BLOCK_SCOPED);
        let (includes, excludes, frame) = if block_scoped {
            (
                SymbolFlags::BLOCK_SCOPED_VARIABLE,
                SymbolFlags::BLOCK_SCOPED_VARIABLE_EXCLUDES,
                self.scopes.len() - 1,
            )
        } else {
            (
                SymbolFlags::FUNCTION_SCOPED_VARIABLE,
                SymbolFlags::FUNCTION_SCOPED_VARIABLE_EXCLUDES,
                self.hoist_frame(),
            )
        };
        let symbol = self.declare(frame, TableTarget::Locals, declaration, name, includes, excludes);
        self.maybe_export(statement, name, symbol);
    }

    fn bind_function_declaration(&mut self, statement: NodeId) {
        let ast = self.ast;
        let NodeKind::FunctionDeclaration(f) = &ast.node(statement).kind else {
            return;
        };
        let name = f.name.text;
        let frame = self.hoist_frame();
        let symbol = self.declare(
            frame,
            TableTarget::Locals,
            statement,
            name,
            SymbolFlags::FUNCTION,
            SymbolFlags::FUNCTION_EXCLUDES,
        );
        self.maybe_export(statement, name, symbol);
        self.bind_callable_body(symbol, &f.parameters, f.body);
    }

    /// Parameters and body statements share the callable's local scope.
    fn bind_callable_body(
        &mut self,
        symbol: SymbolId,
        parameters: &[NodeId],
        body: Option<NodeId>,
    ) {
        let ast = self.ast;
        self.push_container(ScopeKind::Function, symbol);
        for &parameter in parameters {
            if let Some(name) = ast.name_of(parameter) {
                let frame = self.scopes.len() - 1;
                self.declare(
                    frame,
                    TableTarget::Locals,
                    parameter,
                    name,
                    SymbolFlags::FUNCTION_SCOPED_VARIABLE,
                    SymbolFlags::FUNCTION_SCOPED_VARIABLE_EXCLUDES,
                );
            }
        }
        if let Some(body) = body {
            if let Some(statements) = ast.statements_of(body) {
                for &statement in statements {
                    self.bind_statement(statement);
                }
            }
        }
        self.pop_container();
    }

    fn bind_class_declaration(&mut self, statement: NodeId) {
        let ast = self.ast;
        let NodeKind::ClassDeclaration(c) = &ast.node(statement).kind else {
            return;
        };
        let name = c.name.text;
        let frame = self.scopes.len() - 1;
        let symbol = self.declare(
            frame,
            TableTarget::Locals,
            statement,
            name,
            SymbolFlags::CLASS,
            SymbolFlags::CLASS_EXCLUDES,
        );
        self.maybe_export(statement, name, symbol);
        self.push_container(ScopeKind::Class, symbol);
        for &member in &c.members {
            self.bind_class_member(member);
        }
        self.pop_container();
    }

    fn bind_class_member(&mut self, member: NodeId) {
        let ast = self.ast;
        let Some(name) = ast.name_of(member) else {
            return;
        };
        let modifier_meanings = member_modifier_meanings(ast, member);
        match &ast.node(member).kind {
            NodeKind::PropertyDeclaration(_) => {
                let frame = self.scopes.len() - 1;
                self.declare(
                    frame,
                    TableTarget::Members,
                    member,
                    name,
                    SymbolFlags::PROPERTY | modifier_meanings,
                    SymbolFlags::PROPERTY_EXCLUDES,
                );
            }
            NodeKind::MethodDeclaration(m) => {
                let frame = self.scopes.len() - 1;
                let symbol = self.declare(
                    frame,
                    TableTarget::Members,
                    member,
                    name,
                    SymbolFlags::METHOD | modifier_meanings,
                    SymbolFlags::METHOD_EXCLUDES,
                );
                self.bind_callable_body(symbol, &m.parameters, m.body);
            }
            _ => {}
        }
    }

    fn bind_interface_declaration(&mut self, statement: NodeId) {
        let ast = self.ast;
        let NodeKind::InterfaceDeclaration(i) = &ast.node(statement).kind else {
            return;
        };
        let name = i.name.text;
        let frame = self.scopes.len() - 1;
        let symbol = self.declare(
            frame,
            TableTarget::Locals,
            statement,
            name,
            SymbolFlags::INTERFACE,
            SymbolFlags::INTERFACE_EXCLUDES,
        );
        self.maybe_export(statement, name, symbol);
        self.push_container(ScopeKind::Interface, symbol);
        for &member in &i.members {
            let member_name = match ast.name_of(member) {
                Some(n) => n,
                None => continue,
            };
            let (includes, excludes) = match ast.node(member).kind {
                NodeKind::MethodSignature(_) => {
                    (SymbolFlags::METHOD, SymbolFlags::METHOD_EXCLUDES)
                }
                _ => (SymbolFlags::PROPERTY, SymbolFlags::PROPERTY_EXCLUDES),
            };
            let frame = self.scopes.len() - 1;
            self.declare(frame, TableTarget::Members, member, member_name, includes, excludes);
        }
        self.pop_container();
    }

    fn bind_type_alias_declaration(&mut self, statement: NodeId) {
        let ast = self.ast;
        let Some(name) = ast.name_of(statement) else {
            return;
        };
        let frame = self.scopes.len() - 1;
        let symbol = self.declare(
            frame,
            TableTarget::Locals,
            statement,
            name,
            SymbolFlags::TYPE_ALIAS,
            SymbolFlags::TYPE_ALIAS_EXCLUDES,
        );
        self.maybe_export(statement, name, symbol);
    }

    fn bind_enum_declaration(&mut self, statement: NodeId) {
        let ast = self.ast;
        let NodeKind::EnumDeclaration(e) = &ast.node(statement).kind else {
            return;
        };
        let name = e.name.text;
        let is_const = ast
            .data(statement)
            .modifier_flags
            .contains(ModifierFlags::CONST);
        let (includes, excludes) = if is_const {
            (SymbolFlags::CONST_ENUM, SymbolFlags::CONST_ENUM_EXCLUDES)
        } else {
            (SymbolFlags::REGULAR_ENUM, SymbolFlags::REGULAR_ENUM_EXCLUDES)
        };
        let frame = self.scopes.len() - 1;
        let symbol = self.declare(frame, TableTarget::Locals, statement, name, includes, excludes);
        self.maybe_export(statement, name, symbol);
        self.push_container(ScopeKind::Enum, symbol);
        for &member in &e.members {
            if let Some(member_name) = ast.name_of(member) {
                let frame = self.scopes.len() - 1;
                self.declare(
                    frame,
                    TableTarget::Exports,
                    member,
                    member_name,
                    SymbolFlags::ENUM_MEMBER,
                    SymbolFlags::ENUM_MEMBER_EXCLUDES,
                );
            }
        }
        self.pop_container();
    }

    fn bind_module_declaration(&mut self, statement: NodeId) {
        let ast = self.ast;
        let NodeKind::ModuleDeclaration(m) = &ast.node(statement).kind else {
            return;
        };
        let name = m.name.text;
        let body = m.body;
        let state = module_instance_state(ast, statement, &mut self.instance_states);
        let (includes, excludes) = if state == ModuleInstanceState::NonInstantiated {
            (
                SymbolFlags::NAMESPACE_MODULE,
                SymbolFlags::NAMESPACE_MODULE_EXCLUDES,
            )
        } else {
            (SymbolFlags::VALUE_MODULE, SymbolFlags::VALUE_MODULE_EXCLUDES)
        };
        let frame = self.scopes.len() - 1;
        let symbol = self.declare(frame, TableTarget::Locals, statement, name, includes, excludes);
        // The inner segment of a dotted `namespace A.B` shorthand is always
        // exported from the enclosing segment.
        if ast.data(statement).flags.contains(NodeFlags::NESTED_NAMESPACE) {
            self.register_export(name, symbol, statement);
        } else {
            self.maybe_export(statement, name, symbol);
        }

        let Some(body) = body else {
            return;
        };
        self.push_container(ScopeKind::Module, symbol);
        match &ast.node(body).kind {
            NodeKind::ModuleDeclaration(_) => self.bind_module_declaration(body),
            NodeKind::ModuleBlock(b) => {
                let statements = b.statements.clone();
                for s in statements {
                    self.bind_statement(s);
                }
            }
            _ => {}
        }
        self.pop_container();
    }

    fn bind_import_declaration(&mut self, statement: NodeId) {
        let ast = self.ast;
        let NodeKind::ImportDeclaration(i) = &ast.node(statement).kind else {
            return;
        };
        let frame = self.scopes.len() - 1;
        if let Some(default_name) = i.default_name {
            self.declare(
                frame,
                TableTarget::Locals,
                statement,
                default_name.text,
                SymbolFlags::ALIAS,
                SymbolFlags::ALIAS_EXCLUDES,
            );
        }
        if let Some(namespace_name) = i.namespace_name {
            self.declare(
                frame,
                TableTarget::Locals,
                statement,
                namespace_name.text,
                SymbolFlags::ALIAS,
                SymbolFlags::ALIAS_EXCLUDES,
            );
        }
        for &specifier in &i.named_bindings {
            if let Some(name) = ast.name_of(specifier) {
                self.declare(
                    frame,
                    TableTarget::Locals,
                    specifier,
                    name,
                    SymbolFlags::ALIAS,
                    SymbolFlags::ALIAS_EXCLUDES,
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Declaration and export plumbing
    // ------------------------------------------------------------------

    fn declare(
        &mut self,
        frame: usize,
        target: TableTarget,
        node: NodeId,
        name: InternedString,
        includes: SymbolFlags,
        excludes: SymbolFlags,
    ) -> SymbolId {
        let entry = DeclarationEntry {
            node,
            name,
            includes,
            excludes,
        };
        let parent = self.scopes[frame].symbol;
        let symbol = {
            let scope = &mut self.scopes[frame];
            let table = match target {
                TableTarget::Locals => &mut scope.locals,
                TableTarget::Exports => scope.exports.get_or_insert_with(SymbolTable::new),
                TableTarget::Members => scope.members.get_or_insert_with(SymbolTable::new),
            };
            merge_declaration(
                &mut self.symbols,
                table,
                self.ast,
                entry,
                &self.options,
                &mut self.diagnostics,
            )
        };
        self.node_symbols.insert(node, symbol);
        if target != TableTarget::Locals {
            if let Some(s) = self.symbols.get_mut(symbol) {
                if s.parent.is_none() {
                    s.parent = parent;
                }
            }
        }
        symbol
    }

    /// Nearest enclosing frame `var` and function declarations hoist to.
    fn hoist_frame(&self) -> usize {
        self.scopes
            .iter()
            .rposition(|f| f.kind.is_hoist_target())
            .unwrap_or(0)
    }

    fn maybe_export(&mut self, node: NodeId, name: InternedString, symbol: SymbolId) {
        let modifiers = self.ast.data(node).modifier_flags;
        if !modifiers.contains(ModifierFlags::EXPORT) {
            return;
        }
        let export_name = if modifiers.contains(ModifierFlags::DEFAULT) {
            self.ast.interner().intern("default")
        } else {
            name
        };
        self.register_export(export_name, symbol, node);
    }

    fn register_export(&mut self, name: InternedString, symbol: SymbolId, node: NodeId) {
        let Some(frame) = self
            .scopes
            .iter()
            .rposition(|f| matches!(f.kind, ScopeKind::SourceFile | ScopeKind::Module))
        else {
            return;
        };
        let container_symbol = self.scopes[frame].symbol;
        let conflict = {
            let exports = self.scopes[frame].exports.get_or_insert_with(SymbolTable::new);
            match exports.get(name) {
                Some(existing) => existing != symbol,
                None => {
                    exports.set(name, symbol);
                    false
                }
            }
        };
        if !conflict && container_symbol.is_some() {
            if let Some(s) = self.symbols.get_mut(symbol) {
                if s.parent.is_none() {
                    s.parent = container_symbol;
                }
            }
        }
        if conflict {
            let container = match container_symbol {
                Some(id) => self
                    .symbols
                    .get(id)
                    .map(|s| format!("'{}'", self.ast.interner().resolve(s.name)))
                    .unwrap_or_default(),
                None => match &self.ast.node(self.ast.root()).kind {
                    NodeKind::SourceFile(f) => format!("'{}'", f.file_name),
                    _ => String::new(),
                },
            };
            let member = self.ast.interner().resolve(name).to_string();
            self.diagnostics.push(BindDiagnostic::new(
                BindDiagnosticKind::AmbiguousExport,
                &messages::MODULE_0_HAS_ALREADY_EXPORTED_A_MEMBER_NAMED_1,
                vec![container, member],
                vec![node],
            ));
        }
    }

    // ------------------------------------------------------------------
    // Container frames
    // ------------------------------------------------------------------

    /// Open a container frame, moving the container symbol's tables into
    /// it. A merged container declared twice reopens the tables its first
    /// declaration filled.
    fn push_container(&mut self, kind: ScopeKind, symbol: SymbolId) {
        let mut frame = ScopeFrame::new(kind, Some(symbol));
        if let Some(s) = self.symbols.get_mut(symbol) {
            match kind {
                ScopeKind::Function => {
                    frame.locals = s.locals.take().unwrap_or_default();
                }
                ScopeKind::Module => {
                    frame.locals = s.locals.take().unwrap_or_default();
                    frame.exports = Some(s.exports.take().unwrap_or_default());
                }
                ScopeKind::Class | ScopeKind::Interface => {
                    frame.members = Some(s.members.take().unwrap_or_default());
                }
                ScopeKind::Enum => {
                    frame.exports = Some(s.exports.take().unwrap_or_default());
                }
                _ => {}
            }
        }
        self.scopes.push(frame);
    }

    /// Close a container frame, storing its tables back on the symbol.
    fn pop_container(&mut self) {
        let Some(frame) = self.scopes.pop() else {
            return;
        };
        let Some(id) = frame.symbol else {
            return;
        };
        if let Some(s) = self.symbols.get_mut(id) {
            match frame.kind {
                ScopeKind::Function => {
                    s.locals = Some(frame.locals);
                }
                ScopeKind::Module => {
                    s.locals = Some(frame.locals);
                    s.exports = frame.exports;
                }
                ScopeKind::Class | ScopeKind::Interface => {
                    s.members = frame.members;
                }
                ScopeKind::Enum => {
                    s.exports = frame.exports;
                }
                _ => {}
            }
        }
    }
}

/// Meaning flags contributed by a class member's modifiers.
fn member_modifier_meanings(ast: &Ast, member: NodeId) -> SymbolFlags {
    let modifiers = ast.data(member).modifier_flags;
    let mut flags = SymbolFlags::NONE;
    if modifiers.contains(ModifierFlags::STATIC) {
        flags |= SymbolFlags::STATIC;
    }
    if modifiers.contains(ModifierFlags::PRIVATE) {
        flags |= SymbolFlags::PRIVATE;
    }
    if modifiers.contains(ModifierFlags::PROTECTED) {
        flags |= SymbolFlags::PROTECTED;
    }
    flags
}
