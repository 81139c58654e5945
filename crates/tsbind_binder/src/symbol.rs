//! Symbols and symbol tables.
//!
//! A `Symbol` is the semantic identity shared by every declaration of one
//! name in one scope; its `flags` are the union of the meanings those
//! declarations contribute. Symbols live in a `SymbolArena` and reference
//! each other by `SymbolId`, so merged container tables can be moved in
//! and out of scopes without aliasing.

use tsbind_ast::{NodeId, SymbolFlags, SymbolId};
use tsbind_core::collections::OrderedMap;
use tsbind_core::intern::InternedString;

/// A named entity produced by binding.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: InternedString,
    /// Union of the meanings contributed by all declarations.
    pub flags: SymbolFlags,
    /// Union of the excludes masks of all declarations. Kept on the symbol
    /// so merge conflicts are detected the same way regardless of the order
    /// declarations arrive in.
    pub excludes: SymbolFlags,
    /// All declarations of this symbol, in binding order.
    pub declarations: Vec<NodeId>,
    /// The declaration that defines the runtime shape, when any declaration
    /// has a runtime component.
    pub value_declaration: Option<NodeId>,
    /// Instance members, for classes and interfaces.
    pub members: Option<SymbolTable>,
    /// Exported names, for modules and enums.
    pub exports: Option<SymbolTable>,
    /// Function-scoped locals, for functions and modules.
    pub locals: Option<SymbolTable>,
    /// Enclosing container symbol, if this symbol is a member or export.
    pub parent: Option<SymbolId>,
}

impl Symbol {
    fn new(id: SymbolId, name: InternedString) -> Self {
        Self {
            id,
            name,
            flags: SymbolFlags::NONE,
            excludes: SymbolFlags::NONE,
            declarations: Vec::new(),
            value_declaration: None,
            members: None,
            exports: None,
            locals: None,
            parent: None,
        }
    }

    pub fn is_value(&self) -> bool {
        self.flags.intersects(SymbolFlags::VALUE)
    }

    pub fn is_type(&self) -> bool {
        self.flags.intersects(SymbolFlags::TYPE)
    }

    pub fn is_namespace(&self) -> bool {
        self.flags.intersects(SymbolFlags::NAMESPACE)
    }
}

/// A name-to-symbol map for one scope or container, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    table: OrderedMap<InternedString, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            table: OrderedMap::new(),
        }
    }

    pub fn get(&self, name: InternedString) -> Option<SymbolId> {
        self.table.get(&name).copied()
    }

    pub fn set(&mut self, name: InternedString, symbol: SymbolId) {
        self.table.insert(name, symbol);
    }

    pub fn contains(&self, name: InternedString) -> bool {
        self.table.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (InternedString, SymbolId)> + '_ {
        self.table.iter().map(|(k, v)| (*k, *v))
    }

    pub fn names(&self) -> impl Iterator<Item = InternedString> + '_ {
        self.table.keys().copied()
    }

    pub fn symbols(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.table.values().copied()
    }
}

/// Owner of all symbols produced while binding one source file.
#[derive(Debug, Clone, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
        }
    }

    pub fn alloc(&mut self, name: InternedString) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol::new(id, name));
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Look up a name in a table, keeping only symbols that carry at least
    /// one of the requested meanings.
    pub fn resolve(
        &self,
        table: &SymbolTable,
        name: InternedString,
        meaning: SymbolFlags,
    ) -> Option<SymbolId> {
        let id = table.get(name)?;
        let symbol = self.get(id)?;
        if symbol.flags.intersects(meaning) {
            Some(id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsbind_core::intern::StringInterner;

    #[test]
    fn resolve_filters_by_meaning() {
        let interner = StringInterner::new();
        let name = interner.intern("T");
        let mut arena = SymbolArena::new();
        let id = arena.alloc(name);
        arena.get_mut(id).unwrap().flags = SymbolFlags::INTERFACE;

        let mut table = SymbolTable::new();
        table.set(name, id);

        assert_eq!(arena.resolve(&table, name, SymbolFlags::TYPE), Some(id));
        assert_eq!(arena.resolve(&table, name, SymbolFlags::VALUE), None);
    }

    #[test]
    fn tables_iterate_in_declaration_order() {
        let interner = StringInterner::new();
        let mut arena = SymbolArena::new();
        let mut table = SymbolTable::new();
        for text in ["z", "a", "m"] {
            let name = interner.intern(text);
            let id = arena.alloc(name);
            table.set(name, id);
        }
        let order: Vec<_> = table
            .names()
            .map(|n| interner.resolve(n).to_string())
            .collect();
        assert_eq!(order, vec!["z", "a", "m"]);
    }
}
