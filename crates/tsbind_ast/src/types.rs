//! Flag types and id handles shared across the front end.
//!
//! The flag layouts follow TypeScript's NodeFlags, ModifierFlags, and
//! SymbolFlags, trimmed to what binding needs. SymbolFlags doubles as the
//! meaning set of a symbol (Value / Type / Namespace groupings) and carries
//! the excludes masks the declaration merger's compatibility rules are
//! expressed with.

use std::fmt;

bitflags::bitflags! {
    /// Flags on syntax nodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        const NONE              = 0;
        /// `let` declaration list.
        const LET               = 1 << 0;
        /// `const` declaration list.
        const CONST             = 1 << 1;
        /// Module declared with the `namespace` keyword.
        const NAMESPACE         = 1 << 2;
        /// Right-hand segment of a dotted `namespace A.B` shorthand; the
        /// binder exports such a segment from its enclosing segment.
        const NESTED_NAMESPACE  = 1 << 3;

        const BLOCK_SCOPED = Self::LET.bits() | Self::CONST.bits();
    }
}

bitflags::bitflags! {
    /// Modifiers on declarations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModifierFlags: u32 {
        const NONE      = 0;
        const EXPORT    = 1 << 0;
        /// `declare` — asserts existence without defining runtime code.
        const AMBIENT   = 1 << 1;
        const PUBLIC    = 1 << 2;
        const PRIVATE   = 1 << 3;
        const PROTECTED = 1 << 4;
        const STATIC    = 1 << 5;
        const READONLY  = 1 << 6;
        const ABSTRACT  = 1 << 7;
        const ASYNC     = 1 << 8;
        const DEFAULT   = 1 << 9;
        /// `const` on an enum declaration.
        const CONST     = 1 << 10;

        const EXPORT_DEFAULT = Self::EXPORT.bits() | Self::DEFAULT.bits();
        const ACCESSIBILITY_MODIFIER =
            Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
    }
}

bitflags::bitflags! {
    /// Symbol meaning flags, following TypeScript's SymbolFlags.
    ///
    /// A symbol's flags are the union of the meanings contributed by its
    /// declarations. The `*_EXCLUDES` masks encode the merge-compatibility
    /// matrix: a declaration of kind K may not merge into a symbol whose
    /// existing flags intersect K's excludes mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u32 {
        const NONE                      = 0;
        const FUNCTION_SCOPED_VARIABLE  = 1 << 0;
        const BLOCK_SCOPED_VARIABLE     = 1 << 1;
        const PROPERTY                  = 1 << 2;
        const ENUM_MEMBER               = 1 << 3;
        const FUNCTION                  = 1 << 4;
        const CLASS                     = 1 << 5;
        const INTERFACE                 = 1 << 6;
        const CONST_ENUM                = 1 << 7;
        const REGULAR_ENUM              = 1 << 8;
        /// Namespace that requires a runtime object.
        const VALUE_MODULE              = 1 << 9;
        /// Namespace that is fully erasable at emit.
        const NAMESPACE_MODULE          = 1 << 10;
        const METHOD                    = 1 << 11;
        const TYPE_ALIAS                = 1 << 12;
        const ALIAS                     = 1 << 13;
        const STATIC                    = 1 << 14;
        const PRIVATE                   = 1 << 15;
        const PROTECTED                 = 1 << 16;

        const ENUM = Self::REGULAR_ENUM.bits() | Self::CONST_ENUM.bits();
        const VARIABLE =
            Self::FUNCTION_SCOPED_VARIABLE.bits() | Self::BLOCK_SCOPED_VARIABLE.bits();
        const VALUE = Self::VARIABLE.bits()
            | Self::PROPERTY.bits()
            | Self::ENUM_MEMBER.bits()
            | Self::FUNCTION.bits()
            | Self::CLASS.bits()
            | Self::ENUM.bits()
            | Self::VALUE_MODULE.bits()
            | Self::METHOD.bits();
        const TYPE = Self::CLASS.bits()
            | Self::INTERFACE.bits()
            | Self::ENUM.bits()
            | Self::ENUM_MEMBER.bits()
            | Self::TYPE_ALIAS.bits();
        const NAMESPACE = Self::VALUE_MODULE.bits()
            | Self::NAMESPACE_MODULE.bits()
            | Self::ENUM.bits();
        const MODULE = Self::VALUE_MODULE.bits() | Self::NAMESPACE_MODULE.bits();

        // Excludes masks. `var` tolerates other `var`s; block-scoped names
        // tolerate nothing value-like; classes leave room for interfaces and
        // namespaces to merge in; namespaces leave room for functions,
        // classes, and enums; a const enum only merges with const enums and
        // a regular enum only with regular enums and namespaces.
        const FUNCTION_SCOPED_VARIABLE_EXCLUDES =
            Self::VALUE.bits() & !Self::FUNCTION_SCOPED_VARIABLE.bits();
        const BLOCK_SCOPED_VARIABLE_EXCLUDES = Self::VALUE.bits();
        const FUNCTION_EXCLUDES = Self::VALUE.bits()
            & !(Self::FUNCTION.bits() | Self::VALUE_MODULE.bits() | Self::CLASS.bits());
        const CLASS_EXCLUDES = (Self::VALUE.bits() | Self::TYPE.bits())
            & !(Self::VALUE_MODULE.bits() | Self::INTERFACE.bits() | Self::FUNCTION.bits());
        const INTERFACE_EXCLUDES =
            Self::TYPE.bits() & !(Self::INTERFACE.bits() | Self::CLASS.bits());
        const REGULAR_ENUM_EXCLUDES = (Self::VALUE.bits() | Self::TYPE.bits())
            & !(Self::REGULAR_ENUM.bits() | Self::VALUE_MODULE.bits());
        const CONST_ENUM_EXCLUDES =
            (Self::VALUE.bits() | Self::TYPE.bits()) & !Self::CONST_ENUM.bits();
        const VALUE_MODULE_EXCLUDES = Self::VALUE.bits()
            & !(Self::FUNCTION.bits()
                | Self::CLASS.bits()
                | Self::REGULAR_ENUM.bits()
                | Self::VALUE_MODULE.bits());
        const NAMESPACE_MODULE_EXCLUDES = 0;
        const TYPE_ALIAS_EXCLUDES = Self::TYPE.bits();
        const ALIAS_EXCLUDES = Self::ALIAS.bits();
        const ENUM_MEMBER_EXCLUDES = Self::VALUE.bits() & !Self::ENUM_MEMBER.bits();
        const PROPERTY_EXCLUDES = Self::VALUE.bits() & !Self::PROPERTY.bits();
        const METHOD_EXCLUDES = Self::VALUE.bits() & !Self::METHOD.bits();
    }
}

/// Handle to a symbol in the symbol arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const INVALID: SymbolId = SymbolId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

/// Handle to a node in the syntax tree arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const INVALID: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}
