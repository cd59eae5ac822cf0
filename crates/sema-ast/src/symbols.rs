//! Symbol table and scope tree, pre-populated by the upstream binder pass (§6).
//!
//! The checker only reads scope/symbol *structure* here; it writes resolved-type and
//! resolved-symbol annotations into its own result maps (`sema_checker::CheckResult`),
//! not back into this table, keeping the external interface read-mostly per §5.

use crate::ids::{ItemId, ParamId};
use rustc_hash::FxHashMap;
use sema_common::{Atom, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Type,
    Tag,
    Let,
    Const,
    Param,
    Module,
}

bitflags::bitflags! {
    /// Symbol flags (§3).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SymbolFlags: u8 {
        const MUTABLE = 1 << 0;
        const ALLOW_IMPLICIT_CONVERSION = 1 << 1;
        const EXPORTED = 1 << 2;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolDecl {
    Item(ItemId),
    Param(ParamId),
    /// A `let` binding isn't in the item arena; it's identified by the statement that
    /// introduces it plus its declaring scope, recorded at bind time by the (external)
    /// binder pass.
    LetBinding(u32),
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: Atom,
    pub kind: SymbolKind,
    pub scope: ScopeId,
    pub decl: SymbolDecl,
    pub flags: SymbolFlags,
    /// Method receiver key, for symbols that are methods (populated after the type
    /// registry resolves the receiver's syntactic type — see `sema_types::MethodIndex`).
    pub receiver_key: Option<String>,
    pub span: Span,
}

#[derive(Clone, Debug, Default)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub bindings: FxHashMap<Atom, SymbolId>,
}

/// The pre-populated scope tree plus symbol arena (§3 "Scope", "Symbol").
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = SymbolTable::default();
        table.scopes.push(Scope::default()); // root/file scope, ScopeId(0)
        table
    }

    pub fn file_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn push_scope(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent: Some(parent),
            bindings: FxHashMap::default(),
        });
        id
    }

    pub fn declare(&mut self, scope: ScopeId, symbol: Symbol) -> SymbolId {
        let name = symbol.name;
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        self.scopes[scope.0 as usize].bindings.insert(name, id);
        id
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0 as usize]
    }

    /// Resolve a name starting at `scope`, walking parents. Bounded by
    /// `sema_common::limits::MAX_SCOPE_WALK_ITERATIONS` against a malformed scope tree.
    pub fn resolve(&self, scope: ScopeId, name: Atom) -> Option<SymbolId> {
        let mut current = Some(scope);
        let mut guard = 0usize;
        while let Some(id) = current {
            guard += 1;
            if guard > sema_common::limits::MAX_SCOPE_WALK_ITERATIONS {
                return None;
            }
            let s = &self.scopes[id.0 as usize];
            if let Some(&sym) = s.bindings.get(&name) {
                return Some(sym);
            }
            current = s.parent;
        }
        None
    }
}
