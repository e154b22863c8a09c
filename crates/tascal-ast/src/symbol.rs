//! Flat symbol table with dense, declaration-ordered offsets.
//!
//! Tascal has exactly one scope, so there is no rib stack or shadowing to
//! model — just a name → [`Symbol`] map and a monotonic offset counter,
//! both owned by a single [`SymbolTable`] per compilation.

use indexmap::IndexMap;

/// A variable's inferred/declared type.
///
/// `Unknown` is the sentinel used when a reference failed to resolve or an
/// operand's type couldn't be determined; it never reaches the code
/// generator because any expression carrying it is paired with a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Type {
    Integer,
    Boolean,
    Unknown,
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Type::Integer => "integer",
            Type::Boolean => "boolean",
            Type::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Stable handle into a [`SymbolTable`]. Cheap to copy, valid for the
/// lifetime of the table that produced it — the table is append-only and
/// outlives every `IdRef` built during the same parse, so this index never
/// dangles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: Type,
    pub offset: u32,
}

#[derive(Default, Debug)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_name: IndexMap<String, SymbolId>,
    next_offset: u32,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a declaration. Returns `Err(())` if the name is already
    /// declared — the caller is responsible for emitting the "already
    /// declared" diagnostic; the table itself never owns diagnostics.
    pub fn declare(&mut self, name: &str, kind: Type) -> Result<SymbolId, ()> {
        if self.by_name.contains_key(name) {
            return Err(());
        }
        let id = SymbolId(self.symbols.len() as u32);
        let offset = self.next_offset;
        self.next_offset += 1;
        self.symbols.push(Symbol {
            name: name.to_string(),
            kind,
            offset,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn resolve(&self, name: &str) -> Option<SymbolId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    /// Cardinality of the table — becomes `Program::total_vars`.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
