//! Identifier resolution.

use super::{NodeId, SymbolId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolves a node to the declaration it references.
///
/// Must be stable within one analysis pass: the same node always resolves to
/// the same symbol.
pub trait SymbolResolver {
    fn resolve(&self, node: NodeId) -> Option<SymbolId>;
}

impl<R: SymbolResolver + ?Sized> SymbolResolver for &R {
    fn resolve(&self, node: NodeId) -> Option<SymbolId> {
        (**self).resolve(node)
    }
}

/// Map-backed resolver filled in by the front end.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    symbols: HashMap<NodeId, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `node` references `symbol`.
    pub fn insert(&mut self, node: NodeId, symbol: SymbolId) {
        self.symbols.insert(node, symbol);
    }

    /// Builder-style variant of [`SymbolTable::insert`].
    pub fn with(mut self, node: NodeId, symbol: SymbolId) -> Self {
        self.insert(node, symbol);
        self
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolResolver for SymbolTable {
    fn resolve(&self, node: NodeId) -> Option<SymbolId> {
        self.symbols.get(&node).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_recorded_nodes_only() {
        let table = SymbolTable::new().with(NodeId(1), SymbolId(10));

        assert_eq!(table.resolve(NodeId(1)), Some(SymbolId(10)));
        assert_eq!(table.resolve(NodeId(2)), None);
    }

    #[test]
    fn resolution_is_stable() {
        let table = SymbolTable::new().with(NodeId(5), SymbolId(1));

        assert_eq!(table.resolve(NodeId(5)), table.resolve(NodeId(5)));
    }

    #[test]
    fn reference_forwards_resolution() {
        let table = SymbolTable::new().with(NodeId(3), SymbolId(4));
        let by_ref: &dyn SymbolResolver = &table;

        assert_eq!((&by_ref).resolve(NodeId(3)), Some(SymbolId(4)));
    }
}
