//! Arena storage for node records.

use std::collections::HashMap;
use std::hash::Hash;

use generational_arena::{Arena, Index};
use tracing::trace;

/// Canonical record of one node identifier.
///
/// Every container that refers to the node holds its arena index, so children
/// discovered later are visible wherever the node already appears.
#[derive(Debug, Clone)]
pub struct NodeRecord<N> {
    /// Identifier of this node
    pub id: N,
    /// Index of the parent record, None for roots
    pub parent: Option<Index>,
    /// Indices of child records, in attach order
    pub children: Vec<Index>,
}

/// Arena of node records with one record per identifier.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Registration order is kept so that forests render deterministically.
#[derive(Debug)]
pub struct NodeArena<N> {
    arena: Arena<NodeRecord<N>>,
    registry: HashMap<N, Index>,
    order: Vec<Index>,
}

impl<N> Default for NodeArena<N> {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
            registry: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<N: Eq + Hash + Clone> NodeArena<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record index for `id`, registering an empty record on first sight.
    pub fn ensure(&mut self, id: &N) -> Index {
        if let Some(&idx) = self.registry.get(id) {
            return idx;
        }
        let idx = self.arena.insert(NodeRecord {
            id: id.clone(),
            parent: None,
            children: Vec::new(),
        });
        self.registry.insert(id.clone(), idx);
        self.order.push(idx);
        trace!(?idx, "registered node");
        idx
    }

    pub fn index_of(&self, id: &N) -> Option<Index> {
        self.registry.get(id).copied()
    }
}

impl<N> NodeArena<N> {
    /// Hangs `child` below `parent`. Callers guarantee `child` has no parent yet.
    pub fn attach(&mut self, parent: Index, child: Index) {
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
    }

    pub fn get(&self, idx: Index) -> Option<&NodeRecord<N>> {
        self.arena.get(idx)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Record indices in registration order.
    pub fn indices(&self) -> impl Iterator<Item = Index> + '_ {
        self.order.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_known_id_when_ensuring_then_returns_same_record() {
        let mut nodes = NodeArena::new();
        let first = nodes.ensure(&"a");
        let again = nodes.ensure(&"a");

        assert_eq!(first, again);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn given_attached_child_when_reading_then_links_both_directions() {
        let mut nodes = NodeArena::new();
        let parent = nodes.ensure(&"p");
        let child = nodes.ensure(&"c");
        nodes.attach(parent, child);

        assert_eq!(nodes.get(parent).map(|n| n.children.clone()), Some(vec![child]));
        assert_eq!(nodes.get(child).and_then(|n| n.parent), Some(parent));
    }

    #[test]
    fn given_several_ids_when_iterating_indices_then_keeps_registration_order() {
        let mut nodes = NodeArena::new();
        for id in ["z", "a", "m", "a"] {
            nodes.ensure(&id);
        }
        let ids: Vec<_> = nodes
            .indices()
            .filter_map(|idx| nodes.get(idx).map(|n| n.id))
            .collect();

        assert_eq!(ids, vec!["z", "a", "m"]);
    }
}
