//! Immutable forest produced by the tree builder.

use std::fmt;
use std::hash::Hash;

use generational_arena::Index;
use serde::ser::{Error as _, Serialize, SerializeMap, Serializer};
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{NodeArena, NodeRecord};

/// Deepest forest `Serialize` accepts; serializers nest one call per level.
pub const MAX_SERIALIZE_DEPTH: usize = 512;

/// Rooted forest over shared node records.
///
/// Traversals use explicit stacks, so deep chains do not exhaust the call stack.
#[derive(Debug)]
pub struct Forest<N> {
    nodes: NodeArena<N>,
    roots: Vec<Index>,
}

impl<N> Forest<N> {
    pub(crate) fn new(nodes: NodeArena<N>, roots: Vec<Index>) -> Self {
        Self { nodes, roots }
    }

    /// Root identifiers in first-registration order.
    pub fn roots(&self) -> impl Iterator<Item = &N> + '_ {
        self.roots
            .iter()
            .filter_map(|&idx| self.nodes.get(idx))
            .map(|node| &node.id)
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Structural count of nodes reachable from the roots, roots included.
    #[instrument(level = "debug", skip(self))]
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Number of nodes on the longest root-to-leaf path.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter().map(|(depth, _)| depth).max().unwrap_or(0)
    }

    /// Collects all leaf nodes (nodes with no children) in preorder.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<&N> {
        self.records()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| &node.id)
            .collect()
    }

    /// Every root-to-leaf path, in preorder of the leaves.
    #[instrument(level = "debug", skip(self))]
    pub fn branches(&self) -> Vec<Vec<&N>> {
        let mut branches = Vec::new();
        let mut stack: Vec<(Index, Vec<&N>)> = self
            .roots
            .iter()
            .rev()
            .map(|&idx| (idx, Vec::new()))
            .collect();

        while let Some((idx, mut path)) = stack.pop() {
            if let Some(node) = self.nodes.get(idx) {
                path.push(&node.id);
                if node.children.is_empty() {
                    branches.push(path);
                } else {
                    for &child in node.children.iter().rev() {
                        stack.push((child, path.clone()));
                    }
                }
            }
        }

        branches
    }

    /// Preorder iterator over `(depth, id)`, roots at depth 1.
    pub fn iter(&self) -> ForestIterator<'_, N> {
        ForestIterator::new(self)
    }

    /// Depth-first walk reporting entry into and exit from every node.
    pub fn walk(&self) -> Walk<'_, N> {
        Walk {
            forest: self,
            frames: vec![(self.roots.as_slice(), 0)],
        }
    }

    fn records(&self) -> Records<'_, N> {
        Records {
            inner: ForestIterator::new(self),
        }
    }

    fn node(&self, idx: Index) -> Option<&NodeRecord<N>> {
        self.nodes.get(idx)
    }
}

impl<N: Eq + Hash + Clone> Forest<N> {
    pub fn contains(&self, id: &N) -> bool {
        self.nodes.index_of(id).is_some()
    }

    /// Children of `id` in attach order, None for unknown identifiers.
    pub fn children(&self, id: &N) -> Option<Vec<&N>> {
        let node = self.nodes.index_of(id).and_then(|idx| self.node(idx))?;
        Some(
            node.children
                .iter()
                .filter_map(|&child| self.node(child))
                .map(|child| &child.id)
                .collect(),
        )
    }

    pub fn parent(&self, id: &N) -> Option<&N> {
        let node = self.nodes.index_of(id).and_then(|idx| self.node(idx))?;
        node.parent
            .and_then(|parent| self.node(parent))
            .map(|parent| &parent.id)
    }

    pub fn is_root(&self, id: &N) -> bool {
        self.nodes
            .index_of(id)
            .is_some_and(|idx| self.roots.contains(&idx))
    }
}

impl<N: fmt::Display> Forest<N> {
    /// One display tree per root, assembled bottom-up without recursion.
    ///
    /// `termtree::Tree` is itself a nested value; `walk` suits very deep forests better.
    #[instrument(level = "debug", skip(self))]
    pub fn to_termtree(&self) -> Vec<Tree<String>> {
        let mut trees = Vec::with_capacity(self.roots.len());

        for &root in &self.roots {
            // (node, next child position, finished child trees)
            let mut stack: Vec<(Index, usize, Vec<Tree<String>>)> = vec![(root, 0, Vec::new())];

            while let Some(&(idx, pos, _)) = stack.last() {
                let next = self.node(idx).and_then(|node| node.children.get(pos)).copied();
                match next {
                    Some(child) => {
                        if let Some(top) = stack.last_mut() {
                            top.1 += 1;
                        }
                        stack.push((child, 0, Vec::new()));
                    }
                    None => {
                        let Some((idx, _, leaves)) = stack.pop() else {
                            break;
                        };
                        let label = self.node(idx).map(|node| node.id.to_string());
                        let tree = Tree::new(label.unwrap_or_default()).with_leaves(leaves);
                        match stack.last_mut() {
                            Some(parent) => parent.2.push(tree),
                            None => trees.push(tree),
                        }
                    }
                }
            }
        }

        trees
    }
}

pub struct ForestIterator<'a, N> {
    forest: &'a Forest<N>,
    stack: Vec<(Index, usize)>,
}

impl<'a, N> ForestIterator<'a, N> {
    fn new(forest: &'a Forest<N>) -> Self {
        // Push roots in reverse order for left-to-right traversal
        let stack = forest.roots.iter().rev().map(|&idx| (idx, 1)).collect();
        Self { forest, stack }
    }

    fn next_record(&mut self) -> Option<(usize, &'a NodeRecord<N>)> {
        while let Some((idx, depth)) = self.stack.pop() {
            if let Some(node) = self.forest.node(idx) {
                for &child in node.children.iter().rev() {
                    self.stack.push((child, depth + 1));
                }
                return Some((depth, node));
            }
        }
        None
    }
}

impl<'a, N> Iterator for ForestIterator<'a, N> {
    type Item = (usize, &'a N);

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().map(|(depth, node)| (depth, &node.id))
    }
}

struct Records<'a, N> {
    inner: ForestIterator<'a, N>,
}

impl<'a, N> Iterator for Records<'a, N> {
    type Item = (usize, &'a NodeRecord<N>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_record()
    }
}

/// One event of [`Forest::walk`].
#[derive(Debug, PartialEq, Eq)]
pub enum Step<'a, N> {
    Enter {
        id: &'a N,
        /// Roots are at depth 1
        depth: usize,
        /// First among its siblings
        first: bool,
        /// Last among its siblings
        last: bool,
        leaf: bool,
    },
    /// Every descendant of the node entered at `depth` has been visited.
    Leave { depth: usize, leaf: bool },
}

/// Explicit-stack walk; each frame is a sibling list and the next position in it.
pub struct Walk<'a, N> {
    forest: &'a Forest<N>,
    frames: Vec<(&'a [Index], usize)>,
}

impl<'a, N> Iterator for Walk<'a, N> {
    type Item = Step<'a, N>;

    fn next(&mut self) -> Option<Self::Item> {
        let depth = self.frames.len();
        let (siblings, pos) = *self.frames.last()?;

        if let Some(node) = siblings.get(pos).and_then(|&idx| self.forest.node(idx)) {
            if let Some(frame) = self.frames.last_mut() {
                frame.1 += 1;
            }
            self.frames.push((node.children.as_slice(), 0));
            return Some(Step::Enter {
                id: &node.id,
                depth,
                first: pos == 0,
                last: pos + 1 == siblings.len(),
                leaf: node.children.is_empty(),
            });
        }

        // the exhausted frame holds the children of the node one level up
        self.frames.pop();
        if self.frames.is_empty() {
            return None;
        }
        Some(Step::Leave {
            depth: self.frames.len(),
            leaf: siblings.is_empty(),
        })
    }
}

/// Nested map rooted at one record: `{child: {...}, ...}`.
struct Subtree<'a, N> {
    forest: &'a Forest<N>,
    children: &'a [Index],
}

impl<N: Serialize> Serialize for Subtree<'_, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_level(self.forest, self.children, serializer)
    }
}

fn serialize_level<N: Serialize, S: Serializer>(
    forest: &Forest<N>,
    level: &[Index],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(level.len()))?;
    for node in level.iter().filter_map(|&idx| forest.node(idx)) {
        map.serialize_entry(
            &node.id,
            &Subtree {
                forest,
                children: &node.children,
            },
        )?;
    }
    map.end()
}

/// Serializes as a nested mapping; a leaf maps to an empty mapping.
///
/// Forests deeper than [`MAX_SERIALIZE_DEPTH`] are rejected with a serializer error.
impl<N: Serialize> Serialize for Forest<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let depth = self.depth();
        if depth > MAX_SERIALIZE_DEPTH {
            return Err(S::Error::custom(format!(
                "forest depth {depth} exceeds the serialization limit of {MAX_SERIALIZE_DEPTH}"
            )));
        }
        serialize_level(self, &self.roots, serializer)
    }
}
