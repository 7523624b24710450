//! Tree builder turning parent-child edges into a forest.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::NodeArena;
use crate::domain::edge::Edge;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::forest::Forest;

/// How a freshly built forest is verified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CycleCheck {
    /// Depth-first walk over all input edges, failing on any back-edge
    #[default]
    Strict,
    /// Compare the structural node count of the result with the edge count
    NodeCount,
    /// Skip verification
    Off,
}

impl fmt::Display for CycleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleCheck::Strict => "strict",
            CycleCheck::NodeCount => "node-count",
            CycleCheck::Off => "off",
        };
        f.write_str(name)
    }
}

/// Constructs forests from ordered edge lists.
///
/// Each child is attached below the first parent that claims it; later claims
/// for the same child are skipped. Roots are the nodes never attached.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    cycle_check: CycleCheck,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cycle_check(mut self, cycle_check: CycleCheck) -> Self {
        self.cycle_check = cycle_check;
        self
    }

    pub fn cycle_check(&self) -> CycleCheck {
        self.cycle_check
    }

    /// Build the forest described by `edges`.
    ///
    /// # Errors
    /// `DomainError::CycleDetected` if the configured check finds a cycle.
    #[instrument(
        level = "debug",
        skip_all,
        fields(edges = edges.len(), cycle_check = %self.cycle_check)
    )]
    pub fn build<N>(&self, edges: &[Edge<N>]) -> DomainResult<Forest<N>>
    where
        N: Eq + Hash + Clone + fmt::Debug,
    {
        let mut nodes = NodeArena::new();
        let mut parented = HashSet::new();

        for edge in edges {
            match &edge.parent {
                None => {
                    nodes.ensure(&edge.child);
                }
                Some(parent) => {
                    let parent_idx = nodes.ensure(parent);
                    let child_idx = nodes.ensure(&edge.child);
                    if parented.insert(child_idx) {
                        nodes.attach(parent_idx, child_idx);
                    } else {
                        debug!(?parent, child = ?edge.child, "child already attached, skipping");
                    }
                }
            }
        }

        let roots = nodes
            .indices()
            .filter(|idx| !parented.contains(idx))
            .collect();
        let forest = Forest::new(nodes, roots);
        debug!(
            nodes = forest.len(),
            roots = forest.root_count(),
            "forest assembled"
        );

        match self.cycle_check {
            CycleCheck::Strict => check_back_edges(edges)?,
            CycleCheck::NodeCount => check_node_count(&forest, edges.len())?,
            CycleCheck::Off => {}
        }

        Ok(forest)
    }
}

/// Build a forest with the strict cycle check.
pub fn build_forest<N, E, I>(edges: I) -> DomainResult<Forest<N>>
where
    N: Eq + Hash + Clone + fmt::Debug,
    E: Into<Edge<N>>,
    I: IntoIterator<Item = E>,
{
    let edges: Vec<Edge<N>> = edges.into_iter().map(Into::into).collect();
    TreeBuilder::new().build(&edges)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    OnStack,
    Done,
}

/// Walks the full edge graph, skipped attachments included.
#[instrument(level = "debug", skip_all)]
fn check_back_edges<N>(edges: &[Edge<N>]) -> DomainResult<()>
where
    N: Eq + Hash + fmt::Debug,
{
    let mut adjacency: HashMap<&N, Vec<&N>> = HashMap::new();
    let mut starts = Vec::new();
    for edge in edges {
        if let Some(parent) = &edge.parent {
            adjacency
                .entry(parent)
                .or_insert_with(|| {
                    starts.push(parent);
                    Vec::new()
                })
                .push(&edge.child);
        }
    }

    let mut state: HashMap<&N, Visit> = HashMap::new();
    for start in starts {
        if state.contains_key(start) {
            continue;
        }
        state.insert(start, Visit::OnStack);
        let mut stack: Vec<(&N, usize)> = vec![(start, 0)];

        while let Some(&(node, pos)) = stack.last() {
            let next = adjacency.get(node).and_then(|c| c.get(pos)).copied();
            match next {
                Some(child) => {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    match state.get(child) {
                        Some(Visit::OnStack) => {
                            debug!(?node, ?child, "back-edge found");
                            return Err(DomainError::CycleDetected);
                        }
                        Some(Visit::Done) => {}
                        None => {
                            state.insert(child, Visit::OnStack);
                            stack.push((child, 0));
                        }
                    }
                }
                None => {
                    state.insert(node, Visit::Done);
                    stack.pop();
                }
            }
        }
    }

    Ok(())
}

/// Nodes trapped in a cycle are unreachable from any root, so the count falls short.
#[instrument(level = "debug", skip_all)]
fn check_node_count<N>(forest: &Forest<N>, edge_count: usize) -> DomainResult<()> {
    // accumulator starts at 1 for the virtual super-root
    let counted = 1 + forest.node_count();
    if counted - 1 != edge_count {
        debug!(counted, edge_count, "node count does not match edge count");
        return Err(DomainError::CycleDetected);
    }
    Ok(())
}
