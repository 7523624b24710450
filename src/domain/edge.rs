//! Parent-child relationship pairs.

use std::fmt;

/// A single relationship: `child` hangs below `parent`.
///
/// An absent parent declares `child` as a root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge<N> {
    pub parent: Option<N>,
    pub child: N,
}

impl<N> Edge<N> {
    pub fn new(parent: N, child: N) -> Self {
        Self {
            parent: Some(parent),
            child,
        }
    }

    /// Root declaration for `child`.
    pub fn root(child: N) -> Self {
        Self {
            parent: None,
            child,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl<N> From<(Option<N>, N)> for Edge<N> {
    fn from((parent, child): (Option<N>, N)) -> Self {
        Self { parent, child }
    }
}

impl<N: fmt::Display> fmt::Display for Edge<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{} <- {}", parent, self.child),
            None => write!(f, "<root> <- {}", self.child),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_tuple_without_parent_when_converting_then_is_root() {
        let edge: Edge<&str> = (None, "a").into();
        assert!(edge.is_root());
        assert_eq!(edge, Edge::root("a"));
    }

    #[test]
    fn given_edge_when_displaying_then_shows_parent_first() {
        assert_eq!(Edge::new("a", "b").to_string(), "a <- b");
        assert_eq!(Edge::root("c").to_string(), "<root> <- c");
    }
}
