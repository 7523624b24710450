//! Domain layer: edges, node arena, forest and the tree builder
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod edge;
pub mod error;
pub mod forest;

pub use arena::{NodeArena, NodeRecord};
pub use builder::{build_forest, CycleCheck, TreeBuilder};
pub use edge::Edge;
pub use error::{DomainError, DomainResult};
pub use forest::{Forest, ForestIterator, Step, Walk, MAX_SERIALIZE_DEPTH};
