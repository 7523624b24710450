//! Build nested forests from flat parent-child edge lists.
//!
//! ```
//! use edgetree::{build_forest, DomainError};
//!
//! let forest = build_forest(vec![(None, "a"), (Some("a"), "b")]).unwrap();
//! assert_eq!(forest.roots().collect::<Vec<_>>(), vec![&"a"]);
//!
//! let cycle = build_forest(vec![(Some("a"), "b"), (Some("b"), "a")]);
//! assert_eq!(cycle.err(), Some(DomainError::CycleDetected));
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{build_forest, CycleCheck, DomainError, Edge, Forest, TreeBuilder};
