//! Application services

pub mod forest;

pub use forest::{ForestService, ForestSummary};
