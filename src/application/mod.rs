//! Application layer: edge list input, rendering and orchestration

pub mod error;
pub mod parser;
pub mod render;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use parser::{EdgeParser, InputFormat};
pub use render::{render, OutputFormat};
pub use services::{ForestService, ForestSummary};
