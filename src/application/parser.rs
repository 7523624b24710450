//! Edge list parsing: whitespace separated text or JSON pairs.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::Edge;

/// Default token marking an absent parent in text input.
pub const DEFAULT_ROOT_MARKER: &str = "-";

/// Edge list encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InputFormat {
    /// Pick by file extension; without one, JSON if the content starts with `[`
    #[default]
    Auto,
    /// One `parent child` pair per line
    Text,
    /// Array of `[parent_or_null, child]` pairs
    Json,
}

impl InputFormat {
    /// Resolve `Auto`: an extension decides when present, otherwise the leading character.
    pub fn resolve(self, path: Option<&Path>, content: &str) -> Self {
        match self {
            InputFormat::Auto => match path.and_then(Path::extension) {
                Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
                Some(_) => InputFormat::Text,
                None if content.trim_start().starts_with('[') => InputFormat::Json,
                None => InputFormat::Text,
            },
            explicit => explicit,
        }
    }
}

/// Turns edge list documents into edges.
#[derive(Debug, Clone)]
pub struct EdgeParser {
    root_marker: String,
}

impl Default for EdgeParser {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_MARKER)
    }
}

impl EdgeParser {
    pub fn new(root_marker: impl Into<String>) -> Self {
        Self {
            root_marker: root_marker.into(),
        }
    }

    /// Parse `content`; `origin` only helps to resolve `Auto`.
    pub fn parse(
        &self,
        content: &str,
        format: InputFormat,
        origin: Option<&Path>,
    ) -> ApplicationResult<Vec<Edge<String>>> {
        match format.resolve(origin, content) {
            InputFormat::Json => Self::parse_json(content),
            InputFormat::Text | InputFormat::Auto => self.parse_text(content),
        }
    }

    /// Text format.
    ///
    /// Blank lines and `#` comments are skipped. Each remaining line is one of:
    /// - `child` (root declaration)
    /// - `<root_marker> child` (root declaration)
    /// - `parent child`
    #[instrument(level = "debug", skip_all)]
    pub fn parse_text(&self, content: &str) -> ApplicationResult<Vec<Edge<String>>> {
        let mut edges = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            let line_no = line_no + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = trimmed.split_whitespace().collect();
            let edge = match fields.as_slice() {
                [child] => Edge::root((*child).to_string()),
                [parent, child] if *parent == self.root_marker => Edge::root((*child).to_string()),
                [parent, child] => Edge::new((*parent).to_string(), (*child).to_string()),
                other => {
                    return Err(ApplicationError::InvalidEdge {
                        line: line_no,
                        message: format!("expected 1 or 2 fields, found {}", other.len()),
                    })
                }
            };

            if edge.child == self.root_marker {
                return Err(ApplicationError::InvalidEdge {
                    line: line_no,
                    message: format!("root marker '{}' cannot be a child", self.root_marker),
                });
            }
            edges.push(edge);
        }

        debug!(edges = edges.len(), "parsed text edge list");
        Ok(edges)
    }

    /// JSON format: `[[null, "a"], ["a", "b"]]`.
    #[instrument(level = "debug", skip_all)]
    pub fn parse_json(content: &str) -> ApplicationResult<Vec<Edge<String>>> {
        let pairs: Vec<(Option<String>, String)> = serde_json::from_str(content)?;
        debug!(edges = pairs.len(), "parsed JSON edge list");
        Ok(pairs.into_iter().map(Edge::from).collect())
    }
}
