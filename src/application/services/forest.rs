//! Forest service: read edge lists, build forests, render them.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::parser::{EdgeParser, InputFormat};
use crate::application::render::{render, OutputFormat};
use crate::config::Settings;
use crate::domain::{Edge, Forest, TreeBuilder};

/// Input path meaning "read standard input".
pub const STDIN_PATH: &str = "-";

/// Shape of a built forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestSummary {
    pub edges: usize,
    pub nodes: usize,
    pub roots: usize,
    pub leaves: usize,
    pub depth: usize,
}

impl fmt::Display for ForestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} edges, {} nodes, {} roots, {} leaves, depth {}",
            self.edges, self.nodes, self.roots, self.leaves, self.depth
        )
    }
}

/// Orchestrates parsing, building and rendering with the configured settings.
#[derive(Debug, Clone)]
pub struct ForestService {
    parser: EdgeParser,
    builder: TreeBuilder,
    input_format: InputFormat,
    output_format: OutputFormat,
}

impl ForestService {
    pub fn new(settings: &Settings) -> Self {
        Self {
            parser: EdgeParser::new(settings.root_marker.clone()),
            builder: TreeBuilder::new().with_cycle_check(settings.cycle_check),
            input_format: settings.input,
            output_format: settings.output,
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Read and parse edges from `input`, or stdin when `input` is None or `-`.
    #[instrument(level = "debug", skip(self))]
    pub fn read_edges(&self, input: Option<&Path>) -> ApplicationResult<Vec<Edge<String>>> {
        let path = input.filter(|p| *p != Path::new(STDIN_PATH));
        let content = match path {
            Some(path) => read_file(path)?,
            None => {
                let mut content = String::new();
                std::io::stdin()
                    .read_to_string(&mut content)
                    .map_err(|e| ApplicationError::io("read stdin", e))?;
                content
            }
        };
        self.parse_edges(&content, path)
    }

    /// Parse `content`; `origin` only helps to pick the input format.
    pub fn parse_edges(
        &self,
        content: &str,
        origin: Option<&Path>,
    ) -> ApplicationResult<Vec<Edge<String>>> {
        self.parser.parse(content, self.input_format, origin)
    }

    #[instrument(level = "debug", skip_all, fields(edges = edges.len()))]
    pub fn build(&self, edges: &[Edge<String>]) -> ApplicationResult<Forest<String>> {
        let forest = self.builder.build(edges)?;
        info!(
            nodes = forest.len(),
            roots = forest.root_count(),
            "forest built"
        );
        Ok(forest)
    }

    /// Read, build and render in the configured output format.
    #[instrument(level = "debug", skip(self))]
    pub fn render_input(&self, input: Option<&Path>) -> ApplicationResult<String> {
        let edges = self.read_edges(input)?;
        let forest = self.build(&edges)?;
        render(&forest, self.output_format)
    }

    /// Read and build, reporting only the forest's shape.
    #[instrument(level = "debug", skip(self))]
    pub fn check_input(&self, input: Option<&Path>) -> ApplicationResult<ForestSummary> {
        let edges = self.read_edges(input)?;
        let forest = self.build(&edges)?;
        Ok(Self::summarize(&forest, edges.len()))
    }

    pub fn summarize(forest: &Forest<String>, edges: usize) -> ForestSummary {
        ForestSummary {
            edges,
            nodes: forest.node_count(),
            roots: forest.root_count(),
            leaves: forest.leaf_nodes().len(),
            depth: forest.depth(),
        }
    }
}

fn read_file(path: &Path) -> ApplicationResult<String> {
    if !path.exists() {
        return Err(ApplicationError::InputNotFound(PathBuf::from(path)));
    }
    debug!(?path, "reading edge list");
    std::fs::read_to_string(path)
        .map_err(|e| ApplicationError::io(format!("read {}", path.display()), e))
}
