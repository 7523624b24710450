//! Text renderings of a forest.

use std::fmt;

use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use termtree::GlyphPalette;

use crate::application::error::ApplicationResult;
use crate::domain::{Forest, Step};

/// Output representation of a built forest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Indented tree drawing, one per root
    #[default]
    Tree,
    /// Nested JSON mapping
    Json,
    /// Root-to-leaf paths
    Branches,
    /// Root identifiers
    Roots,
    /// Leaf identifiers
    Leaves,
}

/// Render `forest` in `format`; the result ends with a newline unless empty.
///
/// Every format walks the forest with an explicit stack, so depth is only bounded by memory.
pub fn render<N>(forest: &Forest<N>, format: OutputFormat) -> ApplicationResult<String>
where
    N: fmt::Display,
{
    let rendered: String = match format {
        OutputFormat::Tree => draw_tree(forest),
        OutputFormat::Json => nested_json(forest)?,
        OutputFormat::Branches => lines(
            forest
                .branches()
                .iter()
                .map(|branch| branch.iter().join(" <- ")),
        ),
        OutputFormat::Roots => lines(forest.roots()),
        OutputFormat::Leaves => lines(forest.leaf_nodes()),
    };
    Ok(rendered)
}

/// Same layout and glyphs as `termtree`.
fn draw_tree<N: fmt::Display>(forest: &Forest<N>) -> String {
    let glyphs = GlyphPalette::new();
    let mut out = String::new();
    // per open non-root ancestor: was it the last sibling
    let mut open: Vec<bool> = Vec::new();

    for step in forest.walk() {
        match step {
            Step::Enter { id, depth: 1, .. } => out.push_str(&format!("{id}\n")),
            Step::Enter { id, last, .. } => {
                for &ancestor_last in &open {
                    let skip = if ancestor_last { glyphs.last_skip } else { glyphs.middle_skip };
                    out.push_str(skip);
                    out.push_str(glyphs.skip_indent);
                }
                let item = if last { glyphs.last_item } else { glyphs.middle_item };
                out.push_str(&format!("{item}{}{id}\n", glyphs.item_indent));
                open.push(last);
            }
            Step::Leave { depth: 1, .. } => {}
            Step::Leave { .. } => {
                open.pop();
            }
        }
    }

    out
}

/// Pretty nested mapping matching `serde_json::to_string_pretty` of the forest.
fn nested_json<N: fmt::Display>(forest: &Forest<N>) -> ApplicationResult<String> {
    if forest.root_count() == 0 {
        return Ok("{}\n".to_string());
    }

    let mut out = String::from("{");
    for step in forest.walk() {
        match step {
            Step::Enter {
                id,
                depth,
                first,
                leaf,
                ..
            } => {
                if !first {
                    out.push(',');
                }
                out.push('\n');
                indent(&mut out, depth);
                out.push_str(&serde_json::to_string(&id.to_string())?);
                out.push_str(if leaf { ": {}" } else { ": {" });
            }
            Step::Leave { depth, leaf: false } => {
                out.push('\n');
                indent(&mut out, depth);
                out.push('}');
            }
            Step::Leave { .. } => {}
        }
    }
    out.push_str("\n}\n");
    Ok(out)
}

fn indent(out: &mut String, depth: usize) {
    out.extend(std::iter::repeat("  ").take(depth));
}

fn lines<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    items.into_iter().map(|item| format!("{item}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_forest, Edge};
    use rstest::rstest;

    fn forest() -> Forest<String> {
        build_forest(vec![
            Edge::root("a".to_string()),
            Edge::new("a".to_string(), "b".to_string()),
            Edge::new("b".to_string(), "c".to_string()),
            Edge::new("a".to_string(), "d".to_string()),
            Edge::root("e".to_string()),
        ])
        .unwrap()
    }

    #[rstest]
    #[case::tree(OutputFormat::Tree, "a\n├── b\n│   └── c\n└── d\ne\n")]
    #[case::branches(OutputFormat::Branches, "a <- b <- c\na <- d\ne\n")]
    #[case::roots(OutputFormat::Roots, "a\ne\n")]
    #[case::leaves(OutputFormat::Leaves, "c\nd\ne\n")]
    fn given_forest_when_rendering_then_matches(
        #[case] format: OutputFormat,
        #[case] expected: &str,
    ) {
        assert_eq!(render(&forest(), format).unwrap(), expected);
    }

    #[test]
    fn given_forest_when_rendering_json_then_matches_serde_pretty_output() {
        let forest = forest();

        let rendered = render(&forest, OutputFormat::Json).unwrap();

        assert_eq!(
            rendered,
            format!("{}\n", serde_json::to_string_pretty(&forest).unwrap())
        );
    }

    #[test]
    fn given_forest_when_rendering_tree_then_matches_termtree_output() {
        let forest = forest();
        let expected: String = forest.to_termtree().iter().map(ToString::to_string).collect();

        assert_eq!(render(&forest, OutputFormat::Tree).unwrap(), expected);
    }

    #[test]
    fn given_quoted_ids_when_rendering_json_then_escapes_keys() {
        let forest = build_forest(vec![Edge::root("say \"hi\"".to_string())]).unwrap();

        let rendered = render(&forest, OutputFormat::Json).unwrap();

        assert_eq!(rendered, "{\n  \"say \\\"hi\\\"\": {}\n}\n");
    }

    #[test]
    fn given_empty_forest_when_rendering_json_then_is_empty_mapping() {
        let forest = build_forest(Vec::<Edge<String>>::new()).unwrap();
        assert_eq!(render(&forest, OutputFormat::Json).unwrap(), "{}\n");
    }

    #[test]
    fn given_forest_when_rendering_json_then_is_nested_mapping() {
        let rendered = render(&forest(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"a": {"b": {"c": {}}, "d": {}}, "e": {}})
        );
    }
}
