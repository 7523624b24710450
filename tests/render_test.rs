//! Tests for rendering deep forests

use rstest::{fixture, rstest};

use edgetree::application::{render, OutputFormat};
use edgetree::domain::{build_forest, Edge, Forest};

fn chain(levels: usize) -> Forest<String> {
    let ids: Vec<String> = (0..levels).map(|i| format!("a{i}")).collect();
    let mut edges = vec![Edge::root(ids[0].clone())];
    edges.extend(ids.windows(2).map(|w| Edge::new(w[0].clone(), w[1].clone())));
    build_forest(edges).unwrap()
}

#[fixture]
fn thousand_levels() -> Forest<String> {
    chain(1000)
}

#[rstest]
fn given_thousand_level_chain_when_rendering_json_then_nests_every_level(
    thousand_levels: Forest<String>,
) {
    let rendered = render(&thousand_levels, OutputFormat::Json).unwrap();
    let lines: Vec<&str> = rendered.lines().collect();

    // opening brace, one line per node, one closing line per inner node, final brace
    assert_eq!(lines.len(), 2 * 1000 + 1);
    assert_eq!(lines[1], "  \"a0\": {");
    assert_eq!(lines[1000], format!("{}\"a999\": {{}}", "  ".repeat(1000)));
    assert_eq!(lines[1001], format!("{}}}", "  ".repeat(999)));
    assert_eq!(lines[2000], "}");
}

#[rstest]
fn given_thousand_level_chain_when_rendering_tree_then_indents_every_level(
    thousand_levels: Forest<String>,
) {
    let rendered = render(&thousand_levels, OutputFormat::Tree).unwrap();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 1000);
    assert_eq!(lines[0], "a0");
    assert_eq!(lines[1], "└── a1");
    assert_eq!(lines[999], format!("{}└── a999", "    ".repeat(998)));
}

#[test]
fn given_chain_far_beyond_call_stack_when_rendering_json_then_completes() {
    let levels = 4000;
    let forest = chain(levels);

    let rendered = render(&forest, OutputFormat::Json).unwrap();

    let deepest = format!("\n{}\"a{}\": {{}}\n", "  ".repeat(levels), levels - 1);
    assert!(rendered.contains(&deepest));
    assert_eq!(rendered.lines().count(), 2 * levels + 1);
}

#[test]
fn given_chain_far_beyond_call_stack_when_rendering_tree_then_completes() {
    let levels = 2000;
    let forest = chain(levels);

    let rendered = render(&forest, OutputFormat::Tree).unwrap();

    let last = rendered.lines().last().unwrap();
    assert_eq!(last, format!("{}└── a{}", "    ".repeat(levels - 2), levels - 1));
}

#[rstest]
#[case::branches(OutputFormat::Branches)]
#[case::roots(OutputFormat::Roots)]
#[case::leaves(OutputFormat::Leaves)]
fn given_deep_chain_when_rendering_flat_formats_then_lists_one_line(
    #[case] format: OutputFormat,
) {
    let forest = chain(5000);

    let rendered = render(&forest, format).unwrap();

    assert_eq!(rendered.lines().count(), 1);
}
