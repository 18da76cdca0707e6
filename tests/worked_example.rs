//! Properties of the worked example the scenes are built around.

use std::collections::BTreeSet;

use compviz::fixture;
use compviz::fixture::TokenCategory;
use compviz::graph::{BlockId, BranchLabel, MergePlan};

#[test]
fn program_tokenizes_into_33_tokens() {
    let tokens = fixture::tokens();
    assert_eq!(tokens.len(), 33);

    // first statement: int grade = 0;
    let lexemes: Vec<&str> = tokens[5..10].iter().map(|t| t.lexeme).collect();
    assert_eq!(lexemes, ["int", "grade", "=", "0", ";"]);
    let categories: Vec<TokenCategory> = tokens[5..10].iter().map(|t| t.category).collect();
    assert_eq!(
        categories,
        [
            TokenCategory::Keyword,
            TokenCategory::Identifier,
            TokenCategory::Operator,
            TokenCategory::Literal,
            TokenCategory::Delimiter,
        ]
    );
}

#[test]
fn token_lexemes_all_occur_in_the_source() {
    let source = fixture::source_lines().join("\n");
    for token in fixture::tokens() {
        assert!(
            source.contains(token.lexeme),
            "token '{}' not found in source",
            token.lexeme
        );
    }
}

#[test]
fn ast_connector_count_is_node_count_minus_one() {
    assert_eq!(fixture::ast_edges().len(), fixture::ast_nodes().len() - 1);
}

#[test]
fn ast_children_sit_below_their_parents() {
    let nodes = fixture::ast_nodes();
    let pos = |id: &str| nodes.iter().find(|n| n.id == id).unwrap().pos;
    for (parent, child) in fixture::ast_edges() {
        assert!(
            pos(child).y < pos(parent).y,
            "{child} should be below {parent}"
        );
    }
}

#[test]
fn condition_block_has_one_true_and_one_false_edge() {
    let fig = fixture::grade_cfg_final().unwrap();
    let cond = BlockId::new("block_1");
    let out = fig.graph.successors(&cond);
    assert_eq!(out.len(), 2);
    let labels: BTreeSet<&str> = out.iter().map(|e| e.label.unwrap().as_str()).collect();
    assert_eq!(labels, BTreeSet::from(["true", "false"]));

    // unlabeled edges are plain fall-through
    for edge in &fig.graph.edges {
        if edge.from != cond {
            assert!(edge.label.is_none(), "{} -> {}", edge.from, edge.to);
        }
    }
}

#[test]
fn exit_block_is_empty_and_terminal() {
    let fig = fixture::grade_cfg_final().unwrap();
    let exit = BlockId::new("exit_block");
    assert!(fig.graph.block(&exit).unwrap().statements.is_empty());
    assert!(fig.graph.successors(&exit).is_empty());
    assert_eq!(fig.graph.predecessors(&exit).len(), 1);
}

#[test]
fn merging_the_chain_shrinks_nine_to_seven() {
    let fig = fixture::merge_cfg().unwrap();
    assert_eq!(fig.graph.blocks.len(), 9);
    assert_eq!(fig.graph.edges.len(), 9);

    let out = fig.graph.merge_chain(&fixture::merge_plan()).unwrap();
    assert_eq!(out.graph.blocks.len(), 7);
    assert_eq!(out.graph.edges.len(), 7);
    assert_eq!(out.removed_edges.len(), 4);
    assert_eq!(out.added_edges.len(), 2);

    // the merged block carries the chain statements in order
    assert_eq!(
        out.merged.statements,
        ["x = x + 1;", "y = y * 2;", "int z = x + y;"]
    );

    // the branch structure below the chain is untouched
    let cond = BlockId::new("block_4");
    let labels: BTreeSet<Option<BranchLabel>> = out
        .graph
        .successors(&cond)
        .iter()
        .map(|e| e.label)
        .collect();
    assert_eq!(
        labels,
        BTreeSet::from([Some(BranchLabel::True), Some(BranchLabel::False)])
    );
}

#[test]
fn merging_rejects_branching_chains() {
    let fig = fixture::merge_cfg().unwrap();
    // block_4 branches, so a chain through it is not straight-line
    let plan = MergePlan {
        chain: vec![BlockId::new("block_3"), BlockId::new("block_4")],
        merged_id: BlockId::new("bad"),
    };
    assert!(fig.graph.merge_chain(&plan).is_err());

    // block_7 has two predecessors
    let plan = MergePlan {
        chain: vec![BlockId::new("block_5"), BlockId::new("block_7")],
        merged_id: BlockId::new("bad"),
    };
    assert!(fig.graph.merge_chain(&plan).is_err());
}

#[test]
fn boundary_listing_marks_five_blocks() {
    let marked = fixture::marked_code();
    assert_eq!(marked.len(), 10);
    let starts = marked
        .iter()
        .filter(|l| l.text.contains("starts]"))
        .count();
    assert_eq!(starts, 5);
}
