//! The worked example every scene draws from: one small C-like function,
//! its token stream, grammar rules, AST, and two control-flow graphs.
//!
//! Scenes read this data and lay it out; nothing in here knows about
//! shapes, frames, or animation.

use crate::core::Point;
use crate::error::VizResult;
use crate::graph::{BasicBlock, BlockId, BranchLabel, Edge, FlowGraph, MergePlan};
use crate::style::Hue;

/// The source program, one entry per line, indentation included.
pub fn source_lines() -> Vec<&'static str> {
    vec![
        "int checkGrade() {",
        "    int grade = 0;",
        "    int score = 70;",
        "    if (score >= 90) {",
        "        grade = 1;",
        "    } else {",
        "        grade = 2;",
        "    }",
        "    return grade;",
        "}",
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TokenCategory {
    Keyword,
    Identifier,
    Operator,
    Literal,
    Delimiter,
}

impl TokenCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Identifier => "identifier",
            Self::Operator => "operator",
            Self::Literal => "literal",
            Self::Delimiter => "delimiter",
        }
    }

    pub fn hue(self) -> Hue {
        match self {
            Self::Keyword => Hue::Yellow,
            Self::Identifier => Hue::Green,
            Self::Operator => Hue::Red,
            Self::Literal => Hue::Blue,
            Self::Delimiter => Hue::White,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Token {
    pub lexeme: &'static str,
    pub category: TokenCategory,
}

/// The token stream of the program, in source order.
pub fn tokens() -> Vec<Token> {
    use TokenCategory::*;
    let raw: [(&str, TokenCategory); 33] = [
        ("int", Keyword),
        ("checkGrade", Identifier),
        ("(", Delimiter),
        (")", Delimiter),
        ("{", Delimiter),
        ("int", Keyword),
        ("grade", Identifier),
        ("=", Operator),
        ("0", Literal),
        (";", Delimiter),
        ("if", Keyword),
        ("(", Delimiter),
        ("score", Identifier),
        (">=", Operator),
        ("90", Literal),
        (")", Delimiter),
        ("{", Delimiter),
        ("grade", Identifier),
        ("=", Operator),
        ("1", Literal),
        (";", Delimiter),
        ("}", Delimiter),
        ("else", Keyword),
        ("{", Delimiter),
        ("grade", Identifier),
        ("=", Operator),
        ("2", Literal),
        (";", Delimiter),
        ("}", Delimiter),
        ("return", Keyword),
        ("grade", Identifier),
        (";", Delimiter),
        ("}", Delimiter),
    ];
    raw.into_iter()
        .map(|(lexeme, category)| Token { lexeme, category })
        .collect()
}

pub const GRAMMAR_HEADER: &str = "Parse rules:";

pub fn grammar_rules() -> Vec<&'static str> {
    vec![
        "1. FunctionDeclaration -> int IDENTIFIER ( ) { BlockStatement }",
        "2. BlockStatement -> Statement*",
        "3. Statement -> VariableDeclaration | IfStatement | ReturnStatement",
        "4. VariableDeclaration -> int IDENTIFIER [= Expression];",
        "5. IfStatement -> if ( Expression ) Statement [else Statement]",
        "6. ReturnStatement -> return [Expression];",
    ]
}

#[derive(Clone, Debug)]
pub struct AstNode {
    pub id: &'static str,
    pub lines: Vec<&'static str>,
    pub hue: Hue,
    pub pos: Point,
}

/// The tree for `checkGrade`, positions in scene units.
pub fn ast_nodes() -> Vec<AstNode> {
    let node = |id, lines: &[&'static str], hue, x, y| AstNode {
        id,
        lines: lines.to_vec(),
        hue,
        pos: Point::new(x, y),
    };
    vec![
        node("program", &["Program"], Hue::Blue, 0.0, 3.5),
        node(
            "func_decl",
            &["FunctionDeclaration", "checkGrade"],
            Hue::Green,
            0.0,
            2.5,
        ),
        node("block", &["BlockStatement"], Hue::Yellow, 0.0, 1.5),
        node(
            "var_grade",
            &["VariableDeclaration", "int grade = 0"],
            Hue::Orange,
            -4.5,
            -0.5,
        ),
        node(
            "var_score",
            &["VariableDeclaration", "int score = 70"],
            Hue::Orange,
            -1.5,
            -0.5,
        ),
        node("if_stmt", &["IfStatement"], Hue::Red, 1.5, -0.5),
        node(
            "ret",
            &["ReturnStatement", "return grade"],
            Hue::Blue,
            4.5,
            -0.5,
        ),
        node(
            "cond",
            &["BinaryExpression", ">=", "score, 90"],
            Hue::Purple,
            1.5,
            -1.8,
        ),
        node(
            "then_assign",
            &["AssignmentStatement", "grade = 1"],
            Hue::Green,
            0.3,
            -3.2,
        ),
        node(
            "else_assign",
            &["AssignmentStatement", "grade = 2"],
            Hue::Green,
            2.7,
            -3.2,
        ),
    ]
}

/// Parent/child pairs, one per connector.
pub fn ast_edges() -> Vec<(&'static str, &'static str)> {
    vec![
        ("program", "func_decl"),
        ("func_decl", "block"),
        ("block", "var_grade"),
        ("block", "var_score"),
        ("block", "if_stmt"),
        ("block", "ret"),
        ("if_stmt", "cond"),
        ("if_stmt", "then_assign"),
        ("if_stmt", "else_assign"),
    ]
}

#[derive(Clone, Debug)]
pub struct RevealStage {
    pub node_ids: Vec<&'static str>,
    pub secs: f64,
}

/// Top-down reveal order for the tree. Each stage draws the named nodes
/// together with the connectors that point into them.
pub fn ast_reveal_stages() -> Vec<RevealStage> {
    let stage = |ids: &[&'static str], secs| RevealStage {
        node_ids: ids.to_vec(),
        secs,
    };
    vec![
        stage(&["program"], 0.5),
        stage(&["func_decl"], 0.5),
        stage(&["block"], 0.5),
        stage(&["var_grade", "var_score"], 1.0),
        stage(&["if_stmt"], 0.5),
        stage(&["cond", "then_assign", "else_assign"], 1.5),
        stage(&["ret"], 0.5),
    ]
}

pub const BOUNDARY_HEADER: &str = "Basic block boundary rules:";

pub fn boundary_rules() -> Vec<&'static str> {
    vec![
        "- function entry starts a new block",
        "- control flow (if/while/for/return) ends the block",
        "- a control flow target starts a new block",
        "- function exit ends the block",
    ]
}

#[derive(Clone, Debug)]
pub struct MarkedLine {
    pub text: &'static str,
    pub hue: Hue,
}

/// The program with block boundary markers spliced in.
pub fn marked_code() -> Vec<MarkedLine> {
    let line = |text, hue| MarkedLine { text, hue };
    vec![
        line("[block 0 starts]", Hue::Green),
        line("int grade = 0;", Hue::White),
        line("int score = 70;", Hue::White),
        line("[block 1 starts] if (score >= 90) {", Hue::Orange),
        line("[block 2 starts]     grade = 1;", Hue::White),
        line("[block 1 ends] } else {", Hue::Orange),
        line("[block 3 starts]     grade = 2;", Hue::White),
        line("[block 1 ends] }", Hue::Orange),
        line("[block 4 starts] return grade;", Hue::Purple),
        line("[block 4 ends]", Hue::Purple),
    ]
}

#[derive(Clone, Debug)]
pub struct Placement {
    pub id: BlockId,
    pub hue: Hue,
    pub pos: Point,
}

/// A flow graph paired with where and how its blocks are drawn.
#[derive(Clone, Debug)]
pub struct CfgFigure {
    pub graph: FlowGraph,
    pub placements: Vec<Placement>,
    pub scale: f64,
}

impl CfgFigure {
    pub fn placement(&self, id: &BlockId) -> Option<&Placement> {
        self.placements.iter().find(|p| &p.id == id)
    }
}

fn placement(id: &str, hue: Hue, x: f64, y: f64) -> Placement {
    Placement {
        id: BlockId::new(id),
        hue,
        pos: Point::new(x, y),
    }
}

fn grade_graph() -> VizResult<FlowGraph> {
    FlowGraph::new(
        vec![
            BasicBlock::new("entry_block", &["int grade = 0;", "int score = 70;"]),
            BasicBlock::new("block_1", &["if (score >= 90)"]),
            BasicBlock::new("block_2", &["grade = 1;"]),
            BasicBlock::new("block_3", &["grade = 2;"]),
            BasicBlock::new("block_4", &["return grade;"]),
            BasicBlock::new("exit_block", &[]),
        ],
        vec![
            Edge::plain("entry_block", "block_1"),
            Edge::labeled("block_1", "block_2", BranchLabel::True),
            Edge::labeled("block_1", "block_3", BranchLabel::False),
            Edge::plain("block_2", "block_4"),
            Edge::plain("block_3", "block_4"),
            Edge::plain("block_4", "exit_block"),
        ],
    )
}

/// The `checkGrade` CFG, laid out for the block-construction still.
pub fn grade_cfg_loose() -> VizResult<CfgFigure> {
    Ok(CfgFigure {
        graph: grade_graph()?,
        placements: vec![
            placement("entry_block", Hue::Green, 0.0, 2.5),
            placement("block_1", Hue::Orange, 0.0, 0.8),
            placement("block_2", Hue::Yellow, -2.5, -0.5),
            placement("block_3", Hue::Yellow, 2.5, -0.5),
            placement("block_4", Hue::Purple, 0.0, -1.8),
            placement("exit_block", Hue::Red, 0.0, -3.2),
        ],
        scale: 0.6,
    })
}

/// The `checkGrade` CFG, laid out for the finished-graph still.
pub fn grade_cfg_final() -> VizResult<CfgFigure> {
    Ok(CfgFigure {
        graph: grade_graph()?,
        placements: vec![
            placement("entry_block", Hue::Green, 0.0, 2.8),
            placement("block_1", Hue::Orange, 0.0, 1.0),
            placement("block_2", Hue::Yellow, -3.0, -0.3),
            placement("block_3", Hue::Yellow, 3.0, -0.3),
            placement("block_4", Hue::Purple, 0.0, -1.6),
            placement("exit_block", Hue::Red, 0.0, -3.0),
        ],
        scale: 0.65,
    })
}

/// The second worked example: a CFG with a straight-line chain worth
/// merging (block_1 through block_3).
pub fn merge_cfg() -> VizResult<CfgFigure> {
    Ok(CfgFigure {
        graph: FlowGraph::new(
            vec![
                BasicBlock::new("entry_block", &["int x = 0;", "int y = 1;"]),
                BasicBlock::new("block_1", &["x = x + 1;"]),
                BasicBlock::new("block_2", &["y = y * 2;"]),
                BasicBlock::new("block_3", &["int z = x + y;"]),
                BasicBlock::new("block_4", &["if (z > 10)"]),
                BasicBlock::new("block_5", &["x = 100;"]),
                BasicBlock::new("block_6", &["x = 200;"]),
                BasicBlock::new("block_7", &["return x;"]),
                BasicBlock::new("exit_block", &[]),
            ],
            vec![
                Edge::plain("entry_block", "block_1"),
                Edge::plain("block_1", "block_2"),
                Edge::plain("block_2", "block_3"),
                Edge::plain("block_3", "block_4"),
                Edge::labeled("block_4", "block_5", BranchLabel::True),
                Edge::labeled("block_4", "block_6", BranchLabel::False),
                Edge::plain("block_5", "block_7"),
                Edge::plain("block_6", "block_7"),
                Edge::plain("block_7", "exit_block"),
            ],
        )?,
        placements: vec![
            placement("entry_block", Hue::Green, -4.0, 3.0),
            placement("block_1", Hue::Yellow, -1.5, 3.0),
            placement("block_2", Hue::Yellow, 1.0, 3.0),
            placement("block_3", Hue::Yellow, 3.5, 3.0),
            placement("block_4", Hue::Orange, 0.0, 0.5),
            placement("block_5", Hue::Yellow, -2.5, -1.5),
            placement("block_6", Hue::Yellow, 2.5, -1.5),
            placement("block_7", Hue::Purple, 0.0, -3.0),
            placement("exit_block", Hue::Red, 0.0, -4.5),
        ],
        scale: 0.5,
    })
}

/// Collapse the straight-line chain of the merge example.
pub fn merge_plan() -> MergePlan {
    MergePlan {
        chain: vec![
            BlockId::new("block_1"),
            BlockId::new("block_2"),
            BlockId::new("block_3"),
        ],
        merged_id: BlockId::new("merged_block"),
    }
}

/// Where the merged block lands, replacing the chain.
pub fn merged_block_placement() -> Placement {
    placement("merged_block", Hue::Green, 0.0, 3.0)
}

pub const MERGE_RULE_HEADER: &str = "Merge rules:";

pub fn merge_rules() -> Vec<&'static str> {
    vec![
        "- block A has exactly one successor B",
        "- block B has exactly one predecessor A",
        "- both hold, so the blocks merge",
    ]
}

pub const MERGEABLE_ANNOTATION: &str = "mergeable";

pub fn merge_note() -> Vec<&'static str> {
    vec![
        "Merge complete:",
        "block_1, block_2, block_3",
        "collapsed into one block",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn token_stream_matches_the_program() {
        let toks = tokens();
        assert_eq!(toks.len(), 33);
        assert_eq!(toks[0].lexeme, "int");
        assert_eq!(toks[0].category, TokenCategory::Keyword);
        assert_eq!(toks[13].lexeme, ">=");
        assert_eq!(toks[13].category, TokenCategory::Operator);
        assert_eq!(toks[32].lexeme, "}");
    }

    #[test]
    fn ast_is_a_tree() {
        let nodes = ast_nodes();
        let edges = ast_edges();
        assert_eq!(edges.len(), nodes.len() - 1);

        let ids: BTreeSet<&str> = nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids.len(), nodes.len());
        for (parent, child) in &edges {
            assert!(ids.contains(parent));
            assert!(ids.contains(child));
        }

        // every non-root node is pointed at by exactly one connector
        for node in &nodes {
            let incoming = edges.iter().filter(|(_, c)| *c == node.id).count();
            let expected = if node.id == "program" { 0 } else { 1 };
            assert_eq!(incoming, expected, "node {}", node.id);
        }
    }

    #[test]
    fn reveal_stages_cover_every_node_once() {
        let mut seen = BTreeSet::new();
        for stage in ast_reveal_stages() {
            for id in stage.node_ids {
                assert!(seen.insert(id), "node {id} revealed twice");
            }
        }
        assert_eq!(seen.len(), ast_nodes().len());
    }

    #[test]
    fn grade_cfg_branches_once() {
        let fig = grade_cfg_final().unwrap();
        assert_eq!(fig.graph.blocks.len(), 6);
        assert_eq!(fig.graph.edges.len(), 6);
        let labeled: Vec<_> = fig
            .graph
            .edges
            .iter()
            .filter_map(|e| e.label.map(|l| (e.from.clone(), l)))
            .collect();
        assert_eq!(labeled.len(), 2);
        assert!(labeled.iter().all(|(from, _)| from.0 == "block_1"));
    }

    #[test]
    fn every_block_has_a_placement() {
        for fig in [
            grade_cfg_loose().unwrap(),
            grade_cfg_final().unwrap(),
            merge_cfg().unwrap(),
        ] {
            assert_eq!(fig.placements.len(), fig.graph.blocks.len());
            for id in fig.graph.blocks.keys() {
                assert!(fig.placement(id).is_some(), "missing placement for {id}");
            }
        }
    }

    #[test]
    fn merge_plan_applies_to_the_merge_example() {
        let fig = merge_cfg().unwrap();
        let out = fig.graph.merge_chain(&merge_plan()).unwrap();
        assert_eq!(out.graph.blocks.len(), 7);
        assert_eq!(out.graph.edges.len(), 7);
        assert_eq!(out.removed_edges.len(), 4);
        assert_eq!(out.added_edges.len(), 2);
        assert_eq!(
            out.merged.statements,
            vec!["x = x + 1;", "y = y * 2;", "int z = x + y;"]
        );
    }
}
