//! Basic-block / edge entity model for the CFG scenes.
//!
//! Blocks and edges carry stable identifiers; structural edits (merging a
//! straight-line chain) are expressed as set operations over those ids, so
//! the scenes never do positional-index bookkeeping across edits.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::error::{VizError, VizResult};

#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct BlockId(pub String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum BranchLabel {
    True,
    False,
}

impl BranchLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    pub from: BlockId,
    pub to: BlockId,
    pub label: Option<BranchLabel>,
}

impl Edge {
    pub fn plain(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: BlockId::new(from),
            to: BlockId::new(to),
            label: None,
        }
    }

    pub fn labeled(from: impl Into<String>, to: impl Into<String>, label: BranchLabel) -> Self {
        Self {
            from: BlockId::new(from),
            to: BlockId::new(to),
            label: Some(label),
        }
    }

    pub fn touches(&self, ids: &BTreeSet<BlockId>) -> bool {
        ids.contains(&self.from) || ids.contains(&self.to)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub statements: Vec<String>,
}

impl BasicBlock {
    pub fn new(id: impl Into<String>, statements: &[&str]) -> Self {
        Self {
            id: BlockId::new(id),
            statements: statements.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Chain of straight-line blocks to collapse, in flow order.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MergePlan {
    pub chain: Vec<BlockId>,
    pub merged_id: BlockId,
}

/// Result of a merge: the new graph plus the delta the scene animates.
#[derive(Clone, Debug)]
pub struct MergeOutcome {
    pub graph: FlowGraph,
    pub merged: BasicBlock,
    pub removed_edges: Vec<Edge>,
    pub added_edges: Vec<Edge>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FlowGraph {
    pub blocks: BTreeMap<BlockId, BasicBlock>,
    pub edges: Vec<Edge>,
}

impl FlowGraph {
    pub fn new(blocks: Vec<BasicBlock>, edges: Vec<Edge>) -> VizResult<Self> {
        let mut map = BTreeMap::new();
        for block in blocks {
            if map.insert(block.id.clone(), block).is_some() {
                return Err(VizError::validation("duplicate basic block id"));
            }
        }
        let graph = Self { blocks: map, edges };
        graph.validate()?;
        Ok(graph)
    }

    pub fn validate(&self) -> VizResult<()> {
        for edge in &self.edges {
            if !self.blocks.contains_key(&edge.from) {
                return Err(VizError::validation(format!(
                    "edge references unknown source block '{}'",
                    edge.from
                )));
            }
            if !self.blocks.contains_key(&edge.to) {
                return Err(VizError::validation(format!(
                    "edge references unknown destination block '{}'",
                    edge.to
                )));
            }
        }
        for (i, a) in self.edges.iter().enumerate() {
            for b in &self.edges[i + 1..] {
                if a.from == b.from && a.to == b.to {
                    return Err(VizError::validation(format!(
                        "duplicate edge {} -> {}",
                        a.from, a.to
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn block(&self, id: &BlockId) -> VizResult<&BasicBlock> {
        self.blocks
            .get(id)
            .ok_or_else(|| VizError::validation(format!("unknown basic block '{id}'")))
    }

    pub fn successors(&self, id: &BlockId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| &e.from == id).collect()
    }

    pub fn predecessors(&self, id: &BlockId) -> Vec<&Edge> {
        self.edges.iter().filter(|e| &e.to == id).collect()
    }

    /// Edges with at least one endpoint in `ids`, in declaration order.
    pub fn edges_incident(&self, ids: &BTreeSet<BlockId>) -> Vec<Edge> {
        self.edges
            .iter()
            .filter(|e| e.touches(ids))
            .cloned()
            .collect()
    }

    /// Collapse a straight-line chain into one block.
    ///
    /// Every block in the chain must have exactly one predecessor and one
    /// successor, and consecutive chain entries must be linked in order.
    /// The merged block concatenates the chain's statement lists; edges
    /// incident to the chain are dropped and replaced by exactly two new
    /// edges (predecessor -> merged, merged -> successor). All other edges
    /// survive untouched.
    pub fn merge_chain(&self, plan: &MergePlan) -> VizResult<MergeOutcome> {
        if plan.chain.len() < 2 {
            return Err(VizError::validation(
                "merge chain must contain at least two blocks",
            ));
        }

        let chain_set: BTreeSet<BlockId> = plan.chain.iter().cloned().collect();
        if chain_set.len() != plan.chain.len() {
            return Err(VizError::validation("merge chain repeats a block"));
        }

        for id in &plan.chain {
            self.block(id)?;
            let preds = self.predecessors(id);
            let succs = self.successors(id);
            if preds.len() != 1 || succs.len() != 1 {
                return Err(VizError::validation(format!(
                    "block '{id}' is not mergeable: {} predecessor(s), {} successor(s)",
                    preds.len(),
                    succs.len()
                )));
            }
        }

        for pair in plan.chain.windows(2) {
            let next = &self.successors(&pair[0])[0].to;
            if next != &pair[1] {
                return Err(VizError::validation(format!(
                    "merge chain is not linked: '{}' does not flow into '{}'",
                    pair[0], pair[1]
                )));
            }
        }

        let entry = plan.chain.first().expect("chain checked non-empty");
        let exit = plan.chain.last().expect("chain checked non-empty");
        let pred = self.predecessors(entry)[0].from.clone();
        let succ = self.successors(exit)[0].to.clone();
        if chain_set.contains(&pred) || chain_set.contains(&succ) {
            return Err(VizError::validation(
                "merge chain must not loop onto itself",
            ));
        }
        if self.blocks.contains_key(&plan.merged_id) {
            return Err(VizError::validation(format!(
                "merged block id '{}' collides with an existing block",
                plan.merged_id
            )));
        }

        let merged = BasicBlock {
            id: plan.merged_id.clone(),
            statements: plan
                .chain
                .iter()
                .flat_map(|id| self.blocks[id].statements.iter().cloned())
                .collect(),
        };

        let removed_edges = self.edges_incident(&chain_set);
        let added_edges = vec![
            Edge {
                from: pred,
                to: plan.merged_id.clone(),
                label: None,
            },
            Edge {
                from: plan.merged_id.clone(),
                to: succ,
                label: None,
            },
        ];

        let mut blocks: Vec<BasicBlock> = self
            .blocks
            .values()
            .filter(|b| !chain_set.contains(&b.id))
            .cloned()
            .collect();
        blocks.push(merged.clone());

        let mut edges: Vec<Edge> = self
            .edges
            .iter()
            .filter(|e| !e.touches(&chain_set))
            .cloned()
            .collect();
        edges.extend(added_edges.iter().cloned());

        Ok(MergeOutcome {
            graph: FlowGraph::new(blocks, edges)?,
            merged,
            removed_edges,
            added_edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_graph() -> FlowGraph {
        FlowGraph::new(
            vec![
                BasicBlock::new("a", &["s0;"]),
                BasicBlock::new("b", &["s1;"]),
                BasicBlock::new("c", &["s2;"]),
                BasicBlock::new("d", &["s3;"]),
            ],
            vec![
                Edge::plain("a", "b"),
                Edge::plain("b", "c"),
                Edge::plain("c", "d"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_edge_to_unknown_block() {
        let err = FlowGraph::new(
            vec![BasicBlock::new("a", &[])],
            vec![Edge::plain("a", "ghost")],
        );
        assert!(err.is_err());
    }

    #[test]
    fn merge_concatenates_statements_in_chain_order() {
        let g = chain_graph();
        let plan = MergePlan {
            chain: vec![BlockId::new("b"), BlockId::new("c")],
            merged_id: BlockId::new("bc"),
        };
        let out = g.merge_chain(&plan).unwrap();
        assert_eq!(out.merged.statements, vec!["s1;", "s2;"]);
        assert_eq!(out.graph.blocks.len(), 3);
        assert_eq!(out.graph.edges.len(), 2);
        assert_eq!(out.removed_edges.len(), 3);
        assert_eq!(out.added_edges.len(), 2);
    }

    #[test]
    fn merge_rejects_branchy_blocks() {
        let g = FlowGraph::new(
            vec![
                BasicBlock::new("a", &[]),
                BasicBlock::new("b", &[]),
                BasicBlock::new("c", &[]),
                BasicBlock::new("d", &[]),
            ],
            vec![
                Edge::plain("a", "b"),
                Edge::labeled("b", "c", BranchLabel::True),
                Edge::labeled("b", "d", BranchLabel::False),
            ],
        )
        .unwrap();
        let plan = MergePlan {
            chain: vec![BlockId::new("a"), BlockId::new("b")],
            merged_id: BlockId::new("ab"),
        };
        assert!(g.merge_chain(&plan).is_err());
    }

    #[test]
    fn merge_rejects_unlinked_chain() {
        let g = chain_graph();
        let plan = MergePlan {
            chain: vec![BlockId::new("c"), BlockId::new("b")],
            merged_id: BlockId::new("cb"),
        };
        assert!(g.merge_chain(&plan).is_err());
    }

    #[test]
    fn merge_rejects_colliding_merged_id() {
        let g = chain_graph();
        let plan = MergePlan {
            chain: vec![BlockId::new("b"), BlockId::new("c")],
            merged_id: BlockId::new("a"),
        };
        assert!(g.merge_chain(&plan).is_err());
    }
}
