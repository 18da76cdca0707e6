//! The built-in scene scripts.
//!
//! Each scene is a function from (fps, canvas, theme) to a baked
//! [`Scene`]; the scripts drive a [`SceneRecorder`](crate::scene::SceneRecorder)
//! the same way the storyboard drives playback: build units, play batches,
//! wait.

pub mod ast;
pub mod blocks;
pub mod merge;

use crate::core::{Canvas, Fps};
use crate::error::VizResult;
use crate::scene::Scene;
use crate::style::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneKind {
    /// Source code, token stream, grammar rules, then the AST drawn
    /// top-down.
    AstGeneration,
    /// Still: boundary rules and the marked-up listing.
    IdentifyBasicBlocks,
    /// Still: the basic blocks of the worked example, unconnected.
    BuildBasicBlocks,
    /// Still: the finished control-flow graph with branch labels.
    FinalCfg,
    /// Animated: merge a straight-line chain of blocks.
    BlockMerging,
}

impl SceneKind {
    pub const ALL: [SceneKind; 5] = [
        SceneKind::AstGeneration,
        SceneKind::IdentifyBasicBlocks,
        SceneKind::BuildBasicBlocks,
        SceneKind::FinalCfg,
        SceneKind::BlockMerging,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::AstGeneration => "ast_generation",
            Self::IdentifyBasicBlocks => "identify_basic_blocks",
            Self::BuildBasicBlocks => "build_basic_blocks",
            Self::FinalCfg => "final_cfg",
            Self::BlockMerging => "block_merging",
        }
    }

    pub fn build(self, fps: Fps, canvas: Canvas, theme: &Theme) -> VizResult<Scene> {
        match self {
            Self::AstGeneration => ast::build(fps, canvas, theme),
            Self::IdentifyBasicBlocks => blocks::identify_basic_blocks(fps, canvas, theme),
            Self::BuildBasicBlocks => blocks::build_basic_blocks(fps, canvas, theme),
            Self::FinalCfg => blocks::final_cfg(fps, canvas, theme),
            Self::BlockMerging => merge::build(fps, canvas, theme),
        }
    }
}

impl std::fmt::Display for SceneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
