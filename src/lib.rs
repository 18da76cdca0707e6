#![forbid(unsafe_code)]

//! Programmatic animations of compiler front-end concepts: a worked
//! example walks from source code through tokens and grammar rules to an
//! AST, then through basic blocks to a control-flow graph and block
//! merging. Scenes bake into keyframed units and render deterministically
//! through an SVG pipeline to PNG stills or MP4 video.

pub mod anim;
pub mod core;
pub mod ease;
pub mod element;
pub mod encode_ffmpeg;
pub mod error;
pub mod fixture;
pub mod graph;
pub mod layout;
pub mod pipeline;
pub mod raster;
pub mod scene;
pub mod scenes;
pub mod style;
pub mod svg;
pub mod widgets;

pub use anim::Anim;
pub use crate::core::{Canvas, Fps, FrameIndex, FrameRange, Rgba8};
pub use ease::Ease;
pub use error::{VizError, VizResult};
pub use graph::{BasicBlock, BlockId, BranchLabel, Edge, FlowGraph, MergeOutcome, MergePlan};
pub use raster::{FrameRgba, Rasterizer};
pub use scene::{Animation, Scene, SceneRecorder};
pub use scenes::SceneKind;
pub use style::Theme;
