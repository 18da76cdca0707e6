//! SVG document -> pixels, via `usvg`/`resvg`.
//!
//! Text shaping happens here: the generated documents carry `<text>`
//! elements and the parser resolves them against the system font database,
//! so the rasterizer is built once and reused across frames.

use std::sync::Arc;

use crate::core::Canvas;
use crate::error::{VizError, VizResult};

/// One rasterized frame in row-major RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

pub struct Rasterizer {
    opt: usvg::Options<'static>,
}

impl Rasterizer {
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        let opt = usvg::Options {
            fontdb: Arc::new(db),
            ..Default::default()
        };
        Self { opt }
    }

    #[tracing::instrument(skip_all, fields(w = canvas.width, h = canvas.height))]
    pub fn render(&self, svg: &str, canvas: Canvas) -> VizResult<FrameRgba> {
        let tree = usvg::Tree::from_data(svg.as_bytes(), &self.opt)
            .map_err(|e| VizError::render(format!("parse svg tree: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
            .ok_or_else(|| VizError::render("pixmap allocation failed"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        Ok(FrameRgba {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}
