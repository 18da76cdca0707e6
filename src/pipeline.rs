//! One-shot rendering entry points: scene -> SVG / pixels / files.

use std::path::Path;

use crate::{
    core::{FrameIndex, FrameRange},
    encode_ffmpeg::{Mp4Config, Mp4Encoder},
    error::{VizError, VizResult},
    raster::{FrameRgba, Rasterizer},
    scene::Scene,
    style::Theme,
    svg::scene_frame_svg,
};

fn check_frame(scene: &Scene, frame: FrameIndex) -> VizResult<()> {
    if frame.0 >= scene.duration.0 {
        return Err(VizError::render(format!(
            "frame {} out of range (scene '{}' has {} frames)",
            frame.0, scene.name, scene.duration.0
        )));
    }
    Ok(())
}

/// Generate the SVG document for one frame.
pub fn render_svg(scene: &Scene, frame: FrameIndex, theme: &Theme) -> VizResult<String> {
    check_frame(scene, frame)?;
    Ok(scene_frame_svg(scene, frame, theme))
}

/// Rasterize one frame to premultiplied RGBA8.
#[tracing::instrument(skip_all, fields(scene = %scene.name, frame = frame.0))]
pub fn render_frame(
    scene: &Scene,
    frame: FrameIndex,
    rasterizer: &Rasterizer,
    theme: &Theme,
) -> VizResult<FrameRgba> {
    let svg = render_svg(scene, frame, theme)?;
    rasterizer.render(&svg, scene.canvas)
}

/// Rasterize one frame and write it as a PNG.
///
/// The scene background is painted into every frame, so the output carries
/// no transparency and the premultiplied pixel data can be saved directly.
#[tracing::instrument(skip_all, fields(scene = %scene.name, frame = frame.0))]
pub fn render_png(
    scene: &Scene,
    frame: FrameIndex,
    rasterizer: &Rasterizer,
    theme: &Theme,
    out_path: &Path,
) -> VizResult<()> {
    let pixels = render_frame(scene, frame, rasterizer, theme)?;
    crate::encode_ffmpeg::ensure_parent_dir(out_path)?;
    let img = image::RgbaImage::from_raw(pixels.width, pixels.height, pixels.data)
        .ok_or_else(|| VizError::render("pixel buffer size mismatch"))?;
    use anyhow::Context as _;
    img.save(out_path)
        .with_context(|| format!("failed to write png '{}'", out_path.display()))?;
    tracing::info!(path = %out_path.display(), "wrote png");
    Ok(())
}

/// Render a frame range and pipe it into `ffmpeg` as an MP4.
#[tracing::instrument(skip_all, fields(scene = %scene.name))]
pub fn render_to_mp4(
    scene: &Scene,
    range: FrameRange,
    rasterizer: &Rasterizer,
    theme: &Theme,
    out_path: impl Into<std::path::PathBuf>,
) -> VizResult<()> {
    if range.is_empty() {
        return Err(VizError::validation("render range must be non-empty"));
    }
    if range.end.0 > scene.duration.0 {
        return Err(VizError::validation(
            "render range must be within scene duration",
        ));
    }

    let cfg = Mp4Config::new(out_path, scene.canvas, scene.fps);
    let mut enc = Mp4Encoder::new(cfg, theme.background)?;
    for f in range.start.0..range.end.0 {
        let frame = render_frame(scene, FrameIndex(f), rasterizer, theme)?;
        enc.encode_frame(&frame)?;
    }
    enc.finish()?;
    tracing::info!(frames = range.len_frames(), "encoded mp4");
    Ok(())
}
