use std::{
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    core::{Canvas, Fps, Rgba8},
    error::{VizError, VizResult},
    raster::FrameRgba,
};

/// MP4 encode settings. Output targets yuv420p via the system `ffmpeg`
/// binary, so both canvas dimensions must be even.
#[derive(Clone, Debug)]
pub struct Mp4Config {
    pub canvas: Canvas,
    pub fps: Fps,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl Mp4Config {
    pub fn new(out_path: impl Into<PathBuf>, canvas: Canvas, fps: Fps) -> Self {
        Self {
            canvas,
            fps,
            out_path: out_path.into(),
            overwrite: true,
        }
    }

    pub fn validate(&self) -> VizResult<()> {
        self.canvas.validate()?;
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(VizError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn ensure_parent_dir(path: &Path) -> VizResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Streams raw RGBA frames into an `ffmpeg` child process. Frames may carry
/// alpha; they are flattened over the scene background before piping.
pub struct Mp4Encoder {
    cfg: Mp4Config,
    background: Rgba8,
    child: Child,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
}

impl Mp4Encoder {
    pub fn new(cfg: Mp4Config, background: Rgba8) -> VizResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(VizError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(VizError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        // System ffmpeg rather than linked FFmpeg libraries: no native dev
        // headers needed.
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        cmd.arg(if cfg.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.canvas.width, cfg.canvas.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            VizError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| VizError::encode("failed to open ffmpeg stdin (unexpected)"))?;

        Ok(Self {
            scratch: vec![0u8; (cfg.canvas.width * cfg.canvas.height * 4) as usize],
            cfg,
            background,
            child,
            stdin: Some(stdin),
        })
    }

    pub fn encode_frame(&mut self, frame: &FrameRgba) -> VizResult<()> {
        if frame.width != self.cfg.canvas.width || frame.height != self.cfg.canvas.height {
            return Err(VizError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.canvas.width, self.cfg.canvas.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(VizError::validation(
                "frame data size mismatch with width*height*4",
            ));
        }

        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.background,
        )?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(VizError::encode("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin
            .write_all(&self.scratch)
            .map_err(|e| VizError::encode(format!("failed to write frame to ffmpeg stdin: {e}")))?;

        Ok(())
    }

    pub fn finish(mut self) -> VizResult<()> {
        drop(self.stdin.take());

        let output = self
            .child
            .wait_with_output()
            .map_err(|e| VizError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VizError::encode(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg: Rgba8,
) -> VizResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(VizError::validation(
            "flatten expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg.r);
    let bg_g = u16::from(bg.g);
    let bg_b = u16::from(bg.b);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            d[3] = 255;
            continue;
        }

        let inv = 255u16 - a;
        let (r, g, b) = if src_is_premul {
            (
                u16::from(s[0]) + mul_div255(bg_r, inv),
                u16::from(s[1]) + mul_div255(bg_g, inv),
                u16::from(s[2]) + mul_div255(bg_b, inv),
            )
        } else {
            (
                mul_div255(u16::from(s[0]), a) + mul_div255(bg_r, inv),
                mul_div255(u16::from(s[1]), a) + mul_div255(bg_g, inv),
                mul_div255(u16::from(s[2]), a) + mul_div255(bg_b, inv),
            )
        };

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fps() -> Fps {
        Fps::new(30, 1).unwrap()
    }

    #[test]
    fn config_rejects_odd_dimensions() {
        let cfg = Mp4Config::new(
            "out/movie.mp4",
            Canvas {
                width: 11,
                height: 10,
            },
            fps(),
        );
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn config_rejects_zero_canvas() {
        let cfg = Mp4Config::new(
            "out/movie.mp4",
            Canvas {
                width: 0,
                height: 10,
            },
            fps(),
        );
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn flatten_premul_over_black() {
        // premultiplied red @ 50% alpha stays 128,0,0 over black
        let src = vec![128u8, 0, 0, 128];
        let mut dst = vec![0u8; 4];
        flatten_to_opaque_rgba8(&mut dst, &src, true, Rgba8::rgb(0, 0, 0)).unwrap();
        assert_eq!(dst, vec![128u8, 0, 0, 255]);
    }

    #[test]
    fn flatten_straight_over_background() {
        // straight red @ 50% alpha over mid-gray background
        let src = vec![255u8, 0, 0, 128];
        let mut dst = vec![0u8; 4];
        flatten_to_opaque_rgba8(&mut dst, &src, false, Rgba8::rgb(100, 100, 100)).unwrap();
        assert_eq!(dst[3], 255);
        assert!(dst[0] > dst[1]);
        assert_eq!(dst[1], dst[2]);
    }
}
