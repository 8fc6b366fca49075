//! ffmpeg video encoder.

use crate::capability::VideoEncoder;
use crate::error::{AnimError, AnimResult};
use std::env;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::info;

pub const ENV_FFMPEG: &str = "DIALOG_FFMPEG";
pub const FRAME_PATTERN: &str = "%05d.png";

/// Encodes a frame directory to H.264 with the `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    binary: String,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegEncoder {
    /// Use `$DIALOG_FFMPEG`, falling back to `ffmpeg` on the `PATH`.
    pub fn new() -> Self {
        Self::with_binary(env::var(ENV_FFMPEG).unwrap_or_else(|_| "ffmpeg".to_string()))
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Arguments passed to ffmpeg for one encode.
    pub fn args(&self, frames_dir: &Path, fps: f64, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-framerate".into(), fps.to_string().into(), "-i".into()];
        args.push(frames_dir.join(FRAME_PATTERN).into_os_string());
        args.extend(
            [
                "-y", "-vcodec", "libx264", "-profile:v", "main", "-level", "3", "-pix_fmt",
                "yuv420p", "-crf", "21", "-an",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(output.as_os_str().to_owned());
        args
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn encode(&self, frames_dir: &Path, fps: f64, output: &Path) -> AnimResult<()> {
        info!(
            "[FfmpegEncoder] Encoding {} -> {} at {fps} fps",
            frames_dir.join(FRAME_PATTERN).display(),
            output.display()
        );
        let result = Command::new(&self.binary)
            .args(self.args(frames_dir, fps, output))
            .output()
            .map_err(|e| AnimError::encode(format!("failed to start {}: {e}", self.binary)))?;

        if !result.status.success() {
            return Err(AnimError::encode(format!(
                "{} exited with {}: {}",
                self.binary,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }
        info!("[FfmpegEncoder] Wrote {}", output.display());
        Ok(())
    }
}
