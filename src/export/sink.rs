use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use image::RgbaImage;

use crate::foundation::error::{LiveError, LiveResult};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
    /// Frames per second.
    pub rate: f64,
}

/// Consumer of exported frames.
///
/// Ordering contract: `push_frame` is called with strictly increasing indices starting at 0,
/// between exactly one `begin` and either `end` (success) or `abort` (cancellation or failure).
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> LiveResult<()>;
    fn push_frame(&mut self, index: usize, frame: &RgbaImage) -> LiveResult<()>;
    fn end(&mut self) -> LiveResult<()>;
    /// Discard everything pushed so far.
    fn abort(&mut self);
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    finished: bool,
    /// Frames in push order.
    pub frames: Vec<(usize, RgbaImage)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Whether `end` was reached.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> LiveResult<()> {
        self.cfg = Some(cfg);
        self.finished = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, index: usize, frame: &RgbaImage) -> LiveResult<()> {
        self.frames.push((index, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> LiveResult<()> {
        self.finished = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.frames.clear();
    }
}

/// Infinitely looping animated GIF written next to `out_path` and moved into place on `end`.
///
/// Nothing exists at `out_path` until the export completes; an aborted or dropped sink removes
/// its partial file.
pub struct GifSink {
    out_path: PathBuf,
    partial_path: PathBuf,
    speed: i32,
    open: Option<OpenGif>,
}

struct OpenGif {
    encoder: gif::Encoder<BufWriter<File>>,
    width: u16,
    height: u16,
    /// Frame delay in centiseconds.
    delay: u16,
}

impl GifSink {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        let out_path = out_path.into();
        let partial_path = partial_path_for(&out_path);
        Self {
            out_path,
            partial_path,
            speed: 10,
            open: None,
        }
    }

    /// Colour quantisation speed, 1 (best) to 30 (fastest).
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = speed.clamp(1, 30);
        self
    }

    pub fn out_path(&self) -> &Path {
        &self.out_path
    }

    fn discard_partial(&mut self) {
        if self.open.take().is_some() {
            let _ = std::fs::remove_file(&self.partial_path);
        }
    }

    fn publish(&self, gif: OpenGif) -> LiveResult<()> {
        let file = finish_gif(gif.encoder)?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&self.partial_path, &self.out_path)?;
        Ok(())
    }
}

impl std::fmt::Debug for GifSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifSink")
            .field("out_path", &self.out_path)
            .field("speed", &self.speed)
            .field("open", &self.open.is_some())
            .finish()
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> LiveResult<()> {
        if !(cfg.rate.is_finite() && cfg.rate > 0.0) {
            return Err(LiveError::validation("gif frame rate must be > 0"));
        }
        let (Ok(width), Ok(height)) = (u16::try_from(cfg.width), u16::try_from(cfg.height)) else {
            return Err(LiveError::validation(format!(
                "gif frames are limited to {max}x{max}, got {}x{}",
                cfg.width,
                cfg.height,
                max = u16::MAX
            )));
        };
        if let Some(parent) = self.out_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.partial_path)?;
        let mut encoder = gif::Encoder::new(BufWriter::new(file), width, height, &[])
            .map_err(|e| LiveError::export(format!("gif header: {e}")))?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(|e| LiveError::export(format!("gif header: {e}")))?;
        self.open = Some(OpenGif {
            encoder,
            width,
            height,
            delay: (100.0 / cfg.rate).round().clamp(0.0, f64::from(u16::MAX)) as u16,
        });
        Ok(())
    }

    fn push_frame(&mut self, index: usize, frame: &RgbaImage) -> LiveResult<()> {
        let speed = self.speed;
        let Some(gif) = self.open.as_mut() else {
            return Err(LiveError::export("gif sink received a frame before begin"));
        };
        if frame.dimensions() != (u32::from(gif.width), u32::from(gif.height)) {
            return Err(LiveError::export(format!(
                "gif frame {index} is {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                gif.width,
                gif.height
            )));
        }
        let mut pixels = frame.as_raw().clone();
        let mut encoded = gif::Frame::from_rgba_speed(gif.width, gif.height, &mut pixels, speed);
        encoded.delay = gif.delay;
        gif.encoder
            .write_frame(&encoded)
            .map_err(|e| LiveError::export(format!("gif frame {index}: {e}")))
    }

    fn end(&mut self) -> LiveResult<()> {
        let gif = self
            .open
            .take()
            .ok_or_else(|| LiveError::export("gif sink ended before begin"))?;
        if let Err(err) = self.publish(gif) {
            let _ = std::fs::remove_file(&self.partial_path);
            return Err(err);
        }
        tracing::debug!(path = %self.out_path.display(), "gif written");
        Ok(())
    }

    fn abort(&mut self) {
        self.discard_partial();
    }
}

impl Drop for GifSink {
    fn drop(&mut self) {
        self.discard_partial();
    }
}

/// Write the trailer and flush, surfacing errors a plain drop would swallow.
fn finish_gif<W: Write>(encoder: gif::Encoder<BufWriter<W>>) -> LiveResult<W> {
    let buffered = encoder
        .into_inner()
        .map_err(|e| LiveError::export(format!("gif trailer: {e}")))?;
    buffered
        .into_inner()
        .map_err(|e| LiveError::Io(e.into_error()))
}

fn partial_path_for(out_path: &Path) -> PathBuf {
    let mut name = out_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "export.gif".into());
    name.push(".partial");
    out_path.with_file_name(name)
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
