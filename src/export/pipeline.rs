use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use image::{RgbaImage, imageops::FilterType};
use rayon::prelude::*;

use crate::{
    export::sink::{FrameSink, SinkConfig},
    foundation::core::{Size, pixel_size},
    foundation::error::{LiveError, LiveResult},
    picture::model::PictureRef,
    render::{cpu::CpuRasterizer, raster::FrameRGBA, raster::RasterSettings},
};

/// Cooperative cancellation flag shared between an export and its caller.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Frames pushed to the sink so far, out of `total`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportProgress {
    pub done: usize,
    pub total: usize,
}

impl ExportProgress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.done as f32 / self.total as f32
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    Completed { frames: usize },
    /// The sink was aborted; its partial output is gone.
    Cancelled { frames_done: usize },
}

/// Export limits and encoding parameters.
#[derive(Clone, Debug)]
pub struct ExportOpts {
    /// Playback rate in frames per second.
    pub rate: f64,
    pub max_frames: usize,
    pub max_rate: f64,
    /// Output frames wider than this are scaled down, keeping the aspect ratio.
    pub max_width: u32,
    /// Frames rasterized per batch; the cancel flag is checked between batches. `0` means 1.
    pub chunk_size: usize,
    /// Worker threads for rasterization; `None` lets rayon decide.
    pub threads: Option<usize>,
    /// Straight-alpha colour transparent pixels are flattened over.
    pub background_rgba: [u8; 4],
    pub raster: RasterSettings,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            rate: 10.0,
            max_frames: 1000,
            max_rate: 100.0,
            max_width: 100,
            chunk_size: 20,
            threads: None,
            background_rgba: [255, 255, 255, 255],
            raster: RasterSettings::default(),
        }
    }
}

impl ExportOpts {
    /// Check these options against an export of `frames` pictures.
    pub fn validate(&self, frames: usize) -> LiveResult<()> {
        if frames == 0 {
            return Err(LiveError::validation("nothing to export: the book is empty"));
        }
        if frames > self.max_frames {
            return Err(LiveError::validation(format!(
                "export is limited to {} frames, got {frames}",
                self.max_frames
            )));
        }
        if !(self.rate.is_finite() && self.rate > 0.0) {
            return Err(LiveError::validation("export rate must be > 0"));
        }
        if self.rate > self.max_rate {
            return Err(LiveError::validation(format!(
                "export rate is limited to {}, got {}",
                self.max_rate, self.rate
            )));
        }
        if self.max_width == 0 {
            return Err(LiveError::validation("export max_width must be >= 1"));
        }
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(LiveError::validation(
                "export 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Rasterize `pictures` in order and push them to `sink`.
///
/// Pictures are rendered in chunks of `opts.chunk_size` on a rayon pool, each worker owning one
/// [`CpuRasterizer`]. `progress` is called after every chunk. When `cancel` is observed between
/// chunks, or when anything fails, the sink is aborted.
#[tracing::instrument(
    skip(pictures, opts, sink, cancel, progress),
    fields(frames = pictures.len(), rate = opts.rate)
)]
pub fn export_frames<S: FrameSink + ?Sized>(
    pictures: &[PictureRef],
    opts: &ExportOpts,
    sink: &mut S,
    cancel: &CancelToken,
    mut progress: impl FnMut(ExportProgress),
) -> LiveResult<ExportOutcome> {
    if let Err(err) = opts.validate(pictures.len()) {
        tracing::warn!(%err, "export rejected");
        return Err(err);
    }
    let (width, height) = output_size(pictures[0].size(), opts.max_width)?;
    let pool = build_thread_pool(opts.threads)?;

    sink.begin(SinkConfig {
        width,
        height,
        rate: opts.rate,
    })?;
    tracing::info!(total = pictures.len(), width, height, "export started");

    match push_chunks(pictures, opts, (width, height), &pool, sink, cancel, &mut progress) {
        Ok(ExportOutcome::Completed { frames }) => {
            sink.end()?;
            tracing::info!(frames, "export finished");
            Ok(ExportOutcome::Completed { frames })
        }
        Ok(cancelled) => {
            sink.abort();
            tracing::warn!(?cancelled, "export cancelled");
            Ok(cancelled)
        }
        Err(err) => {
            sink.abort();
            Err(err)
        }
    }
}

fn push_chunks<S: FrameSink + ?Sized>(
    pictures: &[PictureRef],
    opts: &ExportOpts,
    size: (u32, u32),
    pool: &rayon::ThreadPool,
    sink: &mut S,
    cancel: &CancelToken,
    progress: &mut impl FnMut(ExportProgress),
) -> LiveResult<ExportOutcome> {
    let total = pictures.len();
    let mut done = 0;
    for chunk in pictures.chunks(normalized_chunk_size(opts.chunk_size)) {
        if cancel.is_cancelled() {
            return Ok(ExportOutcome::Cancelled { frames_done: done });
        }
        for frame in render_chunk(chunk, opts, size, pool)? {
            sink.push_frame(done, &frame)?;
            done += 1;
        }
        tracing::trace!(done, total, "export chunk pushed");
        progress(ExportProgress { done, total });
    }
    Ok(ExportOutcome::Completed { frames: done })
}

fn render_chunk(
    chunk: &[PictureRef],
    opts: &ExportOpts,
    size: (u32, u32),
    pool: &rayon::ThreadPool,
) -> LiveResult<Vec<RgbaImage>> {
    let rendered = pool.install(|| {
        chunk
            .par_iter()
            .map_init(
                || CpuRasterizer::new(opts.raster.clone()),
                |raster, picture| -> LiveResult<RgbaImage> {
                    let frame = picture.materialize(raster)?;
                    Ok(fit_frame(&frame, opts.background_rgba, size))
                },
            )
            .collect::<Vec<_>>()
    });
    rendered.into_iter().collect()
}

fn fit_frame(frame: &FrameRGBA, background_rgba: [u8; 4], (width, height): (u32, u32)) -> RgbaImage {
    let flat = frame.flatten_over(background_rgba);
    if flat.dimensions() == (width, height) {
        flat
    } else {
        image::imageops::resize(&flat, width, height, FilterType::Triangle)
    }
}

/// Output dimensions for pictures of `size`: at most `max_width` wide, same aspect ratio.
pub fn output_size(size: Size, max_width: u32) -> LiveResult<(u32, u32)> {
    let (w, h) = pixel_size(size)?;
    let (w, h) = (u32::from(w), u32::from(h));
    let width = w.min(max_width.max(1));
    let height = ((f64::from(width) * f64::from(h) / f64::from(w)).round() as u32).max(1);
    Ok((width, height))
}

fn build_thread_pool(threads: Option<usize>) -> LiveResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("livepics-raster-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| LiveError::export(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> usize {
    chunk_size.max(1)
}

/// An export running on its own thread.
pub struct ExportJob<S> {
    cancel: CancelToken,
    done: Arc<AtomicUsize>,
    total: usize,
    handle: std::thread::JoinHandle<(LiveResult<ExportOutcome>, S)>,
}

impl<S: FrameSink + Send + 'static> ExportJob<S> {
    /// Start exporting `pictures` (a snapshot taken by the caller) into `sink`.
    pub fn spawn(pictures: Vec<PictureRef>, opts: ExportOpts, mut sink: S) -> LiveResult<Self> {
        let cancel = CancelToken::new();
        let done = Arc::new(AtomicUsize::new(0));
        let total = pictures.len();

        let handle = {
            let cancel = cancel.clone();
            let done = Arc::clone(&done);
            std::thread::Builder::new()
                .name("livepics-export".to_string())
                .spawn(move || {
                    let result = export_frames(&pictures, &opts, &mut sink, &cancel, |p| {
                        done.store(p.done, Ordering::Relaxed)
                    });
                    (result, sink)
                })?
        };

        Ok(Self {
            cancel,
            done,
            total,
            handle,
        })
    }

    /// Ask the export to stop before its next chunk.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn progress(&self) -> ExportProgress {
        ExportProgress {
            done: self.done.load(Ordering::Relaxed),
            total: self.total,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the export and hand the sink back.
    pub fn join(self) -> LiveResult<(ExportOutcome, S)> {
        let (result, sink) = self
            .handle
            .join()
            .map_err(|_| LiveError::export("export thread panicked"))?;
        Ok((result?, sink))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
