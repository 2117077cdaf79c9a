//! livepics is the core of a frame-based animation editor.
//!
//! A [`PicturesBookModel`] holds the frames of an animation. Explicitly drawn pictures sit next to
//! lazily generated runs that can span thousands of frames, and a generated frame is materialized
//! and memoized the first time it is read. Every edit made through an [`Editor`] is recorded in a
//! linear [`UndoRedoController`] history.
//!
//! - Draw into [`Picture`] logs of [`DrawAction`]s
//! - Rasterize them with [`CpuRasterizer`]
//! - Export a book snapshot to an animated GIF with [`export_frames`] or [`ExportJob`]
#![forbid(unsafe_code)]

/// Book model and its batch representation.
pub mod book;
/// Editing session and edit scripts.
pub mod editor;
/// Frame export.
pub mod export;
/// Shared geometry, colour and error types.
pub mod foundation;
/// Undo/redo history.
pub mod history;
/// Pictures and generators.
pub mod picture;
/// Rasterization.
pub mod render;

pub use crate::book::{BatchSpan, model::PicturesBookModel};
pub use crate::editor::{
    script::{EditScript, GeneratorSpec, Step},
    session::{Edit, Editor, EditorState},
};
pub use crate::export::{
    pipeline::{CancelToken, ExportJob, ExportOpts, ExportOutcome, ExportProgress, export_frames},
    sink::{FrameSink, GifSink, InMemorySink, SinkConfig},
};
pub use crate::foundation::core::{BezPath, Point, Rgba8, Size, Vec2};
pub use crate::foundation::error::{LiveError, LiveResult};
pub use crate::history::{
    edit::BookEdit,
    undo::{Action, Command, UndoRedoController},
};
pub use crate::picture::{
    action::{CircleStroke, Curve, DrawAction},
    generator::{BlankPictures, DriftPicture, PicturesGenerator, RepeatPicture, SharedGenerator},
    model::{Picture, PictureRef},
};
pub use crate::render::{
    cpu::CpuRasterizer,
    raster::{FrameRGBA, RasterSettings, Rasterizer},
};
