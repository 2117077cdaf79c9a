//! Exporting a book snapshot to an animation.
//!
//! Frames are rasterized in chunks and handed to a [`sink::FrameSink`] in book order.

/// Chunked, cancellable export pipeline.
pub mod pipeline;
/// Frame sinks (in-memory, animated GIF).
pub mod sink;
