//! The picture book: an ordered sequence mixing stored pictures with lazily generated runs.

pub(crate) mod batch;
pub mod model;

pub use batch::BatchSpan;
