use std::ops::Range;

use crate::{
    book::batch::{BatchSequence, BatchSpan},
    foundation::error::{LiveError, LiveResult},
    picture::{generator::SharedGenerator, model::PictureRef},
};

/// The ordered sequence of pictures that makes up an animation.
///
/// Indices are 0-based and contiguous, and they are only meaningful until the
/// next mutating call. Reads take `&mut self` because reading a generated index
/// memoizes the produced picture into the book.
///
/// Out-of-range reads return `None`; out-of-range removals do nothing;
/// insertion indices are clamped into `0..=count`. A book never holds more than
/// [`PicturesBookModel::MAX_COUNT`] pictures.
#[derive(Clone, Debug, Default)]
pub struct PicturesBookModel {
    batches: BatchSequence,
}

impl PicturesBookModel {
    /// Upper bound on `count()`. Any index plus any run length stays below `usize::MAX`.
    pub const MAX_COUNT: usize = isize::MAX as usize;

    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pictures, explicit and generated.
    pub fn count(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn get(&mut self, index: usize) -> Option<PictureRef> {
        self.batches.get(index)
    }

    pub fn get_last(&mut self) -> Option<PictureRef> {
        let last = self.count().checked_sub(1)?;
        self.get(last)
    }

    /// The picture shown before `index` during playback: `index - 1`, or the last
    /// picture when `index` is 0. `None` with fewer than two pictures.
    pub fn get_before(&mut self, index: usize) -> Option<PictureRef> {
        if self.count() <= 1 {
            return None;
        }
        match index {
            0 => self.get_last(),
            i => self.get(i - 1),
        }
    }

    /// Pictures that can still be added before the book is full.
    pub fn remaining_capacity(&self) -> usize {
        Self::MAX_COUNT.saturating_sub(self.count())
    }

    /// Insert `picture` at `at` (clamped), or append when `at` is `None`.
    /// A full book ignores the insert.
    pub fn insert(&mut self, picture: PictureRef, at: Option<usize>) {
        if self.remaining_capacity() == 0 {
            tracing::warn!(count = self.count(), "book is full, insert ignored");
            return;
        }
        let index = self.clamp_insert_index(at);
        self.batches.insert(picture, index);
        tracing::trace!(index, count = self.count(), "inserted picture");
    }

    /// Insert `count` lazily generated pictures at `at` (clamped), or append.
    ///
    /// The run reads offsets `0..count` from `generator`. Runs that would take the
    /// book past [`PicturesBookModel::MAX_COUNT`] are rejected and leave it unchanged.
    pub fn insert_generator(
        &mut self,
        generator: SharedGenerator,
        count: usize,
        at: Option<usize>,
    ) -> LiveResult<()> {
        if count > self.remaining_capacity() {
            return Err(LiveError::validation(format!(
                "a run of {count} generated pictures does not fit in a book of {}",
                self.count()
            )));
        }
        let index = self.clamp_insert_index(at);
        self.batches.insert_generated(generator, count, index);
        tracing::trace!(index, run = count, count = self.count(), "inserted generator run");
        Ok(())
    }

    pub fn remove(&mut self, index: usize) {
        self.remove_range(index..index.saturating_add(1));
    }

    /// Remove every picture in `range`; the part outside the book is ignored.
    pub fn remove_range(&mut self, range: Range<usize>) {
        self.batches.remove_range(range);
    }

    /// Merge adjacent batches that form one contiguous run. Content is unchanged.
    pub fn compact(&mut self) {
        self.batches.compact();
    }

    /// Batch-level view of the book.
    pub fn layout(&self) -> Vec<BatchSpan> {
        self.batches.spans()
    }

    /// Every picture in order, materializing generated ones. Each generated slot
    /// is produced once and the book collapses into a single stored batch.
    pub fn snapshot(&mut self) -> Vec<PictureRef> {
        self.batches.materialize_all()
    }

    fn clamp_insert_index(&self, at: Option<usize>) -> usize {
        at.map_or(self.count(), |i| i.min(self.count()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/book/model.rs"]
mod tests;
