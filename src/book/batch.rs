use std::{ops::Range, sync::Arc};

use crate::picture::{generator::SharedGenerator, model::PictureRef};

/// A contiguous run of the book.
#[derive(Clone, Debug)]
pub(crate) enum Batch {
    /// Pictures that already exist.
    Pictures(Vec<PictureRef>),
    /// `count` virtual pictures produced by `generator` at offsets `start..start + count`.
    Generated {
        generator: SharedGenerator,
        start: usize,
        count: usize,
    },
}

/// Read-only description of one batch, for inspection and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchSpan {
    Pictures { len: usize },
    Generated { start: usize, count: usize },
}

impl Batch {
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Pictures(pictures) => pictures.len(),
            Self::Generated { count, .. } => *count,
        }
    }

    fn generated(generator: &SharedGenerator, start: usize, count: usize) -> Self {
        Self::Generated {
            generator: Arc::clone(generator),
            start,
            count,
        }
    }

    pub(crate) fn span(&self) -> BatchSpan {
        match self {
            Self::Pictures(pictures) => BatchSpan::Pictures {
                len: pictures.len(),
            },
            Self::Generated { start, count, .. } => BatchSpan::Generated {
                start: *start,
                count: *count,
            },
        }
    }

    /// What is left after removing `range` (batch-relative, clamped to the batch).
    fn cut(&self, range: Range<usize>) -> Vec<Batch> {
        let len = self.len();
        let lo = range.start.min(len);
        let hi = range.end.clamp(lo, len);
        let parts = match self {
            Self::Pictures(pictures) => {
                let mut kept = Vec::with_capacity(len - (hi - lo));
                kept.extend_from_slice(&pictures[..lo]);
                kept.extend_from_slice(&pictures[hi..]);
                vec![Self::Pictures(kept)]
            }
            Self::Generated {
                generator,
                start,
                count,
            } => vec![
                Self::generated(generator, *start, lo),
                Self::generated(generator, start + hi, count - hi),
            ],
        };
        non_empty(parts)
    }

    /// Split at `offset` and put `middle` in between.
    ///
    /// With `consume` the generated slot at `offset` is replaced by `middle`;
    /// without it the right remainder starts at `offset` and nothing is lost.
    fn split_around(&self, offset: usize, middle: Batch, consume: bool) -> Vec<Batch> {
        let parts = match self {
            Self::Pictures(pictures) => {
                let skip = usize::from(consume);
                vec![
                    Self::Pictures(pictures[..offset].to_vec()),
                    middle,
                    Self::Pictures(pictures[offset + skip..].to_vec()),
                ]
            }
            Self::Generated {
                generator,
                start,
                count,
            } => {
                let right = offset + usize::from(consume);
                vec![
                    Self::generated(generator, *start, offset),
                    middle,
                    Self::generated(generator, start + right, count - right),
                ]
            }
        };
        non_empty(parts)
    }

    /// Fold `next` into `self` when both describe one contiguous run.
    fn try_merge(&mut self, next: &Batch) -> bool {
        match (self, next) {
            (Self::Pictures(left), Self::Pictures(right)) => {
                left.extend_from_slice(right);
                true
            }
            (
                Self::Generated {
                    generator,
                    start,
                    count,
                },
                Self::Generated {
                    generator: next_generator,
                    start: next_start,
                    count: next_count,
                },
            ) if Arc::ptr_eq(generator, next_generator) && *start + *count == *next_start => {
                *count += *next_count;
                true
            }
            _ => false,
        }
    }
}

fn non_empty(parts: Vec<Batch>) -> Vec<Batch> {
    parts.into_iter().filter(|b| b.len() > 0).collect()
}

/// Run-length representation of a picture book.
///
/// Lookups scan batches linearly. That stays cheap because edits cluster around
/// the scrubbing position and the number of batches is small compared to the
/// number of pictures they describe.
#[derive(Clone, Debug, Default)]
pub(crate) struct BatchSequence {
    batches: Vec<Batch>,
    total: usize,
}

impl BatchSequence {
    pub(crate) fn len(&self) -> usize {
        self.total
    }

    pub(crate) fn spans(&self) -> Vec<BatchSpan> {
        self.batches.iter().map(Batch::span).collect()
    }

    /// `(batch index, logical index of the batch's first picture)` for `index`.
    pub(crate) fn locate(&self, index: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (i, batch) in self.batches.iter().enumerate() {
            let end = start + batch.len();
            if index < end {
                return Some((i, start));
            }
            start = end;
        }
        None
    }

    /// Picture at `index`, materializing a generated slot on first access.
    ///
    /// A generated slot is replaced in place by a one-picture batch, so a second
    /// read returns the same handle without calling the generator again.
    pub(crate) fn get(&mut self, index: usize) -> Option<PictureRef> {
        let (batch_index, batch_start) = self.locate(index)?;
        let offset = index - batch_start;
        let batch = &self.batches[batch_index];
        match batch {
            Batch::Pictures(pictures) => pictures.get(offset).cloned(),
            Batch::Generated {
                generator, start, ..
            } => {
                let picture = PictureRef::new(generator.picture_at(start + offset));
                let replacement =
                    batch.split_around(offset, Batch::Pictures(vec![picture.clone()]), true);
                tracing::trace!(
                    index,
                    batch_index,
                    parts = replacement.len(),
                    "materialized generated picture"
                );
                self.splice(batch_index..=batch_index, replacement);
                Some(picture)
            }
        }
    }

    /// Insert `picture` before `index`; `index` must already be within `0..=len`.
    pub(crate) fn insert(&mut self, picture: PictureRef, index: usize) {
        if index >= self.total {
            self.batches.push(Batch::Pictures(vec![picture]));
            self.recount();
            return;
        }
        let Some((batch_index, batch_start)) = self.locate(index) else {
            return;
        };
        let offset = index - batch_start;
        if let Batch::Pictures(pictures) = &mut self.batches[batch_index] {
            pictures.insert(offset, picture);
        } else {
            let replacement = self.batches[batch_index].split_around(
                offset,
                Batch::Pictures(vec![picture]),
                false,
            );
            tracing::trace!(index, batch_index, "split generated run for insertion");
            self.splice(batch_index..=batch_index, replacement);
        }
        self.recount();
    }

    /// Insert a run of `count` generated pictures before `index` (`0..=len`).
    pub(crate) fn insert_generated(&mut self, generator: SharedGenerator, count: usize, index: usize) {
        if count == 0 {
            return;
        }
        let run = Batch::Generated {
            generator,
            start: 0,
            count,
        };
        if index >= self.total {
            self.batches.push(run);
            self.recount();
            return;
        }
        let Some((batch_index, batch_start)) = self.locate(index) else {
            return;
        };
        let replacement = self.batches[batch_index].split_around(index - batch_start, run, false);
        tracing::trace!(index, count, batch_index, "spliced generated run");
        self.splice(batch_index..=batch_index, replacement);
        self.recount();
    }

    /// Remove `range`, clamped to the book. Empty ranges are a no-op.
    pub(crate) fn remove_range(&mut self, range: Range<usize>) {
        let start = range.start.min(self.total);
        let end = range.end.min(self.total);
        if start >= end {
            return;
        }
        let before = self.total;
        let (Some((first, first_start)), Some((last, last_start))) =
            (self.locate(start), self.locate(end - 1))
        else {
            return;
        };

        let replacement = if first == last {
            self.batches[first].cut(start - first_start..end - first_start)
        } else {
            let mut head = self.batches[first].cut(start - first_start..usize::MAX);
            head.extend(self.batches[last].cut(0..end - last_start));
            head
        };
        tracing::trace!(start, end, first, last, "removed range");
        self.splice(first..=last, replacement);
        self.recount();

        debug_assert_eq!(self.total, before - (end - start));
    }

    /// Materialize every generated slot in one pass and return the whole book in
    /// order. Afterwards the book is a single `Pictures` batch.
    pub(crate) fn materialize_all(&mut self) -> Vec<PictureRef> {
        let mut all = Vec::with_capacity(self.total);
        for batch in self.batches.drain(..) {
            match batch {
                Batch::Pictures(pictures) => all.extend(pictures),
                Batch::Generated {
                    generator,
                    start,
                    count,
                } => all.extend(
                    (start..start + count).map(|i| PictureRef::new(generator.picture_at(i))),
                ),
            }
        }
        tracing::trace!(count = all.len(), "materialized whole book");
        if !all.is_empty() {
            self.batches.push(Batch::Pictures(all.clone()));
        }
        self.recount();
        all
    }

    /// Merge neighbouring batches that describe one contiguous run.
    pub(crate) fn compact(&mut self) {
        let mut merged: Vec<Batch> = Vec::with_capacity(self.batches.len());
        for batch in self.batches.drain(..) {
            if let Some(prev) = merged.last_mut()
                && prev.try_merge(&batch)
            {
                continue;
            }
            merged.push(batch);
        }
        self.batches = merged;
        self.recount();
    }

    fn splice(&mut self, range: std::ops::RangeInclusive<usize>, replacement: Vec<Batch>) {
        self.batches.splice(range, replacement);
    }

    fn recount(&mut self) {
        debug_assert!(
            self.batches.iter().all(|b| b.len() > 0),
            "zero-length batch retained"
        );
        self.total = self
            .batches
            .iter()
            .fold(0usize, |total, b| total.saturating_add(b.len()));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/book/batch.rs"]
mod tests;
