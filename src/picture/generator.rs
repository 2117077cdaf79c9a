use std::sync::Arc;

use crate::{
    foundation::core::{Size, Vec2},
    picture::model::Picture,
};

/// Produces the picture for a logical generator offset.
///
/// Implementations must be pure: the same index always yields an equivalent
/// picture, so a generator run can be split, shifted and re-read freely.
pub trait PicturesGenerator: Send + Sync + std::fmt::Debug {
    fn picture_at(&self, index: usize) -> Picture;
}

pub type SharedGenerator = Arc<dyn PicturesGenerator>;

/// Empty pictures of a fixed size.
#[derive(Clone, Debug)]
pub struct BlankPictures {
    pub size: Size,
}

impl PicturesGenerator for BlankPictures {
    fn picture_at(&self, _index: usize) -> Picture {
        Picture::new(self.size)
    }
}

/// Copies of a template picture.
#[derive(Clone, Debug)]
pub struct RepeatPicture {
    pub template: Picture,
}

impl PicturesGenerator for RepeatPicture {
    fn picture_at(&self, _index: usize) -> Picture {
        self.template.clone()
    }
}

/// The template moved by `step` once more for every index: offset `i` is
/// translated by `step * (i + 1)`.
#[derive(Clone, Debug)]
pub struct DriftPicture {
    pub template: Picture,
    pub step: Vec2,
}

impl PicturesGenerator for DriftPicture {
    fn picture_at(&self, index: usize) -> Picture {
        self.template.translated(self.step * (index as f64 + 1.0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/picture/generator.rs"]
mod tests;
