use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    foundation::core::{Size, Vec2},
    foundation::error::LiveResult,
    picture::action::DrawAction,
    render::raster::Rasterizer,
};

/// One frame of the animation: a canvas size plus an append-only draw log.
#[derive(Clone, Debug)]
pub struct Picture {
    size: Size,
    actions: Vec<DrawAction>,
}

impl Picture {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            actions: Vec::new(),
        }
    }

    pub fn with_actions(size: Size, actions: Vec<DrawAction>) -> Self {
        Self { size, actions }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn actions(&self) -> &[DrawAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn append_action(&mut self, action: DrawAction) {
        self.actions.push(action);
    }

    /// Pop the newest action; `None` when the log is already empty.
    pub fn remove_last_action(&mut self) -> Option<DrawAction> {
        self.actions.pop()
    }

    /// Same log moved by `offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            size: self.size,
            actions: self.actions.iter().map(|a| a.translated(offset)).collect(),
        }
    }

    /// Replay the log in order onto a blank canvas of this picture's size.
    pub fn materialize<R: Rasterizer + ?Sized>(&self, raster: &mut R) -> LiveResult<R::Raster> {
        raster.begin(self.size)?;
        for action in &self.actions {
            action.draw(raster)?;
        }
        raster.finish()
    }
}

/// Shared handle to a [`Picture`].
///
/// Equality is identity: two handles are equal only when they point at the same
/// picture, never because their logs happen to match. A picture lives as long as
/// its longest holder (book batch, history entry or presentation layer).
#[derive(Clone)]
pub struct PictureRef(Arc<RwLock<Picture>>);

impl PictureRef {
    pub fn new(picture: Picture) -> Self {
        Self(Arc::new(RwLock::new(picture)))
    }

    pub fn blank(size: Size) -> Self {
        Self::new(Picture::new(size))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Picture> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Picture> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn size(&self) -> Size {
        self.read().size()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn append_action(&self, action: DrawAction) {
        self.write().append_action(action);
    }

    pub fn remove_last_action(&self) -> Option<DrawAction> {
        self.write().remove_last_action()
    }

    /// Owned copy of the current log.
    pub fn snapshot(&self) -> Picture {
        self.read().clone()
    }

    /// A new picture (new identity) with the same size and log.
    pub fn duplicate(&self) -> Self {
        Self::new(self.snapshot())
    }

    pub fn materialize<R: Rasterizer + ?Sized>(&self, raster: &mut R) -> LiveResult<R::Raster> {
        self.read().materialize(raster)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address-derived identity, stable for the picture's lifetime.
    pub fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for PictureRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for PictureRef {}

impl std::fmt::Debug for PictureRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PictureRef")
            .field("id", &format_args!("{:#x}", self.identity()))
            .field("actions", &self.len())
            .finish()
    }
}

impl From<Picture> for PictureRef {
    fn from(picture: Picture) -> Self {
        Self::new(picture)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/picture/model.rs"]
mod tests;
