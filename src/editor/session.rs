use crate::{
    book::model::PicturesBookModel,
    foundation::core::Size,
    foundation::error::{LiveError, LiveResult},
    history::{edit::BookEdit, undo::Command, undo::UndoRedoController},
    picture::{action::DrawAction, generator::SharedGenerator, model::PictureRef},
};

/// What undo/redo operate on: the book plus the focused picture index.
#[derive(Clone, Debug)]
pub struct EditorState {
    pub book: PicturesBookModel,
    pub current: usize,
}

/// One history entry: a book edit plus where focus was before and after it.
#[derive(Clone, Debug)]
pub struct Edit {
    pub change: BookEdit,
    pub focus_before: usize,
    pub focus_after: usize,
}

impl Command<EditorState> for Edit {
    fn undo(&self, target: &mut EditorState) {
        self.change.revert(&mut target.book);
        target.current = self.focus_before;
    }

    fn redo(&self, target: &mut EditorState) {
        self.change.apply(&mut target.book);
        target.current = self.focus_after;
    }

    fn label(&self) -> String {
        self.change.kind().to_string()
    }
}

/// An editing session: every user-level operation is applied to the book and
/// recorded as one undoable [`Edit`].
///
/// The session always holds at least one picture and keeps `current` within the
/// book.
#[derive(Debug)]
pub struct Editor {
    state: EditorState,
    history: UndoRedoController<Edit>,
    frame_size: Size,
}

impl Editor {
    /// A session with a single blank picture in focus.
    pub fn new(frame_size: Size) -> Self {
        let mut book = PicturesBookModel::new();
        book.insert(PictureRef::blank(frame_size), None);
        Self {
            state: EditorState { book, current: 0 },
            history: UndoRedoController::new(),
            frame_size,
        }
    }

    pub fn frame_size(&self) -> Size {
        self.frame_size
    }

    pub fn book(&self) -> &PicturesBookModel {
        &self.state.book
    }

    pub fn book_mut(&mut self) -> &mut PicturesBookModel {
        &mut self.state.book
    }

    pub fn history(&self) -> &UndoRedoController<Edit> {
        &self.history
    }

    pub fn current_index(&self) -> usize {
        self.state.current
    }

    pub fn current_picture(&mut self) -> Option<PictureRef> {
        self.state.book.get(self.state.current)
    }

    /// Picture to show as onion skin behind the current one.
    pub fn onion_skin(&mut self) -> Option<PictureRef> {
        self.state.book.get_before(self.state.current)
    }

    /// Move focus without recording history; `None` when `index` is out of range.
    pub fn select(&mut self, index: usize) -> Option<PictureRef> {
        let picture = self.state.book.get(index)?;
        self.state.current = index;
        Some(picture)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Removing is allowed unless the only picture left is already blank.
    pub fn can_remove(&mut self) -> bool {
        self.state.book.count() > 1 || self.current_picture().is_some_and(|p| !p.is_empty())
    }

    pub fn can_play(&self) -> bool {
        self.state.book.count() > 1
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.state)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.state)
    }

    /// Append `action` to the current picture.
    pub fn draw(&mut self, action: DrawAction) {
        let index = self.state.current;
        self.record(
            BookEdit::AppendAction {
                index,
                action,
            },
            index,
        );
    }

    /// Insert a blank picture after the current one and focus it.
    pub fn add_picture(&mut self) -> PictureRef {
        let picture = PictureRef::blank(self.frame_size);
        self.insert_after_current(picture.clone());
        picture
    }

    /// Insert a copy of the current picture after it and focus the copy.
    pub fn duplicate_current(&mut self) -> Option<PictureRef> {
        let copy = self.current_picture()?.duplicate();
        self.insert_after_current(copy.clone());
        Some(copy)
    }

    /// Remove the current picture and focus the one before it (wrapping to the
    /// last). Removing the only picture leaves a fresh blank one behind.
    pub fn remove_current(&mut self) -> Option<PictureRef> {
        let index = self.state.current;
        let removed = self.state.book.get(index)?;
        let removal = BookEdit::RemovePicture {
            index,
            picture: removed.clone(),
        };

        let remaining = self.state.book.count() - 1;
        if remaining > 0 {
            let focus = if index == 0 { remaining - 1 } else { index - 1 };
            self.record(removal, focus);
        } else {
            let change = BookEdit::Sequence(vec![
                removal,
                BookEdit::InsertPicture {
                    index: 0,
                    picture: PictureRef::blank(self.frame_size),
                },
            ]);
            self.record(change, 0);
        }
        Some(removed)
    }

    /// Insert `count` generated pictures after the current one and focus the
    /// last of them. Runs that do not fit in the book are rejected unrecorded.
    pub fn add_generated(&mut self, generator: SharedGenerator, count: usize) -> LiveResult<()> {
        if count == 0 {
            return Ok(());
        }
        let capacity = self.state.book.remaining_capacity();
        if count > capacity {
            return Err(LiveError::validation(format!(
                "cannot add {count} generated pictures, only {capacity} more fit"
            )));
        }
        let index = self.state.current.saturating_add(1);
        self.record(
            BookEdit::InsertGenerated {
                index,
                generator,
                count,
            },
            self.state.current.saturating_add(count),
        );
        Ok(())
    }

    /// Replace the whole book with a single blank picture.
    pub fn clear_all(&mut self) {
        let mut fresh = PicturesBookModel::new();
        fresh.insert(PictureRef::blank(self.frame_size), None);
        let change = BookEdit::ReplaceBook {
            before: Box::new(self.state.book.clone()),
            after: Box::new(fresh),
        };
        self.record(change, 0);
    }

    fn insert_after_current(&mut self, picture: PictureRef) {
        let index = self.state.current + 1;
        self.record(BookEdit::InsertPicture { index, picture }, index);
    }

    fn record(&mut self, change: BookEdit, focus_after: usize) {
        let edit = Edit {
            change,
            focus_before: self.state.current,
            focus_after,
        };
        edit.redo(&mut self.state);
        tracing::debug!(
            edit = edit.change.kind(),
            focus = focus_after,
            count = self.state.book.count(),
            "recorded edit"
        );
        self.history.add(edit);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
