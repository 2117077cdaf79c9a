use crate::{
    book::model::PicturesBookModel,
    history::undo::Command,
    picture::{action::DrawAction, generator::SharedGenerator, model::PictureRef},
};

/// A structural book edit, recorded with the data needed to reverse it.
///
/// Indices are the ones that were valid when the edit was made; replaying the
/// history in order keeps them valid.
#[derive(Clone, Debug)]
pub enum BookEdit {
    InsertPicture {
        index: usize,
        picture: PictureRef,
    },
    RemovePicture {
        index: usize,
        picture: PictureRef,
    },
    InsertGenerated {
        index: usize,
        generator: SharedGenerator,
        count: usize,
    },
    AppendAction {
        index: usize,
        action: DrawAction,
    },
    ReplaceBook {
        before: Box<PicturesBookModel>,
        after: Box<PicturesBookModel>,
    },
    /// Several edits applied front to back and reverted back to front.
    Sequence(Vec<BookEdit>),
}

impl BookEdit {
    pub fn apply(&self, book: &mut PicturesBookModel) {
        match self {
            Self::InsertPicture { index, picture } => book.insert(picture.clone(), Some(*index)),
            Self::RemovePicture { index, .. } => book.remove(*index),
            Self::InsertGenerated {
                index,
                generator,
                count,
            } => {
                if let Err(err) = book.insert_generator(generator.clone(), *count, Some(*index)) {
                    tracing::warn!(%err, "generated run not applied");
                }
            }
            Self::AppendAction { index, action } => {
                if let Some(picture) = book.get(*index) {
                    picture.append_action(action.clone());
                }
            }
            Self::ReplaceBook { after, .. } => *book = (**after).clone(),
            Self::Sequence(edits) => edits.iter().for_each(|e| e.apply(book)),
        }
    }

    pub fn revert(&self, book: &mut PicturesBookModel) {
        match self {
            Self::InsertPicture { index, .. } => book.remove(*index),
            Self::RemovePicture { index, picture } => book.insert(picture.clone(), Some(*index)),
            Self::InsertGenerated { index, count, .. } => {
                book.remove_range(*index..index.saturating_add(*count))
            }
            Self::AppendAction { index, .. } => {
                if let Some(picture) = book.get(*index) {
                    picture.remove_last_action();
                }
            }
            Self::ReplaceBook { before, .. } => *book = (**before).clone(),
            Self::Sequence(edits) => edits.iter().rev().for_each(|e| e.revert(book)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsertPicture { .. } => "insert_picture",
            Self::RemovePicture { .. } => "remove_picture",
            Self::InsertGenerated { .. } => "insert_generated",
            Self::AppendAction { .. } => "append_action",
            Self::ReplaceBook { .. } => "replace_book",
            Self::Sequence(_) => "sequence",
        }
    }
}

impl Command<PicturesBookModel> for BookEdit {
    fn undo(&self, target: &mut PicturesBookModel) {
        self.revert(target);
    }

    fn redo(&self, target: &mut PicturesBookModel) {
        self.apply(target);
    }

    fn label(&self) -> String {
        self.kind().to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/edit.rs"]
mod tests;
