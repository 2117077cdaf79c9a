/// An edit that knows how to reverse and re-apply itself against `T`.
pub trait Command<T: ?Sized> {
    fn undo(&self, target: &mut T);
    fn redo(&self, target: &mut T);

    /// Short human-readable name, for menus and logs.
    fn label(&self) -> String {
        String::from("edit")
    }
}

/// Opaque undo/redo closure pair.
pub struct Action<T: ?Sized> {
    undo: Box<dyn Fn(&mut T) + Send + Sync>,
    redo: Box<dyn Fn(&mut T) + Send + Sync>,
}

impl<T: ?Sized> Action<T> {
    pub fn new(
        undo: impl Fn(&mut T) + Send + Sync + 'static,
        redo: impl Fn(&mut T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            undo: Box::new(undo),
            redo: Box::new(redo),
        }
    }
}

impl<T: ?Sized> Command<T> for Action<T> {
    fn undo(&self, target: &mut T) {
        (self.undo)(target)
    }

    fn redo(&self, target: &mut T) {
        (self.redo)(target)
    }
}

impl<T: ?Sized> std::fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Action")
    }
}

/// Linear edit history with a movable cursor.
///
/// Entries before `redo_position` have been applied; entries at or after it can
/// be redone. Adding an entry while redo history exists discards that history.
/// The controller never applies an entry on `add`: callers perform the edit
/// themselves and record how to reverse it.
#[derive(Debug)]
pub struct UndoRedoController<C> {
    actions: Vec<C>,
    redo_position: usize,
}

impl<C> Default for UndoRedoController<C> {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
            redo_position: 0,
        }
    }
}

impl<C> UndoRedoController<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, action: C) {
        if self.can_redo() {
            let dropped = self.actions.len() - self.redo_position;
            self.actions.truncate(self.redo_position);
            tracing::debug!(dropped, "discarded redo history");
        }
        self.actions.push(action);
        self.redo_position = self.actions.len();
    }

    /// Step back once. Returns `false` when there is nothing to undo.
    pub fn undo<T: ?Sized>(&mut self, target: &mut T) -> bool
    where
        C: Command<T>,
    {
        if !self.can_undo() {
            return false;
        }
        self.redo_position -= 1;
        let action = &self.actions[self.redo_position];
        tracing::debug!(position = self.redo_position, label = %action.label(), "undo");
        action.undo(target);
        true
    }

    /// Step forward once. Returns `false` when there is nothing to redo.
    pub fn redo<T: ?Sized>(&mut self, target: &mut T) -> bool
    where
        C: Command<T>,
    {
        if !self.can_redo() {
            return false;
        }
        let action = &self.actions[self.redo_position];
        tracing::debug!(position = self.redo_position, label = %action.label(), "redo");
        action.redo(target);
        self.redo_position += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.redo_position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.redo_position < self.actions.len()
    }

    pub fn redo_position(&self) -> usize {
        self.redo_position
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// All recorded entries, oldest first.
    pub fn entries(&self) -> &[C] {
        &self.actions
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.redo_position = 0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/undo.rs"]
mod tests;
