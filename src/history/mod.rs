//! Linear undo/redo history.

/// Tagged, inspectable book edits.
pub mod edit;
/// The undo/redo controller and its command trait.
pub mod undo;
