use std::sync::Arc;

use super::*;
use crate::book::batch::BatchSpan;
use crate::foundation::core::{Point, Rgba8};
use crate::picture::generator::BlankPictures;

fn editor() -> Editor {
    Editor::new(Size::new(32.0, 24.0))
}

fn dot(x: f64) -> DrawAction {
    DrawAction::pencil(4.0, vec![Point::new(x, x)], Rgba8::BLACK)
}

#[test]
fn starts_with_one_blank_focused_picture() {
    let mut ed = editor();
    assert_eq!(ed.book().count(), 1);
    assert_eq!(ed.current_index(), 0);
    assert!(ed.current_picture().unwrap().is_empty());
    assert!(!ed.can_undo());
    assert!(!ed.can_remove());
    assert!(!ed.can_play());
    assert!(ed.onion_skin().is_none());
}

#[test]
fn drawing_is_undoable_per_stroke() {
    let mut ed = editor();
    ed.draw(dot(1.0));
    ed.draw(dot(2.0));
    let current = ed.current_picture().unwrap();
    assert_eq!(current.len(), 2);
    assert!(ed.can_remove());

    assert!(ed.undo());
    assert_eq!(current.snapshot().actions(), &[dot(1.0)]);
    assert!(ed.redo());
    assert_eq!(current.len(), 2);
}

#[test]
fn adding_and_duplicating_focus_the_new_picture() {
    let mut ed = editor();
    ed.draw(dot(1.0));
    let original = ed.current_picture().unwrap();

    let copy = ed.duplicate_current().unwrap();
    assert_eq!(ed.current_index(), 1);
    assert_ne!(copy, original);
    assert_eq!(copy.snapshot().actions(), original.snapshot().actions());
    assert_eq!(ed.onion_skin(), Some(original.clone()));

    let blank = ed.add_picture();
    assert_eq!(ed.current_index(), 2);
    assert_eq!(ed.current_picture(), Some(blank));

    assert!(ed.undo());
    assert_eq!(ed.current_index(), 1);
    assert_eq!(ed.book().count(), 2);
    assert!(ed.undo());
    assert_eq!(ed.current_index(), 0);
    assert_eq!(ed.current_picture(), Some(original));
}

#[test]
fn removing_focuses_the_previous_picture_and_wraps() {
    let mut ed = editor();
    let first = ed.current_picture().unwrap();
    ed.add_picture();
    let third = ed.add_picture();

    ed.select(0).unwrap();
    let removed = ed.remove_current().unwrap();
    assert_eq!(removed, first);
    assert_eq!(ed.book().count(), 2);
    assert_eq!(ed.current_index(), 1);
    assert_eq!(ed.current_picture(), Some(third));

    assert!(ed.undo());
    assert_eq!(ed.book().count(), 3);
    assert_eq!(ed.current_index(), 0);
    assert_eq!(ed.current_picture(), Some(first));
}

#[test]
fn removing_the_last_picture_leaves_a_blank_one() {
    let mut ed = editor();
    ed.draw(dot(1.0));
    let drawn = ed.current_picture().unwrap();

    ed.remove_current().unwrap();
    assert_eq!(ed.book().count(), 1);
    let replacement = ed.current_picture().unwrap();
    assert_ne!(replacement, drawn);
    assert!(replacement.is_empty());

    assert!(ed.undo());
    assert_eq!(ed.book().count(), 1);
    assert_eq!(ed.current_picture(), Some(drawn));

    assert!(ed.redo());
    assert_eq!(ed.current_picture(), Some(replacement));
}

#[test]
fn generated_runs_insert_after_focus_and_undo_as_one_step() {
    let mut ed = editor();
    let generator = Arc::new(BlankPictures {
        size: ed.frame_size(),
    });

    ed.add_generated(generator, 1_000).unwrap();
    assert_eq!(ed.book().count(), 1_001);
    assert_eq!(ed.current_index(), 1_000);
    assert!(ed.can_play());

    assert!(ed.undo());
    assert_eq!(ed.book().count(), 1);
    assert_eq!(ed.current_index(), 0);

    assert!(ed.redo());
    assert_eq!(ed.book().count(), 1_001);
    assert_eq!(
        ed.book().layout(),
        vec![
            BatchSpan::Pictures { len: 1 },
            BatchSpan::Generated {
                start: 0,
                count: 1_000
            },
        ]
    );
}

#[test]
fn oversized_generated_runs_are_rejected_without_recording() {
    let mut ed = editor();
    ed.add_picture();
    let generator = Arc::new(BlankPictures {
        size: ed.frame_size(),
    });

    let err = ed.add_generated(generator, usize::MAX).unwrap_err();
    assert!(matches!(err, LiveError::Validation(_)), "{err}");
    assert_eq!(ed.book().count(), 2);
    assert_eq!(ed.current_index(), 1);
    assert_eq!(ed.history().len(), 1);
}

#[test]
fn drawing_on_a_generated_picture_materializes_it() {
    let mut ed = editor();
    ed.add_generated(
        Arc::new(BlankPictures {
            size: ed.frame_size(),
        }),
        10,
    )
    .unwrap();
    ed.select(5).unwrap();
    ed.draw(dot(3.0));
    assert_eq!(ed.current_picture().unwrap().len(), 1);

    assert!(ed.undo());
    assert!(ed.current_picture().unwrap().is_empty());
}

#[test]
fn clear_all_is_reversible() {
    let mut ed = editor();
    ed.add_picture();
    ed.add_picture();
    let before: Vec<_> = ed.book_mut().snapshot();

    ed.clear_all();
    assert_eq!(ed.book().count(), 1);
    assert_eq!(ed.current_index(), 0);

    assert!(ed.undo());
    assert_eq!(ed.book_mut().snapshot(), before);
    assert_eq!(ed.current_index(), 2);
}

#[test]
fn new_edit_after_undo_drops_the_redo_branch() {
    let mut ed = editor();
    ed.add_picture();
    assert!(ed.undo());
    assert!(ed.can_redo());

    ed.draw(dot(1.0));
    assert!(!ed.can_redo());
    assert_eq!(ed.history().len(), 1);
}

#[test]
fn select_rejects_out_of_range_indices() {
    let mut ed = editor();
    assert!(ed.select(3).is_none());
    assert_eq!(ed.current_index(), 0);
}
