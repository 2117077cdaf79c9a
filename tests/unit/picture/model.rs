use super::*;
use crate::foundation::core::{Point, Rgba8};

fn stroke(x: f64) -> DrawAction {
    DrawAction::pencil(3.0, vec![Point::new(x, x)], Rgba8::BLACK)
}

#[test]
fn log_appends_and_pops_from_the_end() {
    let mut p = Picture::new(Size::new(10.0, 10.0));
    assert!(p.is_empty());
    p.append_action(stroke(1.0));
    p.append_action(stroke(2.0));
    assert_eq!(p.len(), 2);
    assert_eq!(p.remove_last_action(), Some(stroke(2.0)));
    assert_eq!(p.actions(), &[stroke(1.0)]);
    assert_eq!(p.remove_last_action(), Some(stroke(1.0)));
    assert_eq!(p.remove_last_action(), None);
    assert!(p.is_empty());
}

#[test]
fn handles_compare_by_identity_not_content() {
    let a = PictureRef::blank(Size::new(4.0, 4.0));
    let b = PictureRef::blank(Size::new(4.0, 4.0));
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
    assert_eq!(a.identity(), a.clone().identity());
}

#[test]
fn mutation_through_one_handle_is_seen_by_all_holders() {
    let a = PictureRef::blank(Size::new(4.0, 4.0));
    let held_elsewhere = a.clone();
    a.append_action(stroke(1.0));
    assert_eq!(held_elsewhere.len(), 1);
    assert!(held_elsewhere.remove_last_action().is_some());
    assert!(a.is_empty());
}

#[test]
fn duplicate_copies_the_log_under_a_new_identity() {
    let a = PictureRef::blank(Size::new(4.0, 4.0));
    a.append_action(stroke(1.0));
    let copy = a.duplicate();
    assert_ne!(copy, a);
    assert_eq!(copy.snapshot().actions(), a.snapshot().actions());

    copy.append_action(stroke(2.0));
    assert_eq!(a.len(), 1);
    assert_eq!(copy.len(), 2);
}

#[test]
fn translated_moves_every_action() {
    let p = Picture::with_actions(Size::new(8.0, 8.0), vec![stroke(1.0), stroke(2.0)]);
    let moved = p.translated(Vec2::new(1.0, 0.0));
    assert_eq!(moved.size(), p.size());
    assert_eq!(
        moved.actions(),
        &[
            DrawAction::pencil(3.0, vec![Point::new(2.0, 1.0)], Rgba8::BLACK),
            DrawAction::pencil(3.0, vec![Point::new(3.0, 2.0)], Rgba8::BLACK),
        ]
    );
}
