use super::*;
use crate::foundation::core::Point;
use crate::picture::{action::DrawAction, model::Picture};

fn render(actions: Vec<DrawAction>) -> FrameRGBA {
    Picture::with_actions(Size::new(32.0, 32.0), actions)
        .materialize(&mut CpuRasterizer::default())
        .unwrap()
}

fn alpha(frame: &FrameRGBA, x: u32, y: u32) -> u8 {
    frame.pixel(x, y).unwrap()[3]
}

fn horizontal(y: f64) -> Vec<Point> {
    vec![Point::new(2.0, y), Point::new(30.0, y)]
}

#[test]
fn empty_picture_is_fully_transparent() {
    let frame = render(vec![]);
    assert_eq!((frame.width, frame.height), (32, 32));
    assert!(frame.premultiplied);
    assert!(frame.data.iter().all(|b| *b == 0));
}

#[test]
fn pencil_stroke_covers_its_path_in_its_colour() {
    let frame = render(vec![DrawAction::pencil(
        6.0,
        horizontal(16.0),
        Rgba8::new(255, 0, 0, 255),
    )]);
    assert_eq!(frame.pixel(16, 16).unwrap(), [255, 0, 0, 255]);
    assert_eq!(alpha(&frame, 16, 2), 0);
}

#[test]
fn erase_clears_earlier_strokes_only_under_itself() {
    let frame = render(vec![
        DrawAction::pencil(10.0, horizontal(16.0), Rgba8::BLACK),
        DrawAction::erase(6.0, vec![Point::new(16.0, 2.0), Point::new(16.0, 30.0)]),
    ]);
    assert_eq!(alpha(&frame, 16, 16), 0);
    assert_eq!(alpha(&frame, 6, 16), 255);
}

#[test]
fn strokes_after_an_erase_paint_again() {
    let frame = render(vec![
        DrawAction::pencil(10.0, horizontal(16.0), Rgba8::BLACK),
        DrawAction::erase(6.0, vec![Point::new(16.0, 2.0), Point::new(16.0, 30.0)]),
        DrawAction::pencil(4.0, horizontal(16.0), Rgba8::WHITE),
    ]);
    assert_eq!(frame.pixel(16, 16).unwrap(), [255, 255, 255, 255]);
}

#[test]
fn circle_strokes_the_outline_not_the_interior() {
    let frame = render(vec![DrawAction::circle(
        Point::new(16.0, 16.0),
        10.0,
        Rgba8::BLACK,
        2.0,
    )]);
    assert!(alpha(&frame, 25, 16) > 200);
    assert_eq!(alpha(&frame, 16, 16), 0);
}

#[test]
fn clear_colour_fills_the_starting_canvas() {
    let mut raster = CpuRasterizer::new(RasterSettings {
        clear_rgba: Some([0, 0, 255, 255]),
    });
    let frame = Picture::new(Size::new(4.0, 4.0))
        .materialize(&mut raster)
        .unwrap();
    assert_eq!(frame.pixel(3, 3).unwrap(), [0, 0, 255, 255]);
}

#[test]
fn primitives_outside_begin_finish_are_errors() {
    let mut raster = CpuRasterizer::default();
    let curve = Curve::new(2.0, horizontal(1.0));
    assert!(raster.stroke_polyline(&curve, Rgba8::BLACK).is_err());
    assert!(raster.finish().is_err());

    raster.begin(Size::new(4.0, 4.0)).unwrap();
    raster.finish().unwrap();
    assert!(raster.finish().is_err());
}

#[test]
fn degenerate_sizes_are_rejected() {
    let err = Picture::new(Size::new(0.0, 10.0))
        .materialize(&mut CpuRasterizer::default())
        .unwrap_err();
    assert!(matches!(err, LiveError::Validation(_)));
}
