use super::*;

fn frame(px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: [px, [0, 0, 0, 0]].concat(),
        premultiplied: true,
    }
}

#[test]
fn pixel_reads_are_bounds_checked() {
    let f = frame([1, 2, 3, 4]);
    assert_eq!(f.pixel(0, 0), Some([1, 2, 3, 4]));
    assert_eq!(f.pixel(1, 0), Some([0, 0, 0, 0]));
    assert_eq!(f.pixel(2, 0), None);
    assert_eq!(f.pixel(0, 1), None);
}

#[test]
fn flatten_keeps_opaque_pixels_and_shows_background_through_transparent_ones() {
    let f = frame([255, 0, 0, 255]);
    let img = f.flatten_over([10, 20, 30, 255]);
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [10, 20, 30, 255]);
}

#[test]
fn flatten_blends_half_covered_pixels() {
    // 50% black premultiplied over white.
    let f = frame([0, 0, 0, 128]);
    let img = f.flatten_over([255, 255, 255, 255]);
    assert_eq!(img.get_pixel(0, 0).0, [127, 127, 127, 255]);
}
