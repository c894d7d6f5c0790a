use image::{Rgba, RgbaImage};
use vision::Letterbox;

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

#[test]
fn output_is_always_canvas_sized() {
    let lb = Letterbox::new(512);
    for (w, h) in [(1920, 1080), (1080, 1920), (1366, 768), (513, 511), (512, 512), (77, 1300), (1, 1)] {
        let out = lb.fit(&gradient(w, h));
        assert_eq!(out.dimensions(), (512, 512), "source {w}x{h}");
    }
}

#[test]
fn fitting_is_deterministic() {
    let lb = Letterbox::new(512);
    let src = gradient(1280, 720);
    assert_eq!(lb.fit(&src).into_raw(), lb.fit(&src).into_raw());
}

#[test]
fn padding_on_opposing_sides_differs_by_at_most_one() {
    let lb = Letterbox::new(512);
    for (w, h) in [(1920, 1080), (1000, 999), (1365, 767), (333, 101), (1023, 1), (640, 2048)] {
        let p = lb.placement(w, h);
        assert!(p.width <= 512 && p.height <= 512, "{w}x{h} overflows: {p:?}");
        let right = 512 - p.width - p.left;
        let bottom = 512 - p.height - p.top;
        assert!(right.abs_diff(p.left) <= 1, "{w}x{h}: {p:?}");
        assert!(bottom.abs_diff(p.top) <= 1, "{w}x{h}: {p:?}");
        // The longer side is the one that comes closest to the canvas.
        if w >= h {
            assert!(p.left <= p.top);
        } else {
            assert!(p.top <= p.left);
        }
    }
}

#[test]
fn letterboxed_pixels_are_zero_and_content_is_not() {
    let lb = Letterbox::new(512);
    let src = RgbaImage::from_pixel(1920, 1080, Rgba([255, 255, 255, 255]));
    let out = lb.fit(&src);
    let p = lb.placement(1920, 1080);
    assert_eq!(out.get_pixel(256, p.top - 1).0, [0, 0, 0, 0]);
    assert_eq!(out.get_pixel(256, p.top + p.height).0, [0, 0, 0, 0]);
    assert_eq!(out.get_pixel(256, p.top).0, [255, 255, 255, 255]);
    assert_eq!(out.get_pixel(p.left, p.top + p.height - 1).0, [255, 255, 255, 255]);
}
