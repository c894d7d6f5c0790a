use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Where a source frame lands on the square canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Integer downscale factor applied to both axes.
    pub ratio: u32,
    pub width: u32,
    pub height: u32,
    pub left: u32,
    pub top: u32,
}

/// Aspect-preserving fit of arbitrary frames onto a `size`x`size` canvas of
/// zero-valued pixels.
///
/// The frame is shrunk by a single integer factor, the smallest one that
/// makes its longer side fit, and centered. Leftover padding is split with
/// floor division, so the two sides of an axis differ by at most one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Letterbox {
    size: u32,
}

impl Letterbox {
    #[must_use]
    pub fn new(size: u32) -> Self {
        assert!(size > 0, "canvas size must be positive");
        Self { size }
    }

    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[must_use]
    pub fn placement(&self, src_width: u32, src_height: u32) -> Placement {
        let longest = src_width.max(src_height);
        let ratio = longest.div_ceil(self.size).max(1);
        let width = (src_width / ratio).max(1);
        let height = (src_height / ratio).max(1);
        Placement {
            ratio,
            width,
            height,
            left: (self.size - width) / 2,
            top: (self.size - height) / 2,
        }
    }

    /// Fit `frame` onto the canvas. The result is always `size`x`size`.
    #[must_use]
    pub fn fit(&self, frame: &RgbaImage) -> RgbaImage {
        let mut canvas = RgbaImage::new(self.size, self.size);
        let (w, h) = frame.dimensions();
        if w == 0 || h == 0 {
            return canvas;
        }
        let p = self.placement(w, h);
        if p.ratio == 1 {
            imageops::replace(&mut canvas, frame, i64::from(p.left), i64::from(p.top));
        } else {
            let resized = imageops::resize(frame, p.width, p.height, FilterType::Triangle);
            imageops::replace(&mut canvas, &resized, i64::from(p.left), i64::from(p.top));
        }
        canvas
    }
}
