//! Zero-mean normalized cross-correlation.
//!
//! For a template `T` of `n` pixels placed at each offset of a frame `I`
//!
//! ```text
//!            Σ (I - mean I) (T - mean T)
//! score = ---------------------------------
//!         sqrt(Σ (I - mean I)² Σ (T - mean T)²)
//! ```
//!
//! The raw cross term `Σ I·T` comes from `imageproc`'s sliding
//! cross-correlation; the per-window sums of `I` and `I²` come from integral
//! images, so only the cross term costs `O(n)` per offset. Scores lie in
//! `[-1, 1]`; windows or templates with no variance score `0`.
//!
//! Frames larger than [`MAX_SEARCH_DIM`] are searched in two passes: a full
//! scan of a copy shrunk by an integer factor, then an exact scan at native
//! resolution in a small window around each of the best coarse hits.
#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use crate::matcher::Match;
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::integral_image::{integral_image, integral_squared_image};
use imageproc::template_matching::{find_extremes, match_template, MatchTemplateMethod};

type Integral = ImageBuffer<Luma<u64>, Vec<u64>>;
type Scores = ImageBuffer<Luma<f32>, Vec<f32>>;

const FLAT_EPSILON: f64 = 1e-6;

/// Longest frame side scanned exhaustively. Larger frames get a coarse pass.
pub const MAX_SEARCH_DIM: u32 = 320;

/// Coarse hits refined at full resolution.
const COARSE_CANDIDATES: usize = 3;

/// Below this many pixels per side a shrunk template carries too little
/// texture to rank positions, so the search stays exhaustive.
const MIN_COARSE_SIDE: u32 = 4;

/// Best-scoring top-left placement of `template` inside `frame`.
///
/// Returns `None` when the template is empty or does not fit in the frame.
#[must_use]
pub fn best_match(frame: &GrayImage, template: &GrayImage) -> Option<Match> {
    let (fw, fh) = frame.dimensions();
    let (tw, th) = template.dimensions();
    if tw == 0 || th == 0 || tw > fw || th > fh {
        return None;
    }
    let factor = fw.max(fh).div_ceil(MAX_SEARCH_DIM);
    if factor > 1 {
        if let Some(found) = coarse_to_fine(frame, template, factor) {
            return Some(found);
        }
    }
    exhaustive(frame, template)
}

/// Scores every placement at native resolution.
#[must_use]
pub fn exhaustive(frame: &GrayImage, template: &GrayImage) -> Option<Match> {
    let scores = score_map(frame, template)?;
    let extremes = find_extremes(&scores);
    let (x, y) = extremes.max_value_location;
    Some(Match { x, y, confidence: extremes.max_value })
}

fn coarse_to_fine(frame: &GrayImage, template: &GrayImage, factor: u32) -> Option<Match> {
    let (fw, fh) = frame.dimensions();
    let (tw, th) = template.dimensions();
    let (ctw, cth) = (tw / factor, th / factor);
    if ctw < MIN_COARSE_SIDE || cth < MIN_COARSE_SIDE {
        return None;
    }

    let small_frame = imageops::resize(frame, fw / factor, fh / factor, FilterType::Triangle);
    let small_template = imageops::resize(template, ctw, cth, FilterType::Triangle);
    let coarse = score_map(&small_frame, &small_template)?;

    let margin = 2 * factor;
    let found = candidates(&coarse, ctw / 2, cth / 2)
        .into_iter()
        .filter_map(|(cx, cy)| {
            let x0 = (cx * factor).saturating_sub(margin).min(fw - tw);
            let y0 = (cy * factor).saturating_sub(margin).min(fh - th);
            let x1 = (cx * factor + tw + margin).min(fw);
            let y1 = (cy * factor + th + margin).min(fh);
            let window = imageops::crop_imm(frame, x0, y0, x1 - x0, y1 - y0).to_image();
            let local = exhaustive(&window, template)?;
            Some(Match { x: local.x + x0, y: local.y + y0, confidence: local.confidence })
        })
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence));
    tracing::trace!(factor, ?found, "coarse-to-fine search");
    found
}

/// Top coarse positions, at least half a template apart on one axis.
fn candidates(scores: &Scores, apart_x: u32, apart_y: u32) -> Vec<(u32, u32)> {
    let mut ranked: Vec<(f32, u32, u32)> = scores.enumerate_pixels().map(|(x, y, p)| (p[0], x, y)).collect();
    ranked.sort_unstable_by(|a, b| b.0.total_cmp(&a.0));

    let mut picked: Vec<(u32, u32)> = Vec::with_capacity(COARSE_CANDIDATES);
    for (_, x, y) in ranked {
        if picked.len() == COARSE_CANDIDATES {
            break;
        }
        if picked.iter().all(|&(px, py)| x.abs_diff(px) > apart_x || y.abs_diff(py) > apart_y) {
            picked.push((x, y));
        }
    }
    picked
}

fn score_map(frame: &GrayImage, template: &GrayImage) -> Option<Scores> {
    let (fw, fh) = frame.dimensions();
    let (tw, th) = template.dimensions();
    if tw == 0 || th == 0 || tw > fw || th > fh {
        return None;
    }

    let n = f64::from(tw) * f64::from(th);
    let (t_sum, t_sq) = template.pixels().fold((0.0_f64, 0.0_f64), |(s, q), p| {
        let v = f64::from(p[0]);
        (s + v, q + v * v)
    });
    let t_spread = t_sq - t_sum * t_sum / n;

    let cross = match_template(frame, template, MatchTemplateMethod::CrossCorrelation);
    let sums: Integral = integral_image::<_, u64>(frame);
    let squares: Integral = integral_squared_image::<_, u64>(frame);

    Some(ImageBuffer::from_fn(fw - tw + 1, fh - th + 1, |x, y| {
        let s = window_sum(&sums, x, y, tw, th) as f64;
        let q = window_sum(&squares, x, y, tw, th) as f64;
        let spread = q - s * s / n;
        let denom = (spread * t_spread).sqrt();
        let score = if denom > FLAT_EPSILON {
            let numer = f64::from(cross.get_pixel(x, y)[0]) - s * t_sum / n;
            (numer / denom).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Luma([score as f32])
    }))
}

/// Sum over the `w`x`h` window at `(x, y)`. Integral images carry a leading
/// zero row and column, so `(x + w, y + h)` is always in bounds.
fn window_sum(integral: &Integral, x: u32, y: u32, w: u32, h: u32) -> u64 {
    let at = |px: u32, py: u32| integral.get_pixel(px, py)[0];
    (at(x + w, y + h) + at(x, y)) - (at(x + w, y) + at(x, y + h))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic textured frame.
    fn noise(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(73) ^ y.wrapping_mul(151)).wrapping_mul(2_654_435_761) >> 24;
            Luma([(v & 0xff) as u8])
        })
    }

    #[test]
    fn finds_exact_crop() {
        let frame = noise(64, 48);
        let template = image::imageops::crop_imm(&frame, 21, 13, 10, 8).to_image();
        let m = best_match(&frame, &template).unwrap();
        assert_eq!((m.x, m.y), (21, 13));
        assert!(m.confidence > 0.999, "confidence {}", m.confidence);
    }

    #[test]
    fn brightness_shift_does_not_change_score() {
        let frame = noise(40, 40);
        let template = image::imageops::crop_imm(&frame, 5, 9, 12, 12).to_image();
        let brighter = GrayImage::from_fn(40, 40, |x, y| {
            Luma([frame.get_pixel(x, y)[0] / 2 + 100])
        });
        let m = best_match(&brighter, &template).unwrap();
        assert_eq!((m.x, m.y), (5, 9));
        assert!(m.confidence > 0.99, "confidence {}", m.confidence);
    }

    #[test]
    fn flat_template_scores_zero() {
        let frame = noise(20, 20);
        let template = GrayImage::from_pixel(5, 5, Luma([128]));
        let m = best_match(&frame, &template).unwrap();
        assert!(m.confidence.abs() < f32::EPSILON);
    }

    #[test]
    fn oversized_or_empty_template_has_no_match() {
        let frame = noise(10, 10);
        assert!(best_match(&frame, &noise(11, 4)).is_none());
        assert!(best_match(&frame, &GrayImage::new(0, 0)).is_none());
    }

    /// Random gray levels in `cell`-sized squares, closer to UI art than
    /// per-pixel noise.
    fn blocks(width: u32, height: u32, cell: u32) -> GrayImage {
        let coarse = noise(width.div_ceil(cell), height.div_ceil(cell));
        GrayImage::from_fn(width, height, |x, y| *coarse.get_pixel(x / cell, y / cell))
    }

    #[test]
    fn finds_button_in_720p_frame() {
        let frame = blocks(1280, 720, 8);
        let template = image::imageops::crop_imm(&frame, 613, 427, 120, 40).to_image();
        let m = best_match(&frame, &template).unwrap();
        assert_eq!((m.x, m.y), (613, 427));
        assert!(m.confidence > 0.99, "confidence {}", m.confidence);
    }

    #[test]
    fn coarse_search_agrees_with_exhaustive() {
        let frame = blocks(400, 240, 6);
        let template = image::imageops::crop_imm(&frame, 251, 97, 40, 20).to_image();
        let fast = best_match(&frame, &template).unwrap();
        let slow = exhaustive(&frame, &template).unwrap();
        assert_eq!((fast.x, fast.y), (slow.x, slow.y));
        assert!((fast.confidence - slow.confidence).abs() < 1e-4);
    }

    #[test]
    fn tiny_template_in_large_frame_stays_exact() {
        let frame = noise(700, 400);
        let template = image::imageops::crop_imm(&frame, 333, 211, 6, 6).to_image();
        let m = best_match(&frame, &template).unwrap();
        assert_eq!((m.x, m.y), (333, 211));
    }

    #[test]
    fn match_at_frame_edge_is_refined_in_bounds() {
        let frame = blocks(640, 360, 5);
        let template = image::imageops::crop_imm(&frame, 640 - 50, 360 - 30, 50, 30).to_image();
        let m = best_match(&frame, &template).unwrap();
        assert_eq!((m.x, m.y), (590, 330));
    }

    #[test]
    fn inverted_template_scores_negative() {
        let frame = noise(16, 16);
        let inverted = GrayImage::from_fn(16, 16, |x, y| Luma([255 - frame.get_pixel(x, y)[0]]));
        let m = best_match(&frame, &inverted).unwrap();
        assert!(m.confidence < -0.99, "confidence {}", m.confidence);
    }
}
