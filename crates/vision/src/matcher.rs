use crate::ncc;
use crate::template::{TemplateId, TemplateSet};
use image::RgbaImage;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

/// Best placement of a template in a frame.
///
/// `(x, y)` is the top-left corner of the matched window in frame pixels.
/// `confidence` is a similarity score in `[-1, 1]`; only non-negative values
/// carry meaning and callers compare it against fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub x: u32,
    pub y: u32,
    pub confidence: f32,
}

impl Match {
    /// A miss: nothing resembling the template was found.
    pub const NONE: Match = Match { x: 0, y: 0, confidence: 0.0 };
}

/// Finds named templates in live frames.
///
/// Never fails and never blocks on absence: a template that is not on
/// screen simply comes back with a low confidence.
pub trait Locator {
    fn locate(&self, id: TemplateId, frame: &RgbaImage) -> Match;
}

/// Real locator backed by [`ncc::best_match`].
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    templates: TemplateSet,
}

impl TemplateMatcher {
    #[must_use]
    pub fn new(templates: TemplateSet) -> Self {
        Self { templates }
    }
}

impl Locator for TemplateMatcher {
    fn locate(&self, id: TemplateId, frame: &RgbaImage) -> Match {
        let gray = image::imageops::grayscale(frame);
        let found = ncc::best_match(&gray, self.templates.get(id)).unwrap_or(Match::NONE);
        tracing::debug!(template = %id, x = found.x, y = found.y, confidence = found.confidence, "locate");
        found
    }
}

#[derive(Debug, Default)]
struct Script {
    queued: VecDeque<Match>,
    last: Option<Match>,
}

/// Locator that replays pre-programmed results per template.
///
/// Each call pops the next scripted result for that template and repeats the
/// final one once the script is exhausted. Unscripted templates report
/// [`Match::NONE`]. Frames are ignored.
#[derive(Debug, Default)]
pub struct ScriptedLocator {
    scripts: RefCell<HashMap<TemplateId, Script>>,
    calls: RefCell<Vec<TemplateId>>,
}

impl ScriptedLocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue confidences reported at the origin.
    #[must_use]
    pub fn script(self, id: TemplateId, confidences: impl IntoIterator<Item = f32>) -> Self {
        self.script_at(id, 0, 0, confidences)
    }

    /// Queue confidences reported at `(x, y)`.
    #[must_use]
    pub fn script_at(
        self,
        id: TemplateId,
        x: u32,
        y: u32,
        confidences: impl IntoIterator<Item = f32>,
    ) -> Self {
        {
            let mut scripts = self.scripts.borrow_mut();
            let script = scripts.entry(id).or_default();
            script
                .queued
                .extend(confidences.into_iter().map(|confidence| Match { x, y, confidence }));
        }
        self
    }

    /// Templates looked up so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<TemplateId> {
        self.calls.borrow().clone()
    }
}

impl Locator for ScriptedLocator {
    fn locate(&self, id: TemplateId, _frame: &RgbaImage) -> Match {
        self.calls.borrow_mut().push(id);
        let mut scripts = self.scripts.borrow_mut();
        let Some(script) = scripts.get_mut(&id) else {
            return Match::NONE;
        };
        if let Some(next) = script.queued.pop_front() {
            script.last = Some(next);
        }
        script.last.unwrap_or(Match::NONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgba};

    #[test]
    fn scripted_locator_replays_then_repeats() {
        let frame = RgbaImage::new(1, 1);
        let locator = ScriptedLocator::new()
            .script_at(TemplateId::MatchStarted, 3, 4, [0.5, 0.8]);
        let seen: Vec<f32> = (0..3)
            .map(|_| locator.locate(TemplateId::MatchStarted, &frame).confidence)
            .collect();
        assert_eq!(seen, vec![0.5, 0.8, 0.8]);
        let m = locator.locate(TemplateId::MatchStarted, &frame);
        assert_eq!((m.x, m.y), (3, 4));
        assert_eq!(locator.locate(TemplateId::Tutorial, &frame), Match::NONE);
        assert_eq!(locator.calls().len(), 5);
    }

    #[test]
    fn template_matcher_finds_template_in_color_frame() {
        // A bright cross on a dark background, drawn into an RGBA frame.
        let mut frame = RgbaImage::from_pixel(40, 30, Rgba([10, 20, 30, 255]));
        for i in 0..7 {
            frame.put_pixel(20 + i, 15, Rgba([250, 240, 230, 255]));
            frame.put_pixel(23, 12 + i, Rgba([250, 240, 230, 255]));
        }
        let cross = image::imageops::grayscale(&image::imageops::crop_imm(&frame, 18, 10, 11, 11).to_image());

        let images = TemplateId::ALL
            .into_iter()
            .map(|id| {
                let img = if id == TemplateId::MatchStarted {
                    cross.clone()
                } else {
                    GrayImage::from_pixel(3, 3, Luma([0]))
                };
                (id, img)
            })
            .collect();
        let matcher = TemplateMatcher::new(TemplateSet::from_images(images).unwrap());

        let hit = matcher.locate(TemplateId::MatchStarted, &frame);
        assert_eq!((hit.x, hit.y), (18, 10));
        assert!(hit.confidence > 0.99);

        let miss = matcher.locate(TemplateId::FindMatch, &frame);
        assert!(miss.confidence < 0.6);
    }
}
