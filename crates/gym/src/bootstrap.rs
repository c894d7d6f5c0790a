//! Pre-match menu navigation.
//!
//! ```text
//! FindMatch -> ModeSelect --(> direct)--------------------> TutorialEntry -> Done
//!                  |                                            ^
//!                  +--(<= direct: drag, pause)--> ModeSelectRetry
//!                                                    |
//!                                                    +--(< retry)--> Aborted
//! ```
//!
//! The flow never touches a device. It asks for one template at a time via
//! [`BootstrapFlow::wanted`] and answers each [`Match`] with the gestures to
//! perform, in window pixel coordinates.

use crate::config::{Clicks, EnvConfig};
use crate::error::EnvError;
use std::time::Duration;
use tracing::{debug, warn};
use vision::{Match, TemplateId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    FindMatch,
    ModeSelect,
    ModeSelectRetry,
    TutorialEntry,
    Done,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Left click at a window-relative position.
    Click { x: i32, y: i32 },
    /// Left-button drag from the current cursor to a window-relative
    /// position.
    Drag { to_x: i32, to_y: i32 },
    Pause(Duration),
}

#[derive(Debug, Clone)]
pub struct BootstrapFlow {
    step: BootstrapStep,
    mode_direct: f32,
    mode_retry: f32,
    clicks: Clicks,
    reveal_pause: Duration,
    find_match_at: (i32, i32),
}

impl BootstrapFlow {
    #[must_use]
    pub fn new(config: &EnvConfig) -> Self {
        Self {
            step: BootstrapStep::FindMatch,
            mode_direct: config.thresholds.mode_direct,
            mode_retry: config.thresholds.mode_retry,
            clicks: config.clicks,
            reveal_pause: config.timing.reveal_pause(),
            find_match_at: (0, 0),
        }
    }

    #[must_use]
    pub fn step(&self) -> BootstrapStep {
        self.step
    }

    /// The template to look for next, or `None` once the flow has ended.
    #[must_use]
    pub fn wanted(&self) -> Option<TemplateId> {
        match self.step {
            BootstrapStep::FindMatch => Some(TemplateId::FindMatch),
            BootstrapStep::ModeSelect | BootstrapStep::ModeSelectRetry => {
                Some(TemplateId::DeathmatchMode)
            }
            BootstrapStep::TutorialEntry => Some(TemplateId::Tutorial),
            BootstrapStep::Done | BootstrapStep::Aborted => None,
        }
    }

    /// Feed the result for [`BootstrapFlow::wanted`] and get the gestures to
    /// perform before asking again.
    ///
    /// # Errors
    ///
    /// [`EnvError::ModeUnavailable`] when the mode button is still below the
    /// retry threshold after the reveal drag. The flow is then
    /// [`BootstrapStep::Aborted`].
    pub fn advance(&mut self, found: Match) -> Result<Vec<Gesture>, EnvError> {
        debug!(step = ?self.step, confidence = found.confidence, "bootstrap");
        match self.step {
            BootstrapStep::FindMatch => {
                self.find_match_at = origin(found);
                self.step = BootstrapStep::ModeSelect;
                Ok(vec![self.click(TemplateId::FindMatch, found)])
            }
            BootstrapStep::ModeSelect if found.confidence > self.mode_direct => {
                self.step = BootstrapStep::TutorialEntry;
                Ok(vec![self.click(TemplateId::DeathmatchMode, found)])
            }
            BootstrapStep::ModeSelect => {
                warn!(confidence = found.confidence, "deathmatch mode not visible, revealing more modes");
                self.step = BootstrapStep::ModeSelectRetry;
                let (x, y) = self.find_match_at;
                Ok(vec![
                    Gesture::Drag { to_x: x + self.clicks.reveal_drag_dx, to_y: y },
                    Gesture::Pause(self.reveal_pause),
                ])
            }
            BootstrapStep::ModeSelectRetry if found.confidence < self.mode_retry => {
                warn!(confidence = found.confidence, "deathmatch mode unavailable, aborting");
                self.step = BootstrapStep::Aborted;
                Err(EnvError::ModeUnavailable { confidence: found.confidence })
            }
            BootstrapStep::ModeSelectRetry => {
                self.step = BootstrapStep::TutorialEntry;
                Ok(vec![self.click(TemplateId::DeathmatchMode, found)])
            }
            BootstrapStep::TutorialEntry => {
                self.step = BootstrapStep::Done;
                Ok(vec![self.click(TemplateId::Tutorial, found)])
            }
            BootstrapStep::Done | BootstrapStep::Aborted => Ok(Vec::new()),
        }
    }

    fn click(&self, id: TemplateId, found: Match) -> Gesture {
        let (x, y) = origin(found);
        let (dx, dy) = self.clicks.offset(id);
        Gesture::Click { x: x + dx, y: y + dy }
    }
}

#[allow(clippy::cast_possible_wrap)]
fn origin(found: Match) -> (i32, i32) {
    (found.x as i32, found.y as i32)
}
