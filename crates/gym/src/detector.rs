use crate::config::Thresholds;
use image::RgbaImage;
use tracing::{debug, info};
use vision::{Locator, TemplateId};

/// Coarse progress of one episode. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecycleState {
    NotStarted,
    Waiting,
    InProgress,
    Finished,
}

impl LifecycleState {
    #[must_use]
    pub fn is_waiting(self) -> bool {
        self < LifecycleState::InProgress
    }

    #[must_use]
    pub fn is_done(self) -> bool {
        self == LifecycleState::Finished
    }
}

/// Threshold-driven lifecycle tracker.
///
/// A low score is never an error; it only means the event has not been seen
/// yet and will be looked for again on the next frame.
#[derive(Debug, Clone)]
pub struct StateDetector {
    state: LifecycleState,
    started_above: f32,
    finished_above: f32,
}

impl StateDetector {
    #[must_use]
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            state: LifecycleState::NotStarted,
            started_above: thresholds.match_started,
            finished_above: thresholds.match_finished,
        }
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Start a new episode in [`LifecycleState::Waiting`].
    pub fn begin_episode(&mut self) {
        self.state = LifecycleState::Waiting;
    }

    /// Look for the start screen while waiting, then for the finish screen
    /// once in progress. Both checks can fire on the same frame.
    pub fn observe(&mut self, locator: &dyn Locator, frame: &RgbaImage) -> LifecycleState {
        if self.state.is_waiting() {
            let found = locator.locate(TemplateId::MatchStarted, frame);
            debug!(confidence = found.confidence, "match start check");
            if found.confidence > self.started_above {
                info!(confidence = found.confidence, "match started");
                self.state = LifecycleState::InProgress;
            }
        }
        if self.state == LifecycleState::InProgress {
            let found = locator.locate(TemplateId::MatchFinished, frame);
            debug!(confidence = found.confidence, "match finish check");
            if found.confidence > self.finished_above {
                info!(confidence = found.confidence, "match finished");
                self.state = LifecycleState::Finished;
            }
        }
        self.state
    }
}
