//! Fakes for every device trait.
//!
//! Handles are cheap to clone and share their state, so a test can keep one
//! clone for inspection after boxing another into the environment.

use crate::{
    DeviceError, Direction, GameProcess, InputDevice, Key, MonitorRegion, MouseButton,
    ProcessLauncher, ScreenSource,
};
use image::RgbaImage;
use std::collections::{BTreeSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key, Direction),
    MoveTo(i32, i32),
    Button(MouseButton, Direction),
    Scroll(i32),
}

/// Input device that records every event instead of injecting it.
#[derive(Debug, Clone, Default)]
pub struct RecordingInput {
    events: Arc<Mutex<Vec<InputEvent>>>,
}

impl RecordingInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<InputEvent>> {
        self.events.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[must_use]
    pub fn events(&self) -> Vec<InputEvent> {
        self.log().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<InputEvent> {
        std::mem::take(&mut *self.log())
    }

    #[must_use]
    pub fn key_events(&self) -> Vec<(Key, Direction)> {
        self.log()
            .iter()
            .filter_map(|e| match e {
                InputEvent::Key(k, d) => Some((*k, *d)),
                _ => None,
            })
            .collect()
    }

    /// Keys whose last recorded event is a press.
    #[must_use]
    pub fn held_keys(&self) -> BTreeSet<Key> {
        let mut held = BTreeSet::new();
        for event in self.log().iter() {
            match event {
                InputEvent::Key(k, Direction::Press) => {
                    held.insert(*k);
                }
                InputEvent::Key(k, Direction::Release) => {
                    held.remove(k);
                }
                _ => {}
            }
        }
        held
    }

    /// Buttons whose last recorded event is a press.
    #[must_use]
    pub fn held_buttons(&self) -> BTreeSet<MouseButton> {
        let mut held = BTreeSet::new();
        for event in self.log().iter() {
            match event {
                InputEvent::Button(b, Direction::Press) => {
                    held.insert(*b);
                }
                InputEvent::Button(b, Direction::Release) => {
                    held.remove(b);
                }
                _ => {}
            }
        }
        held
    }

    #[must_use]
    pub fn cursor(&self) -> Option<(i32, i32)> {
        self.log().iter().rev().find_map(|e| match e {
            InputEvent::MoveTo(x, y) => Some((*x, *y)),
            _ => None,
        })
    }

    fn push(&self, event: InputEvent) {
        tracing::trace!(?event, "recorded input");
        self.log().push(event);
    }
}

impl InputDevice for RecordingInput {
    fn key(&mut self, key: Key, direction: Direction) -> Result<(), DeviceError> {
        self.push(InputEvent::Key(key, direction));
        Ok(())
    }

    fn move_to(&mut self, x: i32, y: i32) -> Result<(), DeviceError> {
        self.push(InputEvent::MoveTo(x, y));
        Ok(())
    }

    fn button(&mut self, button: MouseButton, direction: Direction) -> Result<(), DeviceError> {
        self.push(InputEvent::Button(button, direction));
        Ok(())
    }

    fn scroll(&mut self, ticks: i32) -> Result<(), DeviceError> {
        self.push(InputEvent::Scroll(ticks));
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ScreenState {
    frames: VecDeque<RgbaImage>,
    last: Option<RgbaImage>,
    grabs: Vec<MonitorRegion>,
}

/// Screen source that plays back a queue of frames.
///
/// Each grab pops the next queued frame; once the queue runs dry the last
/// frame is repeated. With nothing ever queued a black frame of the requested
/// size is returned. Frames are resized to the requested region so tests can
/// queue small images.
#[derive(Debug, Clone, Default)]
pub struct ScriptedScreen {
    state: Arc<Mutex<ScreenState>>,
}

impl ScriptedScreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_frames(frames: impl IntoIterator<Item = RgbaImage>) -> Self {
        let screen = Self::default();
        for frame in frames {
            screen.push(frame);
        }
        screen
    }

    fn state(&self) -> MutexGuard<'_, ScreenState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn push(&self, frame: RgbaImage) {
        self.state().frames.push_back(frame);
    }

    /// Regions requested so far, in order.
    #[must_use]
    pub fn grabs(&self) -> Vec<MonitorRegion> {
        self.state().grabs.clone()
    }
}

impl ScreenSource for ScriptedScreen {
    fn grab(&mut self, region: &MonitorRegion) -> Result<RgbaImage, DeviceError> {
        let mut state = self.state();
        state.grabs.push(*region);
        if let Some(next) = state.frames.pop_front() {
            state.last = Some(next);
        }
        let frame = match &state.last {
            Some(frame) if frame.dimensions() == (region.width, region.height) => frame.clone(),
            Some(frame) => image::imageops::resize(
                frame,
                region.width,
                region.height,
                image::imageops::FilterType::Nearest,
            ),
            None => RgbaImage::new(region.width, region.height),
        };
        Ok(frame)
    }
}

/// Game process stand-in that counts terminate calls.
#[derive(Debug, Clone, Default)]
pub struct NullProcess {
    terminations: Arc<AtomicUsize>,
}

impl NullProcess {
    #[must_use]
    pub fn terminations(&self) -> usize {
        self.terminations.load(Ordering::SeqCst)
    }
}

impl GameProcess for NullProcess {
    fn terminate(&mut self) -> Result<(), DeviceError> {
        self.terminations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Launcher that hands out clones of one [`NullProcess`] and remembers what
/// it was asked to launch.
#[derive(Debug, Clone, Default)]
pub struct NullLauncher {
    process: NullProcess,
    launched: Arc<Mutex<Vec<String>>>,
}

impl NullLauncher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn process(&self) -> NullProcess {
        self.process.clone()
    }

    #[must_use]
    pub fn launched(&self) -> Vec<String> {
        self.launched
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl ProcessLauncher for NullLauncher {
    fn launch(
        &self,
        executable: &Path,
        _args: &[String],
    ) -> Result<Box<dyn GameProcess>, DeviceError> {
        self.launched
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(executable.display().to_string());
        Ok(Box::new(self.process.clone()))
    }
}
