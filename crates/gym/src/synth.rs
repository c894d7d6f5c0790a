//! Turns actions into OS input events.
//!
//! The synthesizer keeps its own record of which keys and buttons it has
//! pressed. A press of something already held and a release of something
//! never pressed are both no-ops, and [`InputSynthesizer::release_all`] can
//! lift everything at an episode boundary.

use crate::action::{Action, ChannelKind};
use crate::error::EnvError;
use crate::keymap::Keymap;
use device::{Direction, InputDevice, Key, MonitorRegion, MouseButton};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::debug;

pub struct InputSynthesizer {
    device: Box<dyn InputDevice>,
    region: MonitorRegion,
    keymap: Keymap,
    settle: Duration,
    scroll_ticks: u32,
    held_keys: BTreeSet<Key>,
    held_buttons: BTreeSet<MouseButton>,
}

impl InputSynthesizer {
    #[must_use]
    pub fn new(
        device: Box<dyn InputDevice>,
        region: MonitorRegion,
        settle: Duration,
        scroll_ticks: u32,
    ) -> Self {
        Self {
            device,
            region,
            keymap: Keymap,
            settle,
            scroll_ticks,
            held_keys: BTreeSet::new(),
            held_buttons: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn held_keys(&self) -> &BTreeSet<Key> {
        &self.held_keys
    }

    #[must_use]
    pub fn held_buttons(&self) -> &BTreeSet<MouseButton> {
        &self.held_buttons
    }

    /// Apply both channels of `action`, every press before any release.
    ///
    /// Within a channel the cursor moves first, then buttons, then keys,
    /// then the wheel.
    ///
    /// # Errors
    ///
    /// Propagates the first device failure. Events issued before the failure
    /// are not rolled back.
    pub fn apply(&mut self, action: &Action) -> Result<(), EnvError> {
        self.apply_channel(action, ChannelKind::Press)?;
        self.apply_channel(action, ChannelKind::Release)
    }

    fn apply_channel(&mut self, action: &Action, kind: ChannelKind) -> Result<(), EnvError> {
        let channel = action.channel(kind);
        let direction = match kind {
            ChannelKind::Press => Direction::Press,
            ChannelKind::Release => Direction::Release,
        };

        let (fx, fy) = channel.cursor();
        let (x, y) = self.region.point_at(fx, fy);
        self.move_to(x, y)?;

        let mut clicked = false;
        for (button, active) in [(MouseButton::Left, channel.left()), (MouseButton::Right, channel.right())] {
            if active {
                clicked |= self.button(button, direction)?;
            }
        }
        if clicked {
            self.settle();
        }

        for index in channel.active_keys() {
            if let Some(key) = self.keymap.get(index) {
                self.key(key, direction)?;
            }
        }

        if kind == ChannelKind::Press {
            let ticks = self.scroll_ticks_for(channel.scroll());
            if ticks != 0 {
                debug!(ticks, "scroll");
                self.device.scroll(ticks)?;
            }
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn scroll_ticks_for(&self, value: f32) -> i32 {
        (f64::from(value) * f64::from(self.scroll_ticks)).round() as i32
    }

    fn key(&mut self, key: Key, direction: Direction) -> Result<(), EnvError> {
        let changed = match direction {
            Direction::Press => self.held_keys.insert(key),
            Direction::Release => self.held_keys.remove(&key),
        };
        if changed {
            debug!(%key, ?direction, "key");
            self.device.key(key, direction)?;
        }
        Ok(())
    }

    /// Returns whether an event was issued.
    fn button(&mut self, button: MouseButton, direction: Direction) -> Result<bool, EnvError> {
        let changed = match direction {
            Direction::Press => self.held_buttons.insert(button),
            Direction::Release => self.held_buttons.remove(&button),
        };
        if changed {
            debug!(?button, ?direction, "button");
            self.device.button(button, direction)?;
        }
        Ok(changed)
    }

    /// Move the cursor to an absolute desktop position and wait for the
    /// game to catch up.
    ///
    /// # Errors
    ///
    /// Propagates device failures.
    pub fn move_to(&mut self, x: i32, y: i32) -> Result<(), EnvError> {
        debug!(x, y, "move");
        self.device.move_to(x, y)?;
        self.settle();
        Ok(())
    }

    /// Left click at an absolute desktop position.
    ///
    /// # Errors
    ///
    /// Propagates device failures.
    pub fn click_at(&mut self, x: i32, y: i32) -> Result<(), EnvError> {
        self.move_to(x, y)?;
        self.button(MouseButton::Left, Direction::Press)?;
        self.button(MouseButton::Left, Direction::Release)?;
        self.settle();
        Ok(())
    }

    /// Drag with the left button from the current cursor position to an
    /// absolute desktop position.
    ///
    /// # Errors
    ///
    /// Propagates device failures.
    pub fn drag_to(&mut self, x: i32, y: i32) -> Result<(), EnvError> {
        self.button(MouseButton::Left, Direction::Press)?;
        self.move_to(x, y)?;
        self.button(MouseButton::Left, Direction::Release)?;
        self.settle();
        Ok(())
    }

    /// Release every key and button still held.
    ///
    /// # Errors
    ///
    /// Propagates the first device failure; whatever was not yet released
    /// stays recorded as held.
    pub fn release_all(&mut self) -> Result<(), EnvError> {
        let keys: Vec<Key> = self.held_keys.iter().copied().collect();
        let buttons: Vec<MouseButton> = self.held_buttons.iter().copied().collect();
        if !keys.is_empty() || !buttons.is_empty() {
            debug!(keys = keys.len(), buttons = buttons.len(), "releasing held input");
        }
        for key in keys {
            self.key(key, Direction::Release)?;
        }
        for button in buttons {
            self.button(button, Direction::Release)?;
        }
        Ok(())
    }

    fn settle(&self) {
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
    }
}
