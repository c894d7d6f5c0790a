//! Action tensor layout.
//!
//! An action is a `(2, 85)` float tensor. Row 0 is the press channel, row 1
//! the release channel. Each row holds:
//!
//! | index   | meaning                                   |
//! |---------|-------------------------------------------|
//! | 0..80   | key mask, one entry per [`crate::Keymap`] slot |
//! | 80, 81  | cursor x, y as fractions of the window    |
//! | 82, 83  | left, right button intent                 |
//! | 84      | scroll wheel intent (press channel only)  |
//!
//! Values lie in `[-1, 1]`. Mask and button entries are active iff strictly
//! greater than zero.

use crate::error::EnvError;
use crate::keymap::KEY_COUNT;

pub const MOUSE_X: usize = KEY_COUNT;
pub const MOUSE_Y: usize = KEY_COUNT + 1;
pub const LEFT_BUTTON: usize = KEY_COUNT + 2;
pub const RIGHT_BUTTON: usize = KEY_COUNT + 3;
pub const SCROLL: usize = KEY_COUNT + 4;
pub const CHANNEL_LEN: usize = KEY_COUNT + 5;
pub const ACTION_SHAPE: [usize; 2] = [2, CHANNEL_LEN];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Press = 0,
    Release = 1,
}

/// A validated action. Construction is the only place values are checked, so
/// holding an `Action` means it can be applied without further validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    channels: [[f32; CHANNEL_LEN]; 2],
}

impl Default for Action {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Action {
    /// The do-nothing action: no keys, no buttons, cursor at the window's
    /// top-left corner.
    #[must_use]
    pub fn zeros() -> Self {
        Self { channels: [[0.0; CHANNEL_LEN]; 2] }
    }

    /// Build an action from a row-major buffer and its claimed shape.
    ///
    /// # Errors
    ///
    /// [`EnvError::ActionShape`] if the shape is not `[2, 85]` or does not
    /// match the buffer length, [`EnvError::ActionValue`] for the first value
    /// that is not finite or lies outside `[-1, 1]`.
    pub fn from_vec(shape: &[usize], data: Vec<f32>) -> Result<Self, EnvError> {
        if shape != ACTION_SHAPE || data.len() != ACTION_SHAPE[0] * ACTION_SHAPE[1] {
            let mut actual = shape.to_vec();
            if shape.iter().product::<usize>() != data.len() {
                actual = vec![data.len()];
            }
            return Err(EnvError::ActionShape { expected: ACTION_SHAPE, actual });
        }
        if let Some((index, &value)) = data
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || v.abs() > 1.0)
        {
            return Err(EnvError::ActionValue { index, value });
        }
        let mut channels = [[0.0; CHANNEL_LEN]; 2];
        for (row, chunk) in channels.iter_mut().zip(data.chunks_exact(CHANNEL_LEN)) {
            row.copy_from_slice(chunk);
        }
        Ok(Self { channels })
    }

    /// Set one component, returning the updated action.
    ///
    /// # Errors
    ///
    /// Same value checks as [`Action::from_vec`]; an index past the channel
    /// length is reported as a shape error.
    pub fn with(mut self, channel: ChannelKind, index: usize, value: f32) -> Result<Self, EnvError> {
        if index >= CHANNEL_LEN {
            return Err(EnvError::ActionShape {
                expected: ACTION_SHAPE,
                actual: vec![channel as usize, index],
            });
        }
        if !value.is_finite() || value.abs() > 1.0 {
            return Err(EnvError::ActionValue {
                index: channel as usize * CHANNEL_LEN + index,
                value,
            });
        }
        self.channels[channel as usize][index] = value;
        Ok(self)
    }

    #[must_use]
    pub fn channel(&self, kind: ChannelKind) -> Channel<'_> {
        Channel { values: &self.channels[kind as usize] }
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<f32> {
        self.channels.iter().flatten().copied().collect()
    }
}

/// Read-only view of one action row.
#[derive(Debug, Clone, Copy)]
pub struct Channel<'a> {
    values: &'a [f32; CHANNEL_LEN],
}

impl Channel<'_> {
    /// Indices of active key mask entries.
    pub fn active_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.values[..KEY_COUNT]
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .map(|(i, _)| i)
    }

    /// Cursor target as window fractions, clamped to the window.
    #[must_use]
    pub fn cursor(&self) -> (f64, f64) {
        (
            f64::from(self.values[MOUSE_X]).clamp(0.0, 1.0),
            f64::from(self.values[MOUSE_Y]).clamp(0.0, 1.0),
        )
    }

    #[must_use]
    pub fn left(&self) -> bool {
        self.values[LEFT_BUTTON] > 0.0
    }

    #[must_use]
    pub fn right(&self) -> bool {
        self.values[RIGHT_BUTTON] > 0.0
    }

    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.values[SCROLL]
    }
}
