#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Device
//!
//! Side-effecting operating system capabilities used by the game environment.
//!
//! Everything that touches the real desktop (synthesizing keyboard and mouse
//! input, grabbing pixels off the screen, finding the game window and owning
//! the game process) sits behind one of the traits in this crate. Two families
//! of implementations exist:
//!
//! -   [`mock`]: recording and scripted fakes that never touch the OS. Every
//!     test in the workspace runs against these.
//! -   `desktop` (feature `desktop`): `enigo` for input injection,
//!     `screenshots` for capture and, on Windows, the `windows` crate for
//!     finding the game window by title.
//!
//! Process handling in [`process`] only needs `std::process` and is always
//! available.

pub mod keys;
pub mod mock;
pub mod process;

#[cfg(feature = "desktop")]
pub mod desktop;

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub use keys::Key;
pub use process::{ChildProcess, GameProcess, ProcessLauncher, SystemLauncher};

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("input injection failed: {0}")]
    Input(String),
    #[error("screen capture failed: {0}")]
    Capture(String),
    #[error("no window titled {0:?}")]
    WindowNotFound(String),
    #[error("listing windows failed: {0}")]
    WindowList(String),
    #[error("failed to launch {path:?}: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to terminate game process: {0}")]
    Terminate(#[source] std::io::Error),
    #[error("key not available on this platform: {0}")]
    Unsupported(&'static str),
}

/// Press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Press,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    Left,
    Right,
}

/// Screen rectangle occupied by the game window, in absolute desktop pixels.
///
/// Bound once when the environment is created. The window is expected to keep
/// its position and size for the lifetime of the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorRegion {
    pub top: i32,
    pub left: i32,
    pub width: u32,
    pub height: u32,
}

impl MonitorRegion {
    #[must_use]
    pub const fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self { top, left, width, height }
    }

    /// Absolute desktop position for a point given as fractions of the
    /// window's width and height. `(0.0, 0.0)` is the top-left corner and
    /// `(1.0, 1.0)` the bottom-right one.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn point_at(&self, fx: f64, fy: f64) -> (i32, i32) {
        let x = f64::from(self.left) + fx * f64::from(self.width);
        let y = f64::from(self.top) + fy * f64::from(self.height);
        (x.round() as i32, y.round() as i32)
    }

    /// Translate window-relative pixel coordinates to absolute ones.
    #[must_use]
    pub fn to_absolute(&self, x: i32, y: i32) -> (i32, i32) {
        (self.left + x, self.top + y)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Keyboard and mouse injection.
///
/// Every call issues exactly one OS-level event; no call retries.
pub trait InputDevice {
    fn key(&mut self, key: Key, direction: Direction) -> Result<(), DeviceError>;

    /// Warp the cursor to an absolute desktop position.
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), DeviceError>;

    fn button(&mut self, button: MouseButton, direction: Direction) -> Result<(), DeviceError>;

    /// Scroll the wheel by `ticks` notches. Positive scrolls down.
    fn scroll(&mut self, ticks: i32) -> Result<(), DeviceError>;
}

/// Grabs pixel data for a rectangle of the desktop.
pub trait ScreenSource {
    /// Returns an RGBA image exactly `region.width` x `region.height` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Capture`] when the platform refuses the grab.
    fn grab(&mut self, region: &MonitorRegion) -> Result<RgbaImage, DeviceError>;
}

/// Window discovery by title.
pub trait WindowLocator {
    /// # Errors
    ///
    /// Returns [`DeviceError::WindowNotFound`] when no window matches.
    fn find(&self, title: &str) -> Result<MonitorRegion, DeviceError>;
}

/// Window locator for a window whose rectangle is already known, e.g. from a
/// configuration file. The title is only used for diagnostics.
#[derive(Debug, Clone)]
pub struct FixedWindow {
    region: Option<MonitorRegion>,
}

impl FixedWindow {
    #[must_use]
    pub fn new(region: Option<MonitorRegion>) -> Self {
        Self { region }
    }
}

impl WindowLocator for FixedWindow {
    fn find(&self, title: &str) -> Result<MonitorRegion, DeviceError> {
        match self.region {
            Some(region) if !region.is_empty() => Ok(region),
            _ => Err(DeviceError::WindowNotFound(title.to_owned())),
        }
    }
}

/// Pick the window for `title` from `(title, rectangle)` candidates.
///
/// An exact title wins over a case-insensitive substring match, so a
/// launcher window named "Arena Launcher" does not shadow "Arena". Windows
/// with an empty rectangle (minimized, hidden helpers) are skipped. Among
/// equal candidates the first listed is taken.
#[must_use]
pub fn select_window(title: &str, candidates: &[(String, MonitorRegion)]) -> Option<MonitorRegion> {
    if title.is_empty() {
        return None;
    }
    let wanted = title.to_lowercase();
    let usable = || candidates.iter().filter(|(_, region)| !region.is_empty());
    usable()
        .find(|(name, _)| name == title)
        .or_else(|| usable().find(|(name, _)| name.to_lowercase().contains(&wanted)))
        .map(|(_, region)| *region)
}
