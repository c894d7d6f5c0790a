//! Real desktop backends: `enigo` for input, `screenshots` for capture and
//! window enumeration through the `windows` crate.

use crate::{
    select_window, DeviceError, Direction, InputDevice, Key, MonitorRegion, MouseButton,
    ScreenSource, WindowLocator,
};
use enigo::{Axis, Button, Coordinate, Enigo, Keyboard, Mouse, Settings};
use image::RgbaImage;
use screenshots::Screen;

pub struct EnigoInput {
    enigo: Enigo,
}

impl EnigoInput {
    /// # Errors
    ///
    /// Returns [`DeviceError::Input`] if the platform input connection cannot
    /// be established (no display server, missing permissions).
    pub fn new() -> Result<Self, DeviceError> {
        let enigo =
            Enigo::new(&Settings::default()).map_err(|e| DeviceError::Input(e.to_string()))?;
        Ok(Self { enigo })
    }
}

fn direction(direction: Direction) -> enigo::Direction {
    match direction {
        Direction::Press => enigo::Direction::Press,
        Direction::Release => enigo::Direction::Release,
    }
}

fn map_key(key: Key) -> Result<enigo::Key, DeviceError> {
    use enigo::Key as K;
    let mapped = match key {
        Key::Backspace => K::Backspace,
        Key::CapsLock => K::CapsLock,
        Key::Delete => K::Delete,
        Key::Down => K::DownArrow,
        Key::Char(c) => K::Unicode(c),
        Key::Left => K::LeftArrow,
        Key::End => K::End,
        Key::Enter => K::Return,
        Key::Escape => K::Escape,
        Key::PageDown => K::PageDown,
        Key::PageUp => K::PageUp,
        Key::Right => K::RightArrow,
        Key::Space => K::Space,
        Key::Tab => K::Tab,
        Key::Up => K::UpArrow,
        Key::Home => K::Home,
        Key::AltLeft | Key::AltRight => alt_key(key)?,
        other => platform_key(other)?,
    };
    Ok(mapped)
}

#[cfg(windows)]
#[allow(clippy::unnecessary_wraps)]
fn alt_key(key: Key) -> Result<enigo::Key, DeviceError> {
    Ok(match key {
        Key::AltRight => enigo::Key::RMenu,
        _ => enigo::Key::LMenu,
    })
}

/// X11 keysym of the right Alt key. `enigo::Key::Alt` sends the left one.
#[cfg(all(unix, not(target_os = "macos")))]
const XK_ALT_R: u32 = 0xffea;

#[cfg(all(unix, not(target_os = "macos")))]
#[allow(clippy::unnecessary_wraps)]
fn alt_key(key: Key) -> Result<enigo::Key, DeviceError> {
    Ok(match key {
        Key::AltRight => enigo::Key::Other(XK_ALT_R),
        _ => enigo::Key::Alt,
    })
}

#[cfg(target_os = "macos")]
fn alt_key(key: Key) -> Result<enigo::Key, DeviceError> {
    match key {
        Key::AltRight => Err(DeviceError::Unsupported("altright")),
        _ => Ok(enigo::Key::Alt),
    }
}

#[cfg(not(target_os = "macos"))]
fn platform_key(key: Key) -> Result<enigo::Key, DeviceError> {
    use enigo::Key as K;
    Ok(match key {
        Key::CtrlLeft => K::LControl,
        Key::CtrlRight => K::RControl,
        Key::ShiftLeft => K::LShift,
        Key::ShiftRight => K::RShift,
        Key::Insert => K::Insert,
        Key::NumLock => K::Numlock,
        Key::Numpad(0) => K::Numpad0,
        Key::Numpad(1) => K::Numpad1,
        Key::Numpad(2) => K::Numpad2,
        Key::Numpad(3) => K::Numpad3,
        Key::Numpad(4) => K::Numpad4,
        Key::Numpad(5) => K::Numpad5,
        Key::Numpad(6) => K::Numpad6,
        Key::Numpad(7) => K::Numpad7,
        Key::Numpad(8) => K::Numpad8,
        Key::Numpad(9) => K::Numpad9,
        _ => return Err(DeviceError::Unsupported("keypad digit out of range")),
    })
}

#[cfg(target_os = "macos")]
fn platform_key(key: Key) -> Result<enigo::Key, DeviceError> {
    use enigo::Key as K;
    match key {
        Key::CtrlLeft | Key::CtrlRight => Ok(K::Control),
        Key::ShiftLeft | Key::ShiftRight => Ok(K::Shift),
        Key::Insert => Err(DeviceError::Unsupported("insert")),
        Key::NumLock => Err(DeviceError::Unsupported("numlock")),
        _ => Err(DeviceError::Unsupported("keypad")),
    }
}

impl InputDevice for EnigoInput {
    fn key(&mut self, key: Key, dir: Direction) -> Result<(), DeviceError> {
        let mapped = map_key(key)?;
        self.enigo
            .key(mapped, direction(dir))
            .map_err(|e| DeviceError::Input(format!("{key} {dir:?}: {e}")))
    }

    fn move_to(&mut self, x: i32, y: i32) -> Result<(), DeviceError> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| DeviceError::Input(e.to_string()))
    }

    fn button(&mut self, button: MouseButton, dir: Direction) -> Result<(), DeviceError> {
        let mapped = match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
        };
        self.enigo
            .button(mapped, direction(dir))
            .map_err(|e| DeviceError::Input(e.to_string()))
    }

    fn scroll(&mut self, ticks: i32) -> Result<(), DeviceError> {
        self.enigo
            .scroll(ticks, Axis::Vertical)
            .map_err(|e| DeviceError::Input(e.to_string()))
    }
}

/// Captures from whichever display contains the region's top-left corner.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenCapture;

impl ScreenSource for ScreenCapture {
    fn grab(&mut self, region: &MonitorRegion) -> Result<RgbaImage, DeviceError> {
        let screen = Screen::from_point(region.left, region.top)
            .map_err(|e| DeviceError::Capture(e.to_string()))?;
        let info = screen.display_info;
        screen
            .capture_area(
                region.left - info.x,
                region.top - info.y,
                region.width,
                region.height,
            )
            .map_err(|e| DeviceError::Capture(e.to_string()))
    }
}

/// Finds the game window among the visible top-level windows by title.
///
/// Only Windows can enumerate windows; elsewhere configure a fixed
/// rectangle and use [`crate::FixedWindow`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TitleWindow;

impl WindowLocator for TitleWindow {
    fn find(&self, title: &str) -> Result<MonitorRegion, DeviceError> {
        let windows = visible_windows()?;
        tracing::debug!(title, candidates = windows.len(), "searching top-level windows");
        select_window(title, &windows).ok_or_else(|| DeviceError::WindowNotFound(title.to_owned()))
    }
}

#[cfg(windows)]
fn visible_windows() -> Result<Vec<(String, MonitorRegion)>, DeviceError> {
    use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT};
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetWindowRect, GetWindowTextW, IsWindowVisible,
    };

    #[allow(clippy::cast_sign_loss)]
    unsafe extern "system" fn collect(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let found = &mut *(lparam.0 as *mut Vec<(String, MonitorRegion)>);
        if !IsWindowVisible(hwnd).as_bool() {
            return BOOL(1);
        }
        let mut title = [0u16; 512];
        let len = GetWindowTextW(hwnd, &mut title);
        if len <= 0 {
            return BOOL(1);
        }
        let mut rect = RECT::default();
        if GetWindowRect(hwnd, &mut rect).is_ok() {
            let width = (rect.right - rect.left).max(0) as u32;
            let height = (rect.bottom - rect.top).max(0) as u32;
            found.push((
                String::from_utf16_lossy(&title[..len as usize]),
                MonitorRegion::new(rect.left, rect.top, width, height),
            ));
        }
        BOOL(1)
    }

    let mut found: Vec<(String, MonitorRegion)> = Vec::new();
    // SAFETY: `collect` only runs during this call and `found` outlives it.
    unsafe { EnumWindows(Some(collect), LPARAM(std::ptr::addr_of_mut!(found) as isize)) }
        .map_err(|e| DeviceError::WindowList(e.to_string()))?;
    Ok(found)
}

#[cfg(not(windows))]
fn visible_windows() -> Result<Vec<(String, MonitorRegion)>, DeviceError> {
    Err(DeviceError::WindowList(
        "window enumeration is only available on Windows; set `window` in the config".into(),
    ))
}
