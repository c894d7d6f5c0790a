#![allow(dead_code)]

use device::mock::{NullLauncher, RecordingInput, ScriptedScreen};
use device::{FixedWindow, MonitorRegion};
use gym::config::{Clicks, ObservationConfig, Thresholds, Timing};
use gym::{Devices, EnvConfig, Environment, ExploreMode};
use vision::{ScriptedLocator, TemplateId};

pub const WINDOW: MonitorRegion = MonitorRegion::new(100, 50, 1000, 800);

/// Config with every delay zeroed so tests never sleep.
pub fn config() -> EnvConfig {
    EnvConfig {
        window_title: "Arena".into(),
        window: Some(WINDOW),
        executable: "arena".into(),
        args: Vec::new(),
        templates: TemplateId::ALL
            .into_iter()
            .map(|id| (id.name().to_owned(), format!("/nonexistent/{id}.png").into()))
            .collect(),
        thresholds: Thresholds::default(),
        clicks: Clicks::default(),
        timing: Timing { settle_ms: 0, reveal_pause_ms: 0 },
        observation: ObservationConfig::default(),
        scroll_ticks: 5,
        explore: ExploreMode::Match,
    }
}

/// Inspection handles that stay valid after the devices are boxed.
pub struct Handles {
    pub input: RecordingInput,
    pub screen: ScriptedScreen,
    pub launcher: NullLauncher,
}

pub fn devices(window: Option<MonitorRegion>) -> (Handles, Devices) {
    let handles = Handles {
        input: RecordingInput::new(),
        screen: ScriptedScreen::new(),
        launcher: NullLauncher::new(),
    };
    let devices = Devices {
        input: Box::new(handles.input.clone()),
        screen: Box::new(handles.screen.clone()),
        windows: Box::new(FixedWindow::new(window)),
        launcher: Box::new(handles.launcher.clone()),
    };
    (handles, devices)
}

/// Menu buttons that are all clearly visible, at distinct window positions.
pub fn menus_visible(locator: ScriptedLocator) -> ScriptedLocator {
    locator
        .script_at(TemplateId::FindMatch, 500, 300, [0.95])
        .script_at(TemplateId::DeathmatchMode, 100, 200, [0.9])
        .script_at(TemplateId::Tutorial, 40, 60, [0.9])
}

pub fn environment(locator: ScriptedLocator) -> (Handles, Environment) {
    environment_with(config(), locator)
}

pub fn environment_with(config: EnvConfig, locator: ScriptedLocator) -> (Handles, Environment) {
    let (handles, devices) = devices(Some(WINDOW));
    let env = match Environment::from_parts(config, devices, Box::new(locator)) {
        Ok(env) => env,
        Err(err) => panic!("environment setup failed: {err}"),
    };
    (handles, env)
}
