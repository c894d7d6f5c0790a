use anyhow::Result;
use device::mock::{NullLauncher, RecordingInput, ScriptedScreen};
use device::{FixedWindow, MonitorRegion};
use gym::config::{Clicks, ObservationConfig, Thresholds, Timing};
use gym::{Action, Devices, Env, EnvConfig, Environment, ExploreMode, ACTION_SHAPE};
use vision::{ScriptedLocator, TemplateId};

const DRY_RUN_WINDOW: MonitorRegion = MonitorRegion::new(0, 0, 1280, 720);

#[derive(Debug, Clone, Copy, Default)]
pub struct Summary {
    pub steps: u64,
    pub episodes: u64,
}

/// Stand-in config for dry runs. No file on disk is ever read.
pub fn dry_run_config() -> EnvConfig {
    EnvConfig {
        window_title: "Dry Run".into(),
        window: Some(DRY_RUN_WINDOW),
        executable: "game".into(),
        args: Vec::new(),
        templates: TemplateId::ALL
            .into_iter()
            .map(|id| (id.name().to_owned(), format!("{id}.png").into()))
            .collect(),
        thresholds: Thresholds::default(),
        clicks: Clicks::default(),
        timing: Timing { settle_ms: 0, reveal_pause_ms: 0 },
        observation: ObservationConfig::default(),
        scroll_ticks: 5,
        explore: ExploreMode::Match,
    }
}

/// Menus always visible, the match starts on the third frame and the first
/// episode ends twenty frames later.
fn dry_run_locator() -> ScriptedLocator {
    ScriptedLocator::new()
        .script_at(TemplateId::FindMatch, 600, 400, [0.95])
        .script_at(TemplateId::DeathmatchMode, 200, 300, [0.9])
        .script_at(TemplateId::Tutorial, 640, 360, [0.9])
        .script(TemplateId::MatchStarted, [0.2, 0.2, 0.9])
        .script(TemplateId::MatchFinished, std::iter::repeat(0.0).take(20).chain([0.9]))
}

pub fn run_dry(config: EnvConfig, steps: u64) -> Result<Summary> {
    let window = config.window.or(Some(DRY_RUN_WINDOW));
    let input = RecordingInput::new();
    let devices = Devices {
        input: Box::new(input.clone()),
        screen: Box::new(ScriptedScreen::new()),
        windows: Box::new(FixedWindow::new(window)),
        launcher: Box::new(NullLauncher::new()),
    };
    let mut env = Environment::from_parts(config, devices, Box::new(dry_run_locator()))?;
    let summary = drive(&mut env, steps)?;
    env.close()?;
    tracing::debug!(events = input.events().len(), "dry run input events recorded");
    Ok(summary)
}

#[cfg(feature = "desktop")]
pub fn run_desktop(config: EnvConfig, steps: u64) -> Result<Summary> {
    use device::desktop::{EnigoInput, ScreenCapture, TitleWindow};
    use device::{SystemLauncher, WindowLocator};

    // A configured rectangle wins over searching by title.
    let windows: Box<dyn WindowLocator> = match config.window {
        Some(region) => Box::new(FixedWindow::new(Some(region))),
        None => Box::new(TitleWindow),
    };
    let devices = Devices {
        input: Box::new(EnigoInput::new()?),
        screen: Box::new(ScreenCapture),
        windows,
        launcher: Box::new(SystemLauncher),
    };
    let mut env = Environment::new(config, devices)?;
    let summary = drive(&mut env, steps)?;
    env.close()?;
    Ok(summary)
}

#[cfg(not(feature = "desktop"))]
#[allow(clippy::needless_pass_by_value)]
pub fn run_desktop(_config: EnvConfig, _steps: u64) -> Result<Summary> {
    anyhow::bail!("built without the `desktop` feature; rebuild with --features desktop or pass --dry-run")
}

/// Step `env` for `steps` steps, holding still while waiting for the match
/// and acting randomly once it runs. Resets whenever an episode ends.
pub fn drive(env: &mut impl Env, steps: u64) -> Result<Summary> {
    env.reset()?;
    let mut summary = Summary { steps: 0, episodes: 1 };
    let mut waiting = true;
    for _ in 0..steps {
        let action = if waiting { Action::zeros() } else { random_action()? };
        let result = env.step(&action)?;
        summary.steps += 1;
        waiting = result.info.waiting;
        if result.done {
            tracing::info!(step = summary.steps, episode = summary.episodes, "Episode finished");
            env.reset()?;
            summary.episodes += 1;
            waiting = true;
        }
    }
    Ok(summary)
}

fn random_action() -> Result<Action> {
    let len: usize = ACTION_SHAPE.iter().product();
    let data = (0..len).map(|_| fastrand::f32() * 2.0 - 1.0).collect();
    Ok(Action::from_vec(&ACTION_SHAPE, data)?)
}
