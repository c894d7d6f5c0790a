use crate::action::{Action, ACTION_SHAPE};
use crate::bootstrap::{BootstrapFlow, Gesture};
use crate::config::{EnvConfig, ExploreMode};
use crate::detector::{LifecycleState, StateDetector};
use crate::error::EnvError;
use crate::synth::InputSynthesizer;
use device::{GameProcess, InputDevice, MonitorRegion, ProcessLauncher, ScreenSource, WindowLocator};
use image::RgbaImage;
use serde::Serialize;
use tracing::{info, warn};
use vision::{Letterbox, Locator, TemplateMatcher, TemplateSet};

/// Range of every action component.
pub const ACTION_BOUNDS: (f32, f32) = (-1.0, 1.0);
/// Range of every observation byte.
pub const OBSERVATION_BOUNDS: (u8, u8) = (0, u8::MAX);

/// Reinforcement learning environment over a live game session.
///
/// Modeled on the classic Gym interface: [`reset`] starts an episode and
/// returns the first observation, [`step`] applies one action and reports
/// what happened, [`close`] tears the session down.
///
/// [`reset`]: Env::reset
/// [`step`]: Env::step
/// [`close`]: Env::close
pub trait Env {
    /// # Errors
    ///
    /// Device failures, [`EnvError::ModeUnavailable`] when the menus cannot
    /// be navigated, [`EnvError::Closed`] after [`Env::close`].
    fn reset(&mut self) -> Result<Observation, EnvError>;

    /// # Errors
    ///
    /// Device failures, [`EnvError::NeedsReset`] without a successful
    /// [`Env::reset`], [`EnvError::Closed`] after [`Env::close`].
    fn step(&mut self, action: &Action) -> Result<StepResult, EnvError>;

    /// Idempotent.
    ///
    /// # Errors
    ///
    /// Failures releasing input or terminating the game process. The
    /// environment counts as closed either way.
    fn close(&mut self) -> Result<(), EnvError>;

    fn action_shape(&self) -> [usize; 2];

    fn observation_shape(&self) -> [usize; 3];
}

/// One letterboxed RGBA frame, `size`x`size`x4, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation(RgbaImage);

impl Observation {
    #[must_use]
    pub fn shape(&self) -> [usize; 3] {
        let (w, h) = self.0.dimensions();
        [h as usize, w as usize, 4]
    }

    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.0.as_raw()
    }

    #[must_use]
    pub fn image(&self) -> &RgbaImage {
        &self.0
    }

    #[must_use]
    pub fn into_image(self) -> RgbaImage {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Info {
    /// True until the match start screen has been seen.
    pub waiting: bool,
}

#[derive(Debug, Clone)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    pub done: bool,
    pub info: Info,
}

/// OS capabilities the environment is built from.
pub struct Devices {
    pub input: Box<dyn InputDevice>,
    pub screen: Box<dyn ScreenSource>,
    pub windows: Box<dyn WindowLocator>,
    pub launcher: Box<dyn ProcessLauncher>,
}

pub struct Environment {
    config: EnvConfig,
    region: MonitorRegion,
    synth: InputSynthesizer,
    screen: Box<dyn ScreenSource>,
    locator: Box<dyn Locator>,
    letterbox: Letterbox,
    detector: StateDetector,
    process: Option<Box<dyn GameProcess>>,
    in_episode: bool,
    closed: bool,
}

impl Environment {
    /// Load templates, launch the game and bind its window.
    ///
    /// # Errors
    ///
    /// [`EnvError::Setup`] if any template cannot be read, the executable
    /// cannot be launched or the window cannot be found. Nothing is left
    /// running on failure.
    pub fn new(config: EnvConfig, devices: Devices) -> Result<Self, EnvError> {
        let templates = TemplateSet::load(config.template_paths())?;
        Self::from_parts(config, devices, Box::new(TemplateMatcher::new(templates)))
    }

    /// Like [`Environment::new`] with a ready-made locator instead of the
    /// configured template files.
    ///
    /// # Errors
    ///
    /// Same as [`Environment::new`] minus template loading.
    pub fn from_parts(
        config: EnvConfig,
        devices: Devices,
        locator: Box<dyn Locator>,
    ) -> Result<Self, EnvError> {
        if config.observation.size == 0 {
            return Err(EnvError::Setup("observation size must be positive".into()));
        }
        let Devices { input, screen, windows, launcher } = devices;

        let mut process = launcher
            .launch(&config.executable, &config.args)
            .map_err(EnvError::setup)?;
        let region = match windows.find(&config.window_title) {
            Ok(region) => region,
            Err(err) => {
                if let Err(term) = process.terminate() {
                    warn!(error = %term, "terminating game after failed setup");
                }
                return Err(EnvError::setup(err));
            }
        };
        info!(
            title = %config.window_title,
            left = region.left,
            top = region.top,
            width = region.width,
            height = region.height,
            "environment created"
        );

        let synth = InputSynthesizer::new(input, region, config.timing.settle(), config.scroll_ticks);
        Ok(Self {
            letterbox: Letterbox::new(config.observation.size),
            detector: StateDetector::new(&config.thresholds),
            config,
            region,
            synth,
            screen,
            locator,
            process: Some(process),
            in_episode: false,
            closed: false,
        })
    }

    #[must_use]
    pub fn region(&self) -> MonitorRegion {
        self.region
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.detector.state()
    }

    #[must_use]
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<(), EnvError> {
        if self.closed {
            Err(EnvError::Closed)
        } else {
            Ok(())
        }
    }

    fn observe(&mut self) -> Result<(RgbaImage, Observation), EnvError> {
        let frame = self.screen.grab(&self.region)?;
        let observation = Observation(self.letterbox.fit(&frame));
        Ok((frame, observation))
    }

    fn run_bootstrap(&mut self) -> Result<(), EnvError> {
        let mut flow = BootstrapFlow::new(&self.config);
        while let Some(id) = flow.wanted() {
            let frame = self.screen.grab(&self.region)?;
            let found = self.locator.locate(id, &frame);
            for gesture in flow.advance(found)? {
                self.perform(gesture)?;
            }
        }
        Ok(())
    }

    fn perform(&mut self, gesture: Gesture) -> Result<(), EnvError> {
        match gesture {
            Gesture::Click { x, y } => {
                let (x, y) = self.region.to_absolute(x, y);
                self.synth.click_at(x, y)
            }
            Gesture::Drag { to_x, to_y } => {
                let (x, y) = self.region.to_absolute(to_x, to_y);
                self.synth.drag_to(x, y)
            }
            Gesture::Pause(duration) => {
                if !duration.is_zero() {
                    std::thread::sleep(duration);
                }
                Ok(())
            }
        }
    }
}

impl Env for Environment {
    fn reset(&mut self) -> Result<Observation, EnvError> {
        self.ensure_open()?;
        info!("reset");
        self.in_episode = false;
        self.synth.release_all()?;
        if self.config.explore == ExploreMode::Match {
            self.run_bootstrap()?;
        }
        self.detector.begin_episode();
        self.in_episode = true;
        let (_, observation) = self.observe()?;
        info!("episode started, waiting for match");
        Ok(observation)
    }

    fn step(&mut self, action: &Action) -> Result<StepResult, EnvError> {
        self.ensure_open()?;
        if !self.in_episode {
            return Err(EnvError::NeedsReset);
        }
        self.synth.apply(action)?;
        let (frame, observation) = self.observe()?;
        let state = self.detector.observe(self.locator.as_ref(), &frame);
        Ok(StepResult {
            observation,
            reward: 0.0,
            done: state.is_done(),
            info: Info { waiting: state.is_waiting() },
        })
    }

    fn close(&mut self) -> Result<(), EnvError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.in_episode = false;
        let released = self.synth.release_all();
        let terminated = match self.process.take() {
            Some(mut process) => process.terminate().map_err(EnvError::from),
            None => Ok(()),
        };
        info!("environment closed");
        released.and(terminated)
    }

    fn action_shape(&self) -> [usize; 2] {
        ACTION_SHAPE
    }

    fn observation_shape(&self) -> [usize; 3] {
        let size = self.letterbox.size() as usize;
        [size, size, 4]
    }
}

impl Drop for Environment {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(error = %err, "closing environment on drop");
        }
    }
}
