#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! # Gym
//!
//! A live game session exposed as a step-based reinforcement learning
//! environment.
//!
//! Each [`Env::step`] turns a `(2, 85)` [`Action`] into keyboard and mouse
//! events, grabs the game window, letterboxes it into a square RGBA
//! [`Observation`] and checks the frame for the match start and finish
//! screens. [`Env::reset`] walks the lobby menus into a new match first.
//!
//! ```no_run
//! use gym::{Action, Env, EnvConfig, Environment};
//! # fn devices() -> gym::Devices { unimplemented!() }
//! # fn main() -> anyhow::Result<()> {
//! let config = EnvConfig::from_path("arena.json")?;
//! let mut env = Environment::new(config, devices())?;
//! let _first = env.reset()?;
//! loop {
//!     let step = env.step(&Action::zeros())?;
//!     if step.done {
//!         break;
//!     }
//! }
//! env.close()?;
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod bootstrap;
pub mod config;
pub mod detector;
pub mod env;
pub mod error;
pub mod keymap;
pub mod synth;

pub use action::{Action, ChannelKind, ACTION_SHAPE, CHANNEL_LEN};
pub use bootstrap::{BootstrapFlow, BootstrapStep, Gesture};
pub use config::{EnvConfig, ExploreMode};
pub use detector::{LifecycleState, StateDetector};
pub use env::{Devices, Env, Environment, Info, Observation, StepResult, ACTION_BOUNDS, OBSERVATION_BOUNDS};
pub use error::EnvError;
pub use keymap::{Keymap, KEY_COUNT};
pub use synth::InputSynthesizer;
