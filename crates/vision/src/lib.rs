#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Vision
//!
//! Pixel-side helpers for the game environment:
//!
//! -   [`template`]: the fixed set of named reference images, loaded once.
//! -   [`ncc`]: the match primitive, zero-mean normalized cross-correlation
//!     of a template over a frame.
//! -   [`matcher`]: the [`Locator`] seam used by state detection and menu
//!     navigation, with the real [`TemplateMatcher`] and a scripted fake.
//! -   [`letterbox`]: aspect-preserving resize onto a fixed square canvas.

pub mod letterbox;
pub mod matcher;
pub mod ncc;
pub mod template;

use std::path::PathBuf;
use thiserror::Error;

pub use letterbox::{Letterbox, Placement};
pub use matcher::{Locator, Match, ScriptedLocator, TemplateMatcher};
pub use template::{TemplateId, TemplateSet};

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("failed to read template {name} from {path:?}: {source}")]
    TemplateLoad {
        name: TemplateId,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("no image configured for template {0}")]
    MissingTemplate(TemplateId),
    #[error("unknown template name {0:?}")]
    UnknownTemplate(String),
}
