use crate::VisionError;
use image::GrayImage;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Reference images the environment knows how to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateId {
    /// "Find match" button on the lobby screen.
    FindMatch,
    /// Deathmatch entry in the game mode list.
    DeathmatchMode,
    /// Tutorial entry point.
    Tutorial,
    /// Screen shown once a tutorial or match has begun.
    MatchStarted,
    /// Screen shown once a tutorial or match is over.
    MatchFinished,
}

impl TemplateId {
    pub const ALL: [TemplateId; 5] = [
        TemplateId::FindMatch,
        TemplateId::DeathmatchMode,
        TemplateId::Tutorial,
        TemplateId::MatchStarted,
        TemplateId::MatchFinished,
    ];

    /// Name used in configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TemplateId::FindMatch => "find_match",
            TemplateId::DeathmatchMode => "deathmatch_mode",
            TemplateId::Tutorial => "tutorial",
            TemplateId::MatchStarted => "enter_tutorial_or_match",
            TemplateId::MatchFinished => "finish_tutorial_or_match",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TemplateId {
    type Err = VisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| VisionError::UnknownTemplate(s.to_owned()))
    }
}

/// Every [`TemplateId`] paired with its pixels, normalized to 8-bit luma so
/// frames and templates are always compared in the same color space.
///
/// Read-only once built.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    images: HashMap<TemplateId, GrayImage>,
}

impl TemplateSet {
    /// Read each configured file exactly once.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown name, unreadable file, or required template
    /// left unconfigured. Nothing is returned partially loaded.
    pub fn load<'a, I>(paths: I) -> Result<Self, VisionError>
    where
        I: IntoIterator<Item = (&'a str, &'a PathBuf)>,
    {
        let mut images = HashMap::new();
        for (name, path) in paths {
            let id: TemplateId = name.parse()?;
            let image = image::open(path).map_err(|source| VisionError::TemplateLoad {
                name: id,
                path: path.clone(),
                source,
            })?;
            let gray = image.to_luma8();
            tracing::debug!(template = %id, width = gray.width(), height = gray.height(), "loaded template");
            images.insert(id, gray);
        }
        Self::from_images(images)
    }

    /// # Errors
    ///
    /// Returns [`VisionError::MissingTemplate`] if any [`TemplateId`] is absent.
    pub fn from_images(images: HashMap<TemplateId, GrayImage>) -> Result<Self, VisionError> {
        if let Some(missing) = TemplateId::ALL.into_iter().find(|id| !images.contains_key(id)) {
            return Err(VisionError::MissingTemplate(missing));
        }
        Ok(Self { images })
    }

    #[must_use]
    pub fn get(&self, id: TemplateId) -> &GrayImage {
        // Presence of every id is checked at construction.
        &self.images[&id]
    }
}
