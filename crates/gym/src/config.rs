//! JSON description of one game integration.
//!
//! Only the window title, the executable and the template paths are
//! required; every tuning knob falls back to the values the bundled
//! templates were calibrated with.

use anyhow::{ensure, Context, Result};
use device::MonitorRegion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use vision::TemplateId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvConfig {
    pub window_title: String,
    /// Fixed window rectangle. When set, the window is not searched for by
    /// title.
    #[serde(default)]
    pub window: Option<MonitorRegion>,
    pub executable: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    /// Template name to image path.
    pub templates: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub clicks: Clicks,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub observation: ObservationConfig,
    /// Wheel ticks issued for a full-scale scroll value.
    #[serde(default = "default_scroll_ticks")]
    pub scroll_ticks: u32,
    #[serde(default)]
    pub explore: ExploreMode,
}

/// How much of the game an episode covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExploreMode {
    /// `reset` clicks through the menus into a match; the agent only plays.
    #[default]
    Match,
    /// `reset` leaves the screen as it is and the agent drives the menus too.
    Full,
}

/// Confidence cutoffs. Transitions require a score strictly above the
/// cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub match_started: f32,
    pub match_finished: f32,
    /// Mode button confidence needed to click without revealing more modes.
    pub mode_direct: f32,
    /// Below this after the reveal drag the episode is aborted.
    pub mode_retry: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            match_started: 0.7,
            match_finished: 0.7,
            mode_direct: 0.7,
            mode_retry: 0.6,
        }
    }
}

/// Pixel offsets from a match's top-left corner to the point clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Clicks {
    pub find_match: [i32; 2],
    pub deathmatch_mode: [i32; 2],
    pub tutorial: [i32; 2],
    /// Horizontal distance of the reveal drag, measured from the find match
    /// button.
    pub reveal_drag_dx: i32,
}

impl Default for Clicks {
    fn default() -> Self {
        Self {
            find_match: [-100, 0],
            deathmatch_mode: [250, 0],
            tutorial: [0, 0],
            reveal_drag_dx: -400,
        }
    }
}

impl Clicks {
    #[must_use]
    pub fn offset(&self, id: TemplateId) -> (i32, i32) {
        let [dx, dy] = match id {
            TemplateId::FindMatch => self.find_match,
            TemplateId::DeathmatchMode => self.deathmatch_mode,
            TemplateId::Tutorial => self.tutorial,
            TemplateId::MatchStarted | TemplateId::MatchFinished => [0, 0],
        };
        (dx, dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timing {
    /// Pause after every cursor move and click.
    pub settle_ms: u64,
    /// Pause after the reveal drag before looking for the mode again.
    pub reveal_pause_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self { settle_ms: 200, reveal_pause_ms: 2000 }
    }
}

impl Timing {
    #[must_use]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    #[must_use]
    pub fn reveal_pause(&self) -> Duration {
        Duration::from_millis(self.reveal_pause_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObservationConfig {
    pub size: u32,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self { size: 512 }
    }
}

fn default_scroll_ticks() -> u32 {
    5
}

impl EnvConfig {
    /// Parse and validate a configuration. Template paths are kept as
    /// written.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("malformed environment config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file. Relative template and executable paths are
    /// resolved against the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config =
            Self::from_json(&json).with_context(|| format!("loading config {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for file in self.templates.values_mut() {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
        if self.executable.is_relative() && self.executable.components().count() > 1 {
            self.executable = base.join(&self.executable);
        }
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.window_title.is_empty(), "window_title must not be empty");
        ensure!(self.observation.size > 0, "observation.size must be positive");
        for name in self.templates.keys() {
            name.parse::<TemplateId>()?;
        }
        for id in TemplateId::ALL {
            ensure!(
                self.templates.contains_key(id.name()),
                "template {id} is not configured"
            );
        }
        let t = &self.thresholds;
        for (name, value) in [
            ("match_started", t.match_started),
            ("match_finished", t.match_finished),
            ("mode_direct", t.mode_direct),
            ("mode_retry", t.mode_retry),
        ] {
            ensure!(
                (-1.0..=1.0).contains(&value),
                "threshold {name} = {value} is outside [-1, 1]"
            );
        }
        Ok(())
    }

    /// Template entries in the form [`vision::TemplateSet::load`] takes.
    pub fn template_paths(&self) -> impl Iterator<Item = (&str, &PathBuf)> {
        self.templates.iter().map(|(name, path)| (name.as_str(), path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "window_title": "Arena",
        "executable": "game/arena.exe",
        "templates": {
            "find_match": "t/find.png",
            "deathmatch_mode": "t/dm.png",
            "tutorial": "t/tutor.png",
            "enter_tutorial_or_match": "t/enter.png",
            "finish_tutorial_or_match": "/abs/finish.png"
        }
    }"#;

    #[test]
    fn defaults_fill_optional_sections() {
        let config = EnvConfig::from_json(MINIMAL).unwrap();
        assert_eq!(config.thresholds, Thresholds::default());
        assert_eq!(config.clicks.offset(TemplateId::FindMatch), (-100, 0));
        assert_eq!(config.clicks.offset(TemplateId::DeathmatchMode), (250, 0));
        assert_eq!(config.clicks.reveal_drag_dx, -400);
        assert_eq!(config.timing.settle(), Duration::from_millis(200));
        assert_eq!(config.timing.reveal_pause(), Duration::from_secs(2));
        assert_eq!(config.observation.size, 512);
        assert_eq!(config.scroll_ticks, 5);
        assert!(config.window.is_none());
        assert!(config.args.is_empty());
        assert_eq!(config.explore, ExploreMode::Match);
    }

    #[test]
    fn explore_mode_parses_lowercase_names() {
        let json = MINIMAL.replacen("\"window_title\"", "\"explore\": \"full\", \"window_title\"", 1);
        assert_eq!(EnvConfig::from_json(&json).unwrap().explore, ExploreMode::Full);

        let json = MINIMAL.replacen("\"window_title\"", "\"explore\": \"menus\", \"window_title\"", 1);
        assert!(EnvConfig::from_json(&json).is_err());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let json = MINIMAL.replacen(
            "\"window_title\"",
            "\"thresholds\": {\"mode_retry\": 0.5}, \"timing\": {\"settle_ms\": 0}, \"window_title\"",
            1,
        );
        let config = EnvConfig::from_json(&json).unwrap();
        assert!((config.thresholds.mode_retry - 0.5).abs() < f32::EPSILON);
        assert!((config.thresholds.mode_direct - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.timing.settle_ms, 0);
        assert_eq!(config.timing.reveal_pause_ms, 2000);
    }

    #[test]
    fn missing_template_is_rejected() {
        let json = MINIMAL.replace("\"tutorial\": \"t/tutor.png\",", "");
        let err = EnvConfig::from_json(&json).unwrap_err();
        assert!(format!("{err:#}").contains("tutorial"), "{err:#}");
    }

    #[test]
    fn unknown_template_is_rejected() {
        let json = MINIMAL.replace("\"tutorial\":", "\"tutorial_v2\": \"x.png\", \"tutorial\":");
        assert!(EnvConfig::from_json(&json).is_err());
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let json = MINIMAL.replacen(
            "\"window_title\"",
            "\"thresholds\": {\"match_started\": 1.5}, \"window_title\"",
            1,
        );
        assert!(EnvConfig::from_json(&json).is_err());
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let mut config = EnvConfig::from_json(MINIMAL).unwrap();
        config.resolve_relative_to(Path::new("/opt/arena"));
        assert_eq!(config.templates["find_match"], PathBuf::from("/opt/arena/t/find.png"));
        assert_eq!(
            config.templates["finish_tutorial_or_match"],
            PathBuf::from("/abs/finish.png")
        );
        assert_eq!(config.executable, PathBuf::from("/opt/arena/game/arena.exe"));
    }
}
