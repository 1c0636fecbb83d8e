//! Settings file and command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_RATE, LIVES, MAX_FRAME_RATE, SKILL_CHARGES};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation steps per second. Also scales the skill duration.
    pub frame_rate: u32,
    /// RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Where log output goes while the terminal is in raw mode.
    pub log_file: String,
    pub skill_charges: u32,
    pub lives: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_rate: FRAME_RATE,
            seed: None,
            log_file: "koukaton.log".to_string(),
            skill_charges: SKILL_CHARGES,
            lives: LIVES,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing settings in {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text)?;
        Ok(settings)
    }

    /// Apply command-line overrides on top of the file values. The loop rate
    /// ends up in `1..=MAX_FRAME_RATE` whichever side set it.
    pub fn with_overrides(mut self, seed: Option<u64>, frame_rate: Option<u32>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        if let Some(fps) = frame_rate {
            self.frame_rate = fps;
        }
        self.frame_rate = self.frame_rate.clamp(1, MAX_FRAME_RATE);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let s = Settings::from_json("{}").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.frame_rate, 50);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let s = Settings::from_json(r#"{ "seed": 7, "frame_rate": 30 }"#).unwrap();
        assert_eq!(s.seed, Some(7));
        assert_eq!(s.frame_rate, 30);
        assert_eq!(s.skill_charges, 3);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Settings::from_json("{ frame_rate: }").is_err());
    }

    #[test]
    fn missing_file_falls_back() {
        let s = Settings::load(Path::new("/definitely/not/here.json")).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn overrides_win_over_file() {
        let s = Settings::default().with_overrides(Some(99), Some(0));
        assert_eq!(s.seed, Some(99));
        assert_eq!(s.frame_rate, 1); // clamped
    }

    #[test]
    fn frame_rate_is_capped() {
        let s = Settings::default().with_overrides(None, Some(1_000_000_000));
        assert_eq!(s.frame_rate, MAX_FRAME_RATE);

        let from_file = Settings::from_json(r#"{ "frame_rate": 4000000000 }"#)
            .unwrap()
            .with_overrides(None, None);
        assert_eq!(from_file.frame_rate, MAX_FRAME_RATE);
    }
}
