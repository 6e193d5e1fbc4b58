//! User configuration — motion tunables and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/marquee/config.toml` (default
//! `~/.config/marquee/config.toml`).  Parsing is lenient: unknown keys
//! and malformed values fall back to defaults, so an old config never
//! stops the app from starting.  CLI flags override file values.

use std::path::PathBuf;
use std::str::FromStr;

use crate::core::motion::{Direction, Mode, MotionConfig};

// ───────────────────────────────────────── enum parsing ──────

/// A config/CLI value that isn't one of the accepted names.
#[derive(Debug, thiserror::Error)]
#[error("unrecognised {what} `{value}` (expected one of: {expected})")]
pub struct ParseEnumError {
    what: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for Mode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "step" => Ok(Mode::Step),
            "continuous" | "cruise" => Ok(Mode::Continuous),
            _ => Err(ParseEnumError {
                what: "mode",
                value: s.to_string(),
                expected: "step, continuous",
            }),
        }
    }
}

impl FromStr for Direction {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forward" => Ok(Direction::Forward),
            "backward" | "reverse" => Ok(Direction::Backward),
            _ => Err(ParseEnumError {
                what: "direction",
                value: s.to_string(),
                expected: "forward, backward",
            }),
        }
    }
}

fn mode_key(mode: Mode) -> &'static str {
    match mode {
        Mode::Step => "step",
        Mode::Continuous => "continuous",
    }
}

fn direction_key(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "forward",
        Direction::Backward => "backward",
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration — the motion tunables plus demo deck size.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub motion: MotionConfig,
    /// Number of placeholder cards in the demo deck.
    pub cards: usize,
    /// Columns of spacing between cards.
    pub gap: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            motion: MotionConfig::default(),
            cards: 6,
            gap: 2,
        }
    }
}

impl AppConfig {
    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&path) {
                return Self::parse(&contents);
            }
        }
        Self::default()
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    fn parse(s: &str) -> Self {
        let mut cfg = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "mode" => {
                    if let Ok(v) = value.parse() {
                        cfg.motion.mode = v;
                    }
                }
                "direction" => {
                    if let Ok(v) = value.parse() {
                        cfg.motion.direction = v;
                    }
                }
                "pause_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        // Keep this bounded for predictable pacing.
                        cfg.motion.pause_ms = v.clamp(200, 60_000);
                    }
                }
                "anim_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        cfg.motion.anim_ms = v.clamp(0, 5_000);
                    }
                }
                "speed" => {
                    if let Ok(v) = value.parse::<f64>() {
                        cfg.motion.speed = v.clamp(1.0, 200.0);
                    }
                }
                "peek" => {
                    if let Ok(v) = value.parse::<f64>() {
                        cfg.motion.peek = v.clamp(0.0, 1.0);
                    }
                }
                "cards" => {
                    if let Ok(v) = value.parse::<usize>() {
                        cfg.cards = v.clamp(1, 64);
                    }
                }
                "gap" => {
                    if let Ok(v) = value.parse::<u16>() {
                        cfg.gap = v.min(16);
                    }
                }
                _ => {}
            }
        }

        cfg
    }

    fn serialise(&self) -> String {
        let lines = vec![
            "# marquee configuration".to_string(),
            String::new(),
            "# Motion".to_string(),
            format!("mode = {}", mode_key(self.motion.mode)),
            format!("direction = {}", direction_key(self.motion.direction)),
            format!("pause_ms = {}", self.motion.pause_ms),
            format!("anim_ms = {}", self.motion.anim_ms),
            format!("speed = {}", self.motion.speed),
            format!("peek = {}", self.motion.peek),
            String::new(),
            "# Demo deck".to_string(),
            format!("cards = {}", self.cards),
            format!("gap = {}", self.gap),
            String::new(),
        ];
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/marquee/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("marquee").join("config.toml")
}

// ───────────────────────────────────────── tests ─────────────
