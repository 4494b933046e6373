//! Configuration file management.
//!
//! Handles loading user preferences from `~/.pulse-dash.toml`.

use pulse_dash_core::EngineSettings;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_LOG_LEVEL: &str = "info";

const CONFIG_TEMPLATE: &str = r#"# pulse-dash configuration file

# Log level: error, warn, info, debug, trace (RUST_LOG overrides)
# log_level = "info"

# Panels to show; leave one out to hide it
# panels = ["header", "bars", "heatmap", "pulses", "volume"]

# =============================================================================
# Engine
# =============================================================================

[engine]
# initial_volume_pct = 100
# default_tempo_bpm = 120.0     # Tempo assumed when the payload has none
# num_bars = 32                 # Bars built from a raw chromagram
# min_bar_height_pct = 5.0      # Floor so quiet bands stay visible

# Heatmap dB range: fixed bounds, or percentiles of the matrix itself
# [engine.db_range]
# mode = "fixed"
# min_db = -80.0
# max_db = 0.0
#
# mode = "percentile"
# low = 5.0
# high = 95.0

# Heatmap colors: a single hue ramp, or the tempo palette
# [engine.heatmap_coloring]
# mode = "hue_ramp"
# hue = 200.0
# saturation = 80.0
#
# mode = "palette"

# [engine.pulse]
# trigger = "auto"              # "auto", "interval" or "beats"
# beat_limit = 10               # Only the first N beats pulse
# lifetime_ms = 2000
# min_diameter_px = 50.0
# max_diameter_px = 100.0
# burst_count = 5               # Circles right after start (interval mode)
# burst_stagger_ms = 200
"#;

/// A dashboard area that can be hidden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    Header,
    Bars,
    Heatmap,
    Pulses,
    Volume,
}

impl Panel {
    pub const ALL: [Panel; 5] = [
        Panel::Header,
        Panel::Bars,
        Panel::Heatmap,
        Panel::Pulses,
        Panel::Volume,
    ];
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub log_level: Option<String>,
    pub panels: Option<Vec<Panel>>,
    /// Missing engine keys keep their defaults
    #[serde(default)]
    pub engine: EngineSettings,
}

impl Config {
    fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".pulse-dash.toml"))
    }

    /// Reads `custom` if given, else the home config (created from the
    /// template when missing). Unreadable files fall back to defaults.
    ///
    /// Runs before logging is set up, so problems go to stderr.
    pub fn load(custom: Option<&Path>) -> Self {
        let path = match custom {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Self::default(),
            },
        };

        if custom.is_none() && !path.exists() {
            if fs::write(&path, CONFIG_TEMPLATE).is_ok() {
                eprintln!("Created config template at {:?}", path);
            }
        }

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Warning: could not read config {:?}: {}", path, e);
                return Self::default();
            }
        };
        Self::parse(&text).unwrap_or_else(|e| {
            eprintln!("Warning: ignoring invalid config {:?}: {}", path, e);
            Self::default()
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn shows(&self, panel: Panel) -> bool {
        self.panels
            .as_ref()
            .map_or(true, |panels| panels.contains(&panel))
    }
}
