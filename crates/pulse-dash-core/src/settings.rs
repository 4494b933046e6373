//! Tunable engine constants.

use serde::Deserialize;

use crate::bars::{DEFAULT_NUM_BARS, MIN_BAR_HEIGHT_PCT};
use crate::heatmap::{DbRange, HeatmapColoring};
use crate::palette::DEFAULT_TEMPO_BPM;
use crate::pulse::PulseSettings;
use crate::volume::DEFAULT_VOLUME_PCT;

/// Everything the dashboard can be tuned with; missing fields take defaults
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Bars produced when aggregating a chromagram
    pub num_bars: usize,
    pub min_bar_height_pct: f32,
    pub db_range: DbRange,
    pub heatmap_coloring: HeatmapColoring,
    /// Substituted for a missing or unusable payload tempo
    pub default_tempo_bpm: f64,
    pub pulse: PulseSettings,
    pub initial_volume_pct: u8,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            num_bars: DEFAULT_NUM_BARS,
            min_bar_height_pct: MIN_BAR_HEIGHT_PCT,
            db_range: DbRange::default(),
            heatmap_coloring: HeatmapColoring::default(),
            default_tempo_bpm: DEFAULT_TEMPO_BPM,
            pulse: PulseSettings::default(),
            initial_volume_pct: DEFAULT_VOLUME_PCT,
        }
    }
}
