//! Pulse circles and the randomness that places them.

use rand::{Rng, RngCore};
use serde::Deserialize;
use std::time::Duration;

use crate::color::Rgb;
use crate::palette::Tempo;

pub const DEFAULT_LIFETIME_MS: u64 = 2000;
pub const DEFAULT_MIN_DIAMETER_PX: f32 = 50.0;
pub const DEFAULT_MAX_DIAMETER_PX: f32 = 100.0;
pub const DEFAULT_BEAT_LIMIT: usize = 10;
pub const DEFAULT_BURST_COUNT: usize = 5;
pub const DEFAULT_BURST_STAGGER_MS: u64 = 200;

/// Source of uniform values in `[0, 1)`.
///
/// Every `rand` generator is a source; tests and demos can replay a fixed
/// sequence with [`ScriptedRandom`].
pub trait RandomSource {
    fn next_unit(&mut self) -> f32;
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed list of values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f32::EPSILON)
    }
}

/// Which analysis data drives pulse emission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PulseTrigger {
    /// One pulse per beat period, derived from the tempo
    Interval,
    /// One pulse at each of the first beat timestamps
    Beats,
    /// Beats when the payload has any, otherwise interval
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PulseSettings {
    pub trigger: PulseTrigger,
    /// Only the first `beat_limit` beats are scheduled
    pub beat_limit: usize,
    pub lifetime_ms: u64,
    pub min_diameter_px: f32,
    pub max_diameter_px: f32,
    /// Circles emitted right away in interval mode
    pub burst_count: usize,
    pub burst_stagger_ms: u64,
}

impl Default for PulseSettings {
    fn default() -> Self {
        Self {
            trigger: PulseTrigger::default(),
            beat_limit: DEFAULT_BEAT_LIMIT,
            lifetime_ms: DEFAULT_LIFETIME_MS,
            min_diameter_px: DEFAULT_MIN_DIAMETER_PX,
            max_diameter_px: DEFAULT_MAX_DIAMETER_PX,
            burst_count: DEFAULT_BURST_COUNT,
            burst_stagger_ms: DEFAULT_BURST_STAGGER_MS,
        }
    }
}

impl PulseSettings {
    pub fn lifetime(&self) -> Duration {
        Duration::from_millis(self.lifetime_ms)
    }
}

/// When pulses are emitted, relative to the session start
#[derive(Debug, Clone, PartialEq)]
pub enum PulseSchedule {
    Interval(Duration),
    Beats(Vec<Duration>),
}

impl PulseSchedule {
    /// `60000 / bpm` milliseconds between pulses
    pub fn from_tempo(tempo: &Tempo) -> Self {
        PulseSchedule::Interval(nanos(tempo.beat_interval_ms() * 1e6))
    }

    /// The first `limit` valid beat timestamps (seconds)
    pub fn from_beats(beats: &[f64], limit: usize) -> Self {
        let offsets = beats
            .iter()
            .copied()
            .filter(|t| t.is_finite() && *t >= 0.0)
            .take(limit)
            .map(|t| nanos(t * 1e9))
            .collect();
        PulseSchedule::Beats(offsets)
    }

    pub fn choose(trigger: PulseTrigger, tempo: &Tempo, beats: &[f64], limit: usize) -> Self {
        match trigger {
            PulseTrigger::Interval => Self::from_tempo(tempo),
            PulseTrigger::Beats => Self::from_beats(beats, limit),
            PulseTrigger::Auto => {
                let beat_schedule = Self::from_beats(beats, limit);
                match &beat_schedule {
                    PulseSchedule::Beats(offsets) if !offsets.is_empty() => beat_schedule,
                    _ => Self::from_tempo(tempo),
                }
            }
        }
    }
}

/// A transient circle on the pulse layer
#[derive(Debug, Clone, PartialEq)]
pub struct PulseCircle {
    pub id: u64,
    /// Horizontal position, percent of the layer width
    pub x_pct: f32,
    /// Vertical position, percent of the layer height
    pub y_pct: f32,
    pub diameter_px: f32,
    pub fill: Rgb,
    pub glow: Rgb,
    pub created_at: Duration,
    pub lifetime: Duration,
}

impl PulseCircle {
    /// Draws position and size from `rng`; fill is a random palette color and
    /// the glow is the color after it.
    pub fn spawn(
        id: u64,
        rng: &mut dyn RandomSource,
        colors: &[Rgb; 4],
        settings: &PulseSettings,
        now: Duration,
    ) -> Self {
        let x_pct = rng.next_unit() * 100.0;
        let y_pct = rng.next_unit() * 100.0;
        let (lo, hi) = diameter_bounds(settings);
        let diameter_px = lo + rng.next_unit() * (hi - lo);
        let color_idx = ((rng.next_unit() * colors.len() as f32) as usize).min(colors.len() - 1);

        Self {
            id,
            x_pct,
            y_pct,
            diameter_px,
            fill: colors[color_idx],
            glow: colors[(color_idx + 1) % colors.len()],
            created_at: now,
            lifetime: settings.lifetime(),
        }
    }

    pub fn expires_at(&self) -> Duration {
        self.created_at + self.lifetime
    }

    /// Animation progress from 0 (just created) to 1 (expired)
    pub fn progress(&self, now: Duration) -> f32 {
        if self.lifetime.is_zero() {
            return 1.0;
        }
        let age = now.saturating_sub(self.created_at);
        (age.as_secs_f32() / self.lifetime.as_secs_f32()).min(1.0)
    }
}

/// Rounds to the nearest nanosecond so 0.46 s stays 460 ms
fn nanos(value: f64) -> Duration {
    Duration::from_nanos(value.round().max(0.0) as u64)
}

fn diameter_bounds(settings: &PulseSettings) -> (f32, f32) {
    let lo = settings.min_diameter_px.max(0.0);
    let hi = settings.max_diameter_px.max(lo);
    (lo, hi)
}

/// Output target holding the live circles
#[derive(Debug, Clone, Default)]
pub struct PulseLayer {
    circles: Vec<PulseCircle>,
}

impl PulseLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> &[PulseCircle] {
        &self.circles
    }

    pub fn len(&self) -> usize {
        self.circles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn insert(&mut self, circle: PulseCircle) {
        self.circles.push(circle);
    }

    /// Returns false if the circle was already removed
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.circles.len();
        self.circles.retain(|c| c.id != id);
        self.circles.len() != before
    }
}
