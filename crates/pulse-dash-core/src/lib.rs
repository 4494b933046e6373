//! Audio-synchronized analysis dashboard engine.
//!
//! Turns a precomputed analysis payload into a tempo palette, a frequency
//! bar chart, a spectrogram heatmap and a tempo-locked pulse animation that
//! runs alongside audio playback. Nothing here opens a window or reads the
//! wall clock: hosts pass explicit output targets and drive time through
//! [`Dashboard::tick`].

pub mod bars;
pub mod color;
pub mod dashboard;
pub mod error;
pub mod heatmap;
pub mod palette;
pub mod payload;
pub mod pulse;
pub mod rect;
pub mod session;
pub mod settings;
pub mod theme;
pub mod timer;
pub mod volume;

pub use bars::{Bar, BarChart};
pub use color::{Gradient, Hsl, Rgb};
pub use dashboard::{Dashboard, Diagnostic, HeaderText, Mounts, AUDIO_UNAVAILABLE};
pub use error::{Element, Result, VizError};
pub use heatmap::{DbRange, HeatmapColoring, HeatmapSurface};
pub use palette::{select_palette, Palette, Tempo, TempoBand};
pub use payload::AnalysisPayload;
pub use pulse::{PulseCircle, PulseLayer, PulseSchedule, PulseSettings, PulseTrigger, RandomSource, ScriptedRandom};
pub use session::{ClockPlayer, MediaPlayer, PlaybackSession, SessionState};
pub use settings::EngineSettings;
pub use theme::{apply_theme, Heading, SliderStyle, ThemeTargets};
pub use volume::VolumeControl;
