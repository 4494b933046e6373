//! Dashboard composition.
//!
//! Runs every sub-renderer once against the mount points the host provides,
//! then keeps the playback session alive. Each sub-renderer is isolated: a
//! failure is logged, recorded as a [`Diagnostic`] and the remaining
//! elements still render.

use std::time::Duration;
use tracing::{info, warn};

use crate::bars::{aggregate_chromagram, render_bars, BarChart};
use crate::error::{Element, Result, VizError};
use crate::heatmap::{render_image, render_matrix, HeatmapSurface};
use crate::palette::{Palette, Tempo};
use crate::payload::{AnalysisPayload, BarSource, SpectrogramSource};
use crate::pulse::{PulseCircle, PulseLayer, PulseSchedule, RandomSource};
use crate::session::{ClockPlayer, MediaPlayer, PlaybackSession};
use crate::settings::EngineSettings;
use crate::theme::{apply_theme, ThemeTargets};
use crate::volume::VolumeControl;

/// Inline notice shown when the audio source cannot be opened
pub const AUDIO_UNAVAILABLE: &str = "Audio unavailable";

/// Title, artist and tempo readout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderText {
    pub title: String,
    pub artist: String,
    pub tempo: String,
}

/// Output targets provided by the host. `None` means the host has no such
/// element; the matching sub-renderer is skipped with a diagnostic.
#[derive(Debug, Clone, Default)]
pub struct Mounts {
    pub header: Option<HeaderText>,
    pub bar_chart: Option<BarChart>,
    pub heatmap: Option<HeatmapSurface>,
    pub pulse_layer: Option<PulseLayer>,
    pub volume: Option<VolumeControl>,
    pub theme: ThemeTargets,
}

/// A degraded element and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub element: Option<Element>,
    pub message: String,
}

impl From<&VizError> for Diagnostic {
    fn from(err: &VizError) -> Self {
        Self {
            element: err.element(),
            message: err.to_string(),
        }
    }
}

pub struct Dashboard {
    palette: Palette,
    header: Option<HeaderText>,
    bar_chart: Option<BarChart>,
    heatmap: Option<HeatmapSurface>,
    volume: Option<VolumeControl>,
    theme: ThemeTargets,
    session: Option<PlaybackSession>,
    audio_notice: Option<&'static str>,
    diagnostics: Vec<Diagnostic>,
}

impl Dashboard {
    /// Renders the payload and starts playback on a [`ClockPlayer`] opened
    /// from the payload's audio reference.
    pub fn build(
        payload: &AnalysisPayload,
        mounts: Mounts,
        settings: &EngineSettings,
        rng: Box<dyn RandomSource>,
        now: Duration,
    ) -> Self {
        let mut diagnostics = Vec::new();
        let opened = match payload.audio_uri.as_deref() {
            Some(uri) if !uri.trim().is_empty() => ClockPlayer::open(uri, payload.duration),
            _ => Err(VizError::missing(Element::Audio, "payload has no audio source")),
        };
        let (player, audio_notice) = match opened {
            Ok(player) => (player, None),
            Err(err) => {
                record(&mut diagnostics, err);
                (ClockPlayer::silent(payload.duration), Some(AUDIO_UNAVAILABLE))
            }
        };

        let mut dashboard =
            Self::build_with_player(payload, mounts, settings, Box::new(player), rng, now);
        dashboard.audio_notice = audio_notice;
        diagnostics.append(&mut dashboard.diagnostics);
        dashboard.diagnostics = diagnostics;
        dashboard
    }

    /// Same as [`Dashboard::build`] with a host-provided player
    pub fn build_with_player(
        payload: &AnalysisPayload,
        mounts: Mounts,
        settings: &EngineSettings,
        mut player: Box<dyn MediaPlayer>,
        rng: Box<dyn RandomSource>,
        now: Duration,
    ) -> Self {
        let mut diagnostics = Vec::new();

        let tempo = Tempo::resolve(payload.tempo, settings.default_tempo_bpm);
        if !tempo.is_known() {
            let value = payload
                .tempo
                .map_or_else(|| "missing".to_string(), |t| t.to_string());
            record(
                &mut diagnostics,
                VizError::InvalidNumeric {
                    field: "tempo",
                    value,
                },
            );
        }
        let palette = Palette::for_tempo(tempo);
        info!(band = %palette.band, bpm = palette.tempo.bpm(), known = palette.tempo.is_known(), "palette selected");

        let Mounts {
            mut header,
            mut bar_chart,
            mut heatmap,
            pulse_layer,
            mut volume,
            mut theme,
        } = mounts;

        isolate(&mut diagnostics, fill_header(header.as_mut(), payload, &palette));
        isolate(
            &mut diagnostics,
            draw_bars(bar_chart.as_mut(), payload, &palette, settings),
        );
        isolate(
            &mut diagnostics,
            draw_heatmap(heatmap.as_mut(), payload, &palette, settings),
        );
        isolate(&mut diagnostics, apply_theme(&palette, &mut theme));

        let gain = match volume.as_mut() {
            Some(control) => control.input(settings.initial_volume_pct as i32),
            None => {
                record(&mut diagnostics, VizError::MountPointMissing(Element::Volume));
                VolumeControl::new(settings.initial_volume_pct as i32).gain()
            }
        };
        player.set_volume(gain);

        let session = match pulse_layer {
            Some(layer) => {
                let schedule = PulseSchedule::choose(
                    settings.pulse.trigger,
                    &palette.tempo,
                    &payload.beats,
                    settings.pulse.beat_limit,
                );
                if matches!(&schedule, PulseSchedule::Beats(beats) if beats.is_empty()) {
                    record(
                        &mut diagnostics,
                        VizError::missing(Element::Pulse, "no usable beat timestamps"),
                    );
                }
                Some(PlaybackSession::start(
                    &palette,
                    schedule,
                    player,
                    rng,
                    layer,
                    settings.pulse.clone(),
                    now,
                ))
            }
            None => {
                record(&mut diagnostics, VizError::MountPointMissing(Element::Pulse));
                None
            }
        };

        Self {
            palette,
            header,
            bar_chart,
            heatmap,
            volume,
            theme,
            session,
            audio_notice: None,
            diagnostics,
        }
    }

    /// Advances playback to `now`; returns the number of circles created
    pub fn tick(&mut self, now: Duration) -> usize {
        self.session.as_mut().map_or(0, |session| session.tick(now))
    }

    pub fn stop(&mut self, now: Duration) {
        if let Some(session) = self.session.as_mut() {
            session.stop(now);
        }
    }

    /// Slider input in percent; returns the applied gain
    pub fn set_volume(&mut self, percent: i32) -> f32 {
        let gain = match self.volume.as_mut() {
            Some(control) => control.input(percent),
            None => VolumeControl::new(percent).gain(),
        };
        if let Some(session) = self.session.as_mut() {
            session.set_volume(gain);
        }
        gain
    }

    pub fn nudge_volume(&mut self, delta: i32) -> f32 {
        let current = match (&self.volume, &self.session) {
            (Some(control), _) => control.percent() as i32,
            (None, Some(session)) => (session.player().volume() * 100.0).round() as i32,
            (None, None) => 0,
        };
        self.set_volume(current + delta)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn header(&self) -> Option<&HeaderText> {
        self.header.as_ref()
    }

    pub fn bar_chart(&self) -> Option<&BarChart> {
        self.bar_chart.as_ref()
    }

    pub fn heatmap(&self) -> Option<&HeatmapSurface> {
        self.heatmap.as_ref()
    }

    pub fn volume(&self) -> Option<&VolumeControl> {
        self.volume.as_ref()
    }

    pub fn theme(&self) -> &ThemeTargets {
        &self.theme
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn circles(&self) -> &[PulseCircle] {
        match &self.session {
            Some(session) => session.circles(),
            None => &[],
        }
    }

    pub fn audio_notice(&self) -> Option<&str> {
        self.audio_notice
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_degraded(&self, element: Element) -> bool {
        self.diagnostics.iter().any(|d| d.element == Some(element))
    }
}

fn record(diagnostics: &mut Vec<Diagnostic>, err: VizError) {
    warn!("{}", err);
    diagnostics.push(Diagnostic::from(&err));
}

fn isolate(diagnostics: &mut Vec<Diagnostic>, outcome: Result<()>) {
    if let Err(err) = outcome {
        record(diagnostics, err);
    }
}

fn fill_header(
    header: Option<&mut HeaderText>,
    payload: &AnalysisPayload,
    palette: &Palette,
) -> Result<()> {
    let header = header.ok_or(VizError::MountPointMissing(Element::Header))?;
    header.title = payload.title_or_default().to_string();
    header.artist = payload.artist_or_default().to_string();
    header.tempo = palette.tempo_readout();
    Ok(())
}

fn draw_bars(
    chart: Option<&mut BarChart>,
    payload: &AnalysisPayload,
    palette: &Palette,
    settings: &EngineSettings,
) -> Result<()> {
    let chart = chart.ok_or(VizError::MountPointMissing(Element::BarChart))?;
    match payload.bar_source() {
        Some(BarSource::Values(values)) => {
            render_bars(chart, values, palette, settings.min_bar_height_pct)
        }
        Some(BarSource::Chromagram(rows)) => {
            let values = aggregate_chromagram(rows, settings.num_bars);
            render_bars(chart, &values, palette, settings.min_bar_height_pct)
        }
        None => {
            chart.clear();
            return Err(VizError::missing(
                Element::BarChart,
                "payload has neither barValues nor chromagram",
            ));
        }
    }
    Ok(())
}

fn draw_heatmap(
    surface: Option<&mut HeatmapSurface>,
    payload: &AnalysisPayload,
    palette: &Palette,
    settings: &EngineSettings,
) -> Result<()> {
    let surface = surface.ok_or(VizError::MountPointMissing(Element::Heatmap))?;
    match payload.spectrogram_source() {
        Some(SpectrogramSource::Matrix(matrix)) => render_matrix(
            surface,
            matrix,
            settings.db_range,
            &settings.heatmap_coloring,
            palette,
        ),
        Some(SpectrogramSource::Image(reference)) => render_image(surface, reference),
        None => {
            surface.clear();
            Err(VizError::missing(Element::Heatmap, "payload has no spectrogram"))
        }
    }
}
