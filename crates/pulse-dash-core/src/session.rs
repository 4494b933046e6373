//! Playback session: the audio player plus the pulse emission it drives.
//!
//! The session owns one timer wheel. Emission tasks (the recurring beat
//! pulse, the initial burst, or one task per beat timestamp) are cancelled
//! together when playback stops or ends. Circle expiry tasks live in the same
//! wheel but are never cancelled, so every circle disappears exactly once
//! after its lifetime whatever state the session is in.

use std::time::Duration;
use tracing::{debug, info};

use crate::color::Rgb;
use crate::error::{Element, Result, VizError};
use crate::palette::Palette;
use crate::payload::MediaRef;
use crate::pulse::{PulseCircle, PulseLayer, PulseSchedule, PulseSettings, RandomSource};
use crate::timer::{TaskHandle, Timers};

/// Host-side media playback driven by the session clock
pub trait MediaPlayer {
    fn source(&self) -> &str;

    fn play(&mut self, now: Duration);

    fn pause(&mut self, now: Duration);

    /// Gain in the 0.0-1.0 range
    fn set_volume(&mut self, volume: f32);

    fn volume(&self) -> f32;

    /// Playback position at `now`
    fn position(&self, now: Duration) -> Duration;

    /// True once the media has played to its end
    fn has_ended(&self, now: Duration) -> bool;

    /// Session time at which playing media reaches its end, if known
    fn ends_at(&self) -> Option<Duration>;

    /// Releases the media; a detached player never plays again
    fn detach(&mut self);

    fn is_attached(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ClockState {
    Idle { position: Duration },
    Playing { since: Duration, offset: Duration },
}

/// A playback clock over a track of known length.
///
/// No samples are decoded; the clock provides position and end-of-media for
/// the dashboard.
#[derive(Debug, Clone)]
pub struct ClockPlayer {
    source: String,
    duration: Option<Duration>,
    volume: f32,
    state: ClockState,
    attached: bool,
}

impl ClockPlayer {
    /// Opens `reference`, checking that a local file exists.
    ///
    /// `duration_secs` of `None` (or an unusable value) means the clock never
    /// reaches an end.
    pub fn open(reference: &str, duration_secs: Option<f64>) -> Result<Self> {
        if let MediaRef::Local(path) = MediaRef::parse(reference) {
            if !path.is_file() {
                return Err(VizError::media(Element::Audio, reference, "file not found"));
            }
        }
        Ok(Self::new(reference, duration_secs))
    }

    /// A clock with no media behind it
    pub fn silent(duration_secs: Option<f64>) -> Self {
        Self::new("", duration_secs)
    }

    fn new(source: &str, duration_secs: Option<f64>) -> Self {
        // Lengths too large for a Duration are treated as unknown
        let duration = duration_secs
            .filter(|d| *d > 0.0)
            .and_then(|d| Duration::try_from_secs_f64(d).ok());
        Self {
            source: source.to_string(),
            duration,
            volume: 1.0,
            state: ClockState::Idle {
                position: Duration::ZERO,
            },
            attached: true,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, ClockState::Playing { .. })
    }
}

impl MediaPlayer for ClockPlayer {
    fn source(&self) -> &str {
        &self.source
    }

    fn play(&mut self, now: Duration) {
        if !self.attached {
            return;
        }
        if let ClockState::Idle { position } = self.state {
            self.state = ClockState::Playing {
                since: now,
                offset: position,
            };
        }
    }

    fn pause(&mut self, now: Duration) {
        if self.is_playing() {
            self.state = ClockState::Idle {
                position: self.position(now),
            };
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn position(&self, now: Duration) -> Duration {
        let position = match self.state {
            ClockState::Idle { position } => position,
            ClockState::Playing { since, offset } => offset + now.saturating_sub(since),
        };
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }

    fn has_ended(&self, now: Duration) -> bool {
        self.duration
            .is_some_and(|duration| self.position(now) >= duration)
    }

    fn ends_at(&self) -> Option<Duration> {
        match (self.state, self.duration) {
            (ClockState::Playing { since, offset }, Some(duration)) => {
                since.checked_add(duration.saturating_sub(offset))
            }
            _ => None,
        }
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PulseTask {
    Emit,
    Expire(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Playing,
    /// The media reached its end; circles still expire
    Ended,
    /// `stop()` was called
    Stopped,
}

pub struct PlaybackSession {
    player: Box<dyn MediaPlayer>,
    rng: Box<dyn RandomSource>,
    colors: [Rgb; 4],
    settings: PulseSettings,
    schedule: PulseSchedule,
    timers: Timers<PulseTask>,
    emission: Vec<TaskHandle>,
    layer: PulseLayer,
    next_circle: u64,
    emitted: usize,
    state: SessionState,
}

impl PlaybackSession {
    /// Starts playback and schedules emission relative to `now`.
    ///
    /// Interval schedules emit their first timed pulse one period after
    /// `now`, preceded by the initial burst; beat schedules emit one pulse
    /// per beat offset.
    pub fn start(
        palette: &Palette,
        schedule: PulseSchedule,
        mut player: Box<dyn MediaPlayer>,
        rng: Box<dyn RandomSource>,
        layer: PulseLayer,
        settings: PulseSettings,
        now: Duration,
    ) -> Self {
        let mut timers = Timers::new();
        let mut emission = Vec::new();

        match &schedule {
            PulseSchedule::Interval(period) => {
                emission.push(timers.every(now + *period, *period, PulseTask::Emit));
                let stagger = Duration::from_millis(settings.burst_stagger_ms);
                for i in 0..settings.burst_count as u32 {
                    emission.push(timers.once(now + stagger * i, PulseTask::Emit));
                }
            }
            PulseSchedule::Beats(offsets) => {
                for offset in offsets {
                    emission.push(timers.once(now + *offset, PulseTask::Emit));
                }
            }
        }

        player.play(now);
        info!(
            band = %palette.band,
            schedule = ?schedule,
            source = player.source(),
            "playback session started"
        );

        Self {
            player,
            rng,
            colors: palette.colors,
            settings,
            schedule,
            timers,
            emission,
            layer,
            next_circle: 0,
            emitted: 0,
            state: SessionState::Playing,
        }
    }

    /// Advances the session to `now`: detects the end of the media, emits due
    /// pulses and removes expired circles. Returns the number of circles
    /// created.
    pub fn tick(&mut self, now: Duration) -> usize {
        let mut created = 0;
        if self.state == SessionState::Playing && self.player.has_ended(now) {
            // Pulses due before the end still fire, even when the end is
            // first seen on a late frame
            let end = self.player.ends_at().map_or(now, |at| at.min(now));
            created += self.run_due(end);
            self.cancel_emission();
            self.state = SessionState::Ended;
            info!(emitted = self.emitted, "playback ended");
        }
        created + self.run_due(now)
    }

    fn run_due(&mut self, now: Duration) -> usize {
        let mut created = 0;
        loop {
            let fired = self.timers.poll(now);
            if fired.is_empty() {
                break;
            }
            for task in fired {
                match task.payload {
                    PulseTask::Emit => {
                        self.emit(task.due);
                        created += 1;
                    }
                    PulseTask::Expire(id) => {
                        self.layer.remove(id);
                    }
                }
            }
        }
        created
    }

    fn emit(&mut self, at: Duration) {
        let id = self.next_circle;
        self.next_circle += 1;
        let circle = PulseCircle::spawn(id, self.rng.as_mut(), &self.colors, &self.settings, at);
        self.timers.once(circle.expires_at(), PulseTask::Expire(id));
        debug!(id, x = circle.x_pct, y = circle.y_pct, fill = %circle.fill, "pulse");
        self.layer.insert(circle);
        self.emitted += 1;
    }

    /// Cancels emission, pauses and detaches the player. Safe to call again.
    pub fn stop(&mut self, now: Duration) {
        if self.state == SessionState::Stopped {
            return;
        }
        self.cancel_emission();
        self.player.pause(now);
        self.player.detach();
        self.state = SessionState::Stopped;
        info!(emitted = self.emitted, "playback session stopped");
    }

    fn cancel_emission(&mut self) {
        for handle in self.emission.drain(..) {
            self.timers.cancel(handle);
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// True while any emission task is still scheduled
    pub fn is_emitting(&self) -> bool {
        self.emission.iter().any(|h| self.timers.is_pending(*h))
    }

    pub fn schedule(&self) -> &PulseSchedule {
        &self.schedule
    }

    pub fn circles(&self) -> &[PulseCircle] {
        self.layer.circles()
    }

    /// Circles created since the session started
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn player(&self) -> &dyn MediaPlayer {
        self.player.as_ref()
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.player.set_volume(volume);
    }
}
