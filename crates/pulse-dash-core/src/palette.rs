//! Tempo-driven palette selection.
//!
//! A track's tempo picks one of five bands, ordered cool to warm. Each band
//! carries a four-stop color set (pulses, theming, heatmap colormap) and an
//! HSL gradient used to color bars by value.

use std::fmt;

use crate::color::{Gradient, Hsl, Rgb};

/// Substituted when the payload tempo is missing or unusable
pub const DEFAULT_TEMPO_BPM: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TempoBand {
    VerySlow,
    Slow,
    Moderate,
    Fast,
    VeryFast,
}

impl TempoBand {
    pub const ALL: [TempoBand; 5] = [
        TempoBand::VerySlow,
        TempoBand::Slow,
        TempoBand::Moderate,
        TempoBand::Fast,
        TempoBand::VeryFast,
    ];

    /// Band for a finite BPM value (thresholds are strict upper bounds)
    pub fn from_bpm(bpm: f64) -> Self {
        if bpm < 70.0 {
            TempoBand::VerySlow
        } else if bpm < 90.0 {
            TempoBand::Slow
        } else if bpm < 120.0 {
            TempoBand::Moderate
        } else if bpm < 150.0 {
            TempoBand::Fast
        } else {
            TempoBand::VeryFast
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TempoBand::VerySlow => "Very slow",
            TempoBand::Slow => "Slow",
            TempoBand::Moderate => "Moderate",
            TempoBand::Fast => "Fast",
            TempoBand::VeryFast => "Very fast",
        }
    }

    /// 0 for the coolest band, 4 for the warmest
    pub fn warmth(self) -> usize {
        self as usize
    }

    fn style(self) -> &'static BandStyle {
        &BAND_STYLES[self.warmth()]
    }
}

impl fmt::Display for TempoBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tempo that is always safe to compute with.
///
/// Missing, non-finite and non-positive readings are replaced by a default
/// BPM; `is_known` remembers the substitution for display purposes only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    bpm: f64,
    known: bool,
}

impl Tempo {
    pub fn resolve(raw: Option<f64>, default_bpm: f64) -> Self {
        match raw {
            Some(bpm) if is_usable(bpm) => Self { bpm, known: true },
            _ => Self::fallback(default_bpm),
        }
    }

    pub fn known(bpm: f64) -> Self {
        Self::resolve(Some(bpm), DEFAULT_TEMPO_BPM)
    }

    fn fallback(default_bpm: f64) -> Self {
        let bpm = if is_usable(default_bpm) {
            default_bpm
        } else {
            DEFAULT_TEMPO_BPM
        };
        Self { bpm, known: false }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn is_known(&self) -> bool {
        self.known
    }

    /// Milliseconds between beats (60000 / BPM)
    pub fn beat_interval_ms(&self) -> f64 {
        60_000.0 / self.bpm
    }
}

fn is_usable(bpm: f64) -> bool {
    bpm.is_finite() && bpm > 0.0
}

/// Gradient endpoints used to color bars by value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HslGradient {
    pub start: Hsl,
    pub end: Hsl,
}

impl HslGradient {
    pub fn at(&self, t: f32) -> Hsl {
        self.start.lerp(self.end, t)
    }
}

struct BandStyle {
    colors: [Rgb; 4],
    gradient: HslGradient,
}

const BAND_STYLES: [BandStyle; 5] = [
    // Blues
    BandStyle {
        colors: [
            Rgb::new(8, 48, 107),
            Rgb::new(31, 119, 180),
            Rgb::new(68, 170, 222),
            Rgb::new(145, 215, 240),
        ],
        gradient: HslGradient {
            start: Hsl::new(220.0, 75.0, 40.0),
            end: Hsl::new(195.0, 80.0, 75.0),
        },
    },
    // Blue-green
    BandStyle {
        colors: [
            Rgb::new(8, 48, 107),
            Rgb::new(44, 117, 172),
            Rgb::new(57, 163, 180),
            Rgb::new(52, 203, 170),
        ],
        gradient: HslGradient {
            start: Hsl::new(220.0, 75.0, 40.0),
            end: Hsl::new(170.0, 75.0, 65.0),
        },
    },
    // Green-yellow
    BandStyle {
        colors: [
            Rgb::new(44, 117, 172),
            Rgb::new(57, 163, 180),
            Rgb::new(76, 200, 144),
            Rgb::new(220, 230, 62),
        ],
        gradient: HslGradient {
            start: Hsl::new(200.0, 60.0, 55.0),
            end: Hsl::new(65.0, 75.0, 60.0),
        },
    },
    // Orange
    BandStyle {
        colors: [
            Rgb::new(76, 200, 144),
            Rgb::new(196, 215, 68),
            Rgb::new(253, 173, 39),
            Rgb::new(244, 109, 67),
        ],
        gradient: HslGradient {
            start: Hsl::new(120.0, 60.0, 55.0),
            end: Hsl::new(20.0, 90.0, 55.0),
        },
    },
    // Reds
    BandStyle {
        colors: [
            Rgb::new(220, 120, 47),
            Rgb::new(244, 109, 67),
            Rgb::new(227, 26, 28),
            Rgb::new(178, 4, 4),
        ],
        gradient: HslGradient {
            start: Hsl::new(30.0, 80.0, 50.0),
            end: Hsl::new(0.0, 95.0, 40.0),
        },
    },
];

/// Everything the renderers need to color a track consistently
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub band: TempoBand,
    pub tempo: Tempo,
    pub colors: [Rgb; 4],
    pub gradient: HslGradient,
}

impl Palette {
    pub fn for_tempo(tempo: Tempo) -> Self {
        let band = TempoBand::from_bpm(tempo.bpm());
        let style = band.style();
        Self {
            band,
            tempo,
            colors: style.colors,
            gradient: style.gradient,
        }
    }

    /// The four colors as a left-to-right ramp
    pub fn ramp(&self) -> Gradient {
        Gradient::new(self.colors)
    }

    /// Header readout, e.g. "128 BPM"
    pub fn tempo_readout(&self) -> String {
        if self.tempo.is_known() {
            format!("{} BPM", self.tempo.bpm().round())
        } else {
            "Tempo not found".to_string()
        }
    }

    /// Bar chart caption, e.g. "Fast: 130.0 BPM"
    pub fn caption(&self) -> String {
        if self.tempo.is_known() {
            format!("{}: {:.1} BPM", self.band, self.tempo.bpm())
        } else {
            format!("{}: tempo unknown", self.band)
        }
    }
}

/// Palette for a raw payload tempo, defaulting to 120 BPM when unusable
pub fn select_palette(tempo: Option<f64>) -> Palette {
    Palette::for_tempo(Tempo::resolve(tempo, DEFAULT_TEMPO_BPM))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_threshold_boundaries() {
        let cases = [
            (69.0, TempoBand::VerySlow),
            (70.0, TempoBand::Slow),
            (89.0, TempoBand::Slow),
            (90.0, TempoBand::Moderate),
            (119.0, TempoBand::Moderate),
            (120.0, TempoBand::Fast),
            (149.0, TempoBand::Fast),
            (150.0, TempoBand::VeryFast),
        ];
        for (bpm, band) in cases {
            assert_eq!(select_palette(Some(bpm)).band, band, "tempo {}", bpm);
        }
    }

    #[test]
    fn test_invalid_tempo_uses_default_band() {
        let default_band = select_palette(Some(120.0)).band;
        for raw in [None, Some(f64::NAN), Some(f64::INFINITY), Some(-5.0), Some(0.0)] {
            let palette = select_palette(raw);
            assert_eq!(palette.band, default_band);
            assert!(!palette.tempo.is_known());
            assert_eq!(palette.tempo.bpm(), DEFAULT_TEMPO_BPM);
        }
    }

    #[test]
    fn test_unusable_default_falls_back() {
        let tempo = Tempo::resolve(None, f64::NAN);
        assert_eq!(tempo.bpm(), DEFAULT_TEMPO_BPM);
        let tempo = Tempo::resolve(None, 90.0);
        assert_eq!(tempo.bpm(), 90.0);
    }

    #[test]
    fn test_labels() {
        let palette = select_palette(Some(130.0));
        assert_eq!(palette.tempo_readout(), "130 BPM");
        assert_eq!(palette.caption(), "Fast: 130.0 BPM");

        let palette = select_palette(None);
        assert_eq!(palette.tempo_readout(), "Tempo not found");
        assert_eq!(palette.caption(), "Fast: tempo unknown");
    }

    #[test]
    fn test_band_colors() {
        let palette = select_palette(Some(60.0));
        assert_eq!(palette.colors[0], Rgb::new(8, 48, 107));
        assert_eq!(palette.gradient.end, Hsl::new(195.0, 80.0, 75.0));

        let palette = select_palette(Some(180.0));
        assert_eq!(palette.colors[3], Rgb::new(178, 4, 4));
    }

    #[test]
    fn test_beat_interval() {
        assert!((Tempo::known(100.0).beat_interval_ms() - 600.0).abs() < 1e-9);
        assert!((Tempo::known(60.0).beat_interval_ms() - 1000.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_warmth_is_monotonic(a in 1.0f64..400.0, b in 1.0f64..400.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(select_palette(Some(lo)).band <= select_palette(Some(hi)).band);
        }

        #[test]
        fn prop_band_is_pure(bpm in 1.0f64..400.0) {
            prop_assert_eq!(select_palette(Some(bpm)), select_palette(Some(bpm)));
            prop_assert!(TempoBand::ALL.contains(&select_palette(Some(bpm)).band));
        }
    }
}
