//! Frequency bar chart.
//!
//! Bars come either straight from normalized `barValues` or from a raw
//! chromagram sampled down to a fixed bar count. Heights keep a visible
//! floor and colors follow the palette's HSL gradient by value.

use tracing::debug;

use crate::color::{unit, Hsl};
use crate::palette::{HslGradient, Palette};

pub const DEFAULT_NUM_BARS: usize = 32;
/// Every bar stays at least this tall (percent of the chart)
pub const MIN_BAR_HEIGHT_PCT: f32 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Normalized input value (0-1)
    pub value: f32,
    /// Height as a percentage of the chart
    pub height_pct: f32,
    /// Width as a percentage of the chart
    pub width_pct: f32,
    pub color: Hsl,
}

/// Output target for [`render_bars`]
#[derive(Debug, Clone, Default)]
pub struct BarChart {
    bars: Vec<Bar>,
    caption: Option<String>,
}

impl BarChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn clear(&mut self) {
        self.bars.clear();
        self.caption = None;
    }
}

/// Samples each chromagram row at the bar's relative position and averages
/// the samples, then scales so the tallest bar is 1.
///
/// Rows too short to hold the sampled index are skipped. When the tallest
/// bar is 0 every output is 0.
pub fn aggregate_chromagram(rows: &[Vec<f32>], num_bars: usize) -> Vec<f32> {
    let raw: Vec<f32> = (0..num_bars)
        .map(|i| {
            let position = i as f64 / num_bars as f64;
            let (sum, count) = rows
                .iter()
                .filter_map(|row| {
                    let idx = (position * row.len() as f64).floor() as usize;
                    row.get(idx).copied()
                })
                .map(finite_or_zero)
                .fold((0.0f32, 0usize), |(sum, count), v| (sum + v, count + 1));
            if count > 0 {
                sum / count as f32
            } else {
                0.0
            }
        })
        .collect();

    let max = raw.iter().copied().fold(0.0f32, f32::max);
    if !(max > 0.0) || !max.is_finite() {
        return vec![0.0; num_bars];
    }
    raw.into_iter().map(|v| unit(v / max)).collect()
}

/// `max(min_height_pct, value * 100)`, capped at 100
pub fn bar_height(value: f32, min_height_pct: f32) -> f32 {
    (unit(value) * 100.0).max(min_height_pct).min(100.0)
}

pub fn bar_color(value: f32, gradient: &HslGradient) -> Hsl {
    gradient.at(unit(value))
}

/// Clears `target` and rebuilds one bar per value
pub fn render_bars(target: &mut BarChart, values: &[f32], palette: &Palette, min_height_pct: f32) {
    target.clear();

    let width_pct = if values.is_empty() {
        0.0
    } else {
        100.0 / values.len() as f32
    };

    target.bars = values
        .iter()
        .map(|&raw| {
            let value = unit(finite_or_zero(raw));
            Bar {
                value,
                height_pct: bar_height(value, min_height_pct),
                width_pct,
                color: bar_color(value, &palette.gradient),
            }
        })
        .collect();
    target.caption = Some(palette.caption());

    debug!(bars = target.bars.len(), band = %palette.band, "rendered bar chart");
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::select_palette;
    use proptest::prelude::*;

    #[test]
    fn test_heights_with_floor() {
        let palette = select_palette(Some(130.0));
        let mut chart = BarChart::new();
        render_bars(&mut chart, &[0.0, 0.5, 1.0], &palette, MIN_BAR_HEIGHT_PCT);

        let heights: Vec<f32> = chart.bars().iter().map(|b| b.height_pct).collect();
        assert_eq!(heights, vec![5.0, 50.0, 100.0]);
        assert_eq!(chart.caption(), Some("Fast: 130.0 BPM"));
        assert!((chart.bars()[0].width_pct - 100.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_colors_follow_gradient() {
        let palette = select_palette(Some(130.0));
        let mut chart = BarChart::new();
        render_bars(&mut chart, &[0.0, 1.0], &palette, MIN_BAR_HEIGHT_PCT);

        assert_eq!(chart.bars()[0].color, palette.gradient.start);
        assert_eq!(chart.bars()[1].color, palette.gradient.end);
    }

    #[test]
    fn test_rerender_replaces_bars() {
        let palette = select_palette(Some(80.0));
        let mut chart = BarChart::new();
        render_bars(&mut chart, &[0.2; 32], &palette, MIN_BAR_HEIGHT_PCT);
        render_bars(&mut chart, &[0.9, 0.1], &palette, MIN_BAR_HEIGHT_PCT);

        assert_eq!(chart.len(), 2);
        assert_eq!(chart.bars()[0].value, 0.9);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let palette = select_palette(Some(100.0));
        let mut chart = BarChart::new();
        render_bars(&mut chart, &[-1.0, 3.0, f32::NAN], &palette, MIN_BAR_HEIGHT_PCT);

        let heights: Vec<f32> = chart.bars().iter().map(|b| b.height_pct).collect();
        assert_eq!(heights, vec![5.0, 100.0, 5.0]);
    }

    #[test]
    fn test_chromagram_sampling() {
        // Two rows of length 4, one of length 2
        let rows = vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0, 7.0],
            vec![8.0, 9.0],
        ];
        let bars = aggregate_chromagram(&rows, 4);

        // Bar 2 samples index 2, 2 and 1 -> (2 + 6 + 9) / 3
        // Bar 3 samples index 3, 3 and 1 -> (3 + 7 + 9) / 3 (the max)
        let raw = [(0.0 + 4.0 + 8.0) / 3.0, (1.0 + 5.0 + 8.0) / 3.0, 17.0 / 3.0, 19.0 / 3.0];
        let max = 19.0 / 3.0;
        for (got, want) in bars.iter().zip(raw.iter()) {
            assert!((got - want / max).abs() < 1e-5, "{} vs {}", got, want / max);
        }
        assert_eq!(bars[3], 1.0);
    }

    #[test]
    fn test_chromagram_all_zero() {
        let rows = vec![vec![0.0; 10], vec![0.0; 3]];
        assert_eq!(aggregate_chromagram(&rows, 32), vec![0.0; 32]);
    }

    #[test]
    fn test_chromagram_empty_rows() {
        let rows: Vec<Vec<f32>> = vec![vec![], vec![]];
        assert_eq!(aggregate_chromagram(&rows, 8), vec![0.0; 8]);
        assert_eq!(aggregate_chromagram(&[], 8), vec![0.0; 8]);
        assert!(aggregate_chromagram(&rows, 0).is_empty());
    }

    proptest! {
        #[test]
        fn prop_heights_bounded_and_monotonic(mut values in prop::collection::vec(0.0f32..=1.0, 1..64)) {
            values.sort_by(f32::total_cmp);
            let heights: Vec<f32> = values.iter().map(|&v| bar_height(v, MIN_BAR_HEIGHT_PCT)).collect();
            for h in &heights {
                prop_assert!(*h >= MIN_BAR_HEIGHT_PCT && *h <= 100.0);
            }
            for pair in heights.windows(2) {
                prop_assert!(pair[0] <= pair[1]);
            }
        }

        #[test]
        fn prop_aggregation_keeps_bar_count(
            rows in prop::collection::vec(prop::collection::vec(0.0f32..1.0, 0..40), 0..16),
            num_bars in 1usize..64,
        ) {
            let bars = aggregate_chromagram(&rows, num_bars);
            prop_assert_eq!(bars.len(), num_bars);
            for v in bars {
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
