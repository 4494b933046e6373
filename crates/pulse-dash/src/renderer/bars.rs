//! Frequency bar chart panel.

use nannou::prelude::*;
use pulse_dash_core::{Dashboard, Element};
use std::time::Duration;

use super::{diagnostic_for, draw_fallback, draw_heading, section_fill, to_srgb, Panel};

pub const HEADING: &str = "Frequency Bands";
/// Gap between bars, as a share of each bar's slot
const BAR_GAP: f32 = 0.15;

pub struct BarsPanel;

impl Panel for BarsPanel {
    fn draw(&self, draw: &Draw, bounds: Rect, dashboard: &Dashboard, _now: Duration) {
        let area = draw_heading(draw, bounds, HEADING, 20, section_fill(dashboard, HEADING));

        let chart = match dashboard.bar_chart() {
            Some(chart) if !chart.is_empty() => chart,
            _ => {
                let message =
                    diagnostic_for(dashboard, Element::BarChart).unwrap_or("No frequency data");
                draw_fallback(draw, area, message);
                return;
            }
        };

        let caption_h = 24.0;
        if let Some(caption) = chart.caption() {
            draw.text(caption)
                .x_y(area.x(), area.bottom() + caption_h / 2.0)
                .w(area.w())
                .left_justify()
                .color(rgba(1.0, 1.0, 1.0, 0.7))
                .font_size(14);
        }

        let plot = area.pad_bottom(caption_h + 4.0);
        let mut x = plot.left();
        for bar in chart.bars() {
            let slot = plot.w() * bar.width_pct / 100.0;
            let h = plot.h() * bar.height_pct / 100.0;
            let w = slot * (1.0 - BAR_GAP);

            draw.rect()
                .x_y(x + slot / 2.0, plot.bottom() + h / 2.0)
                .w_h(w, h)
                .color(to_srgb(bar.color.to_rgb()));
            x += slot;
        }
    }
}
