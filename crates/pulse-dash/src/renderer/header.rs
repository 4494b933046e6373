//! Title, artist and tempo readout.

use nannou::prelude::*;
use pulse_dash_core::{Dashboard, Element};
use std::time::Duration;

use super::{diagnostic_for, draw_fallback, draw_heading, Panel};

pub struct HeaderPanel;

impl Panel for HeaderPanel {
    fn draw(&self, draw: &Draw, bounds: Rect, dashboard: &Dashboard, _now: Duration) {
        let bounds = bounds.pad_left(24.0).pad_right(24.0).pad_top(12.0);

        let Some(header) = dashboard.header() else {
            let message = diagnostic_for(dashboard, Element::Header).unwrap_or("No header");
            draw_fallback(draw, bounds, message);
            return;
        };

        let title = dashboard
            .theme()
            .headings
            .iter()
            .find(|h| h.level == 1);
        let size = title.map_or(36, |h| h.font_size);
        let rest = draw_heading(draw, bounds, &header.title, size, title.and_then(|h| h.fill.as_ref()));

        draw.text(&header.artist)
            .x_y(rest.x(), rest.top() - 14.0)
            .w(rest.w())
            .left_justify()
            .color(rgba(1.0, 1.0, 1.0, 0.75))
            .font_size(20);

        // Tempo readout on the right, band name under it
        let palette = dashboard.palette();
        draw.text(&header.tempo)
            .x_y(bounds.right() - 120.0, bounds.top() - 26.0)
            .w(240.0)
            .right_justify()
            .color(WHITE)
            .font_size(28);
        draw.text(palette.band.label())
            .x_y(bounds.right() - 120.0, bounds.top() - 60.0)
            .w(240.0)
            .right_justify()
            .color(super::to_srgb(palette.colors[2]))
            .font_size(16);
    }
}
