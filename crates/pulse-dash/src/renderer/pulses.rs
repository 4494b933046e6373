//! Pulse layer: live circles growing and fading over their lifetime.

use nannou::prelude::*;
use pulse_dash_core::{Dashboard, Element, PulseCircle};
use std::time::Duration;

use super::{diagnostic_for, draw_fallback, to_srgba, Panel};

const START_SCALE: f32 = 0.5;
const END_SCALE: f32 = 1.5;
const GLOW_SCALE: f32 = 1.6;

pub struct PulsesPanel;

/// Scale and opacity at animation progress `t`
pub fn pulse_style(t: f32) -> (f32, f32) {
    let t = t.clamp(0.0, 1.0);
    let scale = START_SCALE + (END_SCALE - START_SCALE) * t;
    let alpha = 1.0 - t;
    (scale, alpha)
}

/// Screen center of a circle placed by percent, top-left origin
pub fn circle_center(bounds: Rect, circle: &PulseCircle) -> Point2 {
    pt2(
        bounds.left() + bounds.w() * circle.x_pct / 100.0,
        bounds.top() - bounds.h() * circle.y_pct / 100.0,
    )
}

impl Panel for PulsesPanel {
    fn draw(&self, draw: &Draw, bounds: Rect, dashboard: &Dashboard, now: Duration) {
        if dashboard.session().is_none() {
            let message = diagnostic_for(dashboard, Element::Pulse).unwrap_or("No playback");
            draw_fallback(draw, bounds, message);
            return;
        }

        for circle in dashboard.circles() {
            let (scale, alpha) = pulse_style(circle.progress(now));
            let center = circle_center(bounds, circle);
            let d = circle.diameter_px * scale;

            draw.ellipse()
                .xy(center)
                .w_h(d * GLOW_SCALE, d * GLOW_SCALE)
                .color(to_srgba(circle.glow, alpha * 0.35));
            draw.ellipse()
                .xy(center)
                .w_h(d, d)
                .color(to_srgba(circle.fill, alpha * 0.9));
        }

        if let Some(notice) = dashboard.audio_notice() {
            draw.text(notice)
                .x_y(bounds.left() + 110.0, bounds.top() - 14.0)
                .w(200.0)
                .left_justify()
                .color(rgba(1.0, 0.45, 0.4, 0.9))
                .font_size(16);
        }
    }
}
