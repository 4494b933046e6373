//! Volume slider with its percent readout.

use nannou::prelude::*;
use pulse_dash_core::{Dashboard, Element, Rgb};
use std::time::Duration;

use super::{diagnostic_for, draw_fallback, to_srgb, Panel};
use crate::ui::layout::slider_track;

/// Track segments used to approximate the gradient
const TRACK_SEGMENTS: usize = 48;
const DEFAULT_TRACK: Rgb = Rgb::new(90, 90, 90);

pub struct SliderPanel;

impl Panel for SliderPanel {
    fn draw(&self, draw: &Draw, bounds: Rect, dashboard: &Dashboard, _now: Duration) {
        let Some(volume) = dashboard.volume() else {
            let message = diagnostic_for(dashboard, Element::Volume).unwrap_or("No volume control");
            draw_fallback(draw, bounds, message);
            return;
        };

        let track = slider_track(bounds);
        let style = dashboard.theme().slider.as_ref();

        match style.and_then(|s| s.track.as_ref()) {
            Some(gradient) => {
                let seg_w = track.w() / TRACK_SEGMENTS as f32;
                for i in 0..TRACK_SEGMENTS {
                    let t = (i as f32 + 0.5) / TRACK_SEGMENTS as f32;
                    draw.rect()
                        .x_y(track.left() + seg_w * (i as f32 + 0.5), track.y())
                        .w_h(seg_w + 0.5, track.h())
                        .color(to_srgb(gradient.sample(t)));
                }
            }
            None => {
                draw.rect()
                    .xy(track.xy())
                    .wh(track.wh())
                    .color(to_srgb(DEFAULT_TRACK));
            }
        }

        let thumb = style.and_then(|s| s.thumb).unwrap_or(Rgb::WHITE);
        let thumb_x = track.left() + track.w() * volume.gain();
        draw.ellipse()
            .x_y(thumb_x, track.y())
            .w_h(18.0, 18.0)
            .color(to_srgb(thumb));

        draw.text("Volume")
            .x_y(track.left() - 60.0, track.y())
            .w(100.0)
            .right_justify()
            .color(rgba(1.0, 1.0, 1.0, 0.7))
            .font_size(16);
        draw.text(volume.readout())
            .x_y(track.right() + 40.0, track.y())
            .w(60.0)
            .left_justify()
            .color(WHITE)
            .font_size(16);
    }
}
