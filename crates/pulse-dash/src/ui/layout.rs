//! Window layout: where each mount point lives.

use nannou::prelude::*;

use crate::utils::{Config, Panel};

const HEADER_HEIGHT: f32 = 110.0;
const VOLUME_HEIGHT: f32 = 60.0;
const MARGIN: f32 = 16.0;
/// Share of the middle area taken by bars and heatmap; pulses get the rest
const CHART_SHARE: f32 = 0.5;
const SLIDER_WIDTH: f32 = 260.0;
const HELP_WIDTH: f32 = 520.0;
const HELP_PADDING: f32 = 25.0;
const HELP_LINE_HEIGHT: f32 = 24.0;
pub const HELP_KEY_WIDTH: f32 = 120.0;

/// Screen areas of the visible panels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub header: Option<Rect>,
    pub bars: Option<Rect>,
    pub heatmap: Option<Rect>,
    pub pulses: Option<Rect>,
    pub volume: Option<Rect>,
}

impl Layout {
    pub fn compute(bounds: Rect, config: &Config) -> Self {
        let header = Rect::from_x_y_w_h(
            bounds.x(),
            bounds.top() - HEADER_HEIGHT / 2.0,
            bounds.w(),
            HEADER_HEIGHT,
        );
        let volume = Rect::from_x_y_w_h(
            bounds.x(),
            bounds.bottom() + VOLUME_HEIGHT / 2.0,
            bounds.w(),
            VOLUME_HEIGHT,
        );

        let middle_h = (bounds.h() - HEADER_HEIGHT - VOLUME_HEIGHT).max(0.0);
        let chart_h = middle_h * CHART_SHARE;
        let chart_y = header.bottom() - chart_h / 2.0;
        let half_w = bounds.w() / 2.0;

        let bars = Rect::from_x_y_w_h(bounds.left() + half_w / 2.0, chart_y, half_w, chart_h)
            .pad(MARGIN);
        let heatmap = Rect::from_x_y_w_h(bounds.right() - half_w / 2.0, chart_y, half_w, chart_h)
            .pad(MARGIN);

        let pulses_h = middle_h - chart_h;
        let pulses = Rect::from_x_y_w_h(
            bounds.x(),
            volume.top() + pulses_h / 2.0,
            bounds.w(),
            pulses_h,
        )
        .pad(MARGIN);

        let visible = |panel: Panel, rect: Rect| config.shows(panel).then_some(rect);
        Self {
            header: visible(Panel::Header, header),
            bars: visible(Panel::Bars, bars),
            heatmap: visible(Panel::Heatmap, heatmap),
            pulses: visible(Panel::Pulses, pulses),
            volume: visible(Panel::Volume, volume),
        }
    }
}

/// The slider track inside the volume area
pub fn slider_track(volume: Rect) -> Rect {
    let width = SLIDER_WIDTH.min(volume.w() * 0.6);
    Rect::from_x_y_w_h(volume.x(), volume.y(), width, 8.0)
}

/// Slider percent for a pointer at `x`, clamped to the track
pub fn percent_at(track: Rect, x: f32) -> i32 {
    if track.w() <= 0.0 {
        return 0;
    }
    let t = ((x - track.left()) / track.w()).clamp(0.0, 1.0);
    (t * 100.0).round() as i32
}

/// Whether a click at `point` lands on the slider (with some slack)
pub fn hits_slider(track: Rect, point: Point2) -> bool {
    let slack = 12.0;
    point.x >= track.left() - slack
        && point.x <= track.right() + slack
        && point.y >= track.bottom() - slack
        && point.y <= track.top() + slack
}

/// Help overlay box for `lines` rows, centered and kept inside `bounds`
pub fn help_panel(bounds: Rect, lines: usize) -> Rect {
    let w = HELP_WIDTH.min(bounds.w() - MARGIN * 2.0).max(0.0);
    let h = HELP_LINE_HEIGHT * lines as f32 + HELP_PADDING * 2.0;
    Rect::from_x_y_w_h(bounds.x(), bounds.y(), w, h.min(bounds.h()))
}

/// Row `index` of a help panel holding `lines` rows, top to bottom
pub fn help_row(panel: Rect, lines: usize, index: usize) -> Rect {
    let inner = panel.pad(HELP_PADDING);
    let h = if lines == 0 {
        0.0
    } else {
        inner.h() / lines as f32
    };
    Rect::from_x_y_w_h(inner.x(), inner.top() - h * (index as f32 + 0.5), inner.w(), h)
}
