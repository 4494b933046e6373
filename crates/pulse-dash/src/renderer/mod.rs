pub mod bars;
pub mod header;
pub mod heatmap;
pub mod pulses;
pub mod slider;

use nannou::prelude::*;
use pulse_dash_core::{Element, Gradient, Rgb};
use std::time::Duration;

use crate::ui::layout::Layout;
use pulse_dash_core::Dashboard;

pub use bars::BarsPanel;
pub use header::HeaderPanel;
pub use heatmap::HeatmapPanel;
pub use pulses::PulsesPanel;
pub use slider::SliderPanel;

const NOTIFICATION_FRAMES: u32 = 180; // ~3 seconds at 60fps

/// A dashboard area drawn from engine state
pub trait Panel {
    fn draw(&self, draw: &Draw, bounds: Rect, dashboard: &Dashboard, now: Duration);
}

/// Resolution settings for the window
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Resolution {
    pub fn windowed() -> Self {
        Self {
            width: 1280,
            height: 800,
            fullscreen: false,
        }
    }

    pub fn release() -> Self {
        Self {
            width: 1280,
            height: 800,
            fullscreen: true,
        }
    }

    /// Debug builds always run windowed
    pub fn current(windowed: bool) -> Self {
        if windowed || cfg!(debug_assertions) {
            Self::windowed()
        } else {
            Self::release()
        }
    }
}

/// Draws every visible panel plus transient notifications
pub struct Renderer {
    header: HeaderPanel,
    bars: BarsPanel,
    heatmap: HeatmapPanel,
    pulses: PulsesPanel,
    slider: SliderPanel,
    notification_text: Option<String>,
    notification_frames: u32,
}

impl Renderer {
    pub fn new(heatmap: HeatmapPanel) -> Self {
        Self {
            header: HeaderPanel,
            bars: BarsPanel,
            heatmap,
            pulses: PulsesPanel,
            slider: SliderPanel,
            notification_text: None,
            notification_frames: 0,
        }
    }

    /// Shows a notification message for 3 seconds
    pub fn show_notification(&mut self, text: String) {
        self.notification_text = Some(text);
        self.notification_frames = NOTIFICATION_FRAMES;
    }

    pub fn update(&mut self) {
        if self.notification_frames > 0 {
            self.notification_frames -= 1;
            if self.notification_frames == 0 {
                self.notification_text = None;
            }
        }
    }

    pub fn draw(&self, draw: &Draw, bounds: Rect, layout: &Layout, dashboard: &Dashboard, now: Duration) {
        draw.background().color(to_srgb(Rgb::BACKGROUND));

        // Pulses first so the charts stay readable on top of them
        let panels: [(Option<Rect>, &dyn Panel); 5] = [
            (layout.pulses, &self.pulses),
            (layout.header, &self.header),
            (layout.bars, &self.bars),
            (layout.heatmap, &self.heatmap),
            (layout.volume, &self.slider),
        ];
        for (area, panel) in panels {
            if let Some(area) = area {
                panel.draw(draw, area, dashboard, now);
            }
        }

        // Draw notification text at middle top
        if let Some(ref text) = self.notification_text {
            let alpha = (self.notification_frames as f32 / NOTIFICATION_FRAMES as f32).min(1.0);
            draw.text(text)
                .x_y(bounds.right() - 160.0, bounds.top() - 24.0)
                .w(300.0)
                .right_justify()
                .color(rgba(1.0, 1.0, 1.0, alpha))
                .font_size(18);
        }
    }
}

pub fn to_srgb(color: Rgb) -> Srgb<u8> {
    srgb(color.r, color.g, color.b)
}

pub fn to_srgba(color: Rgb, alpha: f32) -> Srgba<u8> {
    srgba(color.r, color.g, color.b, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

/// One color per character, sampled left to right along `gradient`
pub fn gradient_glyphs(text: &str, gradient: &Gradient) -> Vec<Srgb<u8>> {
    let count = text.chars().count();
    (0..count)
        .map(|i| {
            let t = if count > 1 { i as f32 / (count - 1) as f32 } else { 0.0 };
            to_srgb(gradient.sample(t))
        })
        .collect()
}

/// Muted text shown where an element could not render
pub fn draw_fallback(draw: &Draw, bounds: Rect, message: &str) {
    draw.text(message)
        .xy(bounds.xy())
        .wh(bounds.wh())
        .center_justify()
        .color(rgba(1.0, 1.0, 1.0, 0.45))
        .font_size(16);
}

/// First diagnostic recorded for `element`
pub fn diagnostic_for(dashboard: &Dashboard, element: Element) -> Option<&str> {
    dashboard
        .diagnostics()
        .iter()
        .find(|d| d.element == Some(element))
        .map(|d| d.message.as_str())
}

/// Themed fill of the heading titled `text`
pub fn section_fill<'a>(dashboard: &'a Dashboard, text: &str) -> Option<&'a Gradient> {
    dashboard
        .theme()
        .headings
        .iter()
        .find(|h| h.text == text)
        .and_then(|h| h.fill.as_ref())
}

/// Draws a section heading with the themed fill, top-left of `bounds`.
/// Returns the area below it.
pub fn draw_heading(draw: &Draw, bounds: Rect, text: &str, size: u32, fill: Option<&Gradient>) -> Rect {
    let line = size as f32 * 1.6;
    let area = Rect::from_x_y_w_h(bounds.x(), bounds.top() - line / 2.0, bounds.w(), line);
    let heading = draw
        .text(text)
        .xy(area.xy())
        .wh(area.wh())
        .left_justify()
        .font_size(size);
    match fill {
        Some(gradient) => heading.glyph_colors(gradient_glyphs(text, gradient)),
        None => heading.color(WHITE),
    };
    Rect::from_corners(
        pt2(bounds.left(), bounds.bottom()),
        pt2(bounds.right(), area.bottom()),
    )
}
