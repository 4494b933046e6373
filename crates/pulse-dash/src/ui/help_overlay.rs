//! Help overlay listing the keyboard and mouse controls.

use nannou::prelude::*;
use pulse_dash_core::Rgb;

use crate::renderer::{to_srgb, to_srgba};
use crate::ui::layout::{help_panel, help_row, HELP_KEY_WIDTH};

const FONT_SIZE: u32 = 18;

/// One line of the overlay; `None` for the key marks a section title
#[derive(Debug, Clone, PartialEq)]
pub struct HelpLine {
    pub key: Option<&'static str>,
    pub text: String,
}

impl HelpLine {
    fn control(key: &'static str, text: impl Into<String>) -> Self {
        Self {
            key: Some(key),
            text: text.into(),
        }
    }

    fn section(text: &str) -> Self {
        Self {
            key: None,
            text: text.to_string(),
        }
    }
}

/// Controls as they apply to the current playback state
pub fn help_lines(volume_pct: Option<u8>, stopped: bool) -> Vec<HelpLine> {
    let volume = match volume_pct {
        Some(pct) => format!("Volume up/down (now {}%)", pct),
        None => "Volume up/down".to_string(),
    };
    let stop = if stopped {
        "Playback stopped"
    } else {
        "Stop playback and pulses"
    };

    vec![
        HelpLine::section("General"),
        HelpLine::control("h", "Toggle this help"),
        HelpLine::control("Esc", "Close help"),
        HelpLine::control("q", "Quit"),
        HelpLine::section("Playback"),
        HelpLine::control("s", stop),
        HelpLine::control("Up/Down", volume),
        HelpLine::control("Click/Drag", "Set volume on the slider"),
    ]
}

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Draws the overlay centered in `bounds`, tinted with `accent`
    pub fn draw(&self, draw: &Draw, bounds: Rect, accent: Rgb, volume_pct: Option<u8>, stopped: bool) {
        if !self.visible {
            return;
        }

        let lines = help_lines(volume_pct, stopped);
        let panel = help_panel(bounds, lines.len());

        draw.rect()
            .xy(panel.xy())
            .wh(panel.wh())
            .color(rgba(0.0, 0.0, 0.0, 0.9));
        draw.rect()
            .xy(panel.xy())
            .wh(panel.wh())
            .no_fill()
            .stroke(to_srgba(accent, 0.6))
            .stroke_weight(1.0);

        for (i, line) in lines.iter().enumerate() {
            let row = help_row(panel, lines.len(), i);
            match line.key {
                None => {
                    draw.text(&line.text)
                        .xy(row.xy())
                        .wh(row.wh())
                        .center_justify()
                        .color(to_srgb(accent))
                        .font_size(FONT_SIZE);
                }
                Some(key) => {
                    let (key_area, text_area) = split_row(row);
                    draw.text(key)
                        .xy(key_area.xy())
                        .wh(key_area.wh())
                        .right_justify()
                        .color(to_srgb(accent))
                        .font_size(FONT_SIZE);
                    draw.text(&line.text)
                        .xy(text_area.xy())
                        .wh(text_area.wh())
                        .left_justify()
                        .color(WHITE)
                        .font_size(FONT_SIZE);
                }
            }
        }
    }
}

/// Key column on the left, description on the right with a small gap
fn split_row(row: Rect) -> (Rect, Rect) {
    let gap = 15.0;
    let key_w = HELP_KEY_WIDTH.min(row.w() / 2.0);
    let key = Rect::from_x_y_w_h(row.left() + key_w / 2.0, row.y(), key_w, row.h());
    let text_w = (row.w() - key_w - gap).max(0.0);
    let text = Rect::from_x_y_w_h(row.right() - text_w / 2.0, row.y(), text_w, row.h());
    (key, text)
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}
