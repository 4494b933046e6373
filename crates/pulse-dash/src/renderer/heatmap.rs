//! Spectrogram panel: uploads the engine's heatmap surface once and draws it
//! as a texture.

use nannou::image::{DynamicImage, RgbaImage};
use nannou::prelude::*;
use pulse_dash_core::{Dashboard, Element, HeatmapSurface};
use std::time::Duration;
use tracing::warn;

use super::{diagnostic_for, draw_fallback, draw_heading, section_fill, Panel};

pub const HEADING: &str = "Spectrogram";
/// Space above the surface reserved for the heading
pub const HEADING_SPACE: f32 = 32.0;

pub struct HeatmapPanel {
    texture: Option<wgpu::Texture>,
}

impl HeatmapPanel {
    pub fn new(app: &App, surface: Option<&HeatmapSurface>) -> Self {
        Self {
            texture: surface.and_then(|surface| upload(app, surface)),
        }
    }
}

fn upload(app: &App, surface: &HeatmapSurface) -> Option<wgpu::Texture> {
    let image = surface.image();
    if image.width() == 0 || image.height() == 0 {
        return None;
    }
    // nannou ships its own `image` version, so copy the raw RGBA bytes across
    let Some(buffer) = RgbaImage::from_raw(image.width(), image.height(), image.as_raw().clone()) else {
        warn!("heatmap surface has an unexpected buffer size");
        return None;
    };
    Some(wgpu::Texture::from_image(app, &DynamicImage::ImageRgba8(buffer)))
}

impl Panel for HeatmapPanel {
    fn draw(&self, draw: &Draw, bounds: Rect, dashboard: &Dashboard, _now: Duration) {
        let area = draw_heading(draw, bounds, HEADING, 20, section_fill(dashboard, HEADING));

        if let Some(texture) = &self.texture {
            draw.texture(texture).xy(area.xy()).wh(area.wh());
        }

        let notice = dashboard
            .heatmap()
            .and_then(|surface| surface.notice())
            .or_else(|| diagnostic_for(dashboard, Element::Heatmap));
        if let Some(message) = notice {
            draw_fallback(draw, area, message);
        }
    }
}
