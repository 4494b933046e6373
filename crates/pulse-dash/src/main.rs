mod renderer;
mod ui;
mod utils;

use anyhow::Context;
use nannou::prelude::*;
use pulse_dash_core::{
    AnalysisPayload, BarChart, Dashboard, HeaderText, Heading, HeatmapSurface, Mounts, PulseLayer,
    SessionState, SliderStyle, ThemeTargets, VolumeControl,
};
use renderer::{HeatmapPanel, Renderer, Resolution};
use std::env;
use std::time::Duration;
use tracing::info;
use ui::bindings::{parse_key, Action};
use ui::help_overlay::HelpOverlay;
use ui::layout::{hits_slider, percent_at, slider_track, Layout};
use utils::{Args, Config, USAGE};

fn main() -> anyhow::Result<()> {
    let args = Args::parse(env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = Config::load(args.config.as_deref());
    utils::logging::init(config.log_level())?;

    // Fail before opening a window when the payload is unusable
    let payload = load_payload(&args)?;
    info!(title = payload.title_or_default(), "payload loaded");

    nannou::app(model).update(update).run();
    Ok(())
}

fn load_payload(args: &Args) -> anyhow::Result<AnalysisPayload> {
    let cwd = env::current_dir().context("Failed to read the working directory")?;
    let path = args
        .payload_path(&cwd)
        .with_context(|| format!("No payload given and no default payload found\n\n{}", USAGE))?;
    AnalysisPayload::from_path(&path).with_context(|| format!("Failed to load payload {:?}", path))
}

struct Model {
    dashboard: Dashboard,
    renderer: Renderer,
    help_overlay: HelpOverlay,
    layout: Layout,
    config: Config,
    /// Time of the last update, used by input handlers
    now: Duration,
    /// Left button went down on the slider and is still held
    dragging: bool,
    end_announced: bool,
}

fn model(app: &App) -> Model {
    // `main` already validated these
    let args = Args::parse(env::args().skip(1)).unwrap_or_default();
    let config = Config::load(args.config.as_deref());
    let payload = load_payload(&args).unwrap_or_default();

    let resolution = Resolution::current(args.windowed);
    app.set_exit_on_escape(false);

    let mut win = app
        .new_window()
        .title(format!("pulse-dash: {}", payload.title_or_default()))
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .resized(resized)
        .size(resolution.width, resolution.height)
        .min_size(800, 600);

    if resolution.fullscreen {
        win = win.fullscreen();
    }

    let window_id = win.build().unwrap();
    let window = app.window(window_id).unwrap();
    let (w, h) = window.inner_size_points();
    info!("Window size: {}x{} (requested: {}x{})", w, h, resolution.width, resolution.height);

    let layout = Layout::compute(Rect::from_w_h(w, h), &config);
    let dashboard = Dashboard::build(
        &payload,
        build_mounts(&payload, &layout),
        &config.engine,
        Box::new(rand::rng()),
        app.duration.since_start,
    );
    info!(
        degraded = dashboard.diagnostics().len(),
        band = %dashboard.palette().band,
        "dashboard ready"
    );

    let heatmap = HeatmapPanel::new(app, dashboard.heatmap());

    Model {
        dashboard,
        renderer: Renderer::new(heatmap),
        help_overlay: HelpOverlay::new(),
        layout,
        config,
        now: app.duration.since_start,
        dragging: false,
        end_announced: false,
    }
}

/// One mount per visible panel
fn build_mounts(payload: &AnalysisPayload, layout: &Layout) -> Mounts {
    let mut headings = Vec::new();
    if layout.header.is_some() {
        headings.push(Heading::new(payload.title_or_default(), 1, 36));
    }
    if layout.bars.is_some() {
        headings.push(Heading::new(renderer::bars::HEADING, 2, 20));
    }
    if layout.heatmap.is_some() {
        headings.push(Heading::new(renderer::heatmap::HEADING, 2, 20));
    }

    Mounts {
        header: layout.header.map(|_| HeaderText::default()),
        bar_chart: layout.bars.map(|_| BarChart::new()),
        heatmap: layout.heatmap.map(|area| {
            let h = area.h() - renderer::heatmap::HEADING_SPACE;
            HeatmapSurface::new(area.w().max(1.0) as u32, h.max(1.0) as u32)
        }),
        pulse_layer: layout.pulses.map(|_| PulseLayer::new()),
        volume: layout.volume.map(|_| VolumeControl::default()),
        theme: ThemeTargets {
            headings,
            slider: layout.volume.map(|_| SliderStyle::default()),
        },
    }
}

fn update(_app: &App, model: &mut Model, update: Update) {
    model.now = update.since_start;
    model.dashboard.tick(model.now);
    model.renderer.update();

    let ended = model
        .dashboard
        .session()
        .is_some_and(|s| s.state() == SessionState::Ended);
    if ended && !model.end_announced {
        model.end_announced = true;
        model.renderer.show_notification("Playback ended".to_string());
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let bounds = app.window_rect();

    model
        .renderer
        .draw(&draw, bounds, &model.layout, &model.dashboard, model.now);

    if model.help_overlay.visible {
        let stopped = model
            .dashboard
            .session()
            .is_some_and(|s| s.state() == SessionState::Stopped);
        model.help_overlay.draw(
            &draw,
            bounds,
            model.dashboard.palette().colors[2],
            model.dashboard.volume().map(|v| v.percent()),
            stopped,
        );
    }

    draw.to_frame(app, &frame).unwrap();
}

fn resized(_app: &App, model: &mut Model, size: Vec2) {
    model.layout = Layout::compute(Rect::from_w_h(size.x, size.y), &model.config);
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    match parse_key(key, model.help_overlay.visible) {
        Some(Action::Quit) => {
            model.dashboard.stop(model.now);
            app.quit();
        }
        Some(Action::ShowHelp) => model.help_overlay.toggle(),
        Some(Action::HideHelp) => model.help_overlay.hide(),
        Some(Action::Stop) => {
            model.dashboard.stop(model.now);
            model.renderer.show_notification("Stopped".to_string());
        }
        Some(Action::Volume(delta)) => {
            let gain = model.dashboard.nudge_volume(delta);
            model
                .renderer
                .show_notification(format!("Volume {}%", (gain * 100.0).round()));
        }
        None => {} // Unhandled key
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }
    let Some(volume) = model.layout.volume else {
        return;
    };

    let track = slider_track(volume);
    let pos = app.mouse.position();
    if hits_slider(track, pos) {
        model.dragging = true;
        model.dashboard.set_volume(percent_at(track, pos.x));
    }
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.dragging = false;
    }
}

fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    if !model.dragging {
        return;
    }
    if let Some(volume) = model.layout.volume {
        model
            .dashboard
            .set_volume(percent_at(slider_track(volume), pos.x));
    }
}
