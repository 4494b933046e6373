use std::time::Duration;

use pulse_dash_core::{
    AnalysisPayload, BarChart, ClockPlayer, Dashboard, Element, EngineSettings, HeaderText,
    Heading, HeatmapSurface, Mounts, PulseLayer, PulseSchedule, PulseTrigger, Rgb, ScriptedRandom,
    SessionState, SliderStyle, TempoBand, ThemeTargets, VolumeControl,
};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn mounts() -> Mounts {
    Mounts {
        header: Some(HeaderText::default()),
        bar_chart: Some(BarChart::new()),
        heatmap: Some(HeatmapSurface::new(64, 32)),
        pulse_layer: Some(PulseLayer::new()),
        volume: Some(VolumeControl::default()),
        theme: ThemeTargets {
            headings: vec![
                Heading::new("Frequencies", 2, 20),
                Heading::new("Spectrogram", 2, 20),
            ],
            slider: Some(SliderStyle::default()),
        },
    }
}

fn build(json: &str, mounts: Mounts, settings: &EngineSettings) -> Dashboard {
    let payload = AnalysisPayload::from_json_str(json).unwrap();
    Dashboard::build_with_player(
        &payload,
        mounts,
        settings,
        Box::new(ClockPlayer::silent(payload.duration)),
        Box::new(ScriptedRandom::new(vec![0.12, 0.87, 0.45, 0.6, 0.33])),
        Duration::ZERO,
    )
}

#[test]
fn test_end_to_end_fast_track() {
    let mut dash = build(
        r#"{"title": "Night Drive", "artist": "Kite", "tempo": 130,
            "barValues": [0, 0.5, 1], "beats": [0.0, 0.46]}"#,
        mounts(),
        &EngineSettings::default(),
    );

    assert_eq!(dash.palette().band, TempoBand::Fast);

    let header = dash.header().unwrap();
    assert_eq!(header.title, "Night Drive");
    assert_eq!(header.tempo, "130 BPM");

    let heights: Vec<f32> = dash
        .bar_chart()
        .unwrap()
        .bars()
        .iter()
        .map(|b| b.height_pct)
        .collect();
    assert_eq!(heights, vec![5.0, 50.0, 100.0]);

    assert_eq!(dash.tick(ms(0)), 1);
    assert_eq!(dash.tick(ms(459)), 0);
    assert_eq!(dash.tick(ms(460)), 1);

    let created: Vec<Duration> = dash.circles().iter().map(|c| c.created_at).collect();
    assert_eq!(created, vec![ms(0), ms(460)]);

    // Beats only: nothing else is emitted
    assert_eq!(dash.tick(ms(1500)), 0);
    dash.tick(ms(2000));
    assert_eq!(dash.circles().len(), 1);
    dash.tick(ms(2460));
    assert!(dash.circles().is_empty());
}

#[test]
fn test_theme_follows_palette() {
    let dash = build(r#"{"tempo": 60, "barValues": [0.3]}"#, mounts(), &EngineSettings::default());
    let palette = dash.palette();

    assert_eq!(palette.band, TempoBand::VerySlow);
    for heading in &dash.theme().headings {
        assert_eq!(heading.fill, Some(palette.ramp()));
    }
    let slider = dash.theme().slider.as_ref().unwrap();
    assert_eq!(slider.thumb, Some(Rgb::new(31, 119, 180)));
}

#[test]
fn test_interval_emission_and_stop() {
    let mut settings = EngineSettings::default();
    settings.pulse.trigger = PulseTrigger::Interval;
    let mut dash = build(r#"{"tempo": 100, "beats": [0.1, 0.2]}"#, mounts(), &settings);

    // Burst at 0..800 ms and the first period at 600 ms
    assert_eq!(dash.tick(ms(1000)), 6);

    dash.stop(ms(1000));
    dash.stop(ms(1000));
    assert_eq!(dash.session().unwrap().state(), SessionState::Stopped);
    assert_eq!(dash.tick(ms(1000 + 600 + 1)), 0);

    dash.tick(ms(5000));
    assert!(dash.circles().is_empty());
}

#[test]
fn test_natural_end_stops_emission() {
    let mut settings = EngineSettings::default();
    settings.pulse.trigger = PulseTrigger::Interval;
    let mut dash = build(r#"{"tempo": 120, "duration": 1.5}"#, mounts(), &settings);

    dash.tick(ms(1400));
    dash.tick(ms(1500));
    let session = dash.session().unwrap();
    assert_eq!(session.state(), SessionState::Ended);
    assert!(session.player().is_attached());
    assert_eq!(dash.tick(ms(3000)), 0);
}

#[test]
fn test_failures_stay_isolated() {
    // Heatmap image is missing, no pulse mount, no tempo
    let mut m = mounts();
    m.pulse_layer = None;
    let dash = build(
        r#"{"barValues": [0.2, 0.8], "spectrogramUri": "missing/spectrogram.png"}"#,
        m,
        &EngineSettings::default(),
    );

    assert!(dash.is_degraded(Element::Heatmap));
    assert!(dash.is_degraded(Element::Pulse));
    assert_eq!(
        dash.heatmap().unwrap().notice(),
        Some("Could not load the spectrogram")
    );

    assert_eq!(dash.bar_chart().unwrap().len(), 2);
    assert_eq!(dash.bar_chart().unwrap().caption(), Some("Fast: tempo unknown"));
    assert_eq!(dash.header().unwrap().tempo, "Tempo not found");
    assert!(dash.theme().headings.iter().all(|h| h.fill.is_some()));
}

#[test]
fn test_chromagram_and_matrix_payload() {
    let json = r#"const audioData = {
        "tempo": "85.0",
        "chromagram": [[0.0, 1.0, 2.0, 3.0], [1.0, 1.0, 1.0, 1.0]],
        "spectrogram": {"data": [[-80.0, 0.0], [-40.0, -40.0]], "time_bins": 2, "freq_bins": 2},
        "beats": []
    };"#;
    let mut settings = EngineSettings::default();
    settings.num_bars = 4;
    let dash = build(json, mounts(), &settings);

    assert_eq!(dash.palette().band, TempoBand::Slow);
    assert_eq!(dash.bar_chart().unwrap().len(), 4);
    assert_eq!(dash.bar_chart().unwrap().bars()[3].value, 1.0);

    let surface = dash.heatmap().unwrap();
    assert!(surface.notice().is_none());
    // Bin 0 sits in the bottom half; its loudest cell is on the right
    let quiet = surface.pixel(0, 31).unwrap();
    let loud = surface.pixel(63, 31).unwrap();
    assert_ne!(quiet, loud);
    assert_ne!(loud, Rgb::BACKGROUND);
    assert!(!dash.is_degraded(Element::Heatmap));
}

#[test]
fn test_missing_mounts_only_skip_their_element() {
    let m = Mounts {
        header: None,
        bar_chart: None,
        heatmap: None,
        pulse_layer: Some(PulseLayer::new()),
        volume: None,
        theme: ThemeTargets::default(),
    };
    let mut dash = build(r#"{"tempo": 140, "beats": [0.0]}"#, m, &EngineSettings::default());

    for element in [Element::Header, Element::BarChart, Element::Heatmap, Element::Volume] {
        assert!(dash.is_degraded(element), "{} should be degraded", element);
    }
    assert_eq!(dash.tick(ms(0)), 1);
    assert_eq!(dash.set_volume(55), 0.55);
}

#[test]
fn test_malformed_fields_degrade_only_their_element() {
    let mut dash = build(
        r#"{"title": 5, "tempo": 120, "barValues": [0, 0.5, 1], "beats": null,
            "spectrogram": {"data": [[-80.0, null], [-40.0, -20.0]]}}"#,
        mounts(),
        &EngineSettings::default(),
    );

    assert_eq!(dash.header().unwrap().title, "Unknown title");
    assert_eq!(dash.bar_chart().unwrap().len(), 3);
    assert!(!dash.is_degraded(Element::BarChart));
    assert!(dash.is_degraded(Element::Heatmap));

    // No beats: the tempo interval drives the pulses instead
    let session = dash.session().unwrap();
    assert!(matches!(session.schedule(), PulseSchedule::Interval(period) if *period == ms(500)));
    assert_eq!(dash.tick(ms(0)), 1);
}

#[test]
fn test_huge_duration_never_ends() {
    let mut settings = EngineSettings::default();
    settings.pulse.trigger = PulseTrigger::Interval;
    let mut dash = build(r#"{"tempo": 120, "duration": 1e30}"#, mounts(), &settings);

    dash.tick(ms(10_000));
    assert_eq!(dash.session().unwrap().state(), SessionState::Playing);
}
