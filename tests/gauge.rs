use pretty_assertions::assert_eq;
use vumeter::arcs::build_arcs;
use vumeter::layout::map_value_to_percentage;
use vumeter::markers::MarkerClass;
use vumeter::needle::adjusted_value;
use vumeter::{
    Gauge, GaugeConfig, GaugeError, GaugeLayout, ManualTicks, PrimitiveKind, TickOutcome,
    ValueChange,
};

fn four_zones() -> GaugeConfig {
    GaugeConfig::builder()
        .width(300.0)
        .height(200.0)
        .ranges(vec![0.0, 10.0, 20.0, 30.0, 50.0])
        .colors(vec![
            "green".to_string(),
            "yellow".to_string(),
            "orange".to_string(),
            "red".to_string(),
        ])
        .build()
}

#[test]
fn test_percentage_mapping_endpoints() {
    assert_eq!(map_value_to_percentage(-3.0, 7.0, -3.0), 0.0);
    assert_eq!(map_value_to_percentage(-3.0, 7.0, 7.0), 1.0);
}

#[test]
fn test_arc_segments_cover_the_range() {
    let config = four_zones();
    let layout = GaugeLayout::compute(&config).unwrap();
    let arcs = build_arcs(&config, &layout).unwrap();

    assert_eq!(arcs.len(), 4);
    assert_eq!(arcs[0].start_pos, 0.0);
    assert_eq!(arcs[3].end_pos, 1.0);
    let colors: Vec<&str> = arcs.iter().map(|a| a.color.as_str()).collect();
    assert_eq!(colors, vec!["green", "yellow", "orange", "red"]);
}

#[test]
fn test_adjusted_value_clamps() {
    let config = four_zones();
    let layout = GaugeLayout::compute(&config).unwrap();
    assert_eq!(adjusted_value(&config, &layout, 0.0), 0.0);
    assert_eq!(adjusted_value(&config, &layout, 50.0), 100.0);
    assert_eq!(adjusted_value(&config, &layout, 75.0), 100.0);
    assert_eq!(adjusted_value(&config, &layout, -5.0), 0.0);

    let percent = GaugeConfig {
        needle_value_is_percentage: true,
        ..four_zones()
    };
    let layout = GaugeLayout::compute(&percent).unwrap();
    assert_eq!(adjusted_value(&percent, &layout, 150.0), 100.0);
    assert_eq!(adjusted_value(&percent, &layout, -20.0), 0.0);
}

#[test]
fn test_transition_lands_on_target() {
    let mut ticks = ManualTicks::new();
    let mut gauge = Gauge::new(GaugeConfig {
        time_out_duration_ms: 500.0,
        ..GaugeConfig::default()
    });
    gauge.set_value(10.0, &mut ticks).unwrap();

    let ValueChange::Animating(handle) = gauge.set_value(90.0, &mut ticks).unwrap() else {
        panic!("expected an animation");
    };
    let mut frames = 0;
    while gauge.on_tick(handle, &mut ticks) == TickOutcome::Frame {
        frames += 1;
    }
    assert_eq!(frames, 9);
    assert_eq!(gauge.value(), 90.0);
    assert!(!gauge.needle().is_animating());
}

#[test]
fn test_cancelled_transition_converges_to_latest_target() {
    let mut ticks = ManualTicks::new();
    let mut gauge = Gauge::new(GaugeConfig::default());
    gauge.set_value(0.0, &mut ticks).unwrap();

    let ValueChange::Animating(to_b) = gauge.set_value(80.0, &mut ticks).unwrap() else {
        panic!("expected an animation");
    };
    gauge.on_tick(to_b, &mut ticks);
    let ValueChange::Animating(to_c) = gauge.set_value(30.0, &mut ticks).unwrap() else {
        panic!("expected an animation");
    };
    assert!(ticks.was_cancelled(to_b));

    // Interleave stale ticks with live ones; only the live timer may move the needle
    for _ in 0..20 {
        gauge.on_tick(to_b, &mut ticks);
        gauge.on_tick(to_c, &mut ticks);
    }
    assert_eq!(gauge.value(), 30.0);
    assert_eq!(ticks.active_count(), 0);
}

#[test]
fn test_layout_is_pure() {
    let config = four_zones();
    assert_eq!(
        GaugeLayout::compute(&config).unwrap(),
        GaugeLayout::compute(&config).unwrap()
    );
}

#[test]
fn test_large_marker_priority() {
    assert_eq!(MarkerClass::classify(20.0, 10.0, 1.0), Some(MarkerClass::Large));
}

#[test]
fn test_missing_colors_render_an_empty_gauge() {
    let config = GaugeConfig::builder()
        .ranges(vec![0.0, 10.0])
        .colors(vec![])
        .build();
    let mut gauge = Gauge::new(config.clone());
    assert_eq!(
        gauge.config_error(),
        Some(&GaugeError::ColorCountMismatch {
            ranges: 2,
            expected: 1,
            actual: 0
        })
    );
    assert!(gauge.config_error().unwrap().is_config_error());

    let frame = gauge.redraw();
    assert!(frame.arcs.is_empty());
    assert!(frame.marker_lines.is_empty());
    assert_eq!(frame.view_box, "0 0 300 200");

    let layout = GaugeLayout::compute(&config).unwrap();
    assert!(build_arcs(&config, &layout).is_err());
}

#[test]
fn test_nan_value_leaves_gauge_untouched() {
    let mut ticks = ManualTicks::new();
    let mut gauge = Gauge::new(GaugeConfig::default());
    gauge.set_value(40.0, &mut ticks).unwrap();
    let before = gauge.needle().clone();

    let err = gauge.set_value(f64::NAN, &mut ticks).unwrap_err();
    assert!(!err.is_config_error());
    assert_eq!(gauge.needle(), &before);
}

#[test]
fn test_svg_document() {
    let mut ticks = ManualTicks::new();
    let mut gauge = Gauge::new(GaugeConfig {
        show_needle_value_as_text: true,
        value_suffix: " dB".to_string(),
        ..four_zones()
    });
    gauge.set_value(25.0, &mut ticks).unwrap();
    let svg = gauge.to_svg();

    assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 300 200">"#));
    assert!(svg.ends_with("</svg>"));
    assert_eq!(svg.matches(r#"class="gauge arc""#).count(), 4);
    assert!(svg.contains(">25 dB</text>"));
    assert!(svg.contains(r#"transform="rotate(0,150,199)""#));
}

#[test]
fn test_frame_primitive_order() {
    let mut gauge = Gauge::new(four_zones());
    let scene = gauge.redraw().to_scene();
    let root = scene.roots().next().unwrap();
    assert_eq!(root.kind, PrimitiveKind::Group);

    let kinds: Vec<PrimitiveKind> = root
        .children
        .iter()
        .filter_map(|index| scene.iter().nth(*index))
        .map(|p| p.kind)
        .collect();
    assert_eq!(kinds.first(), Some(&PrimitiveKind::Path));
    assert_eq!(kinds[1..5], [PrimitiveKind::Circle; 4]);
    // needle then pin, followed by the two range labels
    let tail = &kinds[kinds.len() - 4..];
    assert_eq!(
        tail,
        [
            PrimitiveKind::Polygon,
            PrimitiveKind::Circle,
            PrimitiveKind::Text,
            PrimitiveKind::Text
        ]
    );
}

#[test]
fn test_geometry_change_marks_layout_stale() {
    let mut gauge = Gauge::new(four_zones());
    assert!(!gauge.update_config(|c| c.caption = "Input".to_string()));
    assert!(gauge.update_config(|c| c.width = 400.0));
    assert!(gauge.needs_recompute());
    gauge.recompute().unwrap();
    assert_eq!(gauge.layout().unwrap().view_box, "0 0 400 200");
}
