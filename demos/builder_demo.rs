use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use vumeter::{Gauge, GaugeCommand, GaugeConfig, WindowConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // A 240 degree meter with four zones, built with the bon-generated builder
    let config = GaugeConfig::builder()
        .width(320.0)
        .height(260.0)
        .margin_top(20.0)
        .margin_side(20.0)
        .margin_bottom(20.0)
        .arc_span_degrees(240.0)
        .ranges(vec![0.0, 40.0, 70.0, 90.0, 100.0])
        .colors(vec![
            "green".to_string(),
            "gold".to_string(),
            "orange".to_string(),
            "red".to_string(),
        ])
        .use_arc_shadows(true)
        .show_needle_shadow(true)
        .show_marker_text_small(false)
        .show_needle_value_as_text(true)
        .value_suffix(" rpm")
        .caption("Engine")
        .build();

    let mut gauge = Gauge::new(config);

    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut rng = rand::rng();
        let mut tick = 0u32;
        loop {
            let mut commands = vec![GaugeCommand::SetValue(rng.random_range(0.0..100.0))];
            if tick % 10 == 0 {
                commands.push(GaugeCommand::SetFooter(format!("sample {}", tick)));
            }
            if commands.into_iter().any(|cmd| sender.send(cmd).is_err()) {
                break;
            }
            tick += 1;
            thread::sleep(Duration::from_millis(700));
        }
    });

    println!("Displaying a gauge with a randomly moving needle");
    println!("Set VUMETER_FONT to a .ttf file to see labels");
    println!("Press Ctrl+C to exit");

    let window = WindowConfig::builder()
        .title("builder demo")
        .maybe_font_path(std::env::var_os("VUMETER_FONT").map(Into::into))
        .build();
    gauge.show_with_commands(&window, receiver)
}
