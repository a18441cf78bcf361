use std::env;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use vumeter::{Gauge, GaugeCommand, GaugeConfig, ManualTicks, WindowConfig};

struct Options {
    range: Option<(f64, f64)>,
    title: String,
    font: Option<PathBuf>,
    span: f64,
    percentage: bool,
    svg: bool,
    value: Option<f64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            range: None,
            title: "VU".to_string(),
            font: None,
            span: 180.0,
            percentage: false,
            svg: false,
            value: None,
        }
    }
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Options {
    let mut options = Options {
        font: env::var_os("VUMETER_FONT").map(PathBuf::from),
        ..Options::default()
    };

    let mut args = args.into_iter().peekable();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--range" => {
                if let (Some(x), Some(y)) = (args.next(), args.next()) {
                    if let (Ok(x), Ok(y)) = (x.parse::<f64>(), y.parse::<f64>()) {
                        options.range = Some((x.min(y), x.max(y)));
                    }
                }
            }
            "--title" => {
                if let Some(title) = args.next() {
                    options.title = title;
                }
            }
            "--font" => {
                if let Some(path) = args.next() {
                    options.font = Some(PathBuf::from(path));
                }
            }
            "--span" => {
                if let Some(span) = args.next().and_then(|s| s.parse::<f64>().ok()) {
                    options.span = span;
                }
            }
            "--value" => {
                options.value = args.next().and_then(|s| s.parse::<f64>().ok());
            }
            "--percentage" => options.percentage = true,
            "--svg" => options.svg = true,
            other => warn!(argument = other, "ignoring unknown argument"),
        }
    }
    options
}

fn gauge_config(options: &Options) -> GaugeConfig {
    let builder = GaugeConfig::builder()
        .width(300.0)
        .height(180.0)
        .margin_top(20.0)
        .margin_side(20.0)
        .margin_bottom(30.0)
        .stroke_width(6.0)
        .arc_span_degrees(options.span)
        .needle_value_is_percentage(options.percentage)
        .show_needle_shadow(true)
        .show_needle_value_as_text(true)
        .time_out_duration_ms(300.0)
        .footer(options.title.clone());

    match options.range {
        Some((min, max)) => builder
            .ranges(vec![min, max])
            .colors(vec!["green".to_string()])
            .build(),
        // Classic VU scale: normal up to 0, overload above
        None => builder
            .ranges(vec![-20.0, 0.0, 3.0])
            .colors(vec!["#2e7d32".to_string(), "#c62828".to_string()])
            .marker_large_unit(5.0)
            .value_suffix(" VU")
            .build(),
    }
}

fn gauge_bounds(config: &GaugeConfig) -> Option<(f64, f64)> {
    let min = config.ranges.iter().copied().fold(f64::INFINITY, f64::min);
    let max = config.ranges.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min.is_finite() && max.is_finite() && min <= max).then_some((min, max))
}

fn spawn_stdin_reader(sender: Sender<GaugeCommand>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines().map_while(Result::ok) {
            match line.trim().parse::<f64>() {
                Ok(value) => {
                    if sender.send(GaugeCommand::SetValue(value)).is_err() {
                        break;
                    }
                }
                Err(_) => debug!(line = %line, "skipping non-numeric input"),
            }
        }
    });
}

fn spawn_random_values(sender: Sender<GaugeCommand>, min: f64, max: f64) {
    thread::spawn(move || {
        let mut rng = rand::rng();
        loop {
            let value = rng.random_range(min..=max);
            if sender.send(GaugeCommand::SetValue(value)).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(400));
        }
    });
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let options = parse_args(env::args().skip(1));
    let config = gauge_config(&options);
    let (min, max) = match gauge_bounds(&config) {
        Some(bounds) if !options.percentage => bounds,
        _ => (0.0, 100.0),
    };

    let mut gauge = Gauge::new(config);
    if let Some(err) = gauge.config_error() {
        warn!(error = %err, "starting with an empty gauge");
    }

    if options.svg {
        let mut ticks = ManualTicks::new();
        gauge.set_value(options.value.unwrap_or(min), &mut ticks)?;
        println!("{}", gauge.to_svg());
        return Ok(());
    }

    let (sender, receiver) = mpsc::channel();
    if let Some(value) = options.value {
        let _ = sender.send(GaugeCommand::SetValue(value));
    }
    if io::stdin().is_terminal() {
        info!(min, max, "no input on stdin, showing random values");
        spawn_random_values(sender, min, max);
    } else {
        spawn_stdin_reader(sender);
    }

    let window = WindowConfig::builder()
        .title(options.title.clone())
        .maybe_font_path(options.font.clone())
        .build();
    gauge.show_with_commands(&window, receiver)
}
