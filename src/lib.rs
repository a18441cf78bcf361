// ============================================================================
// CRATE LAYOUT
// ============================================================================
//
// config -> layout -> {arcs, markers, needle} -> frame -> scene / canvas
//
// Everything up to `frame` is pure geometry. `animation` drives the needle
// value over time, `window` is a reference host built on winit and pixels.

pub mod animation;
pub mod arcs;
pub mod canvas;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod layout;
pub mod markers;
pub mod needle;
pub mod scene;
pub mod window;

pub use animation::{
    IntervalTicks, ManualTicks, NeedleState, TickOutcome, TickSource, TimerHandle, ValueChange,
};
pub use canvas::{Color, RasterStyle};
pub use config::GaugeConfig;
pub use error::{GaugeError, RenderError};
pub use frame::GaugeFrame;
pub use layout::GaugeLayout;
pub use needle::NeedlePose;
pub use scene::{PrimitiveFactory, PrimitiveKind, Scene};
pub use window::WindowConfig;

use tracing::{debug, warn};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Commands a host thread can send to a running gauge window
#[derive(Debug, Clone)]
pub enum GaugeCommand {
    SetValue(f64),
    /// Replace the whole configuration; geometry is recomputed when needed
    SetConfig(Box<GaugeConfig>),
    SetCaption(String),
    SetFooter(String),
}

/// A gauge: configuration, cached layout and the animated needle value.
#[derive(Debug, Clone)]
pub struct Gauge {
    config: GaugeConfig,
    layout: Option<GaugeLayout>,
    config_error: Option<GaugeError>,
    layout_stale: bool,
    needle: NeedleState,
    needle_text: Option<String>,
}

impl Gauge {
    pub fn new(config: GaugeConfig) -> Self {
        let mut gauge = Self {
            config,
            layout: None,
            config_error: None,
            layout_stale: true,
            needle: NeedleState::new(),
            needle_text: None,
        };
        // The error is kept in `config_error`; the gauge still draws its background.
        let _ = gauge.recompute();
        gauge
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    /// The current layout, if the geometry part of the config is usable
    pub fn layout(&self) -> Option<&GaugeLayout> {
        self.layout.as_ref()
    }

    pub fn config_error(&self) -> Option<&GaugeError> {
        self.config_error.as_ref()
    }

    pub fn needle(&self) -> &NeedleState {
        &self.needle
    }

    /// The value the needle currently shows
    pub fn value(&self) -> f64 {
        self.needle.value()
    }

    pub fn needs_recompute(&self) -> bool {
        self.layout_stale
    }

    /// Replaces the configuration. Returns true when the layout went stale.
    pub fn set_config(&mut self, config: GaugeConfig) -> bool {
        let stale = self.config.affects_layout(&config);
        self.config = config;
        self.layout_stale |= stale;
        if !self.layout_stale {
            self.refresh_needle_text();
        }
        stale
    }

    pub fn update_config(&mut self, edit: impl FnOnce(&mut GaugeConfig)) -> bool {
        let mut config = self.config.clone();
        edit(&mut config);
        self.set_config(config)
    }

    /// Recomputes the layout from the current configuration.
    pub fn recompute(&mut self) -> Result<(), GaugeError> {
        self.layout_stale = false;
        let result = GaugeLayout::compute(&self.config).and_then(|layout| {
            let colors = self.config.validate_colors();
            self.layout = Some(layout);
            colors
        });

        match &result {
            Ok(()) => {
                self.config_error = None;
                debug!("gauge recomputed");
            }
            Err(err) => {
                // A color mismatch still leaves a usable background
                if !matches!(err, GaugeError::ColorCountMismatch { .. }) {
                    self.layout = None;
                }
                warn!(error = %err, "gauge configuration rejected");
                self.config_error = Some(err.clone());
            }
        }
        self.refresh_needle_text();
        result
    }

    /// Requests a new needle value.
    ///
    /// The first value and zero-length transitions apply at once; otherwise an
    /// eased transition is started on `ticks`. Non-finite values are rejected
    /// and leave the gauge as it was.
    pub fn set_value<T: TickSource + ?Sized>(
        &mut self,
        value: f64,
        ticks: &mut T,
    ) -> Result<ValueChange, GaugeError> {
        let duration = self.config.time_out_duration_ms;
        match self.needle.request(value, duration, ticks) {
            Ok(change) => {
                if change == ValueChange::Immediate {
                    self.refresh_needle_text();
                }
                Ok(change)
            }
            Err(err) => {
                warn!(error = %err, "needle value rejected");
                Err(err)
            }
        }
    }

    /// Feeds one timer tick to the running transition.
    ///
    /// The needle text only follows the final value, never the intermediate frames.
    pub fn on_tick<T: TickSource + ?Sized>(
        &mut self,
        handle: TimerHandle,
        ticks: &mut T,
    ) -> TickOutcome {
        let outcome = self.needle.on_tick(handle, ticks);
        if outcome == TickOutcome::Finished {
            self.refresh_needle_text();
        }
        outcome
    }

    /// Applies one host command; value changes go through `ticks`.
    pub fn apply<T: TickSource + ?Sized>(&mut self, command: GaugeCommand, ticks: &mut T) {
        match command {
            GaugeCommand::SetValue(value) => {
                // Rejections are logged by set_value
                let _ = self.set_value(value, ticks);
            }
            GaugeCommand::SetConfig(config) => {
                self.set_config(*config);
            }
            GaugeCommand::SetCaption(caption) => {
                self.update_config(|c| c.caption = caption);
            }
            GaugeCommand::SetFooter(footer) => {
                self.update_config(|c| c.footer = footer);
            }
        }
    }

    pub fn needle_pose(&self) -> Option<NeedlePose> {
        self.usable_layout()
            .map(|layout| NeedlePose::compute(&self.config, layout, self.needle.value()))
    }

    pub fn needle_text(&self) -> Option<&str> {
        self.needle_text.as_deref()
    }

    /// Builds the current frame, recomputing the layout first if it is stale.
    pub fn redraw(&mut self) -> GaugeFrame {
        if self.layout_stale {
            // Stored in config_error and rendered as an empty gauge
            let _ = self.recompute();
        }
        self.frame()
    }

    /// The frame for the current state without touching a stale layout
    pub fn frame(&self) -> GaugeFrame {
        let Some(layout) = self.usable_layout() else {
            return GaugeFrame::empty(&self.config, self.layout.as_ref());
        };
        GaugeFrame::build(&self.config, layout, self.needle.value(), self.needle_text())
            .unwrap_or_else(|err| {
                warn!(error = %err, "gauge frame could not be built");
                GaugeFrame::empty(&self.config, Some(layout))
            })
    }

    pub fn to_svg(&mut self) -> String {
        self.redraw().to_svg()
    }

    fn usable_layout(&self) -> Option<&GaugeLayout> {
        match self.config_error {
            Some(_) => None,
            None => self.layout.as_ref(),
        }
    }

    fn refresh_needle_text(&mut self) {
        self.needle_text = self
            .usable_layout()
            .and_then(|layout| needle::needle_text(&self.config, layout, self.needle.target()));
    }
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new(GaugeConfig::default())
    }
}
