use bon::Builder;

use crate::error::GaugeError;

/// Declarative description of a gauge.
///
/// A config is treated as immutable for one layout pass. Fields are grouped
/// the same way the layout consumes them; see [`GaugeConfig::affects_layout`]
/// for which ones force a recompute when they change.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct GaugeConfig {
    // Drawing area
    #[builder(default = 300.0)]
    pub width: f64,
    #[builder(default = 200.0)]
    pub height: f64,
    #[builder(default = 0.0)]
    pub margin_top: f64,
    #[builder(default = 0.0)]
    pub margin_bottom: f64,
    #[builder(default = 0.0)]
    pub margin_side: f64,

    // Arcs
    #[builder(default = 10.0)]
    pub stroke_width: f64,
    #[builder(default = 180.0)]
    pub arc_span_degrees: f64,
    #[builder(default = 1.0)]
    pub arc_spacing: f64,
    /// Range boundaries; N boundaries produce N - 1 colored segments
    #[builder(default = vec![0.0, 100.0])]
    pub ranges: Vec<f64>,
    /// One color per segment, passed through to the renderer untouched
    #[builder(default = vec!["green".to_string()])]
    pub colors: Vec<String>,
    #[builder(default = false)]
    pub use_arc_shadows: bool,
    #[builder(default = -3.0)]
    pub arc_shadow_depth: f64,

    // Needle
    #[builder(default = false)]
    pub needle_value_is_percentage: bool,
    #[builder(default = 1.0)]
    pub needle_base_width: f64,
    #[builder(default = 90.0)]
    pub needle_length_percentage: f64,
    #[builder(default = 2.0)]
    pub needle_pin_radius: f64,
    #[builder(default = false)]
    pub show_needle_shadow: bool,
    #[builder(default = 2.0)]
    pub needle_shadow_offset_degrees: f64,
    #[builder(default = 500.0)]
    pub time_out_duration_ms: f64,

    // Markers
    #[builder(default = true)]
    pub show_unit_markers: bool,
    #[builder(default = 1.0)]
    pub marker_small_unit: f64,
    #[builder(default = 5.0)]
    pub marker_small_length: f64,
    #[builder(default = 5.0)]
    pub marker_small_offset: f64,
    #[builder(default = 10.0)]
    pub marker_large_unit: f64,
    #[builder(default = 15.0)]
    pub marker_large_length: f64,
    #[builder(default = 5.0)]
    pub marker_large_offset: f64,
    #[builder(default = false)]
    pub show_marker_text_small: bool,
    #[builder(default = true)]
    pub show_marker_text_large: bool,
    /// Negative values push marker text outside the arcs
    #[builder(default = 10.0)]
    pub marker_text_offset: f64,

    // Labels and text
    #[builder(default = true)]
    pub show_range_labels: bool,
    #[builder(default = false)]
    pub show_needle_value_as_text: bool,
    /// Font dependent shift of the value text below the needle pin
    #[builder(default = 15.0)]
    pub central_value_text_vertical_correction: f64,
    #[builder(default, into)]
    pub value_prefix: String,
    #[builder(default, into)]
    pub value_suffix: String,
    #[builder(default, into)]
    pub caption: String,
    #[builder(default, into)]
    pub footer: String,
    /// Appended to every generated class attribute
    #[builder(default, into)]
    pub extra_class: String,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GaugeConfig {
    /// Returns true when switching from `self` to `other` requires a new layout.
    ///
    /// Text, styling and animation timing can change without touching geometry.
    pub fn affects_layout(&self, other: &GaugeConfig) -> bool {
        self.width != other.width
            || self.height != other.height
            || self.margin_top != other.margin_top
            || self.margin_bottom != other.margin_bottom
            || self.margin_side != other.margin_side
            || self.stroke_width != other.stroke_width
            || self.arc_span_degrees != other.arc_span_degrees
            || self.arc_spacing != other.arc_spacing
            || self.ranges != other.ranges
            || self.colors != other.colors
            || self.needle_value_is_percentage != other.needle_value_is_percentage
            || self.needle_base_width != other.needle_base_width
            || self.needle_length_percentage != other.needle_length_percentage
            || self.needle_pin_radius != other.needle_pin_radius
            || self.show_unit_markers != other.show_unit_markers
            || self.marker_small_unit != other.marker_small_unit
            || self.marker_small_length != other.marker_small_length
            || self.marker_small_offset != other.marker_small_offset
            || self.marker_large_unit != other.marker_large_unit
            || self.marker_large_length != other.marker_large_length
            || self.marker_large_offset != other.marker_large_offset
            || self.show_marker_text_small != other.show_marker_text_small
            || self.show_marker_text_large != other.show_marker_text_large
            || self.marker_text_offset != other.marker_text_offset
            || self.show_range_labels != other.show_range_labels
            || self.central_value_text_vertical_correction
                != other.central_value_text_vertical_correction
    }

    /// Checks everything the layout needs before any trigonometry runs.
    pub fn validate_geometry(&self) -> Result<(), GaugeError> {
        let numbers = [
            ("width", self.width),
            ("height", self.height),
            ("margin_top", self.margin_top),
            ("margin_bottom", self.margin_bottom),
            ("margin_side", self.margin_side),
            ("stroke_width", self.stroke_width),
            ("arc_span_degrees", self.arc_span_degrees),
            ("arc_spacing", self.arc_spacing),
            ("needle_base_width", self.needle_base_width),
            ("needle_length_percentage", self.needle_length_percentage),
            ("needle_pin_radius", self.needle_pin_radius),
            ("marker_text_offset", self.marker_text_offset),
        ];
        if let Some((name, _)) = numbers.iter().find(|(_, value)| !value.is_finite()) {
            return Err(GaugeError::NonFinite(name));
        }
        if self.ranges.len() < 2 {
            return Err(GaugeError::TooFewRanges(self.ranges.len()));
        }
        if self.ranges.iter().any(|value| !value.is_finite()) {
            return Err(GaugeError::NonFinite("ranges"));
        }
        for (name, unit) in [
            ("marker_small_unit", self.marker_small_unit),
            ("marker_large_unit", self.marker_large_unit),
        ] {
            if !unit.is_finite() || unit == 0.0 {
                return Err(GaugeError::InvalidMarkerUnit(name));
            }
        }
        Ok(())
    }

    /// Checks that there is exactly one color per range segment.
    pub fn validate_colors(&self) -> Result<(), GaugeError> {
        let expected = self.ranges.len().saturating_sub(1);
        if self.colors.len() != expected {
            return Err(GaugeError::ColorCountMismatch {
                ranges: self.ranges.len(),
                expected,
                actual: self.colors.len(),
            });
        }
        Ok(())
    }

    /// `extra_class` with a leading space, or nothing
    pub(crate) fn class_suffix(&self) -> String {
        if self.extra_class.is_empty() {
            String::new()
        } else {
            format!(" {}", self.extra_class)
        }
    }
}
