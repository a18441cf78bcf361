//! Tick markers and their text labels
//!
//! Values are walked at whole-unit steps from the corrected minimum to the
//! corrected maximum. A very large range produces a lot of ticks.

use crate::config::GaugeConfig;
use crate::geometry::Line;
use crate::layout::{GaugeLayout, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerClass {
    Large,
    Small,
}

impl MarkerClass {
    /// Large wins when a value is divisible by both units
    pub fn classify(value: f64, large_unit: f64, small_unit: f64) -> Option<Self> {
        if value % large_unit == 0.0 {
            Some(MarkerClass::Large)
        } else if value % small_unit == 0.0 {
            Some(MarkerClass::Small)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerClass::Large => "large",
            MarkerClass::Small => "small",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Marker(MarkerClass),
    /// Boundary labels for a minimum or maximum that got no regular label
    Min,
    Max,
}

impl LabelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelKind::Marker(class) => class.as_str(),
            LabelKind::Min => "minval",
            LabelKind::Max => "maxval",
        }
    }
}

/// A tick line, described unrotated on the horizontal through the center
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLine {
    pub class: MarkerClass,
    pub value: f64,
    pub line: Line,
    pub rotation_degrees: f64,
    pub origin: Point,
}

impl MarkerLine {
    pub fn transform(&self) -> String {
        format!(
            "rotate({},{},{})",
            self.rotation_degrees, self.origin.x, self.origin.y
        )
    }

    /// The tick in screen coordinates, after rotation
    pub fn rotated_line(&self) -> Line {
        self.line
            .rotated(self.rotation_degrees, self.origin.x, self.origin.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerText {
    pub kind: LabelKind,
    pub value: f64,
    pub text: String,
    pub anchor: Point,
    /// Angle of the anchor seen from the center (0 = +x, clockwise)
    pub anchor_angle_degrees: f64,
    /// Keeps the text upright relative to the arc tangent
    pub rotation_degrees: f64,
}

impl MarkerText {
    pub fn transform(&self) -> String {
        format!(
            "rotate({} {} {})",
            self.rotation_degrees, self.anchor.x, self.anchor.y
        )
    }

    /// Same as [`transform`](Self::transform), offset one pixel for the drop shadow
    pub fn shadow_transform(&self) -> String {
        format!("{} translate(1,1)", self.transform())
    }
}

/// Walks `min..=max` at whole-unit steps.
///
/// The step count is fixed up front so huge magnitudes, where `m + 1.0 == m`,
/// still terminate.
fn unit_steps(min: f64, max: f64) -> impl Iterator<Item = f64> {
    let steps = if max >= min { ((max - min).floor() as u64).saturating_add(1) } else { 0 };
    (0..steps).map(move |k| min + k as f64)
}

pub fn build_marker_lines(config: &GaugeConfig, layout: &GaugeLayout) -> Vec<MarkerLine> {
    if !config.show_unit_markers {
        return Vec::new();
    }

    let span = layout.arc_span_degrees;
    let (cx, cy) = (layout.center.x, layout.center.y);

    unit_steps(layout.corrected_min_value, layout.corrected_max_value)
        .filter_map(|m| {
            let class =
                MarkerClass::classify(m, config.marker_large_unit, config.marker_small_unit)?;
            let (length, offset) = match class {
                MarkerClass::Large => (config.marker_large_length, config.marker_large_offset),
                MarkerClass::Small => (config.marker_small_length, config.marker_small_offset),
            };

            let pos = (m - layout.corrected_min_value) / layout.needle_value_range;
            Some(MarkerLine {
                class,
                value: m,
                line: Line::new(
                    cx - (layout.radius + offset),
                    cy,
                    cx - (layout.radius + offset - length),
                    cy,
                ),
                rotation_degrees: 90.0 - span / 2.0 + pos * span,
                origin: layout.center,
            })
        })
        .collect()
}

pub fn build_marker_texts(config: &GaugeConfig, layout: &GaugeLayout) -> Vec<MarkerText> {
    if !config.show_marker_text_large && !config.show_marker_text_small {
        return Vec::new();
    }

    let (min, max) = (layout.corrected_min_value, layout.corrected_max_value);
    let regular: Vec<MarkerText> = unit_steps(min, max)
        .filter_map(|m| {
            let kind = if m % config.marker_large_unit == 0.0 && config.show_marker_text_large {
                MarkerClass::Large
            } else if m % config.marker_small_unit == 0.0 && config.show_marker_text_small {
                MarkerClass::Small
            } else {
                return None;
            };
            Some(marker_text(config, layout, LabelKind::Marker(kind), m))
        })
        .collect();

    let labeled = |value: f64| regular.iter().any(|text| text.value == value);
    let min_label = (!labeled(min)).then(|| marker_text(config, layout, LabelKind::Min, min));
    let max_label = (!labeled(max)).then(|| marker_text(config, layout, LabelKind::Max, max));

    min_label
        .into_iter()
        .chain(regular.iter().cloned())
        .chain(max_label)
        .collect()
}

fn marker_text(config: &GaugeConfig, layout: &GaugeLayout, kind: LabelKind, value: f64) -> MarkerText {
    let span = layout.arc_span_degrees;
    let percentage = (value - layout.corrected_min_value) / layout.needle_value_range;
    let position_degrees = percentage * span;

    let anchor_angle_degrees = -90.0 - span / 2.0 + position_degrees;
    let (sin, cos) = anchor_angle_degrees.to_radians().sin_cos();
    let distance = layout.radius - config.marker_text_offset;

    let text = if config.needle_value_is_percentage {
        format!("{}%", value)
    } else {
        format!("{}", value)
    };

    MarkerText {
        kind,
        value,
        text,
        anchor: Point::new(
            layout.center.x + cos * distance,
            layout.center.y + sin * distance,
        ),
        anchor_angle_degrees,
        rotation_degrees: anchor_angle_degrees + 90.0,
    }
}
