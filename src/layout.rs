//! Layout calculation
//!
//! Turns a [`GaugeConfig`] into the center point, radius and boxes every
//! other builder works from. The layout is a pure function of the config.

use std::f64::consts::PI;

use crate::config::GaugeConfig;
use crate::error::GaugeError;
use crate::geometry::Rectangle;

/// Wide drawing boxes limit the radius by width, narrower ones by height
const WIDE_BOX_RATIO: f64 = 2.1;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Everything derived from the geometry-affecting part of a config
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeLayout {
    pub center: Point,
    pub radius: f64,
    pub circumference: f64,
    pub drawing_box: Rectangle,
    pub circle_bounding_box: Rectangle,
    /// Area reserved below the gauge for the footer
    pub text_box: Rectangle,

    pub needle_min_value: f64,
    pub needle_max_value: f64,
    pub corrected_min_value: f64,
    pub corrected_max_value: f64,
    /// Distance between the corrected minimum and maximum, always > 0
    pub needle_value_range: f64,

    pub arc_span_degrees: f64,
    /// The part of the full circle the gauge does not cover
    pub arc_span_gap_degrees: f64,
    /// Needle rotation at the minimum; 0 degrees points straight up
    pub needle_left_angle: f64,
    pub center_y_correction: f64,

    pub background_path: String,
    pub label_left: Point,
    pub label_right: Point,
    pub label_center: Point,

    pub needle_length: f64,
    /// Base-left, tip, base-right of the unrotated (upright) needle
    pub needle_polygon: [Point; 3],
    pub view_box: String,
}

impl GaugeLayout {
    pub fn compute(config: &GaugeConfig) -> Result<Self, GaugeError> {
        config.validate_geometry()?;

        let needle_min_value = config.ranges.iter().copied().fold(f64::INFINITY, f64::min);
        let needle_max_value = config
            .ranges
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let (corrected_min_value, corrected_max_value) = if config.needle_value_is_percentage {
            (0.0, 100.0)
        } else {
            (needle_min_value, needle_max_value)
        };
        // Arcs are always placed on the raw range, so that one must be usable too
        if needle_max_value == needle_min_value {
            return Err(GaugeError::DegenerateRange(needle_min_value));
        }
        let needle_value_range = (corrected_max_value - corrected_min_value).abs();
        if needle_value_range <= 0.0 {
            return Err(GaugeError::DegenerateRange(corrected_min_value));
        }

        let span = config.arc_span_degrees;
        let drawing_box = Rectangle::new(
            config.margin_side,
            config.margin_top,
            config.width - config.margin_side,
            config.height - config.margin_bottom - config.needle_base_width,
        );

        let radius = if drawing_box.width_over_height() < WIDE_BOX_RATIO {
            drawing_box.width() / 2.0
        } else {
            drawing_box.height()
        };
        let circumference = 2.0 * PI * radius;

        // Raise the center so the lower half of a >180 degree sweep stays visible.
        // The sine takes the raw angle value, as the reference gauge does.
        let center_y_correction = if span > 180.0 {
            ((90.0 + span / 2.0).sin() * radius).abs()
        } else {
            0.0
        };

        let center = Point::new(
            drawing_box.x1() + drawing_box.width() / 2.0,
            drawing_box.y2() - center_y_correction,
        );

        let circle_bounding_box = Rectangle::new(
            center.x - radius,
            drawing_box.y1(),
            center.x + radius,
            center.y + center_y_correction,
        );
        let text_box = Rectangle::new(
            circle_bounding_box.x1(),
            config.height - config.margin_bottom,
            circle_bounding_box.x2(),
            config.height,
        );

        let angle_of_half_arc = (90.0 - span / 2.0).to_radians();
        let (half_sin, half_cos) = angle_of_half_arc.sin_cos();

        let circle_start = Point::new(center.x - half_cos * radius, center.y - half_sin * radius);
        let circle_end = Point::new(center.x + half_cos * radius, circle_start.y);
        let sweep_flag = if span < 180.0 { 0 } else { 1 };
        let background_path = format!(
            "M {},{} L {},{} A {} {} 0 {} 1 {},{} L {},{} Z",
            center.x,
            center.y,
            circle_start.x,
            circle_start.y,
            radius,
            radius,
            sweep_flag,
            circle_end.x,
            circle_end.y,
            circle_end.x,
            circle_end.y,
        );

        let label_distance = radius + config.stroke_width;
        let label_left = Point::new(
            center.x - half_cos * label_distance,
            center.y - half_sin * label_distance,
        );
        let label_right = Point::new(center.x + half_cos * label_distance, label_left.y);
        let label_center = Point::new(
            center.x,
            center.y + config.needle_pin_radius + config.central_value_text_vertical_correction,
        );

        let needle_length = radius * (config.needle_length_percentage / 100.0);
        let needle_polygon = [
            Point::new(center.x - config.needle_base_width, center.y),
            Point::new(center.x, center.y - needle_length),
            Point::new(center.x + config.needle_base_width, center.y),
        ];

        tracing::debug!(
            cx = center.x,
            cy = center.y,
            radius,
            span,
            "gauge layout computed"
        );

        Ok(Self {
            center,
            radius,
            circumference,
            drawing_box,
            circle_bounding_box,
            text_box,
            needle_min_value,
            needle_max_value,
            corrected_min_value,
            corrected_max_value,
            needle_value_range,
            arc_span_degrees: span,
            arc_span_gap_degrees: 360.0 - span,
            needle_left_angle: -span / 2.0,
            center_y_correction,
            background_path,
            label_left,
            label_right,
            label_center,
            needle_length,
            needle_polygon,
            view_box: format!("0 0 {} {}", config.width, config.height),
        })
    }

    /// The needle polygon as an SVG `points` attribute
    pub fn needle_points(&self) -> String {
        self.needle_polygon
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The rotation origin shared by arcs, markers and the needle
    pub fn transform_origin(&self) -> String {
        format!("{},{}", self.center.x, self.center.y)
    }
}

/// Maps `value` between `min` and `max` onto 0..1 (not clamped).
pub fn map_value_to_percentage(min: f64, max: f64, value: f64) -> f64 {
    (value - min) / (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_circle() -> GaugeConfig {
        GaugeConfig::builder()
            .width(300.0)
            .height(200.0)
            .margin_side(10.0)
            .margin_top(10.0)
            .margin_bottom(20.0)
            .needle_base_width(2.0)
            .ranges(vec![0.0, 10.0, 20.0, 30.0, 50.0])
            .colors(vec![
                "green".into(),
                "orange".into(),
                "red".into(),
                "darkred".into(),
            ])
            .build()
    }

    #[test]
    fn half_circle_layout() {
        let layout = GaugeLayout::compute(&half_circle()).unwrap();
        // drawing box 10,10 -> 290,178: 280 x 168, ratio < 2.1
        assert_eq!(layout.drawing_box.width(), 280.0);
        assert_eq!(layout.drawing_box.height(), 168.0);
        assert_eq!(layout.radius, 140.0);
        assert_eq!(layout.center, Point::new(150.0, 178.0));
        assert_eq!(layout.center_y_correction, 0.0);
        assert_eq!(layout.needle_min_value, 0.0);
        assert_eq!(layout.needle_max_value, 50.0);
        assert_eq!(layout.needle_value_range, 50.0);
        assert_eq!(layout.needle_left_angle, -90.0);
        assert_eq!(layout.view_box, "0 0 300 200");
        assert!((layout.circumference - 2.0 * PI * 140.0).abs() < 1e-9);
    }

    #[test]
    fn wide_box_uses_height_as_radius() {
        let config = GaugeConfig::builder().width(500.0).height(100.0).build();
        let layout = GaugeLayout::compute(&config).unwrap();
        // 500 x 99 after the default needle base width
        assert_eq!(layout.radius, 99.0);
    }

    #[test]
    fn wide_span_raises_center() {
        let config = GaugeConfig::builder()
            .width(200.0)
            .height(200.0)
            .arc_span_degrees(270.0)
            .needle_base_width(0.0)
            .build();
        let layout = GaugeLayout::compute(&config).unwrap();
        let expected = (225.0f64.sin() * 100.0).abs();
        assert!((layout.center_y_correction - expected).abs() < 1e-9);
        assert!((layout.center_y_correction - 93.00948780045253).abs() < 1e-9);
        assert!((layout.center.y - (200.0 - expected)).abs() < 1e-9);
        assert!((layout.circle_bounding_box.y2() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn label_anchors_sit_outside_the_arc_ends() {
        let layout = GaugeLayout::compute(&half_circle()).unwrap();
        // 180 degree span: the arc ends are level with the center
        assert!((layout.label_left.x - (150.0 - 150.0)).abs() < 1e-9);
        assert!((layout.label_right.x - 300.0).abs() < 1e-9);
        assert!((layout.label_left.y - 178.0).abs() < 1e-9);
        assert_eq!(layout.label_center, Point::new(150.0, 178.0 + 2.0 + 15.0));
    }

    #[test]
    fn background_path_sweep_flag_follows_span() {
        let narrow = GaugeConfig::builder().arc_span_degrees(120.0).build();
        let layout = GaugeLayout::compute(&narrow).unwrap();
        assert!(layout.background_path.contains(" 0 0 1 "));

        let layout = GaugeLayout::compute(&half_circle()).unwrap();
        assert!(layout.background_path.starts_with("M 150,178 L "));
        assert!(layout.background_path.contains(" 0 1 1 "));
        assert!(layout.background_path.ends_with(" Z"));
    }

    #[test]
    fn needle_polygon_points_up() {
        let layout = GaugeLayout::compute(&half_circle()).unwrap();
        assert_eq!(layout.needle_length, 126.0);
        assert_eq!(layout.needle_points(), "148,178 150,52 152,178");
        assert_eq!(layout.transform_origin(), "150,178");
    }

    #[test]
    fn percentage_mode_corrects_bounds() {
        let config = GaugeConfig::builder()
            .ranges(vec![-100.0, -20.0, 10.0])
            .colors(vec!["green".into(), "red".into()])
            .needle_value_is_percentage(true)
            .build();
        let layout = GaugeLayout::compute(&config).unwrap();
        assert_eq!(layout.corrected_min_value, 0.0);
        assert_eq!(layout.corrected_max_value, 100.0);
        assert_eq!(layout.needle_min_value, -100.0);
        assert_eq!(layout.needle_value_range, 100.0);
    }

    #[test]
    fn degenerate_range_is_an_error() {
        let config = GaugeConfig::builder()
            .ranges(vec![5.0, 5.0])
            .build();
        assert_eq!(
            GaugeLayout::compute(&config),
            Err(GaugeError::DegenerateRange(5.0))
        );
    }

    #[test]
    fn too_few_ranges_is_an_error() {
        let config = GaugeConfig::builder().ranges(vec![5.0]).build();
        assert_eq!(
            GaugeLayout::compute(&config),
            Err(GaugeError::TooFewRanges(1))
        );
    }

    #[test]
    fn layout_is_idempotent() {
        let config = half_circle();
        assert_eq!(
            GaugeLayout::compute(&config).unwrap(),
            GaugeLayout::compute(&config).unwrap()
        );
    }

    #[test]
    fn percentage_mapping_endpoints() {
        assert_eq!(map_value_to_percentage(-4.0, 8.0, -4.0), 0.0);
        assert_eq!(map_value_to_percentage(-4.0, 8.0, 8.0), 1.0);
        assert_eq!(map_value_to_percentage(-4.0, 8.0, 2.0), 0.5);
    }
}
