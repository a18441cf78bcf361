//! Colored arc segments
//!
//! Each segment is drawn as a full circle whose stroke dash pattern leaves
//! only the segment's arc visible; a rotation moves the start of the dash to
//! the segment's angular position.

use crate::config::GaugeConfig;
use crate::error::GaugeError;
use crate::layout::{map_value_to_percentage, GaugeLayout};

/// Drawing parameters for one colored portion of the gauge band
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    pub color: String,
    pub start_pos: f64,
    pub end_pos: f64,
    pub rotation_degrees: f64,
    /// Visible stroke length in pixels
    pub dash_length: f64,
    /// Always long enough to hide the rest of the circle
    pub dash_gap_length: f64,
    pub dash_offset: f64,
    pub rotation_origin_x: f64,
    pub rotation_origin_y: f64,
    pub radius: f64,
    pub stroke_width: f64,
    pub shadow: bool,
}

impl ArcSegment {
    pub fn dash_array(&self) -> String {
        format!("{},{}", self.dash_length, self.dash_gap_length)
    }

    pub fn transform(&self) -> String {
        format!(
            "rotate({} {} {})",
            self.rotation_degrees, self.rotation_origin_x, self.rotation_origin_y
        )
    }

    /// Screen angle (degrees, clockwise from +x) where the visible arc starts
    pub fn start_angle(&self) -> f64 {
        self.rotation_degrees
    }

    /// Angular length (degrees) of the visible arc
    pub fn sweep_degrees(&self) -> f64 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        (self.dash_length.max(0.0) / self.radius).to_degrees()
    }
}

pub fn build_arcs(config: &GaugeConfig, layout: &GaugeLayout) -> Result<Vec<ArcSegment>, GaugeError> {
    config.validate_colors()?;

    let span = layout.arc_span_degrees;
    let half_gap_below = (180.0 - layout.arc_span_gap_degrees) / 2.0;

    let segments = config
        .ranges
        .windows(2)
        .zip(&config.colors)
        .map(|(bounds, color)| {
            let start_pos =
                map_value_to_percentage(layout.needle_min_value, layout.needle_max_value, bounds[0]);
            let end_pos =
                map_value_to_percentage(layout.needle_min_value, layout.needle_max_value, bounds[1]);
            let dash_length =
                (end_pos - start_pos) * layout.circumference * (span / 360.0) - config.arc_spacing;

            ArcSegment {
                color: color.clone(),
                start_pos,
                end_pos,
                rotation_degrees: -(180.0 + half_gap_below) + start_pos * span,
                dash_length,
                dash_gap_length: layout.circumference * 2.0,
                dash_offset: 0.0,
                rotation_origin_x: layout.center.x,
                rotation_origin_y: layout.center.y,
                radius: layout.radius,
                stroke_width: config.stroke_width,
                shadow: config.use_arc_shadows,
            }
        })
        .collect();

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(span: f64) -> GaugeConfig {
        GaugeConfig::builder()
            .width(220.0)
            .height(120.0)
            .needle_base_width(0.0)
            .arc_span_degrees(span)
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
    fn one_segment_per_range_pair() {
        let config = config(180.0);
        let layout = GaugeLayout::compute(&config).unwrap();
        let arcs = build_arcs(&config, &layout).unwrap();
        assert_eq!(arcs.len(), 4);
        assert_eq!(arcs[0].start_pos, 0.0);
        assert_eq!(arcs[3].end_pos, 1.0);
        assert_eq!(arcs[2].color, "red");
    }

    #[test]
    fn half_circle_rotation_and_dash() {
        let config = config(180.0);
        let layout = GaugeLayout::compute(&config).unwrap();
        let arcs = build_arcs(&config, &layout).unwrap();

        // half gap below is zero for a half circle: the band starts at the left
        assert_eq!(arcs[0].rotation_degrees, -180.0);
        assert_eq!(arcs[1].rotation_degrees, -180.0 + 0.2 * 180.0);

        let expected = 0.2 * layout.circumference * 0.5 - 1.0;
        assert!((arcs[0].dash_length - expected).abs() < 1e-9);
        assert_eq!(arcs[0].dash_gap_length, layout.circumference * 2.0);
        assert_eq!(arcs[0].rotation_origin_x, layout.center.x);
        assert_eq!(arcs[0].rotation_origin_y, layout.center.y);
    }

    #[test]
    fn wide_span_distributes_gap_below() {
        let config = config(270.0);
        let layout = GaugeLayout::compute(&config).unwrap();
        let arcs = build_arcs(&config, &layout).unwrap();
        // (180 - 90) / 2 = 45 degrees below the horizontal on the left side
        assert_eq!(arcs[0].rotation_degrees, -225.0);
    }

    #[test]
    fn color_mismatch_yields_no_segments() {
        let config = GaugeConfig::builder()
            .ranges(vec![0.0, 10.0])
            .colors(vec![])
            .build();
        let layout = GaugeLayout::compute(&config).unwrap();
        assert!(matches!(
            build_arcs(&config, &layout),
            Err(GaugeError::ColorCountMismatch { .. })
        ));
    }

    #[test]
    fn attribute_strings() {
        let config = config(180.0);
        let layout = GaugeLayout::compute(&config).unwrap();
        let arcs = build_arcs(&config, &layout).unwrap();
        assert_eq!(
            arcs[0].transform(),
            format!("rotate(-180 {} {})", layout.center.x, layout.center.y)
        );
        assert!(arcs[0].dash_array().ends_with(&format!(",{}", layout.circumference * 2.0)));
    }
}
