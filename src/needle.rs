use crate::config::GaugeConfig;
use crate::layout::{map_value_to_percentage, GaugeLayout};

/// Maps a displayed value to 0..=100 along the gauge.
///
/// In percentage mode the value already is a percentage; otherwise it is
/// placed on the raw `[needle_min_value, needle_max_value]` range.
pub fn adjusted_value(config: &GaugeConfig, layout: &GaugeLayout, value: f64) -> f64 {
    let percentage = if config.needle_value_is_percentage {
        value
    } else {
        map_value_to_percentage(layout.needle_min_value, layout.needle_max_value, value) * 100.0
    };
    percentage.clamp(0.0, 100.0)
}

/// Needle rotation for one displayed value
#[derive(Debug, Clone, PartialEq)]
pub struct NeedlePose {
    pub adjusted_value: f64,
    /// 0 degrees points straight up
    pub rotation_degrees: f64,
    /// Shadow coincides with the needle at 50% and drifts outward toward the ends
    pub shadow_rotation_degrees: Option<f64>,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl NeedlePose {
    pub fn compute(config: &GaugeConfig, layout: &GaugeLayout, value: f64) -> Self {
        let adjusted = adjusted_value(config, layout, value);
        let rotation_degrees =
            layout.needle_left_angle + (adjusted / 100.0) * layout.arc_span_degrees;
        let shadow_offset = (adjusted - 50.0) / 100.0 * config.needle_shadow_offset_degrees;

        Self {
            adjusted_value: adjusted,
            rotation_degrees,
            shadow_rotation_degrees: config
                .show_needle_shadow
                .then_some(rotation_degrees + shadow_offset),
            origin_x: layout.center.x,
            origin_y: layout.center.y,
        }
    }

    pub fn transform(&self) -> String {
        format!(
            "rotate({},{},{})",
            self.rotation_degrees, self.origin_x, self.origin_y
        )
    }

    pub fn shadow_transform(&self) -> Option<String> {
        self.shadow_rotation_degrees
            .map(|angle| format!("rotate({},{},{})", angle, self.origin_x, self.origin_y))
    }
}

/// Text shown below the needle pin, if enabled
pub fn needle_text(config: &GaugeConfig, layout: &GaugeLayout, value: f64) -> Option<String> {
    if !config.show_needle_value_as_text {
        return None;
    }
    if config.needle_value_is_percentage {
        Some(format!("{:.0}%", adjusted_value(config, layout, value)))
    } else {
        Some(format!(
            "{}{}{}",
            config.value_prefix, value, config.value_suffix
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GaugeConfig {
        GaugeConfig::builder()
            .ranges(vec![-100.0, -80.0, -20.0, 0.0, 10.0])
            .colors(vec![
                "green".into(),
                "orange".into(),
                "red".into(),
                "darkred".into(),
            ])
            .build()
    }

    #[test]
    fn adjusted_value_maps_range_ends() {
        let config = config();
        let layout = GaugeLayout::compute(&config).unwrap();
        assert_eq!(adjusted_value(&config, &layout, -100.0), 0.0);
        assert_eq!(adjusted_value(&config, &layout, 10.0), 100.0);
        assert_eq!(adjusted_value(&config, &layout, -500.0), 0.0);
        assert_eq!(adjusted_value(&config, &layout, 90.0), 100.0);
    }

    #[test]
    fn percentage_mode_clamps_raw_value() {
        let config = GaugeConfig {
            needle_value_is_percentage: true,
            ..config()
        };
        let layout = GaugeLayout::compute(&config).unwrap();
        assert_eq!(adjusted_value(&config, &layout, 150.0), 100.0);
        assert_eq!(adjusted_value(&config, &layout, -20.0), 0.0);
        assert_eq!(adjusted_value(&config, &layout, 42.0), 42.0);
    }

    #[test]
    fn pose_spans_the_arc() {
        let config = config();
        let layout = GaugeLayout::compute(&config).unwrap();
        assert_eq!(NeedlePose::compute(&config, &layout, -100.0).rotation_degrees, -90.0);
        assert_eq!(NeedlePose::compute(&config, &layout, 10.0).rotation_degrees, 90.0);
        assert_eq!(NeedlePose::compute(&config, &layout, -45.0).rotation_degrees, 0.0);
    }

    #[test]
    fn shadow_only_when_enabled() {
        let config = config();
        let layout = GaugeLayout::compute(&config).unwrap();
        assert_eq!(NeedlePose::compute(&config, &layout, 0.0).shadow_transform(), None);

        let config = GaugeConfig {
            show_needle_shadow: true,
            needle_shadow_offset_degrees: 4.0,
            ..config
        };
        let at_min = NeedlePose::compute(&config, &layout, -100.0);
        assert_eq!(at_min.shadow_rotation_degrees, Some(-90.0 - 2.0));
        let centered = NeedlePose::compute(&config, &layout, -45.0);
        assert_eq!(centered.shadow_rotation_degrees, Some(0.0));
    }

    #[test]
    fn needle_text_formats() {
        let config = GaugeConfig {
            show_needle_value_as_text: true,
            value_prefix: "~".to_string(),
            value_suffix: " dB".to_string(),
            ..config()
        };
        let layout = GaugeLayout::compute(&config).unwrap();
        assert_eq!(needle_text(&config, &layout, -12.5).as_deref(), Some("~-12.5 dB"));

        let config = GaugeConfig {
            needle_value_is_percentage: true,
            ..config
        };
        assert_eq!(needle_text(&config, &layout, 42.4).as_deref(), Some("42%"));

        let hidden = GaugeConfig::default();
        assert_eq!(needle_text(&hidden, &layout, 1.0), None);
    }
}
