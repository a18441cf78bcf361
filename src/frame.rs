//! One redraw worth of gauge output
//!
//! A [`GaugeFrame`] holds every descriptor the host needs. It can be handed
//! to any [`PrimitiveFactory`], serialized to SVG, or rasterized directly.

use crate::arcs::{build_arcs, ArcSegment};
use crate::attrs;
use crate::config::GaugeConfig;
use crate::error::GaugeError;
use crate::layout::{GaugeLayout, Point};
use crate::markers::{build_marker_lines, build_marker_texts, MarkerLine, MarkerText};
use crate::needle::NeedlePose;
use crate::scene::{PrimitiveFactory, PrimitiveKind, Scene};

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    pub anchor: Point,
    pub class: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeedleFrame {
    pub polygon: [Point; 3],
    pub points: String,
    pub pose: NeedlePose,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PinCircle {
    pub center: Point,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GaugeFrame {
    pub width: f64,
    pub height: f64,
    pub view_box: String,
    pub background_path: Option<String>,
    /// Center and radius of the background wedge, for raster hosts
    pub background: Option<(Point, f64, f64)>,
    pub arcs: Vec<ArcSegment>,
    pub marker_lines: Vec<MarkerLine>,
    pub marker_texts: Vec<MarkerText>,
    pub needle: Option<NeedleFrame>,
    pub pin: Option<PinCircle>,
    pub range_labels: Vec<PlacedText>,
    pub needle_text: Option<PlacedText>,
    pub caption: Option<PlacedText>,
    pub footer: Option<PlacedText>,
    /// `extra_class` with a leading space, appended to every class attribute
    pub class_suffix: String,
    pub arc_shadow_depth: Option<f64>,
}

impl GaugeFrame {
    /// Background only; used when the configuration is unusable
    pub fn empty(config: &GaugeConfig, layout: Option<&GaugeLayout>) -> Self {
        Self {
            width: config.width,
            height: config.height,
            view_box: format!("0 0 {} {}", config.width, config.height),
            background_path: layout.map(|l| l.background_path.clone()),
            background: layout.map(|l| (l.center, l.radius, l.arc_span_degrees)),
            class_suffix: config.class_suffix(),
            ..Default::default()
        }
    }

    pub fn build(
        config: &GaugeConfig,
        layout: &GaugeLayout,
        needle_value: f64,
        needle_text: Option<&str>,
    ) -> Result<Self, GaugeError> {
        let arcs = build_arcs(config, layout)?;
        let mut frame = Self::empty(config, Some(layout));
        frame.view_box = layout.view_box.clone();
        frame.arcs = arcs;
        frame.marker_lines = build_marker_lines(config, layout);
        frame.marker_texts = build_marker_texts(config, layout);
        frame.needle = Some(NeedleFrame {
            polygon: layout.needle_polygon,
            points: layout.needle_points(),
            pose: NeedlePose::compute(config, layout, needle_value),
        });
        frame.pin = Some(PinCircle {
            center: layout.center,
            radius: config.needle_pin_radius,
        });

        if config.show_range_labels {
            let suffix = if config.needle_value_is_percentage { "%" } else { "" };
            frame.range_labels = vec![
                PlacedText {
                    text: format!("{}{}", layout.corrected_min_value, suffix),
                    anchor: layout.label_left,
                    class: "min",
                },
                PlacedText {
                    text: format!("{}{}", layout.corrected_max_value, suffix),
                    anchor: layout.label_right,
                    class: "max",
                },
            ];
        }

        frame.needle_text = needle_text.map(|text| PlacedText {
            text: text.to_string(),
            anchor: layout.label_center,
            class: "value",
        });
        frame.caption = (!config.caption.is_empty()).then(|| PlacedText {
            text: config.caption.clone(),
            anchor: Point::new(layout.center.x, layout.drawing_box.y1() / 2.0),
            class: "caption",
        });
        frame.footer = (!config.footer.is_empty()).then(|| PlacedText {
            text: config.footer.clone(),
            anchor: Point::new(
                layout.text_box.x1() + layout.text_box.width() / 2.0,
                layout.text_box.y1() + layout.text_box.height() / 2.0,
            ),
            class: "footer",
        });
        frame.arc_shadow_depth = config.use_arc_shadows.then_some(config.arc_shadow_depth);

        Ok(frame)
    }

    /// Hands every primitive of this frame to `factory`, inside one group.
    pub fn emit<F: PrimitiveFactory>(&self, factory: &mut F) -> F::Handle {
        let extra = &self.class_suffix;
        let root = factory.create(
            PrimitiveKind::Group,
            attrs! {"class" => format!("gauge{}", extra)},
            None,
        );

        if let Some(path) = &self.background_path {
            let child = factory.create(
                PrimitiveKind::Path,
                attrs! {"d" => path, "class" => format!("gauge background{}", extra)},
                None,
            );
            factory.append(&root, child);
        }

        for arc in &self.arcs {
            let mut attributes = attrs! {
                "r" => format!("{:.2}", arc.radius),
                "cx" => arc.rotation_origin_x,
                "cy" => arc.rotation_origin_y,
                "stroke-width" => arc.stroke_width,
                "stroke" => &arc.color,
                "fill" => "none",
                "class" => format!("gauge arc{}", extra),
                "transform" => arc.transform(),
                "stroke-dasharray" => arc.dash_array(),
                "stroke-dashoffset" => arc.dash_offset,
            };
            if arc.shadow {
                attributes.insert("filter".to_string(), "url(#shadow-arc)".to_string());
            }
            let child = factory.create(PrimitiveKind::Circle, attributes, None);
            factory.append(&root, child);
        }

        for text in &self.marker_texts {
            let kind = text.kind.as_str();
            for (class, transform) in [
                (format!("gauge marker text shadow {}{}", kind, extra), text.shadow_transform()),
                (format!("gauge marker text {}{}", kind, extra), text.transform()),
            ] {
                let child = factory.create(
                    PrimitiveKind::Text,
                    attrs! {
                        "x" => text.anchor.x,
                        "y" => text.anchor.y,
                        "text-anchor" => "middle",
                        "class" => class,
                        "transform" => transform,
                    },
                    Some(text.text.clone()),
                );
                factory.append(&root, child);
            }
        }

        for marker in &self.marker_lines {
            let child = factory.create(
                PrimitiveKind::Line,
                attrs! {
                    "x1" => marker.line.x1,
                    "y1" => marker.line.y1,
                    "x2" => marker.line.x2,
                    "y2" => marker.line.y2,
                    "stroke-width" => 1,
                    "stroke" => "black",
                    "fill" => "none",
                    "class" => format!("gauge marker {}{}", marker.class.as_str(), extra),
                    "transform" => marker.transform(),
                },
                None,
            );
            factory.append(&root, child);
        }

        if let Some(needle) = &self.needle {
            if let Some(shadow) = needle.pose.shadow_transform() {
                let child = factory.create(
                    PrimitiveKind::Polygon,
                    attrs! {
                        "points" => &needle.points,
                        "class" => format!("gauge needle shadow{}", extra),
                        "transform" => shadow,
                    },
                    None,
                );
                factory.append(&root, child);
            }
            let child = factory.create(
                PrimitiveKind::Polygon,
                attrs! {
                    "points" => &needle.points,
                    "class" => format!("gauge needle{}", extra),
                    "transform" => needle.pose.transform(),
                },
                None,
            );
            factory.append(&root, child);
        }

        if let Some(pin) = &self.pin {
            let child = factory.create(
                PrimitiveKind::Circle,
                attrs! {
                    "cx" => pin.center.x,
                    "cy" => pin.center.y,
                    "r" => pin.radius,
                    "class" => format!("gauge pin{}", extra),
                },
                None,
            );
            factory.append(&root, child);
        }

        let texts = self
            .range_labels
            .iter()
            .chain(&self.needle_text)
            .chain(&self.caption)
            .chain(&self.footer);
        for placed in texts {
            let child = factory.create(
                PrimitiveKind::Text,
                attrs! {
                    "x" => placed.anchor.x,
                    "y" => placed.anchor.y,
                    "text-anchor" => "middle",
                    "class" => format!("gauge label {}{}", placed.class, extra),
                },
                Some(placed.text.clone()),
            );
            factory.append(&root, child);
        }

        root
    }

    /// Filter definitions referenced by the arcs, if any
    pub fn svg_defs(&self) -> String {
        match self.arc_shadow_depth {
            Some(depth) => format!(
                r#"<filter id="shadow-arc"><feDropShadow dx="0" dy="{}" stdDeviation="1"/></filter>"#,
                depth
            ),
            None => String::new(),
        }
    }

    pub fn to_scene(&self) -> Scene {
        let mut scene = Scene::new();
        self.emit(&mut scene);
        scene
    }

    pub fn to_svg(&self) -> String {
        self.to_scene().to_svg(&self.view_box, &self.svg_defs())
    }
}
