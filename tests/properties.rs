use proptest::prelude::*;
use vumeter::animation::{ease_in_out, ANIMATION_STEPS};
use vumeter::geometry::Rectangle;
use vumeter::layout::map_value_to_percentage;
use vumeter::{GaugeConfig, GaugeLayout, ManualTicks, NeedleState, TickOutcome, ValueChange};

proptest! {
    #[test]
    fn percentage_mapping_hits_both_ends(min in -1.0e6f64..1.0e6, delta in 1.0e-3f64..1.0e6) {
        let max = min + delta;
        prop_assert_eq!(map_value_to_percentage(min, max, min), 0.0);
        prop_assert_eq!(map_value_to_percentage(min, max, max), 1.0);
    }

    #[test]
    fn easing_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(ease_in_out(lo) <= ease_in_out(hi));
    }

    #[test]
    fn transitions_end_exactly(start in -1.0e4f64..1.0e4, end in -1.0e4f64..1.0e4) {
        let mut ticks = ManualTicks::new();
        let mut state = NeedleState::new();
        state.request(start, 500.0, &mut ticks).unwrap();
        if let ValueChange::Animating(handle) = state.request(end, 500.0, &mut ticks).unwrap() {
            let mut finished = 0;
            for _ in 0..ANIMATION_STEPS {
                if state.on_tick(handle, &mut ticks) == TickOutcome::Finished {
                    finished += 1;
                }
            }
            prop_assert_eq!(finished, 1);
        }
        prop_assert_eq!(state.value(), end);
    }

    #[test]
    fn layout_is_deterministic(
        width in 50.0f64..2000.0,
        height in 50.0f64..2000.0,
        span in 10.0f64..350.0,
    ) {
        let config = GaugeConfig::builder()
            .width(width)
            .height(height)
            .arc_span_degrees(span)
            .build();
        let first = GaugeLayout::compute(&config).unwrap();
        let second = GaugeLayout::compute(&config).unwrap();
        prop_assert!(first.radius > 0.0);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn rectangle_derived_fields_follow_corners(
        x1 in -500.0f64..500.0,
        y1 in -500.0f64..500.0,
        w in 1.0f64..500.0,
        h in 1.0f64..500.0,
        factor in 0.1f64..3.0,
    ) {
        let mut rect = Rectangle::new(x1, y1, x1 + w, y1 + h);
        rect.scale_width(factor).move_delta_vertical(h);
        prop_assert!((rect.width() - (rect.x2() - rect.x1())).abs() < 1e-9);
        prop_assert!((rect.height() - (rect.y2() - rect.y1())).abs() < 1e-9);
        prop_assert!((rect.width_over_height() - rect.width() / rect.height()).abs() < 1e-9);
    }
}
