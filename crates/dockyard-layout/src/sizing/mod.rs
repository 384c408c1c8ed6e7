//! Geometry for rows and columns: extent calculation and splitters.

mod calculation;
pub mod splitter;

pub use calculation::*;
pub use splitter::{rescale_neighbours, Splitter, SplitterDrag};

#[cfg(test)]
mod tests {
    use super::*;
    use dockyard_common::Rect;
    use dockyard_config::Size;
    use slotmap::KeyData;

    use crate::item::ItemId;

    fn child(size: Size, min_px: f64) -> ChildSize {
        ChildSize { size, min_px }
    }

    fn approx(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-6, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn remainder_goes_to_fractional_children() {
        let percents = relative_percents(&[Size::fractional(1.0), Size::percent(30.0)]);
        approx(&percents, &[70.0, 30.0]);
    }

    #[test]
    fn fractions_share_by_weight() {
        let percents = relative_percents(&[
            Size::percent(40.0),
            Size::fractional(1.0),
            Size::fractional(2.0),
        ]);
        approx(&percents, &[40.0, 20.0, 40.0]);
    }

    #[test]
    fn full_percentages_give_fractions_fifty_points() {
        let percents = relative_percents(&[
            Size::percent(60.0),
            Size::percent(40.0),
            Size::fractional(1.0),
        ]);
        approx(&percents, &[40.0, 80.0 / 3.0, 100.0 / 3.0]);
    }

    #[test]
    fn percentages_alone_are_rescaled() {
        approx(
            &relative_percents(&[Size::percent(20.0), Size::percent(20.0)]),
            &[50.0, 50.0],
        );
        approx(
            &relative_percents(&[Size::percent(150.0), Size::percent(50.0)]),
            &[75.0, 25.0],
        );
    }

    #[test]
    fn all_zero_sizes_split_evenly() {
        approx(
            &relative_percents(&[Size::percent(0.0), Size::fractional(0.0)]),
            &[50.0, 50.0],
        );
    }

    #[test]
    fn minimum_is_respected_and_total_kept() {
        let (_, px) = compute_extents(
            &[
                child(Size::percent(90.0), 0.0),
                child(Size::percent(10.0), 300.0),
            ],
            1000.0,
        );
        assert_eq!(px, vec![700.0, 300.0]);
    }

    #[test]
    fn cascading_minimums_still_sum_to_available() {
        let mut extents = vec![10.0, 45.0, 45.0];
        let mins = vec![40.0, 40.0, 0.0];
        enforce_minimums(&mut extents, &mins, 100.0);
        assert!((extents.iter().sum::<f64>() - 100.0).abs() < 1e-6);
        assert!(extents[0] >= 40.0 - 1e-9);
        assert!(extents[1] >= 40.0 - 1e-9);
    }

    #[test]
    fn overconstrained_minimums_are_proportional() {
        let (_, px) = compute_extents(
            &[child(Size::percent(50.0), 300.0), child(Size::percent(50.0), 100.0)],
            200.0,
        );
        assert_eq!(px, vec![150.0, 50.0]);
    }

    #[test]
    fn leftover_pixels_go_to_first_children() {
        let (_, px) = compute_extents(
            &[
                child(Size::fractional(1.0), 0.0),
                child(Size::fractional(1.0), 0.0),
                child(Size::fractional(1.0), 0.0),
            ],
            100.0,
        );
        assert_eq!(px, vec![34.0, 33.0, 33.0]);
    }

    #[test]
    fn fractional_minimum_rounds_up() {
        let (_, px) = compute_extents(
            &[
                child(Size::fractional(1.0), 0.0),
                child(Size::percent(1.0), 150.5),
            ],
            400.0,
        );
        assert_eq!(px, vec![249.0, 151.0]);
    }

    #[test]
    fn splitter_grab_zone_is_centred() {
        let splitter = Splitter::new(0, false, Rect::new(100.0, 0.0, 4.0, 50.0), 10.0);
        assert_eq!(splitter.grab_rect, Rect::new(97.0, 0.0, 10.0, 50.0));
        assert!(splitter.hit_test(98.0, 10.0));
        assert!(!splitter.hit_test(108.0, 10.0));
    }

    #[test]
    fn splitter_drag_clamps_to_minimums() {
        let splitter = Splitter::new(0, false, Rect::new(100.0, 0.0, 5.0, 50.0), 5.0);
        let owner = ItemId::from(KeyData::from_ffi(1));
        let mut drag = SplitterDrag::new(owner, &splitter, 102.0, (100.0, 40.0), (200.0, 50.0));
        assert_eq!(drag.update(0.0), -60.0);
        assert_eq!(drag.update(500.0), 150.0);
        assert_eq!(drag.update(112.0), 10.0);
    }

    #[test]
    fn rescale_keeps_combined_percentage() {
        let (a, b) = rescale_neighbours(50.0, 30.0, 500.0, 300.0, 100.0);
        assert!((a - 60.0).abs() < 1e-9);
        assert!((b - 20.0).abs() < 1e-9);
    }
}
