//! Row/column extent calculation.
//!
//! Three passes: declared sizes to percentages summing to 100, percentages
//! to pixel extents with minimums enforced, then whole pixels.

use dockyard_config::{Size, SizeUnit};

/// Upper bound on proportional redistribution passes before the final
/// slack-based correction.
pub const MAX_MIN_SIZE_PASSES: usize = 8;

/// Percentage points shared among fractional children when the declared
/// percentages already reach 100.
const OVERFLOW_FRACTIONAL_POOL: f64 = 50.0;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildSize {
    pub size: Size,
    /// Pixel floor along the parent's axis.
    pub min_px: f64,
}

/// Turn declared sizes into percentages that sum to exactly 100.
///
/// Percentages are kept when they leave room; the remainder goes to
/// fractional children by weight. When percentages already use up 100,
/// fractional children share an extra 50 points and everything is
/// rescaled.
pub fn relative_percents(sizes: &[Size]) -> Vec<f64> {
    if sizes.is_empty() {
        return Vec::new();
    }
    let magnitude = |s: &Size| s.magnitude.max(0.0);
    let is_percent = |s: &Size| s.unit == SizeUnit::Percent;

    let percent_total: f64 = sizes.iter().filter(|s| is_percent(s)).map(magnitude).sum();
    let fractional_total: f64 = sizes.iter().filter(|s| !is_percent(s)).map(magnitude).sum();

    let mut percents: Vec<f64> = if fractional_total > EPSILON {
        let pool = if percent_total < 100.0 {
            100.0 - percent_total
        } else {
            OVERFLOW_FRACTIONAL_POOL
        };
        sizes
            .iter()
            .map(|s| {
                if is_percent(s) {
                    magnitude(s)
                } else {
                    pool * magnitude(s) / fractional_total
                }
            })
            .collect()
    } else {
        sizes
            .iter()
            .map(|s| if is_percent(s) { magnitude(s) } else { 0.0 })
            .collect()
    };

    let total: f64 = percents.iter().sum();
    if total <= EPSILON {
        let share = 100.0 / sizes.len() as f64;
        return vec![share; sizes.len()];
    }
    if (total - 100.0).abs() > EPSILON {
        let scale = 100.0 / total;
        percents.iter_mut().for_each(|p| *p *= scale);
    }
    percents
}

/// Raise every extent to its minimum, taking the difference from the
/// others.
///
/// When the minimums alone exceed `available`, extents become proportional
/// to the minimums. Otherwise the deficit is taken from unclamped siblings
/// in proportion to their extent, for at most [`MAX_MIN_SIZE_PASSES`]
/// passes; whatever remains is then taken from the siblings' slack above
/// their own minimum, which always balances exactly.
pub fn enforce_minimums(extents: &mut [f64], mins: &[f64], available: f64) {
    debug_assert_eq!(extents.len(), mins.len());
    let min_total: f64 = mins.iter().sum();
    if min_total <= EPSILON {
        return;
    }
    if min_total >= available {
        for (extent, min) in extents.iter_mut().zip(mins) {
            *extent = available * min / min_total;
        }
        return;
    }

    let mut clamped = vec![false; extents.len()];
    for _ in 0..MAX_MIN_SIZE_PASSES {
        let mut deficit = 0.0;
        for i in 0..extents.len() {
            if extents[i] < mins[i] - EPSILON {
                deficit += mins[i] - extents[i];
                extents[i] = mins[i];
                clamped[i] = true;
            }
        }
        if deficit <= EPSILON {
            return;
        }
        let donor_total: f64 = (0..extents.len())
            .filter(|&i| !clamped[i])
            .map(|i| extents[i])
            .sum();
        if donor_total <= EPSILON {
            break;
        }
        for i in (0..extents.len()).filter(|&i| !clamped[i]) {
            extents[i] -= deficit * extents[i] / donor_total;
        }
    }

    // Final clamp.
    for (extent, min) in extents.iter_mut().zip(mins) {
        if *extent < *min {
            *extent = *min;
        }
    }
    let excess: f64 = extents.iter().sum::<f64>() - available;
    if excess > EPSILON {
        let slack_total: f64 = extents.iter().zip(mins).map(|(e, m)| e - m).sum();
        if slack_total > EPSILON {
            for (extent, min) in extents.iter_mut().zip(mins) {
                *extent -= excess * (*extent - min) / slack_total;
            }
        }
    }
}

/// Round extents to whole pixels so the result sums to `available`
/// rounded down. Extents sitting at their minimum round up, the rest round
/// down, ignoring float noise just below a whole pixel; leftover pixels go to the first children and any overshoot is
/// taken back from the last children that can spare it.
pub fn whole_pixels(extents: &[f64], mins: &[f64], available: f64) -> Vec<f64> {
    if extents.is_empty() {
        return Vec::new();
    }
    let at_min = |i: usize| {
        let min = mins.get(i).copied().unwrap_or(0.0);
        min > EPSILON && (extents[i] - min).abs() <= 1e-6
    };
    let mut pixels: Vec<f64> = extents
        .iter()
        .enumerate()
        .map(|(i, e)| if at_min(i) { e.ceil() } else { (e.max(0.0) + 1e-6).floor() })
        .collect();
    let target = available.max(0.0).floor();
    let mut leftover = (target - pixels.iter().sum::<f64>()).round() as i64;

    let mut i = 0usize;
    let len = pixels.len();
    while leftover > 0 {
        pixels[i % len] += 1.0;
        leftover -= 1;
        i += 1;
    }
    while leftover < 0 {
        let floor = |i: usize| mins.get(i).copied().unwrap_or(0.0).ceil();
        let Some(donor) = (0..pixels.len()).rev().find(|&i| pixels[i] - 1.0 >= floor(i)) else {
            break;
        };
        pixels[donor] -= 1.0;
        leftover += 1;
    }
    pixels
}

/// Full calculation for one row or column. `available` must already have
/// the splitters subtracted. Returns `(percents, pixel extents)`.
pub fn compute_extents(children: &[ChildSize], available: f64) -> (Vec<f64>, Vec<f64>) {
    let sizes: Vec<Size> = children.iter().map(|c| c.size).collect();
    let percents = relative_percents(&sizes);
    let available = available.max(0.0);
    let mut extents: Vec<f64> = percents.iter().map(|p| p * available / 100.0).collect();
    let mins: Vec<f64> = children.iter().map(|c| c.min_px.max(0.0)).collect();
    enforce_minimums(&mut extents, &mins, available);
    (percents, whole_pixels(&extents, &mins, available))
}
