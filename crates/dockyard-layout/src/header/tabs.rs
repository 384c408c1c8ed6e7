//! Tab strip sizing and overflow.
//!
//! Tabs are laid out along the header axis in visual order. When they do
//! not fit, the strip escalates through tight mode (narrower controls),
//! overlap (negative spacing up to the configured allowance), shrinking to
//! a proportional share, and finally an overflow dropdown. The dropdown
//! pass overlaps tabs again, with half the allowance, before it hides any.

/// Text measurement and control sizes, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabMetrics {
    /// Average advance of one title character.
    pub char_width: f64,
    /// Space around the title, including the close button.
    pub tab_padding: f64,
    /// Shrunk tabs never go below this.
    pub min_tab_width: f64,
    /// Header control button length in normal mode.
    pub button_width: f64,
    /// Header control button length in tight mode.
    pub tight_button_width: f64,
    /// Trailing part of a closable tab that acts as its close button.
    pub close_width: f64,
}

impl Default for TabMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            tab_padding: 24.0,
            min_tab_width: 40.0,
            button_width: 20.0,
            tight_button_width: 14.0,
            close_width: 12.0,
        }
    }
}

impl TabMetrics {
    pub fn natural_width(&self, title: &str) -> f64 {
        title.chars().count() as f64 * self.char_width + self.tab_padding
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StripMode {
    /// Everything fits with normal controls.
    #[default]
    Normal,
    /// Fits once controls shrink.
    Tight,
    /// Fits with tabs overlapping each other.
    Overlap,
    /// Fits with tabs shrunk to their share.
    Shrunk,
    /// Some tabs moved to the overflow dropdown.
    Dropdown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabPlacement {
    /// Distance from the start of the header along its axis.
    pub offset: f64,
    pub length: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabStripInput<'a> {
    /// Natural tab lengths in visual order.
    pub widths: &'a [f64],
    /// Visual index of the active tab.
    pub active: Option<usize>,
    /// Header length along its axis.
    pub length: f64,
    /// Number of header buttons, not counting the dropdown toggle.
    pub buttons: usize,
    pub control_offset: f64,
    pub overlap_allowance: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabStrip {
    pub mode: StripMode,
    /// Negative spacing between neighbouring tabs.
    pub overlap: f64,
    /// One entry per tab in visual order; `None` for tabs in the dropdown.
    pub placements: Vec<Option<TabPlacement>>,
    /// Visual indices listed in the dropdown. Includes the active tab
    /// whenever the dropdown is in use.
    pub dropdown: Vec<usize>,
}

impl TabStrip {
    pub fn is_tight(&self) -> bool {
        self.mode != StripMode::Normal
    }

    pub fn has_dropdown(&self) -> bool {
        self.mode == StripMode::Dropdown
    }
}

/// Share of the overlap allowance still usable once the dropdown is shown.
pub const DROPDOWN_OVERLAP_FACTOR: f64 = 0.5;

fn controls_length(metrics: &TabMetrics, buttons: usize, tight: bool, dropdown: bool) -> f64 {
    let per = if tight {
        metrics.tight_button_width
    } else {
        metrics.button_width
    };
    let toggle = if dropdown { metrics.tight_button_width } else { 0.0 };
    buttons as f64 * per + toggle
}

fn sequential(widths: &[f64], step_back: f64) -> Vec<Option<TabPlacement>> {
    let mut offset = 0.0;
    widths
        .iter()
        .map(|&length| {
            let placement = TabPlacement { offset, length };
            offset += length - step_back;
            Some(placement)
        })
        .collect()
}

pub fn layout_tab_strip(input: TabStripInput<'_>, metrics: &TabMetrics) -> TabStrip {
    let n = input.widths.len();
    if n == 0 {
        return TabStrip::default();
    }
    let available = |tight: bool, dropdown: bool| {
        (input.length - input.control_offset - controls_length(metrics, input.buttons, tight, dropdown))
            .max(0.0)
    };
    let total: f64 = input.widths.iter().sum();

    if total <= available(false, false) {
        return TabStrip {
            mode: StripMode::Normal,
            placements: sequential(input.widths, 0.0),
            ..Default::default()
        };
    }

    let tight_available = available(true, false);
    if total <= tight_available {
        return TabStrip {
            mode: StripMode::Tight,
            placements: sequential(input.widths, 0.0),
            ..Default::default()
        };
    }

    if n > 1 {
        let needed = (total - tight_available) / (n - 1) as f64;
        if needed <= input.overlap_allowance {
            return TabStrip {
                mode: StripMode::Overlap,
                overlap: needed,
                placements: sequential(input.widths, needed),
                ..Default::default()
            };
        }
    }

    let shrunk = shrink(input, metrics, tight_available);
    if shrunk.iter().sum::<f64>() <= tight_available {
        return TabStrip {
            mode: StripMode::Shrunk,
            placements: sequential(&shrunk, 0.0),
            ..Default::default()
        };
    }

    let dropdown_available = available(true, true);
    let widths = shrink(input, metrics, dropdown_available);
    let allowance = input.overlap_allowance * DROPDOWN_OVERLAP_FACTOR;
    overflow(input.active, &widths, dropdown_available, allowance)
}

/// Cap every tab at its share of `available`; the active tab gets two
/// shares so its label stays legible.
fn shrink(input: TabStripInput<'_>, metrics: &TabMetrics, available: f64) -> Vec<f64> {
    let share = available / (input.widths.len() + 1) as f64;
    input
        .widths
        .iter()
        .enumerate()
        .map(|(i, &natural)| {
            let shares = if Some(i) == input.active { 2.0 } else { 1.0 };
            let cap = (share * shares).max(metrics.min_tab_width);
            natural.min(cap)
        })
        .collect()
}

fn overflow(active: Option<usize>, widths: &[f64], available: f64, allowance: f64) -> TabStrip {
    let active_length = active.map_or(0.0, |i| widths[i].min(available));
    let mut used = active_length;
    let mut shown = usize::from(active.is_some());
    let mut visible = vec![false; widths.len()];
    if let Some(i) = active {
        visible[i] = true;
    }
    for (i, &width) in widths.iter().enumerate() {
        if Some(i) == active {
            continue;
        }
        let cost = if shown > 0 { width - allowance } else { width };
        if used + cost > available {
            break;
        }
        used += cost;
        shown += 1;
        visible[i] = true;
    }

    let length_of = |i: usize| if Some(i) == active { active_length } else { widths[i] };
    let natural: f64 = (0..widths.len()).filter(|&i| visible[i]).map(length_of).sum();
    let overlap = if shown > 1 {
        ((natural - available) / (shown - 1) as f64).clamp(0.0, allowance.max(0.0))
    } else {
        0.0
    };

    let mut offset = 0.0;
    let mut placements = Vec::with_capacity(widths.len());
    let mut dropdown = Vec::new();
    for i in 0..widths.len() {
        if visible[i] {
            let length = length_of(i);
            placements.push(Some(TabPlacement { offset, length }));
            offset += length - overlap;
            if Some(i) == active {
                dropdown.push(i);
            }
        } else {
            placements.push(None);
            dropdown.push(i);
        }
    }
    TabStrip {
        mode: StripMode::Dropdown,
        overlap,
        placements,
        dropdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> TabMetrics {
        TabMetrics {
            char_width: 10.0,
            tab_padding: 0.0,
            min_tab_width: 30.0,
            button_width: 20.0,
            tight_button_width: 10.0,
            close_width: 5.0,
        }
    }

    fn input(widths: &[f64], length: f64) -> TabStripInput<'_> {
        TabStripInput {
            widths,
            active: Some(0),
            length,
            buttons: 2,
            control_offset: 0.0,
            overlap_allowance: 0.0,
        }
    }

    #[test]
    fn natural_width_counts_characters() {
        let m = TabMetrics::default();
        assert_eq!(m.natural_width("abc"), 3.0 * m.char_width + m.tab_padding);
    }

    #[test]
    fn fitting_tabs_are_sequential() {
        let strip = layout_tab_strip(input(&[50.0, 50.0], 200.0), &metrics());
        assert_eq!(strip.mode, StripMode::Normal);
        assert_eq!(
            strip.placements,
            vec![
                Some(TabPlacement { offset: 0.0, length: 50.0 }),
                Some(TabPlacement { offset: 50.0, length: 50.0 }),
            ]
        );
        assert!(strip.dropdown.is_empty());
    }

    #[test]
    fn tight_mode_frees_control_space() {
        // Normal controls take 40, tight controls 20.
        let strip = layout_tab_strip(input(&[60.0, 60.0], 150.0), &metrics());
        assert_eq!(strip.mode, StripMode::Tight);
        assert!(strip.is_tight());
    }

    #[test]
    fn overlap_within_allowance() {
        let mut i = input(&[60.0, 60.0, 60.0], 180.0);
        i.overlap_allowance = 15.0;
        let strip = layout_tab_strip(i, &metrics());
        assert_eq!(strip.mode, StripMode::Overlap);
        assert_eq!(strip.overlap, 10.0);
        assert_eq!(strip.placements[2], Some(TabPlacement { offset: 100.0, length: 60.0 }));
    }

    #[test]
    fn shrinking_before_dropdown() {
        let strip = layout_tab_strip(input(&[100.0, 100.0, 100.0], 180.0), &metrics());
        // 160 available, share 40, active gets 80.
        assert_eq!(strip.mode, StripMode::Shrunk);
        let lengths: Vec<f64> = strip.placements.iter().map(|p| p.unwrap().length).collect();
        assert_eq!(lengths, vec![80.0, 40.0, 40.0]);
    }

    #[test]
    fn minimum_width_forces_dropdown() {
        let widths = [100.0; 6];
        let mut i = input(&widths, 140.0);
        i.active = Some(4);
        let strip = layout_tab_strip(i, &metrics());
        assert_eq!(strip.mode, StripMode::Dropdown);
        // 110 available with the toggle; active takes ~31, two others fit.
        assert!(strip.placements[4].is_some());
        assert!(strip.placements[0].is_some());
        assert!(strip.placements[1].is_some());
        assert!(strip.placements[2].is_none());
        assert_eq!(strip.dropdown, vec![2, 3, 4, 5]);
    }

    #[test]
    fn dropdown_overlaps_before_hiding_tabs() {
        let widths = [100.0; 6];
        let mut i = input(&widths, 140.0);
        i.active = Some(4);
        i.overlap_allowance = 10.0;
        let strip = layout_tab_strip(i, &metrics());
        assert_eq!(strip.mode, StripMode::Dropdown);
        // Five pixels of overlap per tab make room for a third inactive tab.
        assert!(strip.placements[2].is_some());
        assert!(strip.placements[3].is_none());
        assert_eq!(strip.dropdown, vec![3, 4, 5]);
        assert!(strip.overlap > 0.0 && strip.overlap <= 5.0, "overlap {}", strip.overlap);
        let last = strip.placements[4].unwrap();
        assert!(last.offset + last.length <= 110.0 + 1e-9);
    }

    #[test]
    fn empty_strip() {
        let strip = layout_tab_strip(input(&[], 100.0), &metrics());
        assert!(strip.placements.is_empty());
        assert_eq!(strip.mode, StripMode::Normal);
    }
}
