//! # Greedy line breaker
//!
//! First-fit line breaking: a break is placed at a candidate as soon as the
//! current line's natural width would exceed the target. Ported from
//! `original_source/typesetting/layout/_greedy.py::greedy_line_breaks`.

use crate::item::{ParagraphItem, MAX_PENALTY};

/// Is `item` (at `idx`) a feasible break candidate, given whether the
/// previous item was a `Box`? Shared with [`crate::optimal::potential_breaks`]
/// — both breakers agree on what counts as a breakable position.
pub(crate) fn is_feasible_candidate(item: &ParagraphItem, prev_was_box: bool) -> bool {
    match item {
        ParagraphItem::Penalty { penalty, .. } => *penalty < MAX_PENALTY,
        ParagraphItem::Glue { .. } => prev_was_box,
        ParagraphItem::Box { .. } => false,
    }
}

/// Greedily break `items` to fit within `width`, returning break indices in
/// ascending order.
pub fn greedy_line_breaks(items: &[ParagraphItem], width: f64) -> Vec<usize> {
    let mut sum_widths = Vec::with_capacity(items.len() + 1);
    sum_widths.push(0.0);
    for item in items {
        let last = *sum_widths.last().unwrap();
        sum_widths.push(last + item.running_width());
    }

    let mut candidates: Vec<usize> = Vec::new();
    let mut prev_was_box = false;
    for (idx, item) in items.iter().enumerate() {
        if is_feasible_candidate(item, prev_was_box) {
            candidates.push(idx);
        }
        prev_was_box = matches!(item, ParagraphItem::Box { .. });
    }

    let mut breaks = Vec::new();
    let mut current_start_idx = 0usize;

    for (pos, &idx) in candidates.iter().enumerate() {
        let item = &items[idx];
        let is_forced = matches!(item, ParagraphItem::Penalty { penalty, .. } if *penalty <= -MAX_PENALTY);

        if is_forced {
            breaks.push(idx);
            current_start_idx = idx + 1;
            continue;
        }

        if let Some(&next_idx) = candidates.get(pos + 1) {
            let mut natural_width = sum_widths[next_idx] - sum_widths[current_start_idx];
            if let ParagraphItem::Penalty { width, .. } = &items[next_idx] {
                natural_width += width;
            }
            if natural_width > width {
                breaks.push(idx);
                current_start_idx = idx + 1;
            }
        }
        // If there's no next candidate, this one is the last chance before
        // the terminal forced break, which will always be emitted anyway.
    }

    breaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ParagraphItem;

    fn box_(w: f64) -> ParagraphItem {
        ParagraphItem::new_box(w, "x").unwrap()
    }
    fn glue(w: f64) -> ParagraphItem {
        ParagraphItem::new_glue(w, 0.5 * w, 0.3 * w, " ").unwrap()
    }
    fn forced() -> ParagraphItem {
        ParagraphItem::new_penalty(0.0, f64::NEG_INFINITY, true).unwrap()
    }
    fn inf_glue() -> ParagraphItem {
        ParagraphItem::new_glue(0.0, crate::item::MAX_STRETCH, 0.0, "").unwrap()
    }

    /// S1: "a b c" at width 10 -> only the terminal forced break.
    #[test]
    fn s1_trivial() {
        let items = vec![
            box_(1.0),
            glue(1.0),
            box_(1.0),
            glue(1.0),
            box_(1.0),
            inf_glue(),
            forced(),
        ];
        assert_eq!(greedy_line_breaks(&items, 10.0), vec![6]);
    }

    /// S2: "aa bb cc" at width 5 -> break after "bb" (idx 3), then terminal.
    #[test]
    fn s2_forced_wrap() {
        let items = vec![
            box_(2.0),
            glue(1.0),
            box_(2.0),
            glue(1.0),
            box_(2.0),
            inf_glue(),
            forced(),
        ];
        assert_eq!(greedy_line_breaks(&items, 5.0), vec![3, 6]);
    }

    #[test]
    fn breaks_are_ascending() {
        let items = vec![
            box_(2.0),
            glue(1.0),
            box_(2.0),
            glue(1.0),
            box_(2.0),
            glue(1.0),
            box_(2.0),
            inf_glue(),
            forced(),
        ];
        let breaks = greedy_line_breaks(&items, 3.0);
        assert!(breaks.windows(2).all(|w| w[0] < w[1]));
        assert!(breaks.iter().all(|&i| i < items.len()));
    }

    #[test]
    fn empty_items_yield_empty_breaks() {
        assert!(greedy_line_breaks(&[], 10.0).is_empty());
    }

    #[test]
    fn forced_break_always_present() {
        let items = vec![box_(100.0), inf_glue(), forced()];
        let breaks = greedy_line_breaks(&items, 1.0);
        assert!(breaks.contains(&2));
    }
}
