//! # Optimal (Knuth-Plass) line breaker
//!
//! Dynamic-programming search over candidate breakpoints minimizing total
//! demerits, with fitness classes, forced breaks, and a guaranteed
//! "break of last resort". Ported from
//! `original_source/typesetting/layout/_optimal.py::optimal_line_breaks`,
//! which is the literal original implementation spec.md's §4.4 distills
//! and the authority for its two open questions (demerit sign, see
//! [`demerit`]; last-resort override, see [`find_breaks`]).
//!
//! The active set is an arena (`Vec<Node>`) addressed by index rather than
//! the original's `SortedDict<NodeKey, NodeData>` — spec.md §9 design note
//! (b) prefers this for cache locality and simpler lifetimes, and it's the
//! representation `danmolitor-forme`'s own `knuth_plass.rs` independently
//! converged on (though that implementation omits the last-resort rule;
//! this one restores it, matching the original).

use serde::{Deserialize, Serialize};

use crate::greedy::is_feasible_candidate;
use crate::item::{BreakPoint, ParagraphItem, RunningSum, MAX_PENALTY};

/// Tuning knobs for the demerit computation (spec.md §4.4.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimiserParams {
    /// Maximum adjustment ratio for a break to still be considered feasible.
    pub upper_adjustment_ratio: f64,
    /// Extra demerits when two consecutive breaks are both flagged.
    pub extra_flag_penalty: f64,
    /// Fixed demerits added to every line.
    pub line_penalty: f64,
    /// Demerits per unit of mismatched fitness class between adjacent lines.
    pub mismatched_fitness_penalty: f64,
}

impl Default for OptimiserParams {
    fn default() -> Self {
        OptimiserParams {
            upper_adjustment_ratio: 4.0,
            extra_flag_penalty: 50.0,
            line_penalty: 10.0,
            mismatched_fitness_penalty: 10.0,
        }
    }
}

/// Discretization of a line's adjustment ratio (spec.md §4.4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitnessClass {
    Tight = 0,
    Normal = 1,
    Loose = 2,
    VeryLoose = 3,
}

impl FitnessClass {
    fn from_ratio(ratio: f64) -> Self {
        if ratio < -0.5 {
            FitnessClass::Tight
        } else if ratio < 0.5 {
            FitnessClass::Normal
        } else if ratio < 1.0 {
            FitnessClass::Loose
        } else {
            FitnessClass::VeryLoose
        }
    }
}

/// One node in the search DAG: a candidate break, reached via the best path
/// found so far. Indexed by position in the arena; `previous` is an arena
/// index rather than a pointer (spec.md §9 design note (b)).
struct Node {
    /// `None` for the virtual start-of-paragraph node.
    break_point: Option<BreakPoint>,
    line_idx: i64,
    fitness: FitnessClass,
    total_demerits: f64,
    previous: Option<usize>,
}

impl Node {
    fn running_sum(&self) -> RunningSum {
        self.break_point
            .as_ref()
            .map(|bp| bp.running_sum)
            .unwrap_or_default()
    }
}

/// Adjustment ratio for the line from `prev_sum` to `bp` at target `width`
/// (spec.md §4.4.1).
fn adjustment_ratio(prev_sum: RunningSum, bp: &BreakPoint, width: f64) -> f64 {
    let mut natural = bp.running_sum.width - prev_sum.width;
    if let ParagraphItem::Penalty { width: pw, .. } = &bp.item {
        natural += pw;
    }

    if natural < width {
        let stretch = bp.running_sum.stretch - prev_sum.stretch;
        if stretch > 0.0 {
            (width - natural) / stretch
        } else {
            f64::INFINITY
        }
    } else if natural > width {
        let shrink = bp.running_sum.shrink - prev_sum.shrink;
        if shrink > 0.0 {
            (width - natural) / shrink
        } else {
            f64::INFINITY
        }
    } else {
        0.0
    }
}

/// Demerit for breaking at `bp` with adjustment ratio `ratio`, coming from a
/// line with fitness `prev_fitness` that ended at a (possibly virtual)
/// previous break `prev_break`. Implements spec.md §4.4.3, whose sign
/// convention for non-forced negative penalties (`... - p^2`, not `... +
/// p^2`) is confirmed by the original's `line_demerit`.
fn demerit(
    params: &OptimiserParams,
    prev_break: Option<&ParagraphItem>,
    bp: &BreakPoint,
    ratio: f64,
    prev_fitness: FitnessClass,
    fitness: FitnessClass,
) -> f64 {
    let mut penalty = match &bp.item {
        ParagraphItem::Penalty { penalty, .. } => *penalty,
        _ => 0.0,
    };
    let is_forced = penalty <= -MAX_PENALTY;

    let flagged = matches!(&bp.item, ParagraphItem::Penalty { flagged: true, .. });
    if let Some(ParagraphItem::Penalty { flagged: true, .. }) = prev_break {
        if flagged {
            penalty += params.extra_flag_penalty;
        }
    }

    penalty += params.mismatched_fitness_penalty * (fitness as i32 - prev_fitness as i32).abs() as f64;
    penalty += params.line_penalty;

    let badness = 100.0 * ratio.abs().powi(3);
    if is_forced {
        (1.0 + badness).powi(2)
    } else if penalty >= 0.0 {
        (1.0 + badness + penalty).powi(2)
    } else {
        (1.0 + badness).powi(2) - penalty.powi(2)
    }
}

/// Iterate candidate breakpoints in `items`, carrying running totals
/// forward (spec.md §4.4.5).
pub(crate) fn potential_breaks(items: &[ParagraphItem]) -> Vec<BreakPoint> {
    let mut out = Vec::new();
    let mut running = RunningSum::default();
    let mut prev_was_box = false;

    for (idx, item) in items.iter().enumerate() {
        if is_feasible_candidate(item, prev_was_box) {
            out.push(BreakPoint {
                item_idx: idx,
                item: item.clone(),
                running_sum: running,
            });
        }
        running = running.advance(item);
        prev_was_box = matches!(item, ParagraphItem::Box { .. });
    }

    out
}

/// Find the Knuth-Plass optimal break indices for `items` at target `width`.
///
/// Always returns at least the terminal forced break — the "break of last
/// resort" rule (spec.md §4.4.4 step 3) guarantees the active set is never
/// empty when candidates remain, so this never needs to signal failure.
/// Panics only if that invariant is violated, which would indicate a bug in
/// this function, not bad input (spec.md §7).
pub fn optimal_line_breaks(items: &[ParagraphItem], width: f64, params: &OptimiserParams) -> Vec<usize> {
    optimal_line_breaks_with_demerits(items, width, params).0
}

/// Same search as [`optimal_line_breaks`], also returning the winning path's
/// total demerits — the quantity the search actually minimizes, but which
/// the public API has no other way to recover. Exposed `pub(crate)` so the
/// test suite can exercise spec.md §8 invariant 5 (optimal's total demerits
/// never exceed a recomputed demerit sum over another breaker's breaks)
/// without making the search's internal cost a public commitment.
pub(crate) fn optimal_line_breaks_with_demerits(
    items: &[ParagraphItem],
    width: f64,
    params: &OptimiserParams,
) -> (Vec<usize>, f64) {
    if items.is_empty() {
        return (Vec::new(), 0.0);
    }

    let mut arena: Vec<Node> = vec![Node {
        break_point: None,
        line_idx: -1,
        fitness: FitnessClass::Normal,
        total_demerits: 0.0,
        previous: None,
    }];
    let mut active: Vec<usize> = vec![0];

    for bp in potential_breaks(items) {
        let is_forced = bp.item.is_forced_break();
        let mut to_deactivate: Vec<usize> = Vec::new();
        // Best proposal per fitness class for this candidate (keyed upsert
        // scoped to this round — see module docs on the arena design).
        let mut best_by_fitness: [Option<(f64, usize)>; 4] = [None; 4];

        for &node_idx in &active {
            let node = &arena[node_idx];
            let prev_sum = node.running_sum();
            let mut ratio = adjustment_ratio(prev_sum, &bp, width);
            let fitness = FitnessClass::from_ratio(ratio);

            let would_deactivate = ratio < -1.0 || is_forced;
            if would_deactivate {
                to_deactivate.push(node_idx);
                // Break of last resort: if deactivating this node would
                // empty the whole active set, keep this break feasible
                // anyway so the search always terminates with a solution.
                if to_deactivate.len() == active.len() {
                    ratio = -1.0;
                }
            }

            let d = demerit(
                params,
                node.break_point.as_ref().map(|bp| &bp.item),
                &bp,
                ratio,
                node.fitness,
                fitness,
            );
            let total = node.total_demerits + d;

            if ratio >= -1.0 && ratio < params.upper_adjustment_ratio {
                let slot = fitness as usize;
                if best_by_fitness[slot].map_or(true, |(best, _)| total < best) {
                    best_by_fitness[slot] = Some((total, node_idx));
                }
            }
        }

        active.retain(|idx| !to_deactivate.contains(idx));

        for (slot, best) in best_by_fitness.into_iter().enumerate() {
            if let Some((total_demerits, prev_idx)) = best {
                let fitness = match slot {
                    0 => FitnessClass::Tight,
                    1 => FitnessClass::Normal,
                    2 => FitnessClass::Loose,
                    _ => FitnessClass::VeryLoose,
                };
                let new_idx = arena.len();
                arena.push(Node {
                    line_idx: arena[prev_idx].line_idx + 1,
                    fitness,
                    total_demerits,
                    previous: Some(prev_idx),
                    break_point: Some(bp.clone()),
                });
                active.push(new_idx);
            }
        }

        assert!(
            !active.is_empty(),
            "break of last resort invariant violated: active set emptied"
        );
    }

    let best_idx = active
        .iter()
        .copied()
        .min_by(|&a, &b| {
            arena[a]
                .total_demerits
                .partial_cmp(&arena[b].total_demerits)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("active set is never empty once candidates exist");

    let total_demerits = arena[best_idx].total_demerits;

    let mut breaks = Vec::new();
    let mut current = Some(best_idx);
    while let Some(idx) = current {
        let node = &arena[idx];
        if let Some(bp) = &node.break_point {
            breaks.push(bp.item_idx);
        }
        current = node.previous;
    }
    breaks.reverse();
    (breaks, total_demerits)
}

/// Recompute the total demerits of walking `breaks` (an ascending sequence
/// of item indices, such as what [`crate::greedy::greedy_line_breaks`]
/// returns) in order, using the same adjustment-ratio and demerit formulas
/// the search uses — without running the search itself. Every entry in
/// `breaks` must be a feasible candidate per [`is_feasible_candidate`] (true
/// for both breakers' outputs); panics otherwise, since that would mean the
/// break sequence isn't one either breaker could actually have produced.
///
/// Used by the test suite to compare an externally-chosen break sequence's
/// cost against the search's own minimum (spec.md §8 invariant 5).
pub(crate) fn demerits_for_breaks(
    items: &[ParagraphItem],
    breaks: &[usize],
    width: f64,
    params: &OptimiserParams,
) -> f64 {
    let candidates = potential_breaks(items);
    let mut prev_sum = RunningSum::default();
    let mut prev_fitness = FitnessClass::Normal;
    let mut prev_item: Option<ParagraphItem> = None;
    let mut total = 0.0;

    for &idx in breaks {
        let bp = candidates
            .iter()
            .find(|c| c.item_idx == idx)
            .expect("break index must be a feasible candidate")
            .clone();

        let ratio = adjustment_ratio(prev_sum, &bp, width);
        let fitness = FitnessClass::from_ratio(ratio);
        total += demerit(params, prev_item.as_ref(), &bp, ratio, prev_fitness, fitness);

        prev_sum = bp.running_sum;
        prev_fitness = fitness;
        prev_item = Some(bp.item.clone());
    }

    total
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

    #[test]
    fn s1_trivial_single_line() {
        let items = vec![
            box_(1.0),
            glue(1.0),
            box_(1.0),
            glue(1.0),
            box_(1.0),
            inf_glue(),
            forced(),
        ];
        let breaks = optimal_line_breaks(&items, 10.0, &OptimiserParams::default());
        assert_eq!(breaks, vec![6]);
    }

    #[test]
    fn breaks_are_ascending_and_in_range() {
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
        let breaks = optimal_line_breaks(&items, 5.0, &OptimiserParams::default());
        assert!(breaks.windows(2).all(|w| w[0] < w[1]));
        assert!(breaks.iter().all(|&i| i < items.len()));
        assert!(breaks.last() == Some(&8));
    }

    #[test]
    fn empty_items_yield_empty_breaks() {
        assert_eq!(
            optimal_line_breaks(&[], 10.0, &OptimiserParams::default()),
            Vec::<usize>::new()
        );
    }

    #[test]
    fn last_resort_guarantee_single_overwide_box() {
        // One box far wider than the target, then the terminal glue+penalty.
        // No feasible break exists before the forced one; the search must
        // still produce exactly that one break rather than panicking.
        let items = vec![box_(1000.0), inf_glue(), forced()];
        let breaks = optimal_line_breaks(&items, 10.0, &OptimiserParams::default());
        assert_eq!(breaks, vec![2]);
    }

    #[test]
    fn determinism() {
        let items = vec![
            box_(2.0),
            glue(1.0),
            box_(2.0),
            glue(1.0),
            box_(2.0),
            inf_glue(),
            forced(),
        ];
        let a = optimal_line_breaks(&items, 4.0, &OptimiserParams::default());
        let b = optimal_line_breaks(&items, 4.0, &OptimiserParams::default());
        assert_eq!(a, b);
    }

    #[test]
    fn forced_break_always_present() {
        let items = vec![box_(100.0), inf_glue(), forced()];
        let breaks = optimal_line_breaks(&items, 1.0, &OptimiserParams::default());
        assert!(breaks.contains(&2));
    }

    /// S4: a path with two adjacent flagged (hyphen) breaks incurs
    /// `extra_flag_penalty` once; recomputing that same path's demerits with
    /// the penalty zeroed out must strictly lower the total.
    #[test]
    fn extra_flag_penalty_strictly_raises_demerits_for_double_hyphen() {
        let items = vec![
            box_(3.0),
            ParagraphItem::new_penalty(1.0, 50.0, true).unwrap(),
            box_(3.0),
            ParagraphItem::new_penalty(1.0, 50.0, true).unwrap(),
            box_(3.0),
            inf_glue(),
            forced(),
        ];
        let with_flag = OptimiserParams::default();
        let without_flag = OptimiserParams {
            extra_flag_penalty: 0.0,
            ..with_flag
        };
        let (breaks, _) = optimal_line_breaks_with_demerits(&items, 4.0, &with_flag);
        // Both flagged penalties (indices 1 and 3) must be on the winning
        // path for extra_flag_penalty to apply at all.
        assert!(breaks.contains(&1) && breaks.contains(&3));

        let demerits_with = demerits_for_breaks(&items, &breaks, 4.0, &with_flag);
        let demerits_without = demerits_for_breaks(&items, &breaks, 4.0, &without_flag);
        assert!(demerits_without < demerits_with);
    }

    /// S5: a path whose two lines fall into different fitness classes
    /// incurs `mismatched_fitness_penalty` at each crossing; recomputing
    /// that same path's demerits with the penalty zeroed out must strictly
    /// lower the total. Line 1 (break at idx 3) shrinks hard enough to land
    /// TIGHT; line 2 (break at idx 7) lands NORMAL.
    #[test]
    fn mismatched_fitness_penalty_strictly_raises_demerits_across_a_fitness_crossing() {
        let items = vec![
            box_(2.0),
            ParagraphItem::new_glue(1.0, 0.0, 1.0, " ").unwrap(),
            box_(1.0),
            ParagraphItem::new_penalty(0.0, 0.0, false).unwrap(),
            box_(3.0),
            ParagraphItem::new_glue(1.0, 5.0, 10.0, " ").unwrap(),
            box_(1.0),
            ParagraphItem::new_penalty(0.0, 0.0, false).unwrap(),
            inf_glue(),
            forced(),
        ];
        let width = 3.0;
        let breaks = vec![3, 7, 9];

        let with_mismatch = OptimiserParams::default();
        let without_mismatch = OptimiserParams {
            mismatched_fitness_penalty: 0.0,
            ..with_mismatch
        };

        let demerits_with = demerits_for_breaks(&items, &breaks, width, &with_mismatch);
        let demerits_without = demerits_for_breaks(&items, &breaks, width, &without_mismatch);
        assert!(demerits_without < demerits_with);
    }

    /// Spec.md §8 invariant 5: for an input where greedy succeeds, optimal's
    /// total demerits never exceed the demerit sum recomputed over greedy's
    /// own breaks.
    #[test]
    fn optimal_demerits_never_exceed_recomputed_greedy_demerits() {
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
        let width = 5.0;
        let params = OptimiserParams::default();

        let greedy_breaks = crate::greedy::greedy_line_breaks(&items, width);
        let greedy_demerits = demerits_for_breaks(&items, &greedy_breaks, width, &params);
        let (_, optimal_demerits) = optimal_line_breaks_with_demerits(&items, width, &params);

        assert!(optimal_demerits <= greedy_demerits);
    }
}
