//! Project Trimmer: bullet and entry reduction with overshoot restoration.
//!
//! Heights here are calibration credits, not measurements. The fit loop re-measures
//! the whole document after every pass, so a credit that is slightly off only costs
//! an extra iteration.
//!
//! # Passes
//! 1. Pop trailing bullets, last entry first, down to `min_bullets_per_item`.
//! 2. Drop trailing entries down to `min_item_count`.
//! 3. If an entry was dropped and the credit overshot the target, give whole bullets
//!    back to the surviving entries, earliest first.

use serde::Serialize;
use tracing::debug;

use crate::errors::FitError;
use crate::fitting::policy::{Calibration, TrimPolicy};
use crate::models::document::Bulleted;

/// Truncates every entry's bullets to the first `max_initial`.
///
/// Generated entries arrive with up to 5 bullets; the template shows at most 3.
pub fn cap_initial_bullets<T: Bulleted>(mut items: Vec<T>, max_initial: usize) -> Vec<T> {
    for item in &mut items {
        item.bullets_mut().truncate(max_initial);
    }
    items
}

/// Result of one [`trim_further`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimOutcome<T> {
    pub items: Vec<T>,
    /// Net credited reduction after restoration.
    pub reduction_achieved_pt: f32,
    pub bullets_removed: usize,
    pub items_removed: usize,
    pub bullets_restored: usize,
}

impl<T> TrimOutcome<T> {
    /// True when the pass removed nothing, i.e. every floor was already reached.
    pub fn is_noop(&self) -> bool {
        self.bullets_removed == 0 && self.items_removed == 0
    }
}

/// Bullets each entry held when the call started, keyed by entry index.
///
/// Entries are only ever removed from the tail, so a surviving entry keeps its index
/// for the whole call.
struct RestorationTable {
    originals: Vec<Vec<String>>,
}

impl RestorationTable {
    fn capture<T: Bulleted>(items: &[T]) -> Self {
        RestorationTable {
            originals: items.iter().map(|i| i.bullets().to_vec()).collect(),
        }
    }

    /// The next trimmed bullet for entry `index`, if it may grow to `ceiling`.
    fn next_missing(&self, index: usize, current_len: usize, ceiling: usize) -> Option<&String> {
        let original = self.originals.get(index)?;
        if current_len >= original.len().min(ceiling) {
            return None;
        }
        original.get(current_len)
    }
}

/// Reduces `items` by roughly `target_reduction_pt` of credited height.
///
/// Never drops an entry below `min_bullets_per_item` (entries already below it are
/// left alone) nor the list below `min_item_count`. Bullets keep their order: every
/// surviving bullet list is a prefix of the list passed in.
pub fn trim_further<T: Bulleted>(
    mut items: Vec<T>,
    target_reduction_pt: f32,
    policy: &TrimPolicy,
    calibration: &Calibration,
) -> Result<TrimOutcome<T>, FitError> {
    if !target_reduction_pt.is_finite() || target_reduction_pt < 0.0 {
        return Err(FitError::NegativeTarget(target_reduction_pt));
    }

    let table = RestorationTable::capture(&items);
    let mut achieved = 0.0_f32;
    let mut bullets_removed = 0usize;
    let mut items_removed = 0usize;

    // ── Phase 1: trailing bullets, last entry first ──
    for item in items.iter_mut().rev() {
        if achieved >= target_reduction_pt {
            break;
        }
        let bullets = item.bullets_mut();
        while bullets.len() > policy.min_bullets_per_item && achieved < target_reduction_pt {
            bullets.pop();
            achieved += calibration.bullet_height_pt;
            bullets_removed += 1;
        }
    }

    // ── Phase 2: trailing entries ──
    while items.len() > policy.min_item_count && achieved < target_reduction_pt {
        let Some(removed) = items.pop() else { break };
        let credit = calibration.item_removal_credit(removed.bullets().len());
        achieved += credit;
        items_removed += 1;
        debug!(item = removed.label(), credit, achieved, "Removed entry");
    }

    // ── Phase 3: restore into the overshoot ──
    let mut bullets_restored = 0usize;
    if items_removed > 0 && achieved > target_reduction_pt {
        let surplus = achieved - target_reduction_pt;
        let mut allowance = (surplus / calibration.bullet_height_pt).floor() as usize;

        'entries: for (index, item) in items.iter_mut().enumerate() {
            loop {
                if allowance == 0 {
                    break 'entries;
                }
                let len = item.bullets().len();
                let Some(bullet) = table.next_missing(index, len, policy.restore_ceiling) else {
                    break;
                };
                item.bullets_mut().push(bullet.clone());
                allowance -= 1;
                bullets_restored += 1;
                achieved -= calibration.bullet_height_pt;
            }
        }
    }

    debug!(
        target_reduction_pt,
        achieved,
        bullets_removed,
        items_removed,
        bullets_restored,
        remaining = items.len(),
        "Trim pass complete"
    );

    Ok(TrimOutcome {
        items,
        reduction_achieved_pt: achieved,
        bullets_removed,
        items_removed,
        bullets_restored,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::ProjectEntry;

    fn project(name: &str, bullets: usize) -> ProjectEntry {
        ProjectEntry {
            name: name.to_string(),
            dates: "2024".to_string(),
            bullets: (0..bullets).map(|i| format!("{name} bullet {i}")).collect(),
        }
    }

    fn projects(count: usize, bullets: usize) -> Vec<ProjectEntry> {
        (0..count).map(|i| project(&format!("P{i}"), bullets)).collect()
    }

    fn bullet_counts(items: &[ProjectEntry]) -> Vec<usize> {
        items.iter().map(|p| p.bullets.len()).collect()
    }

    #[test]
    fn test_cap_initial_bullets() {
        let mut input = projects(4, 5);
        input.push(project("Short", 2));
        let capped = cap_initial_bullets(input, 3);
        assert_eq!(bullet_counts(&capped), vec![3, 3, 3, 3, 2]);
        assert_eq!(capped[0].bullets[2], "P0 bullet 2", "keeps the leading bullets");
    }

    #[test]
    fn test_bullets_trimmed_before_entries() {
        // 5 × 3 bullets, 200pt target: 5 bullets (70pt), then 3 entries at 43pt each.
        let outcome = trim_further(
            projects(5, 3),
            200.0,
            &TrimPolicy::default(),
            &Calibration::default(),
        )
        .unwrap();

        assert_eq!(outcome.bullets_removed, 5);
        assert_eq!(outcome.items_removed, 3);
        assert_eq!(outcome.bullets_restored, 0);
        assert_eq!(outcome.items.len(), 2, "entry floor holds");
        assert_eq!(bullet_counts(&outcome.items), vec![2, 2]);
        assert_eq!(outcome.reduction_achieved_pt, 199.0);
    }

    #[test]
    fn test_phase_one_walks_from_last_entry() {
        // 28pt target: two bullets, both from the last entry's side.
        let outcome = trim_further(
            projects(3, 3),
            28.0,
            &TrimPolicy::default(),
            &Calibration::default(),
        )
        .unwrap();
        assert_eq!(bullet_counts(&outcome.items), vec![3, 2, 2]);
        assert_eq!(outcome.items_removed, 0);
    }

    #[test]
    fn test_overshoot_restores_bullets() {
        // 3 × 3 bullets, 50pt target: 3 bullets (42pt), then one entry (43pt) = 85pt.
        // Surplus 35pt buys back 2 bullets, earliest entry first.
        let outcome = trim_further(
            projects(3, 3),
            50.0,
            &TrimPolicy::default(),
            &Calibration::default(),
        )
        .unwrap();

        assert_eq!(outcome.items_removed, 1);
        assert_eq!(outcome.bullets_restored, 2);
        assert_eq!(bullet_counts(&outcome.items), vec![3, 3]);
        assert_eq!(outcome.items[0].bullets, project("P0", 3).bullets);
        assert_eq!(outcome.items[1].bullets, project("P1", 3).bullets);
        assert!(outcome.reduction_achieved_pt >= 50.0);
    }

    #[test]
    fn test_restoration_capped_by_original_and_ceiling() {
        let policy = TrimPolicy::default();
        let calibration = Calibration::default();
        // 60pt: C and B lose 4 bullets (56pt), then C goes (43pt). Surplus 39pt buys 2,
        // but A never had more than 2 and B stops at the ceiling of 3.
        let input = vec![project("A", 2), project("B", 5), project("C", 3)];
        let outcome = trim_further(input, 60.0, &policy, &calibration).unwrap();

        assert_eq!(outcome.bullets_restored, 1);
        assert_eq!(bullet_counts(&outcome.items), vec![2, 3]);

        for (item, cap) in outcome.items.iter().zip([2usize, 3]) {
            assert!(
                item.bullets.len() <= cap,
                "{} has {} bullets, cap {cap}",
                item.name,
                item.bullets.len()
            );
        }
    }

    #[test]
    fn test_floors_respected_under_huge_target() {
        let outcome = trim_further(
            projects(6, 3),
            10_000.0,
            &TrimPolicy::default(),
            &Calibration::default(),
        )
        .unwrap();
        assert_eq!(outcome.items.len(), 2);
        assert!(outcome.items.iter().all(|p| p.bullets.len() >= 2));
        assert_eq!(outcome.bullets_restored, 0, "no surplus when target is unmet");
    }

    #[test]
    fn test_noop_at_floors() {
        let outcome = trim_further(
            projects(2, 2),
            100.0,
            &TrimPolicy::default(),
            &Calibration::default(),
        )
        .unwrap();
        assert!(outcome.is_noop());
        assert_eq!(outcome.items, projects(2, 2));
    }

    #[test]
    fn test_entries_below_floor_untouched() {
        let input = vec![project("A", 1), project("B", 1)];
        let outcome = trim_further(
            input.clone(),
            50.0,
            &TrimPolicy::default(),
            &Calibration::default(),
        )
        .unwrap();
        assert_eq!(outcome.items, input);
    }

    #[test]
    fn test_zero_target_changes_nothing() {
        let outcome = trim_further(
            projects(4, 3),
            0.0,
            &TrimPolicy::default(),
            &Calibration::default(),
        )
        .unwrap();
        assert!(outcome.is_noop());
        assert_eq!(outcome.items, projects(4, 3));
    }

    #[test]
    fn test_negative_target_rejected() {
        let result = trim_further(
            projects(2, 3),
            -1.0,
            &TrimPolicy::default(),
            &Calibration::default(),
        );
        assert!(matches!(result, Err(FitError::NegativeTarget(_))));
        assert!(trim_further(
            projects(2, 3),
            f32::NAN,
            &TrimPolicy::default(),
            &Calibration::default()
        )
        .is_err());
    }
}
