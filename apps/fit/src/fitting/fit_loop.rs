//! Fit Loop: drives a document under the page budget.
//!
//! # Sequence
//! 1. Validate the configuration (every precondition fails fast, before any work).
//! 2. Cap project bullets at `max_initial_bullets`.
//! 3. Fit the skills section once; it is never revisited.
//! 4. Estimate, then alternate project trim passes and re-estimates until the document
//!    fits, the iteration cap is hit, or a pass finds nothing left to remove.
//!
//! Running out of iterations or floors is not an error: the outcome carries the final
//! height and `fits()` reports whether the budget was met.
//!
//! CPU-bound and synchronous. Async callers run it inside `tokio::task::spawn_blocking`.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::FitError;
use crate::fitting::policy::FitConfig;
use crate::fitting::skills::fit_skills;
use crate::fitting::trimmer::{cap_initial_bullets, trim_further};
use crate::layout::estimator::HeightEstimator;
use crate::layout::page_fill::{analyze_page_fill, PageFillAnalysis};
use crate::layout::styles::StyleSheet;
use crate::layout::text_layout::TextLayout;
use crate::models::document::Document;

/// A fitted document plus the trail of estimates that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct FitOutcome {
    pub document: Document,
    /// Trim passes that changed the document.
    pub iterations: usize,
    /// Estimate after the skills pass, then one per iteration.
    pub heights: Vec<f32>,
    pub final_height_pt: f32,
    pub budget_pt: f32,
    pub fill: PageFillAnalysis,
}

impl FitOutcome {
    pub fn fits(&self) -> bool {
        self.final_height_pt <= self.budget_pt
    }

    /// Points still over budget; `0.0` when the document fits.
    pub fn overflow_pt(&self) -> f32 {
        (self.final_height_pt - self.budget_pt).max(0.0)
    }
}

/// Fits `doc` to one page.
///
/// Returns the input unchanged (apart from the bullet cap and skills pass, which are
/// no-ops on an already-fitted document) when it is within budget, so fitting a fitted
/// document is idempotent.
pub fn fit<L: TextLayout + ?Sized>(
    mut doc: Document,
    styles: &StyleSheet,
    layout: &L,
    config: &FitConfig,
) -> Result<FitOutcome, FitError> {
    let budget = config.validate()?;
    let budget_pt = budget.usable_height_pt();
    let estimator = HeightEstimator::new(styles, layout, &config.geometry, &config.calibration);

    doc.projects = cap_initial_bullets(
        std::mem::take(&mut doc.projects),
        config.trim.max_initial_bullets,
    );
    doc.skills = fit_skills(
        &doc.skills,
        config.skills.max_lines,
        config.skills.chars_per_line,
    )?;

    let mut height = estimator.estimate(&doc);
    let mut heights = vec![height];
    let mut iterations = 0usize;
    debug!(height, budget_pt, "Initial estimate");

    while height > budget_pt && iterations < config.max_iterations {
        let target = (height - budget_pt)
            .ceil()
            .max(config.calibration.bullet_height_pt);

        let pass = trim_further(
            std::mem::take(&mut doc.projects),
            target,
            &config.trim,
            &config.calibration,
        )?;
        let exhausted = pass.is_noop();
        doc.projects = pass.items;
        if exhausted {
            debug!(height, "Trim floors reached; stopping early");
            break;
        }

        iterations += 1;
        height = estimator.estimate(&doc);
        heights.push(height);
        debug!(iteration = iterations, target, height, "Trim pass re-estimated");
    }

    let fill = analyze_page_fill(height, &budget);
    if height > budget_pt {
        warn!(
            height,
            budget_pt,
            overflow = height - budget_pt,
            iterations,
            "Document still exceeds page budget after trimming"
        );
    } else {
        info!(
            height,
            budget_pt,
            iterations,
            verdict = ?fill.verdict,
            "Document fits page budget"
        );
    }

    Ok(FitOutcome {
        document: doc,
        iterations,
        heights,
        final_height_pt: height,
        budget_pt,
        fill,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
