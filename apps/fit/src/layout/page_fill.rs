//! Page geometry, the vertical budget, and how well a predicted height uses it.
//!
//! # Page fill rules
//! - Whitespace > 8%  → page looks sparse (reported, never acted on by the trimmer)
//! - Overflow ≤ 5%    → minor overflow
//! - Overflow > 5%    → major overflow

use serde::{Deserialize, Serialize};

use crate::errors::FitError;

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

/// Physical page layout in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub side_margin_pt: f32,
    pub top_margin_pt: f32,
    pub bottom_margin_pt: f32,
    /// Share of the content width given to the left column of aligned rows.
    pub left_column_fraction: f32,
}

impl Default for PageGeometry {
    /// US letter, 30pt side margins, 10pt top and bottom, 75/25 aligned rows.
    fn default() -> Self {
        PageGeometry {
            page_width_pt: 612.0,
            page_height_pt: 792.0,
            side_margin_pt: 30.0,
            top_margin_pt: 10.0,
            bottom_margin_pt: 10.0,
            left_column_fraction: 0.75,
        }
    }
}

impl PageGeometry {
    pub fn content_width_pt(&self) -> f32 {
        self.page_width_pt - 2.0 * self.side_margin_pt
    }

    pub fn left_column_pt(&self) -> f32 {
        self.content_width_pt() * self.left_column_fraction
    }

    pub fn right_column_pt(&self) -> f32 {
        self.content_width_pt() * (1.0 - self.left_column_fraction)
    }

    /// The vertical budget this page offers. Fails if the margins eat the page.
    pub fn budget(&self) -> Result<PageBudget, FitError> {
        PageBudget::new(
            self.page_height_pt - self.top_margin_pt - self.bottom_margin_pt,
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Budget
// ────────────────────────────────────────────────────────────────────────────

/// Maximum predicted height, in points, a fitted document may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageBudget {
    usable_height_pt: f32,
}

impl PageBudget {
    /// Single US-letter page with 10pt top and bottom margins.
    pub const REFERENCE_PT: f32 = 772.0;

    pub fn new(usable_height_pt: f32) -> Result<Self, FitError> {
        if !usable_height_pt.is_finite() || usable_height_pt <= 0.0 {
            return Err(FitError::NonPositiveBudget(usable_height_pt));
        }
        Ok(PageBudget { usable_height_pt })
    }

    pub fn usable_height_pt(&self) -> f32 {
        self.usable_height_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fill analysis
// ────────────────────────────────────────────────────────────────────────────

/// Overall page fill verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageFillVerdict {
    /// 92–100% fill.
    Acceptable,
    /// < 92% fill (> 8% whitespace).
    TooMuchWhitespace,
    /// 100–105% fill.
    MinorOverflow,
    /// > 105% fill.
    MajorOverflow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFillAnalysis {
    pub height_used_pt: f32,
    pub height_available_pt: f32,
    pub whitespace_fraction: f32,
    pub overflow_fraction: f32,
    pub verdict: PageFillVerdict,
}

/// Classifies a predicted height against the budget.
pub fn analyze_page_fill(height_pt: f32, budget: &PageBudget) -> PageFillAnalysis {
    let available = budget.usable_height_pt();
    let fill_ratio = height_pt / available;

    let whitespace_fraction = (1.0_f32 - fill_ratio).max(0.0);
    let overflow_fraction = (fill_ratio - 1.0_f32).max(0.0);

    let verdict = if fill_ratio > 1.05 {
        PageFillVerdict::MajorOverflow
    } else if fill_ratio > 1.00 {
        PageFillVerdict::MinorOverflow
    } else if whitespace_fraction > 0.08 {
        PageFillVerdict::TooMuchWhitespace
    } else {
        PageFillVerdict::Acceptable
    };

    PageFillAnalysis {
        height_used_pt: height_pt,
        height_available_pt: available,
        whitespace_fraction,
        overflow_fraction,
        verdict,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
