//! Tunable constants and policy floors for the fitting engine.
//!
//! The calibration numbers were tuned against one renderer, font and page. They are
//! configuration, not physics: re-check them against the text-layout port whenever
//! the style catalog or page geometry changes.

use serde::{Deserialize, Serialize};

use crate::errors::FitError;
use crate::layout::page_fill::{PageBudget, PageGeometry};

/// Height credits the trimmer uses instead of re-measuring after every removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// One bullet line including its spacing.
    pub bullet_height_pt: f32,
    /// One entry header row.
    pub item_header_pt: f32,
    /// Spacer after each entry.
    pub item_spacer_pt: f32,
    /// Applied to the raw estimate to absorb systematic under-estimation.
    pub safety_multiplier: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration {
            bullet_height_pt: 14.0,
            item_header_pt: 13.0,
            item_spacer_pt: 2.0,
            safety_multiplier: 1.05,
        }
    }
}

impl Calibration {
    /// Height credited when an entry with `bullets` bullets is removed outright.
    pub fn item_removal_credit(&self, bullets: usize) -> f32 {
        self.item_header_pt + bullets as f32 * self.bullet_height_pt + self.item_spacer_pt
    }

    fn validate(&self) -> Result<(), FitError> {
        for (field, value) in [
            ("bullet_height_pt", self.bullet_height_pt),
            ("item_header_pt", self.item_header_pt),
            ("item_spacer_pt", self.item_spacer_pt),
            ("safety_multiplier", self.safety_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FitError::NonPositiveCalibration { field, value });
            }
        }
        Ok(())
    }
}

/// Floors and caps for bullet/entry trimming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimPolicy {
    /// Generated entries usually carry 5 bullets; never show more than this many.
    pub max_initial_bullets: usize,
    pub min_bullets_per_item: usize,
    pub min_item_count: usize,
    /// Restoration never grows an entry past this many bullets.
    pub restore_ceiling: usize,
}

impl Default for TrimPolicy {
    fn default() -> Self {
        TrimPolicy {
            max_initial_bullets: 3,
            min_bullets_per_item: 2,
            min_item_count: 2,
            restore_ceiling: 3,
        }
    }
}

/// Line budget for the skills section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsPolicy {
    pub max_lines: usize,
    /// Approximate characters per bullet line at 10pt.
    pub chars_per_line: usize,
}

impl Default for SkillsPolicy {
    fn default() -> Self {
        SkillsPolicy {
            max_lines: 5,
            chars_per_line: 90,
        }
    }
}

/// Everything `fit` needs besides the document, the style sheet and the layout port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitConfig {
    pub geometry: PageGeometry,
    pub calibration: Calibration,
    pub trim: TrimPolicy,
    pub skills: SkillsPolicy,
    pub max_iterations: usize,
}

impl Default for FitConfig {
    /// Reference configuration: US letter, 772pt budget, 10 fit iterations.
    fn default() -> Self {
        FitConfig {
            geometry: PageGeometry::default(),
            calibration: Calibration::default(),
            trim: TrimPolicy::default(),
            skills: SkillsPolicy::default(),
            max_iterations: FitConfig::DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl FitConfig {
    pub const DEFAULT_MAX_ITERATIONS: usize = 10;

    pub fn reference() -> Self {
        FitConfig::default()
    }

    /// Checks every precondition and returns the page budget on success.
    pub fn validate(&self) -> Result<PageBudget, FitError> {
        let budget = self.geometry.budget()?;

        let width = self.geometry.content_width_pt();
        if !width.is_finite() || width <= 0.0 {
            return Err(FitError::NonPositiveCalibration {
                field: "content_width_pt",
                value: width,
            });
        }
        let fraction = self.geometry.left_column_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(FitError::NonPositiveCalibration {
                field: "left_column_fraction",
                value: fraction,
            });
        }

        self.calibration.validate()?;

        if self.skills.chars_per_line == 0 {
            return Err(FitError::ZeroCharsPerLine);
        }
        if self.max_iterations == 0 {
            return Err(FitError::ZeroIterations);
        }
        if self.trim.restore_ceiling < self.trim.min_bullets_per_item {
            return Err(FitError::CeilingBelowFloor {
                field: "restore_ceiling",
                ceiling: self.trim.restore_ceiling,
                floor: self.trim.min_bullets_per_item,
            });
        }
        if self.trim.max_initial_bullets < self.trim.min_bullets_per_item {
            return Err(FitError::CeilingBelowFloor {
                field: "max_initial_bullets",
                ceiling: self.trim.max_initial_bullets,
                floor: self.trim.min_bullets_per_item,
            });
        }
        Ok(budget)
    }
}
