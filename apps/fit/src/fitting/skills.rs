//! Skills Fitter: bounds the skills section to a fixed number of rendered lines.
//!
//! Works on character counts, not measured widths: a skills line is short, dense
//! Times 10pt, and ~90 characters per line has held up well enough that the estimator
//! never needs to trim skills again afterwards.

use tracing::debug;

use crate::errors::FitError;
use crate::models::document::SkillsMap;

/// No single category may wrap onto more than this many lines.
pub const MAX_LINES_PER_CATEGORY: usize = 2;

/// Keeps the highest-priority categories and, within each, the leading skills that
/// fit the remaining line budget.
///
/// Categories are visited in order. Each gets at most
/// `min(remaining, MAX_LINES_PER_CATEGORY)` lines, minus the `"• Category: "` prefix.
/// Skills are whole tokens: a skill that does not fit is dropped along with every
/// skill after it, never truncated. Categories left with no skills are omitted.
pub fn fit_skills(
    skills: &SkillsMap,
    max_lines: usize,
    chars_per_line: usize,
) -> Result<SkillsMap, FitError> {
    if chars_per_line == 0 {
        return Err(FitError::ZeroCharsPerLine);
    }

    let mut fitted = SkillsMap::new();
    let mut lines_used = 0usize;

    for (category, list) in skills.iter() {
        if lines_used >= max_lines {
            debug!(category, "Skills line budget exhausted; dropping category");
            continue;
        }

        let allowed = (max_lines - lines_used).min(MAX_LINES_PER_CATEGORY);
        let prefix_len = format!("• {category}: ").chars().count();
        let max_chars = allowed * chars_per_line;
        if max_chars <= prefix_len {
            debug!(category, prefix_len, max_chars, "Category prefix alone overflows; dropping");
            continue;
        }
        let available = max_chars - prefix_len;

        let mut kept: Vec<&str> = Vec::new();
        let mut accumulated = 0usize;
        // Blank tokens ("Rust,,Go") are skipped rather than rendered as ", ,".
        for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let cost = token.chars().count() + 2;
            if accumulated + cost > available {
                break;
            }
            accumulated += cost;
            kept.push(token);
        }

        if kept.is_empty() {
            debug!(category, "No skill fits; dropping category");
            continue;
        }

        let lines = (accumulated + prefix_len).div_ceil(chars_per_line);
        lines_used += lines;
        debug!(
            category,
            kept = kept.len(),
            lines,
            lines_used,
            "Skills category fitted"
        );
        fitted.insert(category, kept.join(", "));
    }

    Ok(fitted)
}
