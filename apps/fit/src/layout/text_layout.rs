//! Text-layout port: how tall a paragraph renders at a given width and style.
//!
//! The fitting engine is only as accurate as this port. Every height it predicts is
//! relative to what `measure` reports, so the implementation plugged in here must wrap
//! text the same way the page renderer does.

use crate::layout::font_metrics::get_metrics;
use crate::layout::styles::TextStyle;
use crate::markup::strip_markup;

/// Paragraph measurement.
pub trait TextLayout {
    /// Rendered height in points of `text` wrapped to `max_width_pt`:
    /// `lines × leading + space_before + space_after`, or `0.0` for empty text.
    fn measure(&self, text: &str, style: &TextStyle, max_width_pt: f32) -> f32;
}

/// Table-driven layout using the static Times metrics and greedy word wrap.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricTextLayout;

impl MetricTextLayout {
    pub fn new() -> Self {
        MetricTextLayout
    }

    /// Number of wrapped lines `text` occupies.
    ///
    /// The first line is narrowed by `left_indent + first_line_indent`, later lines by
    /// `left_indent` alone. A word wider than the line still takes a line of its own.
    pub fn line_count(&self, text: &str, style: &TextStyle, max_width_pt: f32) -> usize {
        let plain = strip_markup(text);
        let words: Vec<&str> = plain.split_whitespace().collect();
        if words.is_empty() {
            return 0;
        }

        let metrics = get_metrics(&style.font);
        let first_limit = max_width_pt - style.left_indent_pt - style.first_line_indent_pt;
        let rest_limit = max_width_pt - style.left_indent_pt;
        let space_w = metrics.space_width * style.size_pt;

        let mut line_count = 1usize;
        let mut current_width = 0.0_f32;
        let mut first_on_line = true;

        for word in &words {
            let word_w = metrics.width_pt(word, style.size_pt);
            let gap = if first_on_line { 0.0 } else { space_w };
            let limit = if line_count == 1 { first_limit } else { rest_limit };

            if !first_on_line && current_width + gap + word_w > limit {
                line_count += 1;
                current_width = word_w;
                // first_on_line stays false: next word on the new line gets a space
            } else {
                current_width += gap + word_w;
                first_on_line = false;
            }
        }
        line_count
    }
}

impl TextLayout for MetricTextLayout {
    fn measure(&self, text: &str, style: &TextStyle, max_width_pt: f32) -> f32 {
        match self.line_count(text, style, max_width_pt) {
            0 => 0.0,
            lines => lines as f32 * style.leading_pt + style.vertical_spacing(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::styles::StyleSheet;

    const WIDTH: f32 = 552.0;

    #[test]
    fn test_empty_text_measures_zero() {
        let layout = MetricTextLayout::new();
        let styles = StyleSheet::reference();
        assert_eq!(layout.measure("", &styles.bullet_point, WIDTH), 0.0);
        assert_eq!(layout.measure("   ", &styles.bullet_point, WIDTH), 0.0);
        assert_eq!(layout.measure("<b></b>", &styles.summary, WIDTH), 0.0);
    }

    #[test]
    fn test_single_line_includes_paragraph_spacing() {
        let layout = MetricTextLayout::new();
        let styles = StyleSheet::reference();
        // 1 line × 12 leading + 1.5 space before
        let h = layout.measure("• Shipped it", &styles.bullet_point, WIDTH);
        assert!((h - 13.5).abs() < 1e-4, "expected 13.5, got {h}");

        // 1 line × 25 leading + 2 space after
        let h = layout.measure("Ada Lovelace", &styles.name_header, WIDTH);
        assert!((h - 27.0).abs() < 1e-4, "expected 27.0, got {h}");
    }

    #[test]
    fn test_long_text_wraps() {
        let layout = MetricTextLayout::new();
        let styles = StyleSheet::reference();
        let text = "word ".repeat(150);
        let lines = layout.line_count(&text, &styles.summary, WIDTH);
        assert!(lines >= 3, "150 words at 10pt should wrap to 3+ lines, got {lines}");
        let h = layout.measure(&text, &styles.summary, WIDTH);
        assert!((h - (lines as f32 * 12.0 + 1.0)).abs() < 1e-3);
    }

    #[test]
    fn test_narrower_width_never_uses_fewer_lines() {
        let layout = MetricTextLayout::new();
        let styles = StyleSheet::reference();
        let text = "Architected a distributed caching layer using Redis and consistent hashing, \
                    reducing p99 latency by 40% under 50k RPS peak load across three regions";
        let wide = layout.line_count(text, &styles.bullet_point, WIDTH);
        let narrow = layout.line_count(text, &styles.bullet_point, WIDTH * 0.5);
        assert!(narrow >= wide, "narrow ({narrow}) should be >= wide ({wide})");
    }

    #[test]
    fn test_markup_does_not_change_line_count() {
        let layout = MetricTextLayout::new();
        let styles = StyleSheet::reference();
        let plain = "Reduced build times by 60% with incremental caching";
        let marked = "Reduced <b>build times</b> by <i>60%</i> with incremental caching";
        assert_eq!(
            layout.line_count(plain, &styles.bullet_point, WIDTH),
            layout.line_count(marked, &styles.bullet_point, WIDTH)
        );
    }

    #[test]
    fn test_oversized_word_takes_own_line() {
        let layout = MetricTextLayout::new();
        let styles = StyleSheet::reference();
        let giant = "x".repeat(400);
        let text = format!("a {giant} b");
        assert_eq!(layout.line_count(&text, &styles.summary, WIDTH), 3);
    }
}
