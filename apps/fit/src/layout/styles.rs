//! Style catalog shared by the height estimator and the page renderer.
//!
//! The catalog is a process-wide constant. Both sides must use the same sheet: a
//! renderer drawing with different spacing silently breaks the fit guarantee.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontFace;

// ────────────────────────────────────────────────────────────────────────────
// Style types
// ────────────────────────────────────────────────────────────────────────────

/// Closed set of paragraph styles the template uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleId {
    NameHeader,
    ContactLine,
    SectionHeader,
    /// Company, school, project name and the dates column beside them.
    BoldEntry,
    /// Role, degree and the location column beside them.
    ItalicEntry,
    BulletPoint,
    /// Summary and languages paragraphs.
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Justify,
}

/// One paragraph style. All measurements in points.
///
/// `first_line_indent_pt` is relative to `left_indent_pt` and may be negative
/// (hanging bullets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: FontFace,
    pub size_pt: f32,
    pub leading_pt: f32,
    pub space_before_pt: f32,
    pub space_after_pt: f32,
    pub left_indent_pt: f32,
    pub first_line_indent_pt: f32,
    pub alignment: Alignment,
}

impl TextStyle {
    const fn plain(font: FontFace, size_pt: f32, leading_pt: f32) -> Self {
        TextStyle {
            font,
            size_pt,
            leading_pt,
            space_before_pt: 0.0,
            space_after_pt: 0.0,
            left_indent_pt: 0.0,
            first_line_indent_pt: 0.0,
            alignment: Alignment::Left,
        }
    }

    /// Paragraph spacing added once around the wrapped lines.
    pub fn vertical_spacing(&self) -> f32 {
        self.space_before_pt + self.space_after_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// Top-level document sections, in the order the template renders them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Education,
    Skills,
    Experience,
    Projects,
    Research,
    Leadership,
    Certifications,
    Awards,
    Volunteering,
    Languages,
}

impl SectionKind {
    pub const CANONICAL_ORDER: [SectionKind; 11] = [
        SectionKind::Summary,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Experience,
        SectionKind::Projects,
        SectionKind::Research,
        SectionKind::Leadership,
        SectionKind::Certifications,
        SectionKind::Awards,
        SectionKind::Volunteering,
        SectionKind::Languages,
    ];
}

// ────────────────────────────────────────────────────────────────────────────
// Style sheet
// ────────────────────────────────────────────────────────────────────────────

/// Fixed vertical gaps that are not paragraphs: the rule under each section header
/// and the spacers the template inserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpacing {
    pub rule_height_pt: f32,
    /// Spacer after the rule for summary, education and skills.
    pub wide_lead_pt: f32,
    /// Spacer after the rule for every other section.
    pub narrow_lead_pt: f32,
    /// Spacer after each entry (and after the summary, skills and languages blocks).
    pub item_spacer_pt: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSheet {
    pub name_header: TextStyle,
    pub contact_line: TextStyle,
    pub section_header: TextStyle,
    pub bold_entry: TextStyle,
    pub italic_entry: TextStyle,
    pub bullet_point: TextStyle,
    pub summary: TextStyle,
    pub spacing: SectionSpacing,
}

static REFERENCE: StyleSheet = StyleSheet {
    name_header: TextStyle {
        space_after_pt: 2.0,
        alignment: Alignment::Center,
        ..TextStyle::plain(FontFace::TimesBold, 21.0, 25.0)
    },
    contact_line: TextStyle {
        space_after_pt: 10.0,
        alignment: Alignment::Center,
        ..TextStyle::plain(FontFace::TimesRoman, 10.0, 12.0)
    },
    section_header: TextStyle {
        space_before_pt: 2.0,
        space_after_pt: 2.0,
        ..TextStyle::plain(FontFace::TimesBold, 12.0, 14.0)
    },
    bold_entry: TextStyle::plain(FontFace::TimesBold, 11.0, 13.0),
    italic_entry: TextStyle::plain(FontFace::TimesItalic, 10.0, 12.0),
    bullet_point: TextStyle {
        space_before_pt: 1.5,
        left_indent_pt: 14.0,
        first_line_indent_pt: -9.0,
        ..TextStyle::plain(FontFace::TimesRoman, 10.0, 12.0)
    },
    summary: TextStyle {
        space_after_pt: 1.0,
        alignment: Alignment::Justify,
        ..TextStyle::plain(FontFace::TimesRoman, 10.0, 12.0)
    },
    spacing: SectionSpacing {
        rule_height_pt: 2.0,
        wide_lead_pt: 3.0,
        narrow_lead_pt: 1.0,
        item_spacer_pt: 2.0,
    },
};

impl StyleSheet {
    /// The reference catalog: Times on US letter, tuned for a dense one-page résumé.
    pub fn reference() -> &'static StyleSheet {
        &REFERENCE
    }

    pub fn get(&self, id: StyleId) -> &TextStyle {
        match id {
            StyleId::NameHeader => &self.name_header,
            StyleId::ContactLine => &self.contact_line,
            StyleId::SectionHeader => &self.section_header,
            StyleId::BoldEntry => &self.bold_entry,
            StyleId::ItalicEntry => &self.italic_entry,
            StyleId::BulletPoint => &self.bullet_point,
            StyleId::Summary => &self.summary,
        }
    }

    /// Fixed cost of a section heading: header paragraph, rule and lead spacer.
    ///
    /// Headings are a single short line, so they are not measured.
    pub fn section_overhead(&self, kind: SectionKind) -> f32 {
        let header = self.get(StyleId::SectionHeader);
        let lead = match kind {
            SectionKind::Summary | SectionKind::Education | SectionKind::Skills => {
                self.spacing.wide_lead_pt
            }
            _ => self.spacing.narrow_lead_pt,
        };
        header.space_before_pt
            + header.leading_pt
            + header.space_after_pt
            + self.spacing.rule_height_pt
            + lead
    }
}
