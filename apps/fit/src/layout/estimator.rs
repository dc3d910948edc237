//! Height Estimator: predicts the rendered height of a whole document.
//!
//! Walks the sections in the template's canonical order and mirrors, flowable for
//! flowable, what the renderer puts on the page:
//! - header: name paragraph + contact line
//! - each non-empty section: heading + rule + lead spacer, then its entries
//! - entries: aligned header rows (max of the left and right columns), bullet lines,
//!   trailing spacer
//!
//! Empty sections are skipped entirely, heading included. The raw sum is multiplied by
//! the calibration safety factor before being compared against the page budget.

use serde::{Deserialize, Serialize};

use crate::fitting::policy::Calibration;
use crate::layout::page_fill::PageGeometry;
use crate::layout::styles::{SectionKind, StyleId, StyleSheet, TextStyle};
use crate::layout::text_layout::TextLayout;
use crate::models::document::{Bulleted, Document};

/// Per-section raw heights, for logs and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightBreakdown {
    pub header_pt: f32,
    /// Only the sections that are present, in render order.
    pub sections: Vec<(SectionKind, f32)>,
    /// Sum before the safety multiplier.
    pub raw_total_pt: f32,
    /// Predicted height: `raw_total_pt × safety_multiplier`.
    pub total_pt: f32,
}

impl HeightBreakdown {
    pub fn section(&self, kind: SectionKind) -> Option<f32> {
        self.sections
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, h)| *h)
    }
}

/// Predicted height of `doc` in points. Pure and deterministic.
pub fn estimate_height<L: TextLayout + ?Sized>(
    doc: &Document,
    styles: &StyleSheet,
    layout: &L,
    geometry: &PageGeometry,
    calibration: &Calibration,
) -> f32 {
    HeightEstimator::new(styles, layout, geometry, calibration).estimate(doc)
}

/// Same walk as [`estimate_height`], keeping the per-section figures.
pub fn estimate_breakdown<L: TextLayout + ?Sized>(
    doc: &Document,
    styles: &StyleSheet,
    layout: &L,
    geometry: &PageGeometry,
    calibration: &Calibration,
) -> HeightBreakdown {
    HeightEstimator::new(styles, layout, geometry, calibration).breakdown(doc)
}

/// Borrowing bundle of everything a height estimate depends on.
pub struct HeightEstimator<'a, L: TextLayout + ?Sized> {
    styles: &'a StyleSheet,
    layout: &'a L,
    geometry: &'a PageGeometry,
    calibration: &'a Calibration,
}

impl<'a, L: TextLayout + ?Sized> HeightEstimator<'a, L> {
    pub fn new(
        styles: &'a StyleSheet,
        layout: &'a L,
        geometry: &'a PageGeometry,
        calibration: &'a Calibration,
    ) -> Self {
        HeightEstimator {
            styles,
            layout,
            geometry,
            calibration,
        }
    }

    pub fn estimate(&self, doc: &Document) -> f32 {
        self.breakdown(doc).total_pt
    }

    pub fn breakdown(&self, doc: &Document) -> HeightBreakdown {
        let header_pt = self.header(doc);
        let sections: Vec<(SectionKind, f32)> = SectionKind::CANONICAL_ORDER
            .iter()
            .filter_map(|&kind| {
                self.section_body(kind, doc)
                    .map(|body| (kind, self.styles.section_overhead(kind) + body))
            })
            .collect();

        let raw_total_pt = header_pt + sections.iter().map(|(_, h)| h).sum::<f32>();
        HeightBreakdown {
            header_pt,
            sections,
            raw_total_pt,
            total_pt: raw_total_pt * self.calibration.safety_multiplier,
        }
    }

    // ── header ─────────────────────────────────────────────────────────────

    fn header(&self, doc: &Document) -> f32 {
        let contact = doc.contact.render_line();
        self.full_width(&doc.name, self.styles.get(StyleId::NameHeader))
            + self.full_width(&contact, self.styles.get(StyleId::ContactLine))
    }

    // ── sections ───────────────────────────────────────────────────────────

    /// Height of a section's content below its heading, or `None` if the section is
    /// absent and contributes nothing.
    fn section_body(&self, kind: SectionKind, doc: &Document) -> Option<f32> {
        let spacer = self.styles.spacing.item_spacer_pt;
        let bold = self.styles.get(StyleId::BoldEntry);
        let italic = self.styles.get(StyleId::ItalicEntry);

        match kind {
            SectionKind::Summary => non_blank(&doc.summary)
                .map(|summary| self.full_width(summary, self.styles.get(StyleId::Summary)) + spacer),

            SectionKind::Education => non_empty(&doc.education).map(|entries| {
                entries
                    .iter()
                    .map(|edu| {
                        let gpa = edu
                            .gpa_line()
                            .map(|line| self.bullet_line(&line))
                            .unwrap_or(0.0);
                        self.aligned_row(&edu.school, &edu.dates, bold)
                            + self.aligned_row(&edu.degree, &edu.location, italic)
                            + gpa
                            + self.bullets(edu)
                            + spacer
                    })
                    .sum::<f32>()
            }),

            SectionKind::Skills => (!doc.skills.is_empty()).then(|| {
                doc.skills
                    .iter()
                    .map(|(category, skills)| self.bullet_line(&format!("{category}: {skills}")))
                    .sum::<f32>()
                    + spacer
            }),

            SectionKind::Experience => non_empty(&doc.experience).map(|entries| {
                entries
                    .iter()
                    .map(|exp| {
                        self.aligned_row(&exp.company, &exp.dates, bold)
                            + self.aligned_row(&exp.role, &exp.location, italic)
                            + self.bullets(exp)
                            + spacer
                    })
                    .sum::<f32>()
            }),

            SectionKind::Projects => non_empty(&doc.projects).map(|entries| {
                entries
                    .iter()
                    .map(|proj| {
                        self.aligned_row(&proj.name, &proj.dates, bold) + self.bullets(proj) + spacer
                    })
                    .sum::<f32>()
            }),

            SectionKind::Research => non_empty(&doc.research).map(|entries| {
                entries
                    .iter()
                    .map(|res| {
                        let conference = res
                            .conference
                            .as_deref()
                            .map(|c| self.full_width(c, italic))
                            .unwrap_or(0.0);
                        let link = res
                            .link
                            .as_deref()
                            .and_then(non_blank)
                            .map(|l| self.full_width(&format!("Link: {l}"), italic))
                            .unwrap_or(0.0);
                        self.aligned_row(&res.title, &res.dates, bold)
                            + conference
                            + link
                            + self.bullets(res)
                            + spacer
                    })
                    .sum::<f32>()
            }),

            SectionKind::Leadership => non_empty(&doc.leadership).map(|entries| {
                entries
                    .iter()
                    .map(|lead| {
                        self.aligned_row(&lead.organization, &lead.dates, bold)
                            + self.aligned_row(&lead.role, &lead.location, italic)
                            + self.bullets(lead)
                            + spacer
                    })
                    .sum::<f32>()
            }),

            SectionKind::Certifications => non_empty(&doc.certifications).map(|entries| {
                entries
                    .iter()
                    .map(|cert| self.aligned_row(&cert.label(), &cert.dates, bold) + spacer)
                    .sum::<f32>()
            }),

            SectionKind::Awards => non_empty(&doc.awards).map(|entries| {
                entries
                    .iter()
                    .map(|award| self.aligned_row(&award.label(), &award.dates, bold) + spacer)
                    .sum::<f32>()
            }),

            SectionKind::Volunteering => non_empty(&doc.volunteering).map(|entries| {
                entries
                    .iter()
                    .map(|vol| {
                        self.aligned_row(&vol.organization, &vol.dates, bold)
                            + self.aligned_row(&vol.role, &vol.location, italic)
                            + self.bullets(vol)
                            + spacer
                    })
                    .sum::<f32>()
            }),

            SectionKind::Languages => {
                let joined = doc.languages.join(", ");
                non_blank(&joined)
                    .map(|langs| self.full_width(langs, self.styles.get(StyleId::Summary)) + spacer)
            }
        }
    }

    // ── primitives ─────────────────────────────────────────────────────────

    fn full_width(&self, text: &str, style: &TextStyle) -> f32 {
        self.layout
            .measure(text, style, self.geometry.content_width_pt())
    }

    /// Two-column row: left text at 75% width, right-aligned text at 25%.
    fn aligned_row(&self, left: &str, right: &str, style: &TextStyle) -> f32 {
        let l = self.layout.measure(left, style, self.geometry.left_column_pt());
        let r = self.layout.measure(right, style, self.geometry.right_column_pt());
        l.max(r)
    }

    /// One `• text` paragraph; its space-before comes from the bullet style.
    fn bullet_line(&self, text: &str) -> f32 {
        self.full_width(&format!("• {text}"), self.styles.get(StyleId::BulletPoint))
    }

    fn bullets<T: Bulleted>(&self, item: &T) -> f32 {
        item.bullets().iter().map(|b| self.bullet_line(b)).sum()
    }
}

fn non_empty<T>(items: &[T]) -> Option<&[T]> {
    (!items.is_empty()).then_some(items)
}

fn non_blank(text: &str) -> Option<&str> {
    (!text.trim().is_empty()).then_some(text)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::text_layout::MetricTextLayout;
    use crate::models::document::{
        AwardEntry, Contact, EducationEntry, ExperienceEntry, ProjectEntry, SkillsMap,
    };

    /// Every non-empty paragraph is exactly one line: makes expected sums easy to write.
    struct OneLineLayout;

    impl TextLayout for OneLineLayout {
        fn measure(&self, text: &str, style: &TextStyle, _max_width_pt: f32) -> f32 {
            if text.trim().is_empty() {
                0.0
            } else {
                style.leading_pt + style.vertical_spacing()
            }
        }
    }

    fn estimator<'a, L: TextLayout>(
        layout: &'a L,
        geometry: &'a PageGeometry,
        calibration: &'a Calibration,
    ) -> HeightEstimator<'a, L> {
        HeightEstimator::new(StyleSheet::reference(), layout, geometry, calibration)
    }

    fn project(name: &str, bullets: usize) -> ProjectEntry {
        ProjectEntry {
            name: name.to_string(),
            dates: "2024".to_string(),
            bullets: (0..bullets).map(|i| format!("Bullet {i}")).collect(),
        }
    }

    #[test]
    fn test_empty_document_is_zero() {
        let geometry = PageGeometry::default();
        let calibration = Calibration::default();
        let est = estimator(&OneLineLayout, &geometry, &calibration);
        let breakdown = est.breakdown(&Document::default());
        assert_eq!(breakdown.total_pt, 0.0);
        assert!(breakdown.sections.is_empty(), "no section overhead for empty document");
    }

    #[test]
    fn test_header_uses_name_and_contact_styles() {
        let geometry = PageGeometry::default();
        let calibration = Calibration::default();
        let est = estimator(&OneLineLayout, &geometry, &calibration);
        let doc = Document {
            name: "Ada".to_string(),
            contact: Contact::Line("London".to_string()),
            ..Document::default()
        };
        // name 25 + 2, contact 12 + 10
        assert_eq!(est.breakdown(&doc).header_pt, 49.0);
    }

    #[test]
    fn test_project_section_arithmetic() {
        let geometry = PageGeometry::default();
        let calibration = Calibration::default();
        let est = estimator(&OneLineLayout, &geometry, &calibration);
        let doc = Document {
            projects: vec![project("A", 3), project("B", 2)],
            ..Document::default()
        };
        let breakdown = est.breakdown(&doc);
        // overhead 21; per project: row 13 + bullets × 13.5 + spacer 2
        let expected = 21.0 + (13.0 + 3.0 * 13.5 + 2.0) + (13.0 + 2.0 * 13.5 + 2.0);
        assert_eq!(breakdown.section(SectionKind::Projects), Some(expected));
        assert!((breakdown.total_pt - expected * 1.05).abs() < 1e-3);
    }

    #[test]
    fn test_safety_multiplier_applied_to_raw_total() {
        let geometry = PageGeometry::default();
        let calibration = Calibration::default();
        let est = estimator(&OneLineLayout, &geometry, &calibration);
        let doc = Document {
            summary: "Engineer".to_string(),
            projects: vec![project("A", 2)],
            ..Document::default()
        };
        let breakdown = est.breakdown(&doc);
        assert!((breakdown.total_pt - breakdown.raw_total_pt * 1.05).abs() < 1e-4);
    }

    #[test]
    fn test_education_gpa_line_only_when_present() {
        let geometry = PageGeometry::default();
        let calibration = Calibration::default();
        let est = estimator(&OneLineLayout, &geometry, &calibration);
        let mut edu = EducationEntry {
            school: "MIT".to_string(),
            degree: "BS".to_string(),
            dates: "2020".to_string(),
            location: "Cambridge".to_string(),
            ..EducationEntry::default()
        };
        let without = est
            .breakdown(&Document {
                education: vec![edu.clone()],
                ..Document::default()
            })
            .section(SectionKind::Education)
            .unwrap();
        // overhead 23 + bold row 13 + italic row 12 + spacer 2
        assert_eq!(without, 50.0);

        edu.gpa = Some("3.9".to_string());
        let with = est
            .breakdown(&Document {
                education: vec![edu],
                ..Document::default()
            })
            .section(SectionKind::Education)
            .unwrap();
        assert_eq!(with - without, 13.5, "GPA adds exactly one bullet line");
    }

    #[test]
    fn test_skills_one_line_per_category_plus_spacer() {
        let geometry = PageGeometry::default();
        let calibration = Calibration::default();
        let est = estimator(&OneLineLayout, &geometry, &calibration);
        let skills: SkillsMap = [("Languages", "Rust, Go"), ("Cloud", "AWS")]
            .into_iter()
            .collect();
        let doc = Document {
            skills,
            ..Document::default()
        };
        // 23 + 2 × 13.5 + 2
        assert_eq!(est.breakdown(&doc).section(SectionKind::Skills), Some(52.0));
    }

    #[test]
    fn test_sections_reported_in_canonical_order() {
        let geometry = PageGeometry::default();
        let calibration = Calibration::default();
        let est = estimator(&OneLineLayout, &geometry, &calibration);
        let doc = Document {
            summary: "x".to_string(),
            awards: vec![AwardEntry {
                name: "Prize".to_string(),
                ..AwardEntry::default()
            }],
            experience: vec![ExperienceEntry {
                company: "Acme".to_string(),
                ..ExperienceEntry::default()
            }],
            projects: vec![project("A", 1)],
            ..Document::default()
        };
        let kinds: Vec<SectionKind> = est
            .breakdown(&doc)
            .sections
            .iter()
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Projects,
                SectionKind::Awards
            ]
        );
    }

    #[test]
    fn test_blank_summary_is_skipped() {
        let geometry = PageGeometry::default();
        let calibration = Calibration::default();
        let est = estimator(&OneLineLayout, &geometry, &calibration);
        let doc = Document {
            summary: "   ".to_string(),
            ..Document::default()
        };
        assert_eq!(est.estimate(&doc), 0.0);
    }

    #[test]
    fn test_removing_a_bullet_never_increases_height() {
        let layout = MetricTextLayout::new();
        let geometry = PageGeometry::default();
        let calibration = Calibration::default();
        let styles = StyleSheet::reference();
        let mut doc = Document {
            projects: vec![project("A", 3), project("B", 3)],
            ..Document::default()
        };
        let before = estimate_height(&doc, styles, &layout, &geometry, &calibration);
        doc.projects[1].bullets.pop();
        let after = estimate_height(&doc, styles, &layout, &geometry, &calibration);
        assert!(after < before, "after ({after}) should be < before ({before})");
    }

    #[test]
    fn test_estimate_follows_the_style_sheet() {
        let geometry = PageGeometry::default();
        let calibration = Calibration::default();
        let doc = Document {
            projects: vec![project("A", 2)],
            ..Document::default()
        };
        let reference = estimator(&OneLineLayout, &geometry, &calibration)
            .breakdown(&doc)
            .raw_total_pt;

        let mut loose = StyleSheet::reference().clone();
        loose.bullet_point.leading_pt += 2.0;
        let est = HeightEstimator::new(&loose, &OneLineLayout, &geometry, &calibration);
        // two bullet lines, 2pt more leading each
        assert_eq!(est.breakdown(&doc).raw_total_pt - reference, 4.0);
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let layout = MetricTextLayout::new();
        let geometry = PageGeometry::default();
        let calibration = Calibration::default();
        let styles = StyleSheet::reference();
        let doc = Document {
            summary: "Backend engineer with a decade of distributed systems work".to_string(),
            projects: vec![project("A", 3)],
            ..Document::default()
        };
        let a = estimate_height(&doc, styles, &layout, &geometry, &calibration);
        let b = estimate_height(&doc, styles, &layout, &geometry, &calibration);
        assert_eq!(a, b);
    }
}
