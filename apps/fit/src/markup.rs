//! Inline markup handling for generated text.
//!
//! The tailoring collaborator writes markdown emphasis; the renderer understands a
//! small set of inline tags (`<b>`, `<i>`, `<link>`). Tags take no horizontal space,
//! so measurement always runs on the stripped text.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::document::{Bulleted, Document, SkillsMap};

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold pattern is valid"))
}

fn italic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*([^*]+)\*").expect("italic pattern is valid"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"))
}

/// Converts `**bold**` to `<b>bold</b>` and `*italic*` to `<i>italic</i>`.
pub fn markdown_to_markup(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let bolded = bold_re().replace_all(text, "<b>$1</b>");
    italic_re().replace_all(&bolded, "<i>$1</i>").into_owned()
}

/// Removes inline tags and decodes the entities the renderer accepts.
pub fn strip_markup(text: &str) -> String {
    if !text.contains('<') && !text.contains('&') {
        return text.to_string();
    }
    tag_re()
        .replace_all(text, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Applies [`markdown_to_markup`] to every free-text field generated content touches:
/// summary, skill lists and all bullets.
pub fn normalize_document(mut doc: Document) -> Document {
    fn convert_bullets<T: Bulleted>(items: &mut [T]) {
        for item in items {
            for bullet in item.bullets_mut().iter_mut() {
                *bullet = markdown_to_markup(bullet);
            }
        }
    }

    doc.summary = markdown_to_markup(&doc.summary);
    doc.skills = doc
        .skills
        .iter()
        .map(|(category, skills)| (category.to_string(), markdown_to_markup(skills)))
        .collect::<SkillsMap>();

    convert_bullets(&mut doc.education);
    convert_bullets(&mut doc.experience);
    convert_bullets(&mut doc.projects);
    convert_bullets(&mut doc.research);
    convert_bullets(&mut doc.leadership);
    convert_bullets(&mut doc.volunteering);
    doc
}
