//! Résumé document model.
//!
//! A `Document` arrives once per request, either from the profile store or from the
//! tailoring collaborator, and is treated the same way in both cases. Every list is
//! ordered by priority: index 0 is the most important entry or bullet, and all
//! trimming removes from the tail.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub name: String,
    pub contact: Contact,
    pub summary: String,
    pub education: Vec<EducationEntry>,
    pub skills: SkillsMap,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub research: Vec<ResearchEntry>,
    pub leadership: Vec<LeadershipEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub certifications: Vec<CertificationEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub awards: Vec<AwardEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volunteering: Vec<VolunteerEntry>,
    #[serde(
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub languages: Vec<String>,
}

impl Document {
    /// The stand-in profile served when no profile has been uploaded yet.
    pub fn placeholder() -> Self {
        Document {
            name: "User Name".to_string(),
            contact: Contact::Info(ContactInfo {
                location: "Location".to_string(),
                phone: "Phone".to_string(),
                email: "Email".to_string(),
                linkedin_url: None,
                portfolio_url: None,
            }),
            summary: "Please upload your resume to generate a profile.".to_string(),
            ..Document::default()
        }
    }

    /// Total number of bullets across every bulleted section.
    pub fn bullet_count(&self) -> usize {
        fn sum<T: Bulleted>(items: &[T]) -> usize {
            items.iter().map(|i| i.bullets().len()).sum()
        }
        sum(&self.education)
            + sum(&self.experience)
            + sum(&self.projects)
            + sum(&self.research)
            + sum(&self.leadership)
            + sum(&self.volunteering)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Contact
// ────────────────────────────────────────────────────────────────────────────

/// Contact block: either structured fields or a pre-rendered line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Contact {
    Info(ContactInfo),
    Line(String),
}

impl Default for Contact {
    fn default() -> Self {
        Contact::Line(String::new())
    }
}

impl Contact {
    /// The single pipe-joined line the header renders.
    pub fn render_line(&self) -> String {
        match self {
            Contact::Info(info) => info.render_line(),
            Contact::Line(line) => line.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub location: String,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
}

impl ContactInfo {
    /// Links render as fixed labels, so URL length never changes the line height.
    pub fn render_line(&self) -> String {
        let linkedin = self.linkedin_url.as_deref().filter(|u| !u.is_empty()).map(|_| "LinkedIn");
        let portfolio = self.portfolio_url.as_deref().filter(|u| !u.is_empty()).map(|_| "Portfolio");

        [
            Some(self.location.as_str()),
            Some(self.phone.as_str()),
            Some(self.email.as_str()),
            linkedin,
            portfolio,
        ]
        .into_iter()
        .flatten()
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entries
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    #[serde(alias = "institution")]
    pub school: String,
    pub degree: String,
    pub dates: String,
    pub location: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "string_or_number"
    )]
    pub gpa: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bullets: Vec<String>,
}

impl EducationEntry {
    /// GPA line text, `"GPA: "`-prefixed unless the value already carries it.
    pub fn gpa_line(&self) -> Option<String> {
        let gpa = self.gpa.as_deref().map(str::trim).filter(|g| !g.is_empty())?;
        if gpa.starts_with("GPA") {
            Some(gpa.to_string())
        } else {
            Some(format!("GPA: {gpa}"))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    #[serde(
        alias = "title",
        alias = "position",
        alias = "job_title",
        alias = "designation"
    )]
    pub role: String,
    pub dates: String,
    pub location: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub dates: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadershipEntry {
    pub organization: String,
    #[serde(alias = "title")]
    pub role: String,
    pub dates: String,
    pub location: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchEntry {
    pub title: String,
    pub dates: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: String,
    pub dates: String,
}

impl CertificationEntry {
    /// `"Name (Issuer)"`, or just the name when no issuer is given.
    pub fn label(&self) -> String {
        if self.issuer.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.issuer)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwardEntry {
    pub name: String,
    pub organization: String,
    pub dates: String,
}

impl AwardEntry {
    pub fn label(&self) -> String {
        if self.organization.is_empty() {
            self.name.clone()
        } else {
            format!("{} - {}", self.name, self.organization)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolunteerEntry {
    pub organization: String,
    pub role: String,
    pub dates: String,
    pub location: String,
    pub bullets: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Bulleted entries
// ────────────────────────────────────────────────────────────────────────────

/// An entry carrying an importance-ordered bullet list.
///
/// The trimmer is generic over this trait so any bulleted section can be reduced
/// with the same policy.
pub trait Bulleted {
    fn bullets(&self) -> &[String];
    fn bullets_mut(&mut self) -> &mut Vec<String>;
    /// Short human-readable name used in trim logs.
    fn label(&self) -> &str;
}

macro_rules! impl_bulleted {
    ($($ty:ty => $label:ident),* $(,)?) => {
        $(
            impl Bulleted for $ty {
                fn bullets(&self) -> &[String] {
                    &self.bullets
                }

                fn bullets_mut(&mut self) -> &mut Vec<String> {
                    &mut self.bullets
                }

                fn label(&self) -> &str {
                    &self.$label
                }
            }
        )*
    };
}

impl_bulleted! {
    EducationEntry => school,
    ExperienceEntry => company,
    ProjectEntry => name,
    LeadershipEntry => organization,
    ResearchEntry => title,
    VolunteerEntry => organization,
}

// ────────────────────────────────────────────────────────────────────────────
// Skills map
// ────────────────────────────────────────────────────────────────────────────

/// Category used when skills arrive as a flat list instead of a map.
pub const FLAT_SKILLS_CATEGORY: &str = "Skills";

/// Category → comma-separated skills, in insertion order.
///
/// Category order is priority order, so this is a `Vec` of pairs that (de)serializes
/// as a JSON object without losing key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillsMap(Vec<(String, String)>);

impl SkillsMap {
    pub fn new() -> Self {
        SkillsMap(Vec::new())
    }

    /// Inserts a category, replacing the skills of an existing one in place.
    pub fn insert(&mut self, category: impl Into<String>, skills: impl Into<String>) {
        let category = category.into();
        let skills = skills.into();
        match self.0.iter_mut().find(|(c, _)| *c == category) {
            Some(entry) => entry.1 = skills,
            None => self.0.push((category, skills)),
        }
    }

    pub fn get(&self, category: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, s)| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(c, s)| (c.as_str(), s.as_str()))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<C: Into<String>, S: Into<String>> FromIterator<(C, S)> for SkillsMap {
    fn from_iter<I: IntoIterator<Item = (C, S)>>(iter: I) -> Self {
        let mut map = SkillsMap::new();
        for (category, skills) in iter {
            map.insert(category, skills);
        }
        map
    }
}

impl Serialize for SkillsMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, skills) in &self.0 {
            map.serialize_entry(category, skills)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SkillsMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SkillsVisitor;

        impl<'de> Visitor<'de> for SkillsVisitor {
            type Value = SkillsMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of skill category to skills")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SkillsMap, A::Error> {
                let mut map = SkillsMap::new();
                while let Some((category, skills)) =
                    access.next_entry::<String, StringOrList>()?
                {
                    map.insert(category, skills.joined());
                }
                Ok(map)
            }

            /// A flat list of skills lands in a single generic category.
            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<SkillsMap, A::Error> {
                let mut skills = Vec::new();
                while let Some(skill) = access.next_element::<String>()? {
                    skills.push(skill);
                }
                let mut map = SkillsMap::new();
                if !skills.is_empty() {
                    map.insert(FLAT_SKILLS_CATEGORY, skills.join(", "));
                }
                Ok(map)
            }

            fn visit_unit<E: de::Error>(self) -> Result<SkillsMap, E> {
                Ok(SkillsMap::new())
            }
        }

        deserializer.deserialize_any(SkillsVisitor)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field helpers
// ────────────────────────────────────────────────────────────────────────────

/// Generated content sometimes emits lists where a comma-joined string is expected.
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

impl StringOrList {
    fn joined(self) -> String {
        match self {
            StringOrList::One(s) => s,
            StringOrList::Many(items) => items.join(", "),
        }
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Option::<StringOrList>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(StringOrList::One(s)) if s.trim().is_empty() => Vec::new(),
        Some(StringOrList::One(s)) => vec![s],
        Some(StringOrList::Many(items)) => items,
    })
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
