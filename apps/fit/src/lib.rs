//! One-page résumé fitting engine.
//!
//! Predicts the rendered height of a structured résumé from a style catalog and a
//! text-layout port, then trims content deterministically until it fits the page.

pub mod config;
pub mod errors;
pub mod fitting;
pub mod layout;
pub mod markup;
pub mod models;
pub mod profile;

pub use errors::FitError;
pub use fitting::{fit, FitConfig, FitOutcome};
pub use layout::{MetricTextLayout, StyleSheet, TextLayout};
pub use models::document::Document;
