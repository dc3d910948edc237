// Page layout model: font metrics, the style catalog, the text-layout port, and the
// height estimator built on top of them.

pub mod estimator;
pub mod font_metrics;
pub mod page_fill;
pub mod styles;
pub mod text_layout;

// Re-export the public API consumed by the fitting engine and the binary.
pub use estimator::{estimate_breakdown, estimate_height, HeightBreakdown, HeightEstimator};
pub use page_fill::{PageBudget, PageGeometry};
pub use styles::{SectionKind, StyleSheet, TextStyle};
pub use text_layout::{MetricTextLayout, TextLayout};
