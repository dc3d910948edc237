// Content fitting: skills line budget, project trimming, and the loop that drives
// a document under the page budget. Everything here is synchronous and CPU-bound.

pub mod fit_loop;
pub mod policy;
pub mod skills;
pub mod trimmer;

pub use fit_loop::{fit, FitOutcome};
pub use policy::{Calibration, FitConfig, SkillsPolicy, TrimPolicy};
