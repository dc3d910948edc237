use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::fitting::policy::FitConfig;

/// Runtime configuration loaded from environment variables.
///
/// Every variable is optional; unset ones fall back to the reference configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub profile_path: PathBuf,
    /// Document to fit. When unset, the document is read from stdin, or from the
    /// profile store if stdin is a terminal.
    pub document_path: Option<PathBuf>,
    pub page_height_pt: f32,
    pub page_top_margin_pt: f32,
    pub page_bottom_margin_pt: f32,
    pub max_iterations: usize,
    pub skills_max_lines: usize,
    pub skills_chars_per_line: usize,
    pub min_bullets_per_item: usize,
    pub min_item_count: usize,
    pub max_initial_bullets: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let reference = FitConfig::reference();
        Ok(Config {
            profile_path: std::env::var("PROFILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("profile.json")),
            document_path: std::env::var("DOCUMENT_PATH").ok().map(PathBuf::from),
            page_height_pt: env_or("PAGE_HEIGHT_PT", reference.geometry.page_height_pt)?,
            page_top_margin_pt: env_or("PAGE_TOP_MARGIN_PT", reference.geometry.top_margin_pt)?,
            page_bottom_margin_pt: env_or(
                "PAGE_BOTTOM_MARGIN_PT",
                reference.geometry.bottom_margin_pt,
            )?,
            max_iterations: env_or("FIT_MAX_ITERATIONS", reference.max_iterations)?,
            skills_max_lines: env_or("SKILLS_MAX_LINES", reference.skills.max_lines)?,
            skills_chars_per_line: env_or(
                "SKILLS_CHARS_PER_LINE",
                reference.skills.chars_per_line,
            )?,
            min_bullets_per_item: env_or(
                "MIN_BULLETS_PER_ITEM",
                reference.trim.min_bullets_per_item,
            )?,
            min_item_count: env_or("MIN_ITEM_COUNT", reference.trim.min_item_count)?,
            max_initial_bullets: env_or(
                "MAX_INITIAL_BULLETS",
                reference.trim.max_initial_bullets,
            )?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Engine configuration: the reference config with the overrides applied.
    /// Not validated here; `fit` rejects bad values with a typed error.
    pub fn fit_config(&self) -> FitConfig {
        let mut config = FitConfig::reference();
        config.geometry.page_height_pt = self.page_height_pt;
        config.geometry.top_margin_pt = self.page_top_margin_pt;
        config.geometry.bottom_margin_pt = self.page_bottom_margin_pt;
        config.max_iterations = self.max_iterations;
        config.skills.max_lines = self.skills_max_lines;
        config.skills.chars_per_line = self.skills_chars_per_line;
        config.trim.min_bullets_per_item = self.min_bullets_per_item;
        config.trim.min_item_count = self.min_item_count;
        config.trim.max_initial_bullets = self.max_initial_bullets;
        config
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_var(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_config() -> Config {
        let reference = FitConfig::reference();
        Config {
            profile_path: PathBuf::from("profile.json"),
            document_path: None,
            page_height_pt: reference.geometry.page_height_pt,
            page_top_margin_pt: reference.geometry.top_margin_pt,
            page_bottom_margin_pt: reference.geometry.bottom_margin_pt,
            max_iterations: reference.max_iterations,
            skills_max_lines: reference.skills.max_lines,
            skills_chars_per_line: reference.skills.chars_per_line,
            min_bullets_per_item: reference.trim.min_bullets_per_item,
            min_item_count: reference.trim.min_item_count,
            max_initial_bullets: reference.trim.max_initial_bullets,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_defaults_map_to_reference_fit_config() {
        assert_eq!(reference_config().fit_config(), FitConfig::reference());
    }

    #[test]
    fn test_overrides_reach_fit_config() {
        let config = Config {
            page_height_pt: 842.0,
            min_item_count: 1,
            ..reference_config()
        };
        let fit = config.fit_config();
        assert_eq!(fit.geometry.page_height_pt, 842.0);
        assert_eq!(fit.trim.min_item_count, 1);
        assert_eq!(fit.validate().unwrap().usable_height_pt(), 822.0);
    }

    #[test]
    fn test_parse_var_names_the_variable() {
        let err = parse_var::<usize>("FIT_MAX_ITERATIONS", "ten").unwrap_err();
        assert!(
            err.to_string().contains("FIT_MAX_ITERATIONS"),
            "error should name the variable: {err}"
        );
        assert_eq!(parse_var::<f32>("PAGE_HEIGHT_PT", " 792 ").unwrap(), 792.0);
    }
}
