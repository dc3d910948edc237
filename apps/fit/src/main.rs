use std::io::{IsTerminal, Read};

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn, Instrument, Span};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use resume_fit::config::Config;
use resume_fit::fit;
use resume_fit::layout::{estimate_breakdown, MetricTextLayout, StyleSheet};
use resume_fit::markup::normalize_document;
use resume_fit::models::document::Document;
use resume_fit::profile::{load_profile, parse_document};
use resume_fit::FitError;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the fitted document.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume-fit v{}", env!("CARGO_PKG_VERSION"));

    let run_id = Uuid::new_v4();
    run(config).instrument(info_span!("fit_run", %run_id)).await
}

async fn run(config: Config) -> Result<()> {
    let doc = normalize_document(read_document(&config)?);
    let fit_config = config.fit_config();
    info!(
        bullets = doc.bullet_count(),
        projects = doc.projects.len(),
        max_iterations = fit_config.max_iterations,
        "Document loaded"
    );

    // CPU-bound: keep it off the async executor.
    let worker_span = Span::current();
    let fitted = tokio::task::spawn_blocking(move || {
        let _guard = worker_span.enter();
        let styles = StyleSheet::reference();
        let layout = MetricTextLayout::new();
        let outcome = fit(doc, styles, &layout, &fit_config)?;

        let breakdown = estimate_breakdown(
            &outcome.document,
            styles,
            &layout,
            &fit_config.geometry,
            &fit_config.calibration,
        );
        for (section, height) in &breakdown.sections {
            debug!(?section, height, "Section height");
        }
        Ok::<_, FitError>(outcome)
    })
    .await
    .context("fit task panicked")?;

    let outcome = match fitted {
        Ok(outcome) => outcome,
        Err(e) if e.is_invalid_configuration() => {
            return Err(anyhow::Error::new(e).context("Fit configuration rejected; check the environment"));
        }
        Err(e) => return Err(anyhow::Error::new(e).context("fitting failed")),
    };

    if !outcome.fits() {
        warn!(
            overflow_pt = outcome.overflow_pt(),
            "Fitted document still overflows one page"
        );
    }
    info!(
        iterations = outcome.iterations,
        final_height_pt = outcome.final_height_pt,
        budget_pt = outcome.budget_pt,
        "Fit complete"
    );

    let json = serde_json::to_string_pretty(&outcome.document)
        .context("Failed to serialize fitted document")?;
    println!("{json}");

    Ok(())
}

/// `DOCUMENT_PATH` if set, else piped stdin, else the stored profile.
fn read_document(config: &Config) -> Result<Document> {
    if let Some(path) = &config.document_path {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document '{}'", path.display()))?;
        return parse_document(&raw)
            .with_context(|| format!("Failed to parse document '{}'", path.display()));
    }

    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        let mut raw = String::new();
        stdin
            .lock()
            .read_to_string(&mut raw)
            .context("Failed to read document from stdin")?;
        if !raw.trim().is_empty() {
            return parse_document(&raw).context("Failed to parse document from stdin");
        }
    }

    load_profile(&config.profile_path).with_context(|| {
        format!(
            "Failed to load profile '{}'",
            config.profile_path.display()
        )
    })
}
