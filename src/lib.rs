pub mod config;
pub mod pipeline;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use config::{ConfigError, GeneratorConfig, UPSTREAM_FALLBACK_DESCRIPTION, UPSTREAM_FALLBACK_SUMMARY};
use pipeline::{MovementDescription, MovementPasswordEngine};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Build the description from command-line arguments (program name
/// excluded). Blank text is replaced the way the upstream analysis
/// collaborator degrades when video analysis fails.
pub fn description_from_args<I>(args: I) -> MovementDescription
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let comprehensive = args
        .next()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| UPSTREAM_FALLBACK_DESCRIPTION.to_string());
    let summary = args
        .next()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| UPSTREAM_FALLBACK_SUMMARY.to_string());
    MovementDescription::new(comprehensive, summary)
}

/// CLI entry: `movepass <comprehensive> [summary]`, prints the result as JSON.
pub fn run() -> Result<(), EngineError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let engine = MovementPasswordEngine::new(GeneratorConfig::from_env()?)?;
    let input = description_from_args(std::env::args().skip(1));
    let result = engine.generate(&input);

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
