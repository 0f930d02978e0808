use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Movepass";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tag attached to every generated result.
pub const GENERATION_METHOD: &str = "advanced_biometric_extraction";

/// Text the upstream analysis collaborator supplies when video analysis fails.
pub const UPSTREAM_FALLBACK_DESCRIPTION: &str = "generic movement";
/// Summary used when the upstream response carries no summary section.
pub const UPSTREAM_FALLBACK_SUMMARY: &str = "Movement analysis completed";

/// Absolute password length limits; configured bounds must sit inside these.
pub const MIN_PASSWORD_LENGTH: usize = 12;
pub const MAX_PASSWORD_LENGTH: usize = 64;

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "movepass=info,movepass_lib=info"
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid length bounds: min {min}, max {max} (need 12 <= min <= max <= 64)")]
    InvalidLengthBounds { min: usize, max: usize },

    #[error("top_n must be at least 1")]
    ZeroTopN,

    #[error("unicode_cap must be between 1 and 3, got {0}")]
    InvalidUnicodeCap(usize),

    #[error("Environment variable {name} is not a valid number: {value}")]
    InvalidEnvValue { name: &'static str, value: String },
}

/// Tunables for one generator instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Shortest password emitted; shorter strings are padded.
    pub min_length: usize,
    /// Longest password emitted; longer strings are cut before the random anchor.
    pub max_length: usize,
    /// Maximum elements kept per semantic category.
    pub top_n: usize,
    /// Maximum Unicode substitutions per password.
    pub unicode_cap: usize,
    /// Token distance around a body part searched for spatial descriptors.
    pub context_window: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_length: 12,
            max_length: 24,
            top_n: 3,
            unicode_cap: 3,
            context_window: 3,
        }
    }
}

impl GeneratorConfig {
    /// Defaults overridden by `MOVEPASS_MIN_LENGTH`, `MOVEPASS_MAX_LENGTH`
    /// and `MOVEPASS_UNICODE_CAP`, then validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(v) = parse_override("MOVEPASS_MIN_LENGTH", &lookup)? {
            config.min_length = v;
        }
        if let Some(v) = parse_override("MOVEPASS_MAX_LENGTH", &lookup)? {
            config.max_length = v;
        }
        if let Some(v) = parse_override("MOVEPASS_UNICODE_CAP", &lookup)? {
            config.unicode_cap = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_length < MIN_PASSWORD_LENGTH
            || self.max_length > MAX_PASSWORD_LENGTH
            || self.min_length > self.max_length
        {
            return Err(ConfigError::InvalidLengthBounds {
                min: self.min_length,
                max: self.max_length,
            });
        }
        if self.top_n == 0 {
            return Err(ConfigError::ZeroTopN);
        }
        if !(1..=3).contains(&self.unicode_cap) {
            return Err(ConfigError::InvalidUnicodeCap(self.unicode_cap));
        }
        Ok(())
    }
}

fn parse_override(
    name: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Option<usize>, ConfigError> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnvValue { name, value: raw }),
    }
}
