//! Error types for configuration loading.

/// Errors that can occur while loading or validating painter configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Palette must contain at least one anchor color")]
    EmptyPalette,

    #[error("Invalid radius range: min={min}, max={max}")]
    RadiusRange { min: f32, max: f32 },

    #[error("Invalid value for {field}: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}
