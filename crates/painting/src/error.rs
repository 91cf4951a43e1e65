//! Error type for building a renderer from configuration.

use pigment_config::ConfigError;

use crate::gate::SelectorError;

/// Errors that can occur while setting up an [`crate::AmbientRenderer`].
///
/// Painting itself never fails; only configuration can be rejected.
#[derive(Debug, thiserror::Error)]
pub enum PainterError {
    #[error("Invalid painter config: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid exclusion selector: {0}")]
    Selector(#[from] SelectorError),
}
