//! Painter configuration for replays

use std::path::Path;

use anyhow::Context as _;
use pigment_config::PainterConfig;

/// Environment variable naming a painter config JSON file
pub const CONFIG_ENV: &str = "PIGMENT_CONFIG";

/// Load the painter config from `path`, else from `$PIGMENT_CONFIG`, else
/// use the defaults
pub fn load_painter_config(path: Option<&Path>) -> anyhow::Result<PainterConfig> {
    let from_env = std::env::var_os(CONFIG_ENV);
    let path = path.or(from_env.as_deref().map(Path::new));

    let Some(path) = path else {
        tracing::debug!("no painter config given, using defaults");
        return Ok(PainterConfig::default());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read painter config '{}'", path.display()))?;
    PainterConfig::from_json(&json)
        .with_context(|| format!("load painter config '{}'", path.display()))
}
