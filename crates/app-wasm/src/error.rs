//! Host setup errors

use painting::PainterError;
use pigment_config::ConfigError;
use wasm_bindgen::JsValue;

/// Errors that can occur while installing the painter into a page
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("No global window")]
    NoWindow,

    #[error("Window has no document")]
    NoDocument,

    #[error("Document has no body")]
    NoBody,

    #[error("Invalid painter config: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Painter(#[from] PainterError),

    #[error("DOM call failed: {0}")]
    Dom(String),
}

impl HostError {
    /// Wrap a JavaScript exception
    pub fn dom(err: JsValue) -> Self {
        Self::Dom(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
    }
}

impl From<HostError> for JsValue {
    fn from(err: HostError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
