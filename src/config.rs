//! Handler configuration
//!
//! Routing and observability knobs for the dispatcher.

use serde::{Deserialize, Serialize};

/// Dispatcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Logical component name, attached to metric emissions as the
    /// `component` dimension and to request logs.
    #[serde(default = "default_component")]
    pub component: String,

    /// Collection path suffix matched by the create route. Id-scoped routes
    /// live under `<collection_path>/`.
    #[serde(default = "default_collection_path")]
    pub collection_path: String,
}

fn default_component() -> String {
    "itemstore".to_string()
}

fn default_collection_path() -> String {
    "/items".to_string()
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            component: default_component(),
            collection_path: default_collection_path(),
        }
    }
}

impl HandlerConfig {
    /// Default configuration with the component name taken from the
    /// `ITEMSTORE_COMPONENT` environment variable when set and non-empty.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(component) = std::env::var("ITEMSTORE_COMPONENT") {
            if !component.is_empty() {
                config.component = component;
            }
        }
        config
    }
}
