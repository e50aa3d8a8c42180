//! Binding resolution configuration.

use serde::Deserialize;

use crate::error::ConfigError;

/// Settings for [`ResolveBindingsPass`](crate::ResolveBindingsPass).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Maximum number of parent hops walked when a definition has no class.
    pub max_parent_depth: usize,
    /// Report unused bindings inherited from defaults or instanceof
    /// conditionals, not only those declared on the service itself.
    pub report_inherited_unused: bool,
}

impl ResolveConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_parent_depth == 0 {
            return Err(ConfigError::InvalidValue(
                "max_parent_depth must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            max_parent_depth: 32,
            report_inherited_unused: false,
        }
    }
}
