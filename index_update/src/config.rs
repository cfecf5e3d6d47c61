//! Update policies and where they come from.
//!
//! ```toml
//! casting = "unsafe"          # "unsafe" | "safe"
//! negative_indices = true     # count negative coordinates from the end
//! scatter_order = "forward"   # "forward" | "reverse"
//! ```

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::convert::Casting;
use crate::error::{IndexError, IndexResult};
use crate::scatter::ScatterOrder;

/// Path of a TOML file to load by `UpdateConfig::from_env`
pub const CONFIG_ENV: &str = "INDEX_UPDATE_CONFIG";
/// Overrides `casting`
pub const CASTING_ENV: &str = "INDEX_UPDATE_CASTING";
/// Overrides `scatter_order`
pub const SCATTER_ORDER_ENV: &str = "INDEX_UPDATE_SCATTER_ORDER";

/// Policies for `index_update_with` and `resolve`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateConfig {
    /// How update values are converted to the array's element type
    pub casting: Casting,
    /// Whether negative coordinates count from the end of their axis
    pub negative_indices: bool,
    /// Write order for duplicate target positions
    pub scatter_order: ScatterOrder,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            casting: Casting::default(),
            negative_indices: true,
            scatter_order: ScatterOrder::default(),
        }
    }
}

impl UpdateConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> IndexResult<Self> {
        toml::from_str(source)
            .map_err(|e| IndexError::config_error(format!("invalid configuration: {}", e)))
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> IndexResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            IndexError::config_error(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    /// Configuration from the process environment.
    ///
    /// Starts from the file named by `INDEX_UPDATE_CONFIG` (or the defaults),
    /// then applies `INDEX_UPDATE_CASTING` and `INDEX_UPDATE_SCATTER_ORDER`.
    pub fn from_env() -> IndexResult<Self> {
        Self::from_env_vars(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`
    pub fn from_env_vars<F>(lookup: F) -> IndexResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = match set(CONFIG_ENV) {
            Some(path) => Self::load(path.trim())?,
            None => Self::default(),
        };
        if let Some(casting) = set(CASTING_ENV) {
            config.casting = Casting::parse(&casting)?;
        }
        if let Some(order) = set(SCATTER_ORDER_ENV) {
            config.scatter_order = ScatterOrder::parse(&order)?;
        }
        Ok(config)
    }

    pub fn with_casting(self, casting: Casting) -> Self {
        Self { casting, ..self }
    }

    pub fn with_negative_indices(self, negative_indices: bool) -> Self {
        Self {
            negative_indices,
            ..self
        }
    }

    pub fn with_scatter_order(self, scatter_order: ScatterOrder) -> Self {
        Self {
            scatter_order,
            ..self
        }
    }
}
