//! Runtime configuration.
//!
//! Read from a JSON file; every field is optional and falls back to the
//! default.
//!
//! ```json
//! { "pvs_command": "/sbin/pvs", "vgs_command": "/sbin/vgs", "layout_policy": "strict" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What a reload does when segments overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPolicy {
    /// Log each overlap and keep the data.
    #[default]
    Warn,
    /// Fail the reload with `MapError::LayoutViolation`.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Program used to list physical volume segments.
    pub pvs_command: String,
    /// Program used to list volume group extent sizes.
    pub vgs_command: String,
    pub layout_policy: LayoutPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pvs_command: "pvs".to_string(),
            vgs_command: "vgs".to_string(),
            layout_policy: LayoutPolicy::Warn,
        }
    }
}

impl Config {
    pub fn read_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
