/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     you may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::path::Path;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Configuration for the Conduit connection layer
///
/// Loaded from TOML files in XDG-compliant directories. Every section and
/// field is optional in the file; missing values fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConduitConfig {
    /// Limits and capacity configuration
    pub limits: LimitsConfig,
    /// Diagnostic output switches
    pub diagnostics: DiagnosticsConfig,
    /// Default values configuration
    pub defaults: DefaultsConfig,
}

/// Limits and capacity configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum nesting of dispatches started from inside handlers. `0` means unbounded.
    pub max_dispatch_depth: usize,
    /// Initial capacity reserved for a new event or signal receiver list
    pub receiver_list_capacity: usize,
}

/// Diagnostic output switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Emit a warning when a connected value sink is connected again
    pub report_redundant_connections: bool,
    /// Emit a trace event for every receiver invoked during dispatch
    pub trace_dispatch: bool,
}

/// Default configuration values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Root name given to components created with `ComponentHandle::default()`
    pub component_name: String,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_dispatch_depth: 0,
            receiver_list_capacity: 4,
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            report_redundant_connections: true,
            trace_dispatch: false,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            component_name: "component".to_string(),
        }
    }
}

impl ConduitConfig {
    /// The dispatch depth limit, or `None` when nesting is unbounded.
    pub const fn dispatch_depth_limit(&self) -> Option<usize> {
        match self.limits.max_dispatch_depth {
            0 => None,
            limit => Some(limit),
        }
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a value has the wrong type.
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str::<Self>(source)?)
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Load configuration from XDG-compliant locations
    ///
    /// Looks for `conduit/config.toml` under `$XDG_CONFIG_HOME` (falling back to
    /// `~/.config`) and the XDG config dirs.
    ///
    /// If no configuration file is found, returns the default configuration.
    /// If a configuration file exists but is malformed, logs an error and uses defaults.
    pub fn load() -> Self {
        use tracing::{error, info};

        let xdg_dirs = match xdg::BaseDirectories::with_prefix("conduit") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        if let Some(path) = xdg_dirs.find_config_file("config.toml") {
            info!("Loading configuration from: {}", path.display());
            match Self::load_from(&path) {
                Ok(config) => {
                    info!("Successfully loaded configuration");
                    config
                }
                Err(e) => {
                    error!("Failed to load configuration file {}: {}", path.display(), e);
                    Self::default()
                }
            }
        } else {
            info!("No configuration file found, using defaults");
            Self::default()
        }
    }
}

lazy_static! {
    /// Global configuration instance loaded from XDG-compliant locations
    pub static ref CONFIG: ConduitConfig = ConduitConfig::load();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() -> anyhow::Result<()> {
        let config = ConduitConfig::from_toml_str(
            r"
            [limits]
            max_dispatch_depth = 8
            ",
        )?;
        assert_eq!(config.limits.max_dispatch_depth, 8);
        assert_eq!(config.limits.receiver_list_capacity, 4);
        assert!(config.diagnostics.report_redundant_connections);
        assert_eq!(config.defaults.component_name, "component");
        assert_eq!(config.dispatch_depth_limit(), Some(8));
        Ok(())
    }

    #[test]
    fn zero_depth_is_unbounded() {
        assert_eq!(ConduitConfig::default().dispatch_depth_limit(), None);
    }

    #[test]
    fn wrong_type_is_rejected() {
        let parsed = ConduitConfig::from_toml_str(
            r#"
            [diagnostics]
            trace_dispatch = "yes"
            "#,
        );
        assert!(parsed.is_err());
    }
}
