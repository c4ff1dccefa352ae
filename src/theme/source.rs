//! Loading themes from YAML or JSON configuration.
//!
//! A theme file has three optional top-level keys:
//!
//! ```yaml
//! name: contoso-light
//! values:
//!   colors:
//!     brand: "#0078d4"
//! settings:
//!   Button:
//!     root:
//!       classes: [btn-contoso]
//! ```
//!
//! `settings` entries must be objects; they are checked when the file is
//! loaded so a malformed theme fails before any component resolves against it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::theme::{Theme, ThemeData};
use crate::error::{kind_of, ThemeError};

/// Serialized form of a [`Theme`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeSource {
    /// Optional display name.
    pub name: Option<String>,
    /// Named settings objects, looked up by theme-key layers.
    pub settings: BTreeMap<String, Value>,
    /// Ramp values read by token functions.
    pub values: Map<String, Value>,
}

impl TryFrom<ThemeSource> for Theme {
    type Error = ThemeError;

    fn try_from(source: ThemeSource) -> Result<Self, Self::Error> {
        for (name, settings) in &source.settings {
            if !settings.is_object() {
                return Err(ThemeError::InvalidSettings {
                    name: name.clone(),
                    found: kind_of(settings),
                });
            }
        }

        Ok(Theme::from_data(ThemeData {
            name: source.name,
            settings: source.settings,
            values: source.values,
        }))
    }
}

impl Theme {
    /// Parses a theme from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a settings entry is not a mapping.
    pub fn from_yaml(content: &str) -> Result<Self, ThemeError> {
        let source: ThemeSource = serde_yaml::from_str(content)?;
        Theme::try_from(source)
    }

    /// Parses a theme from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a settings entry is not an object.
    pub fn from_json(content: &str) -> Result<Self, ThemeError> {
        let source: ThemeSource = serde_json::from_str(content)?;
        Theme::try_from(source)
    }

    /// Reads a theme file, choosing the parser by extension.
    ///
    /// `.yaml` and `.yml` are parsed as YAML, `.json` as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let parse: fn(&str) -> Result<Theme, ThemeError> = match extension.as_deref() {
            Some("yaml") | Some("yml") => Theme::from_yaml,
            Some("json") => Theme::from_json,
            _ => {
                return Err(ThemeError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        let content = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let theme = parse(&content)?;
        tracing::debug!(path = %path.display(), name = ?theme.name(), "loaded theme");
        Ok(theme)
    }

    /// Snapshots this theme into its serializable form.
    pub fn to_source(&self) -> ThemeSource {
        ThemeSource {
            name: self.name().map(str::to_string),
            settings: self
                .setting_names()
                .filter_map(|name| Some((name.to_string(), self.settings(name)?.clone())))
                .collect(),
            values: self.values().clone(),
        }
    }
}
