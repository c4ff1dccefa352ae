//! A single contribution to a component's settings.

use std::sync::Arc;

use serde_json::Value;

use super::merge::ComponentSettings;
use crate::error::{kind_of, LayerSource, Result, StylingError};
use crate::theme::Theme;

/// Function computing a settings object from the active theme.
pub type ThemeSettingsFn = Arc<dyn Fn(&Theme) -> Value + Send + Sync>;

/// One ordered contribution to a component's settings.
///
/// Each layer resolves to an object keyed by slot name. Layers resolve
/// independently and are then merged in declaration order, so a later layer
/// overrides scalars and extends sequences contributed by earlier ones.
///
/// # Example
///
/// ```rust
/// use compose_styling::{SettingsLayer, Theme};
/// use serde_json::json;
///
/// let layers = [
///     SettingsLayer::literal(json!({ "root": { "classes": ["button"] } })),
///     // Optional hook: themes without a "Button" entry contribute nothing.
///     SettingsLayer::theme_key("Button"),
///     SettingsLayer::theme_fn(|theme: &Theme| {
///         json!({ "root": { "color": theme.value("colors.brand") } })
///     }),
/// ];
/// ```
#[derive(Clone)]
pub enum SettingsLayer {
    /// A settings object used as-is.
    Literal(Value),
    /// The name of an entry in the theme's settings namespace.
    ThemeKey(String),
    /// A function from the theme to a settings object.
    ThemeFunction(ThemeSettingsFn),
}

impl SettingsLayer {
    /// Creates a literal layer.
    pub fn literal(settings: Value) -> Self {
        SettingsLayer::Literal(settings)
    }

    /// Creates a layer that looks up `name` in the theme.
    pub fn theme_key(name: impl Into<String>) -> Self {
        SettingsLayer::ThemeKey(name.into())
    }

    /// Creates a layer computed from the theme.
    pub fn theme_fn<F>(f: F) -> Self
    where
        F: Fn(&Theme) -> Value + Send + Sync + 'static,
    {
        SettingsLayer::ThemeFunction(Arc::new(f))
    }

    /// Resolves this layer against `theme`.
    ///
    /// `index` is the layer's position in its stack and only feeds error messages.
    ///
    /// # Errors
    ///
    /// Fails if the layer does not produce an object, or if any slot entry in
    /// that object is not itself an object. A theme key absent from the theme
    /// is not an error and resolves to empty settings.
    pub fn resolve(&self, index: usize, theme: &Theme) -> Result<ComponentSettings> {
        match self {
            SettingsLayer::Literal(value) => {
                settings_from_value(index, LayerSource::Literal, value.clone())
            }
            SettingsLayer::ThemeKey(name) => match theme.settings(name) {
                Some(value) => settings_from_value(
                    index,
                    LayerSource::ThemeKey(name.clone()),
                    value.clone(),
                ),
                None => {
                    tracing::debug!(layer = index, key = %name, "theme has no settings entry, skipping");
                    Ok(ComponentSettings::new())
                }
            },
            SettingsLayer::ThemeFunction(f) => {
                settings_from_value(index, LayerSource::ThemeFunction, f(theme))
            }
        }
    }
}

fn settings_from_value(
    index: usize,
    source_kind: LayerSource,
    value: Value,
) -> Result<ComponentSettings> {
    let slots = match value {
        Value::Object(slots) => slots,
        other => {
            return Err(StylingError::InvalidLayer {
                index,
                source_kind,
                found: kind_of(&other),
            })
        }
    };

    slots
        .into_iter()
        .map(|(slot, props)| match props {
            Value::Object(props) => Ok((slot, props)),
            other => Err(StylingError::MalformedSlot {
                index,
                slot,
                found: kind_of(&other),
            }),
        })
        .collect()
}

impl From<Value> for SettingsLayer {
    fn from(settings: Value) -> Self {
        SettingsLayer::Literal(settings)
    }
}

impl From<&str> for SettingsLayer {
    fn from(name: &str) -> Self {
        SettingsLayer::ThemeKey(name.to_string())
    }
}

impl PartialEq for SettingsLayer {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SettingsLayer::Literal(a), SettingsLayer::Literal(b)) => a == b,
            (SettingsLayer::ThemeKey(a), SettingsLayer::ThemeKey(b)) => a == b,
            (SettingsLayer::ThemeFunction(a), SettingsLayer::ThemeFunction(b)) => {
                Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for SettingsLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsLayer::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            SettingsLayer::ThemeKey(name) => f.debug_tuple("ThemeKey").field(name).finish(),
            SettingsLayer::ThemeFunction(_) => f.write_str("ThemeFunction(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_resolves_as_is() {
        let layer = SettingsLayer::literal(json!({ "root": { "color": "red" } }));
        let settings = layer.resolve(0, &Theme::new()).unwrap();
        assert_eq!(settings["root"]["color"], json!("red"));
    }

    #[test]
    fn test_theme_key_present() {
        let theme = Theme::new().add_settings("Button", json!({ "root": { "color": "blue" } }));
        let settings = SettingsLayer::theme_key("Button").resolve(0, &theme).unwrap();
        assert_eq!(settings["root"]["color"], json!("blue"));
    }

    #[test]
    fn test_theme_key_missing_is_empty() {
        let settings = SettingsLayer::theme_key("Button")
            .resolve(0, &Theme::new())
            .unwrap();
        assert!(settings.is_empty());
    }

    #[test]
    fn test_theme_function_reads_theme() {
        let theme = Theme::new().add_value("brand", json!("teal"));
        let layer = SettingsLayer::theme_fn(|t: &Theme| json!({ "root": { "color": t.value("brand") } }));
        let settings = layer.resolve(0, &theme).unwrap();
        assert_eq!(settings["root"]["color"], json!("teal"));
    }

    #[test]
    fn test_theme_function_non_object_fails() {
        let layer = SettingsLayer::theme_fn(|_: &Theme| json!("oops"));
        let err = layer.resolve(3, &Theme::new()).unwrap_err();
        assert!(matches!(
            err,
            StylingError::InvalidLayer {
                index: 3,
                source_kind: LayerSource::ThemeFunction,
                found: "a string",
            }
        ));
    }

    #[test]
    fn test_theme_key_non_object_fails() {
        let theme = Theme::new().add_settings("Button", json!(42));
        let err = SettingsLayer::theme_key("Button").resolve(0, &theme).unwrap_err();
        assert!(matches!(err, StylingError::InvalidLayer { .. }));
    }

    #[test]
    fn test_malformed_slot_entry_fails() {
        let layer = SettingsLayer::literal(json!({ "root": ["not", "props"] }));
        let err = layer.resolve(1, &Theme::new()).unwrap_err();
        assert!(matches!(
            err,
            StylingError::MalformedSlot { index: 1, ref slot, .. } if slot == "root"
        ));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(
            SettingsLayer::from("Button"),
            SettingsLayer::ThemeKey("Button".into())
        );
        assert_eq!(
            SettingsLayer::from(json!({})),
            SettingsLayer::Literal(json!({}))
        );
    }

    #[test]
    fn test_function_layers_compare_by_identity() {
        let layer = SettingsLayer::theme_fn(|_: &Theme| json!({}));
        let same = layer.clone();
        let other = SettingsLayer::theme_fn(|_: &Theme| json!({}));
        assert_eq!(layer, same);
        assert_ne!(layer, other);
    }
}
