//! Theme handle and builder.

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use serde_json::{Map, Value};

/// Backing storage shared by every clone of a [`Theme`].
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ThemeData {
    pub(crate) name: Option<String>,
    pub(crate) settings: BTreeMap<String, Value>,
    pub(crate) values: Map<String, Value>,
}

/// An opaque theme used when resolving component styling.
///
/// A theme provides two things:
///
/// - a **settings namespace**: named settings objects that
///   [`SettingsLayer::ThemeKey`](crate::SettingsLayer::ThemeKey) layers look up
/// - **ramp values**: arbitrary design values that token functions read,
///   addressed by dotted path
///
/// Cloning a theme is cheap and the clone keeps the same identity, so
/// memoized resolutions are shared between clones. Adding entries to a theme
/// that is shared with other handles produces a new identity.
///
/// # Example
///
/// ```rust
/// use compose_styling::Theme;
/// use serde_json::json;
///
/// let theme = Theme::named("light")
///     .add_value("colors", json!({ "brand": "#0078d4", "text": "#323130" }))
///     .add_settings("Button", json!({ "root": { "classes": ["btn-light"] } }));
///
/// assert_eq!(theme.value("colors.brand"), Some(&json!("#0078d4")));
/// assert!(theme.settings("Button").is_some());
/// assert!(theme.settings("Checkbox").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Theme {
    inner: Arc<ThemeData>,
}

impl Theme {
    /// Creates an empty, unnamed theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty theme with a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::from_data(ThemeData {
            name: Some(name.into()),
            ..ThemeData::default()
        })
    }

    pub(crate) fn from_data(data: ThemeData) -> Self {
        Self {
            inner: Arc::new(data),
        }
    }

    /// Adds a named settings object, returning an updated theme for chaining.
    ///
    /// The value should be an object keyed by slot name. Anything else is
    /// reported when a layer first resolves it.
    pub fn add_settings(mut self, name: &str, settings: Value) -> Self {
        Arc::make_mut(&mut self.inner)
            .settings
            .insert(name.to_string(), settings);
        self
    }

    /// Adds a top-level ramp value, returning an updated theme for chaining.
    pub fn add_value(mut self, key: &str, value: Value) -> Self {
        Arc::make_mut(&mut self.inner)
            .values
            .insert(key.to_string(), value);
        self
    }

    /// Returns the theme's display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Looks up a named entry in the settings namespace.
    pub fn settings(&self, name: &str) -> Option<&Value> {
        self.inner.settings.get(name)
    }

    /// Names in the settings namespace, in sorted order.
    pub fn setting_names(&self) -> impl Iterator<Item = &str> {
        self.inner.settings.keys().map(String::as_str)
    }

    /// Looks up a ramp value by dotted path, e.g. `"colors.brand"`.
    ///
    /// Path segments index into objects by key and into arrays by position.
    pub fn value(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.inner.values.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Returns all top-level ramp values.
    pub fn values(&self) -> &Map<String, Value> {
        &self.inner.values
    }

    /// Returns true if both handles refer to the same theme instance.
    pub fn ptr_eq(&self, other: &Theme) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    pub(crate) fn downgrade(&self) -> Weak<ThemeData> {
        Arc::downgrade(&self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_theme_add_settings() {
        let theme = Theme::new().add_settings("Button", json!({ "root": {} }));
        assert_eq!(theme.settings("Button"), Some(&json!({ "root": {} })));
        assert!(theme.settings("Missing").is_none());
    }

    #[test]
    fn test_theme_value_nested_path() {
        let theme = Theme::new().add_value(
            "ramp",
            json!({ "neutral": ["#fff", "#eee", "#ddd"], "space": { "s1": 4 } }),
        );

        assert_eq!(theme.value("ramp.neutral.1"), Some(&json!("#eee")));
        assert_eq!(theme.value("ramp.space.s1"), Some(&json!(4)));
        assert!(theme.value("ramp.neutral.9").is_none());
        assert!(theme.value("ramp.space.s1.deeper").is_none());
        assert!(theme.value("nothing").is_none());
    }

    #[test]
    fn test_theme_clone_shares_identity() {
        let theme = Theme::named("dark");
        let clone = theme.clone();
        assert!(theme.ptr_eq(&clone));
        assert_eq!(theme.id(), clone.id());
    }

    #[test]
    fn test_theme_builder_on_shared_handle_forks_identity() {
        let theme = Theme::new();
        let shared = theme.clone();
        let extended = shared.add_value("x", json!(1));

        assert!(!theme.ptr_eq(&extended));
        assert!(theme.value("x").is_none());
        assert_eq!(extended.value("x"), Some(&json!(1)));
    }

    #[test]
    fn test_theme_default_is_unnamed() {
        let theme = Theme::default();
        assert!(theme.name().is_none());
        assert!(theme.values().is_empty());
        assert_eq!(Theme::named("hc").name(), Some("hc"));
    }
}
