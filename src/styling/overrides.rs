//! Caller-supplied last-mile overrides.

use crate::settings::{ComponentSettings, Props};

/// Supplies per-slot property overrides for a single render pass.
///
/// Overrides are merged after settings and style factories, so they always
/// win. Any `Fn(&str) -> Option<Props>` closure is a lookup.
///
/// # Example
///
/// ```rust
/// use compose_styling::{OverrideLookup, Props};
/// use serde_json::json;
///
/// let lookup = |slot: &str| -> Option<Props> {
///     (slot == "root").then(|| json!({ "color": "green" }).as_object().cloned().unwrap())
/// };
/// assert!(lookup.lookup("root").is_some());
/// assert!(lookup.lookup("label").is_none());
/// ```
pub trait OverrideLookup {
    /// Returns the override fragment for `slot`, if any.
    fn lookup(&self, slot: &str) -> Option<Props>;
}

impl<F> OverrideLookup for F
where
    F: Fn(&str) -> Option<Props>,
{
    fn lookup(&self, slot: &str) -> Option<Props> {
        self(slot)
    }
}

/// A lookup backed by fixed per-slot settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticOverrides(pub ComponentSettings);

impl OverrideLookup for StaticOverrides {
    fn lookup(&self, slot: &str) -> Option<Props> {
        self.0.get(slot).cloned()
    }
}

impl FromIterator<(String, Props)> for StaticOverrides {
    fn from_iter<I: IntoIterator<Item = (String, Props)>>(iter: I) -> Self {
        StaticOverrides(iter.into_iter().collect())
    }
}
