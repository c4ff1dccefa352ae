//! Ordered, persistent sequences of settings layers.

use std::sync::Arc;

use super::layer::SettingsLayer;
use super::merge::{merge_settings, ComponentSettings, TOKENS_KEY};
use crate::error::{Result, SlotReference, StylingError};
use crate::theme::Theme;

struct StackSegment {
    parent: Option<Arc<StackSegment>>,
    layers: Vec<SettingsLayer>,
    len: usize,
}

/// An ordered sequence of [`SettingsLayer`]s.
///
/// Stacks are persistent: [`extend`](Self::extend) returns a new stack that
/// shares every existing layer with the original, which is never modified.
/// This is what lets each step of a compose chain append layers without
/// copying or disturbing its parent.
///
/// # Example
///
/// ```rust
/// use compose_styling::{SettingsLayer, SettingsLayerStack, Theme};
/// use serde_json::json;
///
/// let base = SettingsLayerStack::from_iter([
///     SettingsLayer::literal(json!({ "root": { "color": "red", "classes": ["a"] } })),
/// ]);
/// let child = base.extend([
///     SettingsLayer::literal(json!({ "root": { "color": "blue", "classes": ["b"] } })),
/// ]);
///
/// assert_eq!(base.len(), 1);
/// assert_eq!(child.len(), 2);
///
/// let merged = child.merge(&Theme::new()).unwrap();
/// assert_eq!(merged["root"]["color"], json!("blue"));
/// assert_eq!(merged["root"]["classes"], json!(["a", "b"]));
/// ```
#[derive(Clone, Default)]
pub struct SettingsLayerStack {
    head: Option<Arc<StackSegment>>,
}

impl SettingsLayerStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new stack with `layers` appended after every existing layer.
    pub fn extend(&self, layers: impl IntoIterator<Item = SettingsLayer>) -> Self {
        let layers: Vec<SettingsLayer> = layers.into_iter().collect();
        if layers.is_empty() {
            return self.clone();
        }

        let len = self.len() + layers.len();
        Self {
            head: Some(Arc::new(StackSegment {
                parent: self.head.clone(),
                layers,
                len,
            })),
        }
    }

    /// Total number of layers.
    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |segment| segment.len)
    }

    /// Returns true if the stack holds no layers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates layers in declaration order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &SettingsLayer> + '_ {
        let mut segments = Vec::new();
        let mut cursor = self.head.as_deref();
        while let Some(segment) = cursor {
            segments.push(segment);
            cursor = segment.parent.as_deref();
        }
        segments
            .into_iter()
            .rev()
            .flat_map(|segment| segment.layers.iter())
    }

    /// Returns the layers as an owned vector.
    pub fn to_vec(&self) -> Vec<SettingsLayer> {
        self.iter().cloned().collect()
    }

    /// Returns true if both stacks share the same storage.
    pub fn ptr_eq(&self, other: &SettingsLayerStack) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Resolves every layer against `theme` and merges them in order.
    ///
    /// # Errors
    ///
    /// Fails on the first layer that does not resolve to a valid settings object.
    pub fn merge(&self, theme: &Theme) -> Result<ComponentSettings> {
        self.merge_checked(theme, |_| true)
    }

    /// Like [`merge`](Self::merge), but rejects slot names for which
    /// `is_declared` returns false.
    ///
    /// The reserved [`TOKENS_KEY`] entry is never checked.
    pub fn merge_checked(
        &self,
        theme: &Theme,
        is_declared: impl Fn(&str) -> bool,
    ) -> Result<ComponentSettings> {
        let mut merged = ComponentSettings::new();
        for (index, layer) in self.iter().enumerate() {
            let resolved = layer.resolve(index, theme)?;
            if let Some(slot) = resolved
                .keys()
                .find(|slot| slot.as_str() != TOKENS_KEY && !is_declared(slot.as_str()))
            {
                return Err(StylingError::UnknownSlot {
                    slot: slot.clone(),
                    reference: SlotReference::Settings { layer: index },
                });
            }
            tracing::trace!(layer = index, slots = resolved.len(), "merging settings layer");
            merge_settings(&mut merged, resolved);
        }
        Ok(merged)
    }
}

impl FromIterator<SettingsLayer> for SettingsLayerStack {
    fn from_iter<I: IntoIterator<Item = SettingsLayer>>(iter: I) -> Self {
        SettingsLayerStack::new().extend(iter)
    }
}

impl PartialEq for SettingsLayerStack {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.len() == other.len() && self.iter().eq(other.iter()))
    }
}

impl std::fmt::Debug for SettingsLayerStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
