//! Options contributed by one step of a compose chain.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::definition::{ComponentDefinition, SlotStyleEntry, UsePrepareProps, UseStyling};
use super::statics::Statics;
use crate::error::Result;
use crate::settings::SettingsLayer;
use crate::styling::{OverrideLookup, RenderData, ResolvedSlotProps};
use crate::theme::Theme;
use crate::tokens::SlotTokens;

/// Partial component options, consumed by [`ComponentDefinition::new`] and
/// [`ComponentDefinition::compose`].
///
/// Every field is optional. When composing, anything left unset is inherited
/// from the parent definition.
///
/// # Example
///
/// ```rust
/// use compose_styling::{ComposeOptions, SettingsLayer, SlotStyleEntry, SlotTokens, TokenValue};
/// use serde_json::{json, Value};
///
/// let options = ComposeOptions::<Value>::new()
///     .slot("root", SlotStyleEntry::new())
///     .tokens("root", SlotTokens::new().add("padding", TokenValue::literal(4)))
///     .layer(SettingsLayer::literal(json!({ "root": { "classes": ["card"] } })))
///     .add_static("displayName", "Card");
/// ```
pub struct ComposeOptions<P = Value> {
    pub(crate) slots: BTreeMap<String, SlotStyleEntry<P>>,
    pub(crate) settings: Vec<SettingsLayer>,
    pub(crate) tokens: BTreeMap<String, SlotTokens>,
    pub(crate) statics: Statics,
    pub(crate) use_styling: Option<UseStyling<P>>,
    pub(crate) use_prepare_props: Option<UsePrepareProps<P>>,
}

impl<P> ComposeOptions<P> {
    /// Creates empty options.
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
            settings: Vec::new(),
            tokens: BTreeMap::new(),
            statics: Statics::new(),
            use_styling: None,
            use_prepare_props: None,
        }
    }

    /// Declares a slot, replacing any inherited entry with the same name.
    pub fn slot(mut self, name: &str, entry: SlotStyleEntry<P>) -> Self {
        self.slots.insert(name.to_string(), entry);
        self
    }

    /// Appends one settings layer.
    pub fn layer(mut self, layer: impl Into<SettingsLayer>) -> Self {
        self.settings.push(layer.into());
        self
    }

    /// Appends several settings layers, in order.
    pub fn settings(mut self, layers: impl IntoIterator<Item = SettingsLayer>) -> Self {
        self.settings.extend(layers);
        self
    }

    /// Declares tokens for a slot.
    ///
    /// Calling this twice for the same slot layers the second set over the first.
    pub fn tokens(mut self, slot: &str, tokens: SlotTokens) -> Self {
        let merged = match self.tokens.get(slot) {
            Some(existing) => existing.merged(&tokens),
            None => tokens,
        };
        self.tokens.insert(slot.to_string(), merged);
        self
    }

    /// Attaches a named static value.
    pub fn add_static<T: Any + Send + Sync>(mut self, name: &str, value: T) -> Self {
        self.statics = self.statics.add(name, value);
        self
    }

    /// Attaches several static values at once.
    pub fn statics(mut self, statics: Statics) -> Self {
        self.statics = self.statics.merged(&statics);
        self
    }

    /// Replaces the styling hook.
    ///
    /// The hook receives the definition being rendered, so it can delegate to
    /// [`StylingResolver`](crate::StylingResolver) and adjust the result.
    pub fn use_styling<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ComponentDefinition<P>, &P, &Theme, Option<&dyn OverrideLookup>) -> Result<ResolvedSlotProps>
            + Send
            + Sync
            + 'static,
    {
        self.use_styling = Some(Arc::new(hook));
        self
    }

    /// Replaces the render-data builder.
    ///
    /// The builder receives the props and a styling callback already bound to
    /// the active theme and the definition's styling hook.
    pub fn use_prepare_props<F>(mut self, hook: F) -> Self
    where
        F: Fn(
                &P,
                &dyn Fn(&P, Option<&dyn OverrideLookup>) -> Result<ResolvedSlotProps>,
            ) -> Result<RenderData>
            + Send
            + Sync
            + 'static,
    {
        self.use_prepare_props = Some(Arc::new(hook));
        self
    }
}

impl<P> Default for ComposeOptions<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> std::fmt::Debug for ComposeOptions<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposeOptions")
            .field("slots", &self.slots.keys().collect::<Vec<_>>())
            .field("settings", &self.settings)
            .field("tokens", &self.tokens)
            .field("statics", &self.statics)
            .field("use_styling", &self.use_styling.is_some())
            .field("use_prepare_props", &self.use_prepare_props.is_some())
            .finish()
    }
}
