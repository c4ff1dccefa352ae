//! The default styling pipeline.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::output::ResolvedSlotProps;
use super::overrides::OverrideLookup;
use crate::compose::ComponentDefinition;
use crate::error::{Result, StylingError};
use crate::settings::{merge_props, ComponentSettings, TOKENS_KEY};
use crate::theme::Theme;
use crate::tokens::{resolve_tokens, ResolvedTokenMap, TokenMap};

/// Resolves a definition into final per-slot props.
///
/// For each render pass, resolution runs these steps in order:
///
/// 1. Resolve each slot's tokens against the theme (memoized per token set and theme)
/// 2. Merge the settings layers against the theme (memoized per definition and theme)
/// 3. Retune declared tokens from the settings' reserved `tokens` entry
/// 4. Start each slot from its merged settings and merge in its style
///    factory's fragment, if the slot's filter accepts the props
/// 5. Merge the override lookup's fragment for each slot last
///
/// All merges follow the same rule as settings layers. Apart from the two
/// memos, resolution keeps no state between calls, so it is idempotent and
/// independent render passes do not interact.
///
/// # Example
///
/// ```rust
/// use compose_styling::{
///     ComponentDefinition, ComposeOptions, Props, SlotStyleEntry, SlotTokens, StylingResolver,
///     Theme, TokenValue,
/// };
/// use serde_json::{json, Value};
///
/// let definition = ComponentDefinition::new(
///     ComposeOptions::<Value>::new()
///         .slot("root", SlotStyleEntry::styled(|_props, tokens, _theme| {
///             let mut style = Props::new();
///             style.insert("background".into(), tokens["background"].clone());
///             style
///         }))
///         .tokens("root", SlotTokens::new().add("background", TokenValue::theme_value("colors.surface")))
///         .layer(json!({ "root": { "classes": ["card"] } })),
/// );
///
/// let theme = Theme::new().add_value("colors", json!({ "surface": "#fafafa" }));
/// let green = |slot: &str| (slot == "root").then(|| {
///     json!({ "border": "green" }).as_object().cloned().unwrap()
/// });
///
/// let slots = StylingResolver::new(&definition)
///     .resolve(&json!({}), &theme, Some(&green))
///     .unwrap();
/// let root = slots.get("root").unwrap();
/// assert_eq!(root["classes"], json!(["card"]));
/// assert_eq!(root["background"], json!("#fafafa"));
/// assert_eq!(root["border"], json!("green"));
/// ```
#[derive(Debug)]
pub struct StylingResolver<'a, P> {
    definition: &'a ComponentDefinition<P>,
}

impl<'a, P> StylingResolver<'a, P> {
    /// Creates a resolver for `definition`.
    pub fn new(definition: &'a ComponentDefinition<P>) -> Self {
        Self { definition }
    }

    /// Resolves token definitions for every slot that declares any.
    ///
    /// # Errors
    ///
    /// Fails if tokens are bound to an undeclared slot or a token function fails.
    pub fn resolved_tokens(&self, theme: &Theme) -> Result<ResolvedTokenMap> {
        resolve_tokens(self.definition.tokens(), theme, |slot| {
            self.definition.has_slot(slot)
        })
    }

    /// Merges the definition's settings layers against `theme`.
    ///
    /// # Errors
    ///
    /// Fails if a layer is malformed or names an undeclared slot, or if the
    /// definition declares a slot under the reserved [`TOKENS_KEY`] name.
    pub fn merged_settings(&self, theme: &Theme) -> Result<Arc<ComponentSettings>> {
        let definition = self.definition;
        if definition.has_slot(TOKENS_KEY) {
            return Err(StylingError::ReservedSlot {
                slot: TOKENS_KEY.to_string(),
            });
        }
        definition.settings_cache().get_or_try_insert_with(theme, || {
            tracing::debug!(
                layers = definition.settings().len(),
                theme = ?theme.name(),
                "merging settings"
            );
            definition
                .settings()
                .merge_checked(theme, |slot| definition.has_slot(slot))
        })
    }

    /// Runs the full pipeline for one render pass.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error or token function failure.
    pub fn resolve(
        &self,
        props: &P,
        theme: &Theme,
        lookup: Option<&dyn OverrideLookup>,
    ) -> Result<ResolvedSlotProps> {
        let tokens = self.resolved_tokens(theme)?;
        let settings = self.merged_settings(theme)?;
        let retuned = settings.get(TOKENS_KEY);
        let no_tokens = TokenMap::new();

        let mut resolved = BTreeMap::new();
        for (slot, entry) in self.definition.slots() {
            let mut slot_props = settings.get(slot).cloned().unwrap_or_default();

            if let Some(factory) = entry.factory() {
                if entry.applies_to(props) {
                    let slot_tokens = tokens.get(slot).map_or(&no_tokens, |tokens| &**tokens);
                    let slot_tokens = retune(slot_tokens, retuned);
                    merge_props(&mut slot_props, factory(props, &*slot_tokens, theme));
                } else {
                    tracing::trace!(slot = %slot, "style factory filtered out");
                }
            }

            if let Some(fragment) = lookup.and_then(|lookup| lookup.lookup(slot)) {
                tracing::trace!(slot = %slot, keys = fragment.len(), "applying override");
                merge_props(&mut slot_props, fragment);
            }

            resolved.insert(slot.clone(), slot_props);
        }

        Ok(ResolvedSlotProps::from_map(resolved))
    }
}

/// Overwrites declared tokens with values from the settings' `tokens` entry.
fn retune<'t>(tokens: &'t TokenMap, retuned: Option<&TokenMap>) -> Cow<'t, TokenMap> {
    let Some(retuned) = retuned else {
        return Cow::Borrowed(tokens);
    };
    if !retuned.keys().any(|key| tokens.contains_key(key)) {
        return Cow::Borrowed(tokens);
    }

    let mut tokens = tokens.clone();
    for (key, value) in retuned {
        if let Some(slot) = tokens.get_mut(key) {
            *slot = value.clone();
        }
    }
    Cow::Owned(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{ComposeOptions, SlotStyleEntry};
    use crate::error::{SlotReference, StylingError};
    use crate::settings::{Props, SettingsLayer};
    use crate::tokens::{SlotTokens, TokenValue};
    use serde_json::{json, Value};

    fn props(value: Value) -> Props {
        value.as_object().cloned().unwrap_or_default()
    }

    fn echo_tokens() -> SlotStyleEntry<Value> {
        SlotStyleEntry::styled(|_: &Value, tokens: &TokenMap, _: &Theme| tokens.clone())
    }

    #[test]
    fn test_every_declared_slot_present() {
        let definition = ComponentDefinition::new(
            ComposeOptions::<Value>::new()
                .slot("root", SlotStyleEntry::new())
                .slot("icon", SlotStyleEntry::new()),
        );
        let slots = StylingResolver::new(&definition)
            .resolve(&json!({}), &Theme::new(), None)
            .unwrap();
        assert_eq!(slots.slot_names().collect::<Vec<_>>(), ["icon", "root"]);
        assert!(slots.get("icon").unwrap().is_empty());
    }

    #[test]
    fn test_factory_overrides_settings() {
        let definition = ComponentDefinition::new(
            ComposeOptions::<Value>::new()
                .slot(
                    "root",
                    SlotStyleEntry::styled(|_: &Value, _: &TokenMap, _: &Theme| {
                        props(json!({ "color": "blue", "classes": ["factory"] }))
                    }),
                )
                .layer(json!({ "root": { "color": "red", "classes": ["settings"], "margin": 1 } })),
        );
        let slots = StylingResolver::new(&definition)
            .resolve(&json!({}), &Theme::new(), None)
            .unwrap();
        assert_eq!(
            Value::Object(slots.get("root").unwrap().clone()),
            json!({ "color": "blue", "classes": ["settings", "factory"], "margin": 1 })
        );
    }

    #[test]
    fn test_filter_skips_factory() {
        let definition = ComponentDefinition::new(ComposeOptions::<Value>::new().slot(
            "root",
            SlotStyleEntry::styled(|_: &Value, _: &TokenMap, _: &Theme| props(json!({ "x": 1 })))
                .with_filter(|props: &Value| props["enabled"] == json!(true)),
        ));
        let resolver = StylingResolver::new(&definition);
        let theme = Theme::new();

        let on = resolver.resolve(&json!({ "enabled": true }), &theme, None).unwrap();
        let off = resolver.resolve(&json!({ "enabled": false }), &theme, None).unwrap();
        assert_eq!(on.get("root").unwrap()["x"], json!(1));
        assert!(off.get("root").unwrap().is_empty());
    }

    #[test]
    fn test_override_beats_settings_and_factory() {
        let definition = ComponentDefinition::new(
            ComposeOptions::<Value>::new()
                .slot(
                    "root",
                    SlotStyleEntry::styled(|_: &Value, _: &TokenMap, _: &Theme| {
                        props(json!({ "color": "blue" }))
                    }),
                )
                .layer(json!({ "root": { "color": "red" } })),
        );
        let lookup = |slot: &str| (slot == "root").then(|| props(json!({ "color": "green" })));
        let slots = StylingResolver::new(&definition)
            .resolve(&json!({}), &Theme::new(), Some(&lookup))
            .unwrap();
        assert_eq!(slots.get("root").unwrap()["color"], json!("green"));
    }

    #[test]
    fn test_factory_receives_resolved_tokens() {
        let definition = ComponentDefinition::new(
            ComposeOptions::<Value>::new()
                .slot("root", echo_tokens())
                .tokens(
                    "root",
                    SlotTokens::new()
                        .add("gap", TokenValue::literal(4))
                        .add("color", TokenValue::theme_value("brand")),
                ),
        );
        let theme = Theme::new().add_value("brand", json!("teal"));
        let slots = StylingResolver::new(&definition)
            .resolve(&json!({}), &theme, None)
            .unwrap();
        assert_eq!(
            Value::Object(slots.get("root").unwrap().clone()),
            json!({ "gap": 4, "color": "teal" })
        );
    }

    #[test]
    fn test_settings_tokens_retune_declared_tokens() {
        let definition = ComponentDefinition::new(
            ComposeOptions::<Value>::new()
                .slot("root", echo_tokens())
                .tokens("root", SlotTokens::new().add("gap", TokenValue::literal(4)))
                .layer(json!({ "tokens": { "gap": 8, "undeclared": true } })),
        );
        let slots = StylingResolver::new(&definition)
            .resolve(&json!({}), &Theme::new(), None)
            .unwrap();
        assert_eq!(
            Value::Object(slots.get("root").unwrap().clone()),
            json!({ "gap": 8 })
        );
        assert!(slots.get(TOKENS_KEY).is_none());
    }

    #[test]
    fn test_settings_for_undeclared_slot_fail() {
        let definition = ComponentDefinition::new(
            ComposeOptions::<Value>::new()
                .slot("root", SlotStyleEntry::new())
                .layer(SettingsLayer::literal(json!({ "ghost": { "x": 1 } }))),
        );
        let err = StylingResolver::new(&definition)
            .resolve(&json!({}), &Theme::new(), None)
            .unwrap_err();
        assert!(matches!(
            err,
            StylingError::UnknownSlot { ref slot, reference: SlotReference::Settings { layer: 0 } }
                if slot == "ghost"
        ));
    }

    #[test]
    fn test_token_failure_propagates() {
        let definition = ComponentDefinition::new(
            ComposeOptions::<Value>::new()
                .slot("root", echo_tokens())
                .tokens("root", SlotTokens::new().add("color", TokenValue::theme_value("nope"))),
        );
        let err = StylingResolver::new(&definition)
            .resolve(&json!({}), &Theme::new(), None)
            .unwrap_err();
        assert!(matches!(err, StylingError::TokenFunction { .. }));
    }

    #[test]
    fn test_merged_settings_memoized_per_theme() {
        let definition = ComponentDefinition::new(
            ComposeOptions::<Value>::new()
                .slot("root", SlotStyleEntry::new())
                .layer(SettingsLayer::theme_key("Card")),
        );
        let resolver = StylingResolver::new(&definition);
        let light = Theme::new().add_settings("Card", json!({ "root": { "bg": "white" } }));
        let dark = Theme::new().add_settings("Card", json!({ "root": { "bg": "black" } }));

        let first = resolver.merged_settings(&light).unwrap();
        let again = resolver.merged_settings(&light).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(resolver.merged_settings(&dark).unwrap()["root"]["bg"], json!("black"));
        assert_eq!(definition.cached_theme_count(), 2);

        drop(dark);
        assert_eq!(definition.cached_theme_count(), 1);
    }

    #[test]
    fn test_tokens_slot_name_is_reserved() {
        let definition = ComponentDefinition::new(
            ComposeOptions::<Value>::new()
                .slot("root", SlotStyleEntry::new())
                .slot("tokens", SlotStyleEntry::new())
                .layer(json!({ "tokens": { "gap": 8 } })),
        );
        let err = StylingResolver::new(&definition)
            .resolve(&json!({}), &Theme::new(), None)
            .unwrap_err();
        assert!(matches!(err, StylingError::ReservedSlot { ref slot } if slot == TOKENS_KEY));
        assert_eq!(definition.cached_theme_count(), 0);
    }

    #[test]
    fn test_tokens_entry_never_reaches_output() {
        let definition = ComponentDefinition::new(
            ComposeOptions::<Value>::new()
                .slot("root", echo_tokens())
                .tokens("root", SlotTokens::new().add("gap", TokenValue::literal(4)))
                .layer(json!({ "tokens": { "gap": 8 } })),
        );
        let slots = StylingResolver::new(&definition)
            .resolve(&json!({}), &Theme::new(), None)
            .unwrap();
        assert!(slots.get(TOKENS_KEY).is_none());
        assert_eq!(slots.get("root").unwrap()["gap"], json!(8));
    }

    #[test]
    fn test_retune_borrows_when_nothing_matches() {
        let tokens = props(json!({ "gap": 4 }));
        let unrelated = props(json!({ "color": "red" }));
        assert!(matches!(retune(&tokens, None), Cow::Borrowed(_)));
        assert!(matches!(retune(&tokens, Some(&unrelated)), Cow::Borrowed(_)));
        assert_eq!(
            retune(&tokens, Some(&props(json!({ "gap": 2 })))).into_owned(),
            props(json!({ "gap": 2 }))
        );
    }
}
