//! Immutable component definitions and the compose chain.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::options::ComposeOptions;
use super::statics::Statics;
use crate::cache::ThemeCache;
use crate::error::Result;
use crate::settings::{ComponentSettings, Props, SettingsLayer, SettingsLayerStack};
use crate::styling::{OverrideLookup, RenderData, ResolvedSlotProps, StylingResolver};
use crate::theme::Theme;
use crate::tokens::{SlotTokens, TokenMap};

/// Builds a slot's style fragment from props, resolved tokens and the theme.
pub type StyleFactory<P> = Arc<dyn Fn(&P, &TokenMap, &Theme) -> Props + Send + Sync>;

/// Decides whether a slot's style factory applies to the given props.
pub type SlotFilter<P> = Arc<dyn Fn(&P) -> bool + Send + Sync>;

/// Replacement for the default styling pipeline.
pub type UseStyling<P> = Arc<
    dyn Fn(&ComponentDefinition<P>, &P, &Theme, Option<&dyn OverrideLookup>) -> Result<ResolvedSlotProps>
        + Send
        + Sync,
>;

/// Builds render data from props and a bound styling callback.
pub type UsePrepareProps<P> = Arc<
    dyn Fn(&P, &dyn Fn(&P, Option<&dyn OverrideLookup>) -> Result<ResolvedSlotProps>) -> Result<RenderData>
        + Send
        + Sync,
>;

/// A declared slot and its optional style factory.
///
/// # Example
///
/// ```rust
/// use compose_styling::SlotStyleEntry;
/// use serde_json::{json, Value};
///
/// let icon: SlotStyleEntry<Value> = SlotStyleEntry::styled(|_props, tokens, _theme| {
///     let mut style = serde_json::Map::new();
///     style.insert("size".into(), tokens.get("iconSize").cloned().unwrap_or(json!(16)));
///     style
/// })
/// .with_filter(|props: &Value| props.get("icon").is_some());
/// ```
pub struct SlotStyleEntry<P> {
    factory: Option<StyleFactory<P>>,
    filter: Option<SlotFilter<P>>,
}

impl<P> SlotStyleEntry<P> {
    /// Declares a slot with no style factory.
    pub fn new() -> Self {
        Self {
            factory: None,
            filter: None,
        }
    }

    /// Declares a slot whose style comes from `factory`.
    pub fn styled<F>(factory: F) -> Self
    where
        F: Fn(&P, &TokenMap, &Theme) -> Props + Send + Sync + 'static,
    {
        Self {
            factory: Some(Arc::new(factory)),
            filter: None,
        }
    }

    /// Restricts the factory to props accepted by `filter`.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// The style factory, if any.
    pub fn factory(&self) -> Option<&StyleFactory<P>> {
        self.factory.as_ref()
    }

    /// The factory filter, if any.
    pub fn filter(&self) -> Option<&SlotFilter<P>> {
        self.filter.as_ref()
    }

    /// Returns true if the factory should run for `props`.
    pub fn applies_to(&self, props: &P) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(props))
    }
}

impl<P> Default for SlotStyleEntry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for SlotStyleEntry<P> {
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
            filter: self.filter.clone(),
        }
    }
}

fn same_fn<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl<P> PartialEq for SlotStyleEntry<P> {
    fn eq(&self, other: &Self) -> bool {
        same_fn(&self.factory, &other.factory) && same_fn(&self.filter, &other.filter)
    }
}

impl<P> std::fmt::Debug for SlotStyleEntry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotStyleEntry")
            .field("factory", &self.factory.is_some())
            .field("filter", &self.filter.is_some())
            .finish()
    }
}

/// Declared slots, keyed by name.
pub type SlotMap<P> = BTreeMap<String, SlotStyleEntry<P>>;

/// Token definitions, keyed by slot name.
pub type TokenDefinitions = BTreeMap<String, SlotTokens>;

struct DefinitionInner<P> {
    slots: Arc<SlotMap<P>>,
    settings: SettingsLayerStack,
    tokens: Arc<TokenDefinitions>,
    statics: Statics,
    use_styling: Option<UseStyling<P>>,
    use_prepare_props: Option<UsePrepareProps<P>>,
    settings_cache: ThemeCache<ComponentSettings>,
}

/// An immutable component definition.
///
/// A definition bundles the component's slots, its ordered settings layers,
/// per-slot token definitions, statics and optional hooks. It never changes
/// after construction: [`compose`](Self::compose) and
/// [`customize`](Self::customize) return new definitions that share every
/// unchanged part with their parent, so any definition in a chain stays
/// independently usable.
///
/// Cloning a definition is cheap and keeps its identity, including the
/// memoized settings for each theme it has been resolved against.
///
/// # Example
///
/// ```rust
/// use compose_styling::{ComponentDefinition, ComposeOptions, SettingsLayer, SlotStyleEntry, Theme};
/// use serde_json::{json, Value};
///
/// let button = ComponentDefinition::new(
///     ComposeOptions::<Value>::new()
///         .slot("root", SlotStyleEntry::new())
///         .slot("label", SlotStyleEntry::new())
///         .layer(json!({ "root": { "classes": ["button"], "color": "black" } })),
/// );
///
/// let primary = button.customize([SettingsLayer::literal(
///     json!({ "root": { "classes": ["primary"], "color": "white" } }),
/// )]);
///
/// let slots = primary.use_styling(&json!({}), &Theme::new(), None).unwrap();
/// assert_eq!(slots.get("root").unwrap()["classes"], json!(["button", "primary"]));
/// assert_eq!(slots.get("root").unwrap()["color"], json!("white"));
/// assert_eq!(button.settings().len(), 1);
/// ```
pub struct ComponentDefinition<P = Value> {
    inner: Arc<DefinitionInner<P>>,
}

impl<P> ComponentDefinition<P> {
    /// Creates a root definition from options.
    pub fn new(options: ComposeOptions<P>) -> Self {
        Self::from_parts(
            Arc::new(options.slots),
            SettingsLayerStack::from_iter(options.settings),
            Arc::new(options.tokens),
            options.statics,
            options.use_styling,
            options.use_prepare_props,
        )
    }

    fn from_parts(
        slots: Arc<SlotMap<P>>,
        settings: SettingsLayerStack,
        tokens: Arc<TokenDefinitions>,
        statics: Statics,
        use_styling: Option<UseStyling<P>>,
        use_prepare_props: Option<UsePrepareProps<P>>,
    ) -> Self {
        Self {
            inner: Arc::new(DefinitionInner {
                slots,
                settings,
                tokens,
                statics,
                use_styling,
                use_prepare_props,
                settings_cache: ThemeCache::new(),
            }),
        }
    }

    /// Returns a new definition extending this one with `options`.
    ///
    /// - slots: new entries replace same-named ones, others are kept
    /// - settings: new layers are appended after the inherited ones
    /// - tokens: merged per slot, new keys replace same-named ones
    /// - statics: merged by name
    /// - hooks: replaced when given, inherited otherwise
    ///
    /// `self` is left untouched.
    pub fn compose(&self, options: ComposeOptions<P>) -> Self {
        let parent = &self.inner;
        tracing::debug!(
            slots = options.slots.len(),
            layers = options.settings.len(),
            token_slots = options.tokens.len(),
            statics = options.statics.len(),
            "composing definition"
        );

        let slots = if options.slots.is_empty() {
            Arc::clone(&parent.slots)
        } else {
            let mut slots = (*parent.slots).clone();
            slots.extend(options.slots);
            Arc::new(slots)
        };

        let tokens = if options.tokens.is_empty() {
            Arc::clone(&parent.tokens)
        } else {
            let mut tokens = (*parent.tokens).clone();
            for (slot, added) in options.tokens {
                let merged = match tokens.get(&slot) {
                    Some(existing) => existing.merged(&added),
                    None => added,
                };
                tokens.insert(slot, merged);
            }
            Arc::new(tokens)
        };

        Self::from_parts(
            slots,
            parent.settings.extend(options.settings),
            tokens,
            parent.statics.merged(&options.statics),
            options.use_styling.or_else(|| parent.use_styling.clone()),
            options
                .use_prepare_props
                .or_else(|| parent.use_prepare_props.clone()),
        )
    }

    /// Returns a new definition with `layers` appended to the settings.
    ///
    /// Slots, tokens, statics and hooks are shared with `self` unchanged.
    pub fn customize(&self, layers: impl IntoIterator<Item = SettingsLayer>) -> Self {
        self.compose(ComposeOptions::new().settings(layers))
    }

    /// The declared slots.
    pub fn slots(&self) -> &SlotMap<P> {
        &self.inner.slots
    }

    /// Returns true if `slot` is declared.
    pub fn has_slot(&self, slot: &str) -> bool {
        self.inner.slots.contains_key(slot)
    }

    /// The settings layers, parent layers first.
    pub fn settings(&self) -> &SettingsLayerStack {
        &self.inner.settings
    }

    /// Token definitions per slot.
    pub fn tokens(&self) -> &TokenDefinitions {
        &self.inner.tokens
    }

    /// Attached statics.
    pub fn statics(&self) -> &Statics {
        &self.inner.statics
    }

    /// Returns true if a custom styling hook is installed.
    pub fn has_custom_styling(&self) -> bool {
        self.inner.use_styling.is_some()
    }

    /// Returns true if a custom render-data builder is installed.
    pub fn has_custom_prepare_props(&self) -> bool {
        self.inner.use_prepare_props.is_some()
    }

    /// Returns true if both handles refer to the same definition.
    pub fn ptr_eq(&self, other: &ComponentDefinition<P>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of themes with memoized merged settings for this definition.
    pub fn cached_theme_count(&self) -> usize {
        self.inner.settings_cache.len()
    }

    pub(crate) fn settings_cache(&self) -> &ThemeCache<ComponentSettings> {
        &self.inner.settings_cache
    }

    /// Resolves per-slot props through the styling hook.
    ///
    /// Uses the custom hook if one was installed anywhere along the compose
    /// chain, otherwise the default [`StylingResolver`].
    ///
    /// # Errors
    ///
    /// Returns configuration errors from settings or tokens, and token
    /// function failures.
    pub fn use_styling(
        &self,
        props: &P,
        theme: &Theme,
        lookup: Option<&dyn OverrideLookup>,
    ) -> Result<ResolvedSlotProps> {
        match &self.inner.use_styling {
            Some(hook) => hook(self, props, theme, lookup),
            None => StylingResolver::new(self).resolve(props, theme, lookup),
        }
    }

    /// Builds render data for a render pass.
    ///
    /// Without a custom builder, this is the styling result with a `null` state.
    /// A builder that styles without its own lookup falls back to `lookup`.
    pub fn prepare(
        &self,
        props: &P,
        theme: &Theme,
        lookup: Option<&dyn OverrideLookup>,
    ) -> Result<RenderData> {
        match &self.inner.use_prepare_props {
            Some(hook) => {
                let styling = |props: &P, own: Option<&dyn OverrideLookup>| {
                    self.use_styling(props, theme, own.or(lookup))
                };
                hook(props, &styling)
            }
            None => Ok(RenderData {
                slot_props: self.use_styling(props, theme, lookup)?,
                state: Value::Null,
            }),
        }
    }

    /// Checks the definition against `theme` without rendering.
    ///
    /// Resolves every token set and settings layer, surfacing the same
    /// configuration errors a render would. This runs automatically on first
    /// resolution, but can be called early for up-front failure.
    pub fn validate(&self, theme: &Theme) -> Result<()> {
        let resolver = StylingResolver::new(self);
        resolver.resolved_tokens(theme)?;
        resolver.merged_settings(theme)?;
        Ok(())
    }
}

impl<P> Clone for ComponentDefinition<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> std::fmt::Debug for ComponentDefinition<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("slots", &self.inner.slots.keys().collect::<Vec<_>>())
            .field("settings", &self.inner.settings)
            .field("tokens", &self.inner.tokens)
            .field("statics", &self.inner.statics)
            .field("use_styling", &self.inner.use_styling.is_some())
            .field("use_prepare_props", &self.inner.use_prepare_props.is_some())
            .finish()
    }
}
