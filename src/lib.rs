//! # Compose Styling - Layered Slot Styling for Composable Components
//!
//! `compose-styling` resolves component styling in a deterministic, layered
//! way. A component is described once by an immutable
//! [`ComponentDefinition`], extended through chained
//! [`compose`](ComponentDefinition::compose) and
//! [`customize`](ComponentDefinition::customize) calls, and resolved at render
//! time against an opaque [`Theme`] into a final property map per slot.
//!
//! ## Concepts
//!
//! - **Slots**: named, independently stylable parts of a component
//! - **Settings layers**: ordered contributions to per-slot settings, from a
//!   literal, a theme lookup, or a theme function ([`SettingsLayer`])
//! - **Tokens**: named design values per slot, literal or theme-derived,
//!   fed to the slot's style factory ([`SlotTokens`])
//! - **Overrides**: last-mile, per-render properties supplied by the caller
//!   ([`OverrideLookup`])
//!
//! ## Merge rule
//!
//! Every merge uses the same rule. Later contributions overwrite scalars,
//! concatenate onto sequences, and merge recursively into objects:
//!
//! ```rust
//! use compose_styling::{SettingsLayer, SettingsLayerStack, Theme};
//! use serde_json::json;
//!
//! let stack = SettingsLayerStack::from_iter([
//!     SettingsLayer::literal(json!({ "root": { "color": "red", "classes": ["a"] } })),
//!     SettingsLayer::literal(json!({ "root": { "color": "blue", "classes": ["b"] } })),
//! ]);
//!
//! let merged = stack.merge(&Theme::new()).unwrap();
//! assert_eq!(merged["root"]["color"], json!("blue"));
//! assert_eq!(merged["root"]["classes"], json!(["a", "b"]));
//! ```
//!
//! ## Precedence
//!
//! From lowest to highest: settings layers (in declaration order across the
//! whole compose chain), the slot's style factory, then the override lookup.
//!
//! ## Quick Start
//!
//! ```rust
//! use compose_styling::{
//!     ComponentDefinition, ComposeOptions, Props, SettingsLayer, SlotStyleEntry, SlotTokens,
//!     Theme, TokenValue,
//! };
//! use serde_json::{json, Value};
//!
//! let button = ComponentDefinition::new(
//!     ComposeOptions::<Value>::new()
//!         .slot("root", SlotStyleEntry::styled(|_props, tokens, _theme| {
//!             let mut style = Props::new();
//!             style.insert("background".into(), tokens["background"].clone());
//!             style
//!         }))
//!         .slot("label", SlotStyleEntry::new())
//!         .tokens("root", SlotTokens::new().add("background", TokenValue::theme_value("colors.brand")))
//!         .layer(json!({ "root": { "classes": ["button"] } }))
//!         .layer(SettingsLayer::theme_key("Button")),
//! );
//!
//! // Derive a variant without restating the base.
//! let compact = button.customize([SettingsLayer::literal(
//!     json!({ "root": { "classes": ["compact"], "padding": 2 } }),
//! )]);
//!
//! let theme = Theme::named("light")
//!     .add_value("colors", json!({ "brand": "#0078d4" }))
//!     .add_settings("Button", json!({ "label": { "weight": 600 } }));
//!
//! let slots = compact.use_styling(&json!({}), &theme, None).unwrap();
//! let root = slots.get("root").unwrap();
//! assert_eq!(root["classes"], json!(["button", "compact"]));
//! assert_eq!(root["background"], json!("#0078d4"));
//! assert_eq!(slots.get("label").unwrap()["weight"], json!(600));
//! ```
//!
//! ## Caching
//!
//! Token resolution is memoized per (token set, theme) and merged settings per
//! (definition, theme). Both memos hold themes weakly and live inside the
//! value they memoize, so dropping either a definition or a theme releases its
//! entries.

mod cache;
pub mod compose;
pub mod error;
pub mod settings;
pub mod styling;
pub mod theme;
pub mod tokens;

pub use compose::{
    ComponentDefinition, ComposeOptions, SlotFilter, SlotMap, SlotStyleEntry, Statics,
    StyleFactory, TokenDefinitions, UsePrepareProps, UseStyling,
};
pub use error::{BoxError, LayerSource, Result, SlotReference, StylingError, ThemeError};
pub use settings::{
    merge_props, merge_settings, merge_value, ComponentSettings, Props, SettingsLayer,
    SettingsLayerStack, ThemeSettingsFn, TOKENS_KEY,
};
pub use styling::{OverrideLookup, RenderData, ResolvedSlotProps, StaticOverrides, StylingResolver};
pub use theme::{Theme, ThemeSource};
pub use tokens::{
    resolve_slot_tokens, resolve_tokens, ResolvedTokenMap, SlotTokens, TokenFn, TokenMap,
    TokenValue,
};
