//! Settings layers and the layered merge.
//!
//! This module provides:
//!
//! - [`SettingsLayer`]: A literal, theme-keyed or theme-computed settings object
//! - [`SettingsLayerStack`]: An ordered, persistent sequence of layers
//! - [`merge_value`], [`merge_props`], [`merge_settings`]: The merge rule
//!
//! Later layers take precedence: scalar properties are overwritten, sequence
//! properties are concatenated, and nested objects merge recursively. This
//! is what lets a customization add a class name or tweak one property
//! without restating everything the base component declared.

mod layer;
mod merge;
mod stack;

pub use layer::{SettingsLayer, ThemeSettingsFn};
pub use merge::{merge_props, merge_settings, merge_value, ComponentSettings, Props, TOKENS_KEY};
pub use stack::SettingsLayerStack;
