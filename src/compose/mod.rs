//! Component definitions and the chainable extension API.
//!
//! This module provides:
//!
//! - [`ComponentDefinition`]: An immutable bundle of slots, settings, tokens,
//!   statics and hooks
//! - [`ComposeOptions`]: The partial options one compose step contributes
//! - [`SlotStyleEntry`]: A declared slot with an optional, filterable style factory
//! - [`Statics`]: Type-erased values attached to a component
//!
//! A root definition is built once with [`ComponentDefinition::new`] and then
//! extended with [`compose`](ComponentDefinition::compose) or
//! [`customize`](ComponentDefinition::customize). Each step returns a new
//! definition; the parent is never modified and can keep being used or
//! extended in other directions.

mod definition;
mod options;
mod statics;

pub use definition::{
    ComponentDefinition, SlotFilter, SlotMap, SlotStyleEntry, StyleFactory, TokenDefinitions,
    UsePrepareProps, UseStyling,
};
pub use options::ComposeOptions;
pub use statics::Statics;
