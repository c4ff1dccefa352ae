//! Turning a definition into final per-slot props.
//!
//! This module provides:
//!
//! - [`StylingResolver`]: The default pipeline combining tokens, settings,
//!   style factories and overrides
//! - [`OverrideLookup`]: Caller-supplied per-render overrides
//! - [`ResolvedSlotProps`] and [`RenderData`]: What the renderer receives

mod output;
mod overrides;
mod resolver;

pub use output::{RenderData, ResolvedSlotProps};
pub use overrides::{OverrideLookup, StaticOverrides};
pub use resolver::StylingResolver;
