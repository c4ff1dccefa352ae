//! Theme values consumed by settings layers and token functions.
//!
//! This module provides:
//!
//! - [`Theme`]: An opaque, cheaply cloneable theme handle with a settings
//!   namespace and arbitrary ramp values
//! - [`ThemeSource`]: The serde representation used to load themes from
//!   YAML or JSON configuration
//!
//! A theme's identity (not its contents) is what the resolution caches key
//! on. Clones of a handle share identity.

mod source;
#[allow(clippy::module_inception)]
mod theme;

pub use source::ThemeSource;
pub(crate) use theme::ThemeData;
pub use theme::Theme;
