//! Design tokens: per-slot definitions and their memoized resolution.
//!
//! A slot declares tokens as literals or theme functions ([`TokenValue`]),
//! grouped in a [`SlotTokens`] set. Resolving a set against a theme yields a
//! concrete [`TokenMap`] that the slot's style factory consumes.
//!
//! Resolution is memoized per (token set, theme) pair. The memo lives inside
//! the token set and holds themes weakly, so it goes away with either key.

mod resolver;
mod value;

pub use resolver::{resolve_slot_tokens, resolve_tokens, ResolvedTokenMap};
pub use value::{SlotTokens, TokenFn, TokenMap, TokenValue};
