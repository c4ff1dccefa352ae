//! Token resolution against a theme.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::value::{SlotTokens, TokenMap};
use crate::error::{Result, SlotReference, StylingError};
use crate::theme::Theme;

/// Resolved tokens for every slot that declares any, keyed by slot name.
pub type ResolvedTokenMap = BTreeMap<String, Arc<TokenMap>>;

/// Resolves one slot's token definitions against `theme`.
///
/// The result is memoized in `tokens` per theme instance: repeated calls with
/// the same pair return the stored map without evaluating any function again.
///
/// # Errors
///
/// Propagates the first token function failure. Failures are not memoized.
pub fn resolve_slot_tokens(slot: &str, tokens: &SlotTokens, theme: &Theme) -> Result<Arc<TokenMap>> {
    tokens.cache().get_or_try_insert_with(theme, || {
        tracing::debug!(slot, tokens = tokens.len(), theme = ?theme.name(), "resolving slot tokens");
        tokens
            .iter()
            .map(|(key, value)| {
                value
                    .evaluate(theme)
                    .map(|resolved| (key.to_string(), resolved))
                    .map_err(|source| StylingError::TokenFunction {
                        slot: slot.to_string(),
                        token: key.to_string(),
                        source,
                    })
            })
            .collect()
    })
}

/// Resolves the token definitions of every slot.
///
/// `is_declared` guards against tokens bound to a slot the component never
/// declared; such a binding has no factory to feed and is a configuration error.
pub fn resolve_tokens<'a>(
    tokens: impl IntoIterator<Item = (&'a String, &'a SlotTokens)>,
    theme: &Theme,
    is_declared: impl Fn(&str) -> bool,
) -> Result<ResolvedTokenMap> {
    tokens
        .into_iter()
        .map(|(slot, definitions)| {
            if !is_declared(slot.as_str()) {
                return Err(StylingError::UnknownSlot {
                    slot: slot.clone(),
                    reference: SlotReference::Tokens,
                });
            }
            Ok((slot.clone(), resolve_slot_tokens(slot, definitions, theme)?))
        })
        .collect()
}
