//! Raw token definitions.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::cache::ThemeCache;
use crate::error::BoxError;
use crate::theme::Theme;

/// Concrete token values for one slot, after evaluation against a theme.
pub type TokenMap = Map<String, Value>;

/// Fallible function computing a token value from the theme.
pub type TokenFn = Arc<dyn Fn(&Theme) -> Result<Value, BoxError> + Send + Sync>;

/// A single token definition: a literal or a theme-dependent function.
#[derive(Clone)]
pub enum TokenValue {
    /// A fixed value.
    Literal(Value),
    /// A value computed from the active theme.
    Function(TokenFn),
}

impl TokenValue {
    /// Creates a literal token.
    pub fn literal(value: impl Into<Value>) -> Self {
        TokenValue::Literal(value.into())
    }

    /// Creates a token computed from the theme.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Theme) -> Value + Send + Sync + 'static,
    {
        TokenValue::Function(Arc::new(move |theme: &Theme| Ok(f(theme))))
    }

    /// Creates a token computed by a function that may fail.
    pub fn try_from_fn<F>(f: F) -> Self
    where
        F: Fn(&Theme) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        TokenValue::Function(Arc::new(f))
    }

    /// Creates a token that reads a ramp value from the theme by dotted path.
    ///
    /// Evaluation fails if the theme has no value at `path`.
    pub fn theme_value(path: impl Into<String>) -> Self {
        let path = path.into();
        TokenValue::try_from_fn(move |theme: &Theme| {
            theme
                .value(&path)
                .cloned()
                .ok_or_else(|| format!("theme has no value at '{}'", path).into())
        })
    }

    pub(crate) fn evaluate(&self, theme: &Theme) -> Result<Value, BoxError> {
        match self {
            TokenValue::Literal(value) => Ok(value.clone()),
            TokenValue::Function(f) => f(theme),
        }
    }
}

impl From<Value> for TokenValue {
    fn from(value: Value) -> Self {
        TokenValue::Literal(value)
    }
}

impl PartialEq for TokenValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TokenValue::Literal(a), TokenValue::Literal(b)) => a == b,
            (TokenValue::Function(a), TokenValue::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for TokenValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            TokenValue::Function(_) => f.write_str("Function(..)"),
        }
    }
}

struct SlotTokensInner {
    entries: BTreeMap<String, TokenValue>,
    cache: ThemeCache<TokenMap>,
}

/// The token definitions declared for one slot.
///
/// A `SlotTokens` value owns the memoized resolutions of its definitions,
/// one per theme. Clones share both the definitions and the memo, so an
/// unchanged slot keeps its cache across compose steps; every new set
/// built by [`add`](Self::add) or [`merged`](Self::merged) starts a fresh one.
///
/// # Example
///
/// ```rust
/// use compose_styling::{SlotTokens, TokenValue, Theme};
/// use serde_json::json;
///
/// let tokens = SlotTokens::new()
///     .add("padding", TokenValue::literal(8))
///     .add("color", TokenValue::theme_value("colors.brand"));
///
/// assert_eq!(tokens.len(), 2);
/// ```
#[derive(Clone)]
pub struct SlotTokens {
    inner: Arc<SlotTokensInner>,
}

impl SlotTokens {
    /// Creates an empty token set.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SlotTokensInner {
                entries: BTreeMap::new(),
                cache: ThemeCache::new(),
            }),
        }
    }

    /// Adds a token definition, returning the updated set for chaining.
    ///
    /// The returned set starts with an empty memo, even when this was the
    /// only handle to an already resolved set.
    pub fn add(self, key: &str, value: impl Into<TokenValue>) -> Self {
        let mut entries = match Arc::try_unwrap(self.inner) {
            Ok(inner) => inner.entries,
            Err(shared) => shared.entries.clone(),
        };
        entries.insert(key.to_string(), value.into());
        SlotTokens {
            inner: Arc::new(SlotTokensInner {
                entries,
                cache: ThemeCache::new(),
            }),
        }
    }

    /// Looks up a token definition.
    pub fn get(&self, key: &str) -> Option<&TokenValue> {
        self.inner.entries.get(key)
    }

    /// Returns true if a token named `key` is declared.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.entries.contains_key(key)
    }

    /// Iterates token definitions in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenValue)> {
        self.inner
            .entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Number of declared tokens.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Returns true if no tokens are declared.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Returns a set with `other`'s definitions layered over this one's.
    ///
    /// Keys in `other` replace matching keys here; all other keys are kept.
    pub fn merged(&self, other: &SlotTokens) -> SlotTokens {
        if other.is_empty() || self.ptr_eq(other) {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }

        let mut entries = self.inner.entries.clone();
        entries.extend(
            other
                .inner
                .entries
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        Self {
            inner: Arc::new(SlotTokensInner {
                entries,
                cache: ThemeCache::new(),
            }),
        }
    }

    /// Returns true if both values share the same definitions and memo.
    pub fn ptr_eq(&self, other: &SlotTokens) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of themes with a memoized resolution.
    pub fn cached_theme_count(&self) -> usize {
        self.inner.cache.len()
    }

    pub(crate) fn cache(&self) -> &ThemeCache<TokenMap> {
        &self.inner.cache
    }
}

impl Default for SlotTokens {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V: Into<TokenValue>> FromIterator<(K, V)> for SlotTokens {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: Arc::new(SlotTokensInner {
                entries: iter
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
                cache: ThemeCache::new(),
            }),
        }
    }
}

impl PartialEq for SlotTokens {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.inner.entries == other.inner.entries
    }
}

impl std::fmt::Debug for SlotTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.inner.entries.iter()).finish()
    }
}
