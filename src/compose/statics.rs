//! Extra values attached to a composed component.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

type StaticValue = Arc<dyn Any + Send + Sync>;

/// Named values attached to a component, such as nested sub-component
/// definitions.
///
/// Values are type-erased and read back with [`get`](Self::get). Merging is
/// by key: a later value replaces an earlier one with the same name.
///
/// # Example
///
/// ```rust
/// use compose_styling::Statics;
///
/// let statics = Statics::new()
///     .add("displayName", "Button")
///     .add("maxItems", 3usize);
///
/// assert_eq!(statics.get::<&str>("displayName"), Some(&"Button"));
/// assert_eq!(statics.get::<usize>("maxItems"), Some(&3));
/// assert!(statics.get::<String>("displayName").is_none());
/// ```
#[derive(Clone, Default)]
pub struct Statics {
    values: Arc<BTreeMap<String, StaticValue>>,
}

impl Statics {
    /// Creates an empty set of statics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named value, returning the updated statics for chaining.
    pub fn add<T: Any + Send + Sync>(mut self, name: &str, value: T) -> Self {
        Arc::make_mut(&mut self.values).insert(name.to_string(), Arc::new(value));
        self
    }

    /// Returns the value stored under `name` if it has type `T`.
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name)?.downcast_ref::<T>()
    }

    /// Returns true if a value is stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names of all stored values, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns statics with `other`'s values layered over these.
    pub fn merged(&self, other: &Statics) -> Statics {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }

        let mut values = (*self.values).clone();
        values.extend(
            other
                .values
                .iter()
                .map(|(name, value)| (name.clone(), Arc::clone(value))),
        );
        Statics {
            values: Arc::new(values),
        }
    }

    /// Returns true if both share the same storage.
    pub fn ptr_eq(&self, other: &Statics) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}

impl PartialEq for Statics {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.len() == other.len()
                && self
                    .values
                    .iter()
                    .zip(other.values.iter())
                    .all(|((a_name, a), (b_name, b))| a_name == b_name && Arc::ptr_eq(a, b)))
    }
}

impl std::fmt::Debug for Statics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
