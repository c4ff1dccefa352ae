//! Resolution output handed to the renderer.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::settings::Props;

/// Final per-slot properties for one render pass.
///
/// Every declared slot has an entry, empty if nothing contributed to it.
/// The engine keeps no reference to this value once it is returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedSlotProps {
    slots: BTreeMap<String, Props>,
}

impl ResolvedSlotProps {
    pub(crate) fn from_map(slots: BTreeMap<String, Props>) -> Self {
        Self { slots }
    }

    /// Properties for `slot`.
    pub fn get(&self, slot: &str) -> Option<&Props> {
        self.slots.get(slot)
    }

    /// Mutable properties for `slot`, for styling hooks that post-process.
    pub fn get_mut(&mut self, slot: &str) -> Option<&mut Props> {
        self.slots.get_mut(slot)
    }

    /// Slot names in sorted order.
    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// Iterates (slot, props) pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Props)> {
        self.slots.iter().map(|(slot, props)| (slot.as_str(), props))
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Consumes the output, returning the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, Props> {
        self.slots
    }
}

impl IntoIterator for ResolvedSlotProps {
    type Item = (String, Props);
    type IntoIter = std::collections::btree_map::IntoIter<String, Props>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

/// Per-slot props bundled with component state derived while preparing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderData {
    /// Final props per slot.
    pub slot_props: ResolvedSlotProps,
    /// Arbitrary state produced by a render-data builder.
    pub state: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_as_plain_map() {
        let mut slots = BTreeMap::new();
        slots.insert(
            "root".to_string(),
            json!({ "color": "red" }).as_object().cloned().unwrap(),
        );
        let resolved = ResolvedSlotProps::from_map(slots);

        assert_eq!(
            serde_json::to_value(&resolved).unwrap(),
            json!({ "root": { "color": "red" } })
        );
        assert_eq!(resolved.slot_names().collect::<Vec<_>>(), ["root"]);
    }
}
