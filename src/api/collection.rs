//! The id-keyed item collection and its merge protocol.
//!
//! One collection exists per endpoint handler and is mutated exclusively by
//! `merge`. Readers observe a consistent snapshot between merges.

use std::collections::HashMap;

use serde_json::Value;

use crate::api::item::ApiItem;
use crate::error::ResponseError;

/// An id→item mapping reconciled against freshly fetched raw payloads.
///
/// Two deliberate policies, both pinned by tests:
///
/// - **No deletion**: an id absent from a later payload stays in the
///   collection. Device datasets are treated as grow-only between reboots.
/// - **Always notify**: every id present in a merged payload is reported as
///   changed, even when its content is byte-identical to what is stored.
///   [`ApiItem::has_changed`] isolates the comparison should a suppress-no-op
///   policy ever be wanted.
#[derive(Debug, Default)]
pub struct ItemCollection<T> {
    items: HashMap<String, T>,
}

impl<T: ApiItem> ItemCollection<T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Reconciles the collection against one fetched payload.
    ///
    /// Unseen ids are decoded and inserted; existing ids are re-decoded and
    /// replaced. Returns the ids touched by this call, in payload order.
    ///
    /// # Errors
    ///
    /// Fails with the item type's decode error on a malformed record; the
    /// collection keeps every item merged before the failing record.
    pub fn merge(
        &mut self,
        payload: impl IntoIterator<Item = (String, Value)>,
    ) -> Result<Vec<String>, ResponseError> {
        let mut changed = Vec::new();
        for (id, raw) in payload {
            let item = T::decode(&id, &raw)?;
            self.items.insert(id.clone(), item);
            changed.push(id);
        }
        Ok(changed)
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.get(id)
    }

    /// Returns true if an item with this id is present.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Iterates over item ids in unspecified order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Iterates over `(id, item)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.items.iter().map(|(id, item)| (id.as_str(), item))
    }

    /// Number of items currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the collection holds no items.
    ///
    /// Emptiness is not an unsupported-signal; whether the endpoint loaded at
    /// all lives on the handler's `initialized` flag.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T: ApiItem> IntoIterator for &'a ItemCollection<T> {
    type Item = (&'a String, &'a T);
    type IntoIter = std::collections::hash_map::Iter<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
