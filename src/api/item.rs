//! The decode contract every endpoint record type implements.
//!
//! Endpoint wrappers differ wildly in payload shape (JSON objects, flattened
//! parameter dumps, SOAP-derived mappings), but by the time a payload reaches
//! the synchronizer it has been reduced to an ordered mapping from item id to
//! an opaque raw record. `ApiItem` is the seam that turns one raw record into
//! one typed item.

use serde_json::Value;

use crate::error::ResponseError;

/// One endpoint's dataset as fetched: ordered `(id, raw record)` pairs.
///
/// Order matters — the synchronizer reports changed ids, and the orchestrator
/// fires subscriber notifications, in payload order.
pub type RawPayload = Vec<(String, Value)>;

/// A typed item decodable from one raw endpoint record.
///
/// Implementations are stateless with respect to the owning collection:
/// `decode` is a pure function of its inputs, and two decodes of
/// byte-identical raw input must produce value-equal items.
pub trait ApiItem: Sized + Clone + PartialEq {
    /// Decodes one raw record into a typed item.
    ///
    /// # Errors
    ///
    /// Fails with [`ResponseError::MissingKey`] when the record lacks a key
    /// this item type requires. Well-formed input must never fail.
    fn decode(id: &str, raw: &Value) -> Result<Self, ResponseError>;

    /// The item's identifier, unique within its owning collection and stable
    /// across refreshes.
    fn id(&self) -> &str;

    /// Returns true iff re-decoding `raw` would produce an item observably
    /// different from `self`.
    ///
    /// The default re-decodes and compares structurally; a record that no
    /// longer decodes counts as changed. The synchronizer's always-notify
    /// merge policy does not consult this, but it is the single place to
    /// switch to true diffing.
    fn has_changed(&self, raw: &Value) -> bool {
        match Self::decode(self.id(), raw) {
            Ok(decoded) => decoded != *self,
            Err(_) => true,
        }
    }
}
