//! The endpoint update orchestrator.
//!
//! One handler exists per endpoint (ports, lights, view areas, ...). It owns
//! that endpoint's item collection and subscriber registry and bridges one
//! fetch to both: merge the payload, then notify subscribers for every
//! changed id, in merge order.

use tracing::debug;

use crate::api::collection::ItemCollection;
use crate::api::item::{ApiItem, RawPayload};
use crate::api::subscription::{IdFilter, Subscription, SubscriptionRegistry};
use crate::capability::CapabilityDirectory;
use crate::error::{VapixError, VapixResult};

/// Orchestrates fetch→merge→notify for one endpoint.
///
/// An endpoint that answers `Unauthorized`, `Forbidden`, or `PathNotFound`
/// is simply not available on this device or account; `update` reports that
/// as a quiet `false` and the handler stays usable. `initialized` is sticky:
/// once an update has succeeded, later failures never revert it.
#[derive(Debug)]
pub struct ApiHandler<T> {
    api_id: String,
    items: ItemCollection<T>,
    subscribers: SubscriptionRegistry,
    initialized: bool,
}

impl<T: ApiItem> ApiHandler<T> {
    /// Creates a handler for the endpoint identified by `api_id` in the
    /// device's capability directory.
    #[must_use]
    pub fn new(api_id: impl Into<String>) -> Self {
        Self {
            api_id: api_id.into(),
            items: ItemCollection::new(),
            subscribers: SubscriptionRegistry::new(),
            initialized: false,
        }
    }

    /// The endpoint's capability identifier.
    #[must_use]
    pub fn api_id(&self) -> &str {
        &self.api_id
    }

    /// Runs one fetch and reconciles its payload.
    ///
    /// Subscriber notifications fire strictly after the merge completes, one
    /// per changed id, in the order the merge reported them.
    ///
    /// # Errors
    ///
    /// Transport and response failures propagate. Capability-absent failures
    /// (`Unauthorized` | `Forbidden` | `PathNotFound`) do not: they return
    /// `Ok(false)` and leave `initialized` untouched.
    pub fn update(
        &mut self,
        fetch: impl FnOnce() -> VapixResult<RawPayload>,
    ) -> VapixResult<bool> {
        let payload = match fetch() {
            Ok(payload) => payload,
            Err(err) if err.is_capability_absent() => {
                debug!(api_id = %self.api_id, error = %err, "endpoint not available");
                return Ok(false);
            }
            Err(err) => return Err(err),
        };

        let changed = self.items.merge(payload).map_err(VapixError::from)?;
        self.initialized = true;

        for id in &changed {
            self.subscribers.notify(id);
        }

        Ok(self.initialized)
    }

    /// True once any update has succeeded. Never reverted by later failures.
    #[must_use]
    pub const fn initialized(&self) -> bool {
        self.initialized
    }

    /// True iff the device reports this endpoint in its capability
    /// directory. Legitimately false before the directory's first load.
    #[must_use]
    pub fn supported(&self, directory: &dyn CapabilityDirectory) -> bool {
        directory.contains(&self.api_id)
    }

    /// Registers a subscriber callback; see
    /// [`SubscriptionRegistry::subscribe`].
    pub fn subscribe(
        &self,
        filter: impl Into<IdFilter>,
        callback: impl Fn(&str) + Send + Sync + 'static,
    ) -> Subscription {
        self.subscribers.subscribe(filter, callback)
    }

    /// Read access to the endpoint's items.
    #[must_use]
    pub const fn items(&self) -> &ItemCollection<T> {
        &self.items
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.get(id)
    }

    /// Returns true if an item with this id is present.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains(id)
    }

    /// Number of items currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no items are held. Not an unsupported-signal; see
    /// [`ApiHandler::initialized`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value};

    use crate::capability::DeviceCapabilities;
    use crate::error::{RequestError, ResponseError};

    #[derive(Debug, Clone, PartialEq)]
    struct State {
        id: String,
        state: String,
    }

    impl ApiItem for State {
        fn decode(id: &str, raw: &Value) -> Result<Self, ResponseError> {
            let state = raw
                .get("state")
                .and_then(Value::as_str)
                .ok_or_else(|| ResponseError::missing_key("state"))?
                .to_string();
            Ok(Self {
                id: id.to_string(),
                state,
            })
        }

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn payload(entries: &[(&str, &str)]) -> RawPayload {
        entries
            .iter()
            .map(|(id, state)| ((*id).to_string(), json!({ "state": state })))
            .collect()
    }

    #[test]
    fn successful_update_initializes_and_notifies() {
        let mut handler = ApiHandler::<State>::new("io-port");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let _sub = handler.subscribe(IdFilter::All, move |id| s.lock().unwrap().push(id.to_string()));

        let loaded = handler
            .update(|| Ok(payload(&[("0", "open"), ("1", "closed")])))
            .unwrap();

        assert!(loaded);
        assert!(handler.initialized());
        assert_eq!(handler.len(), 2);
        assert_eq!(*seen.lock().unwrap(), vec!["0", "1"]);
    }

    #[test]
    fn capability_absent_failure_is_tolerated_and_not_sticky() {
        let mut handler = ApiHandler::<State>::new("light-control");

        assert!(!handler.update(|| Err(VapixError::Unauthorized)).unwrap());
        assert!(!handler.initialized());

        assert!(handler.update(|| Ok(payload(&[("0", "on")]))).unwrap());
        assert!(handler.initialized());
    }

    #[test]
    fn initialized_survives_later_failures() {
        let mut handler = ApiHandler::<State>::new("io-port");
        handler.update(|| Ok(payload(&[("0", "open")]))).unwrap();

        assert!(!handler.update(|| Err(VapixError::Forbidden)).unwrap());
        assert!(handler.initialized());
        assert!(handler.contains("0"));
    }

    #[test]
    fn transport_failures_propagate() {
        let mut handler = ApiHandler::<State>::new("io-port");
        let err = handler
            .update(|| {
                Err(RequestError::Connection {
                    message: "refused".to_string(),
                }
                .into())
            })
            .unwrap_err();
        assert!(err.is_retryable());
        assert!(!handler.initialized());
    }

    #[test]
    fn supported_consults_the_directory() {
        let handler = ApiHandler::<State>::new("io-port");

        let mut directory = DeviceCapabilities::new();
        assert!(!handler.supported(&directory));

        directory.register_api("io-port");
        assert!(handler.supported(&directory));
    }
}
