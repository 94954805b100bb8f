//! Device capability directory.
//!
//! Axis devices report which optional APIs they expose through the API
//! discovery endpoint; older firmware exposes some of the same surfaces only
//! through the legacy parameter dump. Handlers ask this directory whether
//! their endpoint exists at all, independently of whether an update has run.

use std::collections::HashSet;

/// Capability lookup consulted by [`ApiHandler::supported`].
///
/// [`ApiHandler::supported`]: crate::api::handler::ApiHandler::supported
pub trait CapabilityDirectory {
    /// Returns true if the endpoint identified by `api_id` is present on
    /// this device.
    fn contains(&self, api_id: &str) -> bool;
}

/// Directory fed from API discovery plus the legacy parameter dump.
///
/// Both sources register plain API identifiers; `contains` does not care
/// which one an id came from.
#[derive(Debug, Clone, Default)]
pub struct DeviceCapabilities {
    discovered: HashSet<String>,
    legacy: HashSet<String>,
}

impl DeviceCapabilities {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an API id reported by API discovery.
    pub fn register_api(&mut self, api_id: impl Into<String>) {
        self.discovered.insert(api_id.into());
    }

    /// Records an API id known to be backed by the legacy parameter dump.
    pub fn register_legacy(&mut self, api_id: impl Into<String>) {
        self.legacy.insert(api_id.into());
    }

    /// Number of registered ids across both sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.discovered.len() + self.legacy.len()
    }

    /// Returns true if nothing has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.discovered.is_empty() && self.legacy.is_empty()
    }
}

impl CapabilityDirectory for DeviceCapabilities {
    fn contains(&self, api_id: &str) -> bool {
        self.discovered.contains(api_id) || self.legacy.contains(api_id)
    }
}
