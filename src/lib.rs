//! # vapix - Axis VAPIX synchronization core
//!
//! The item-collection synchronization and subscription engine underlying
//! Axis network device (VAPIX) endpoint wrappers, plus the event decoder
//! that normalizes the device's heterogeneous notification payloads.
//!
//! ## Core Concepts
//!
//! - **ApiItem**: the decode contract an endpoint record type implements
//! - **ItemCollection**: an id-keyed collection reconciled against fetched
//!   payloads (insert or update, never evict)
//! - **ApiHandler**: one endpoint's fetch→merge→notify orchestrator, with
//!   capability-absent failures treated as "not on this device"
//! - **Event**: one normalized notification, decoded from a flat mapping or
//!   a metadata-stream XML blob
//!
//! Transport, authentication, and URL construction are deliberately not
//! here: the networking collaborator hands this crate parsed payloads and
//! classified errors.
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use vapix::models::Port;
//! use vapix::{ApiHandler, IdFilter};
//!
//! let mut ports = ApiHandler::<Port>::new(vapix::models::port::API_ID);
//! let _sub = ports.subscribe(IdFilter::All, |id| println!("port {id} changed"));
//!
//! // The fetch closure is normally backed by the HTTP collaborator.
//! let loaded = ports
//!     .update(|| Ok(vec![("0".to_string(), json!({"Direction": "input"}))]))
//!     .unwrap();
//! assert!(loaded);
//! assert!(ports.contains("0"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod capability;
pub mod error;
pub mod event;
pub mod models;

// Re-export primary types at crate root for convenience
pub use api::{
    ApiHandler, ApiItem, IdFilter, ItemCollection, RawPayload, Subscription, SubscriptionId,
    SubscriptionRegistry, ID_FILTER_ALL,
};
pub use capability::{CapabilityDirectory, DeviceCapabilities};
pub use error::{RequestError, ResponseError, VapixError, VapixResult};
pub use event::{Event, EventInstance, EventOperation, EventTopic, ANY_SOURCE};
