//! Generic endpoint machinery: the decode contract, the id-keyed collection
//! synchronizer, the subscriber registry, and the update orchestrator that
//! ties the three together. Every endpoint wrapper is a thin specialization
//! of these parts.

/// The id-keyed collection and its merge protocol.
pub mod collection;
/// Endpoint update orchestration.
pub mod handler;
/// The per-endpoint decode contract.
pub mod item;
/// Subscriber registration and fan-out.
pub mod subscription;

pub use collection::ItemCollection;
pub use handler::ApiHandler;
pub use item::{ApiItem, RawPayload};
pub use subscription::{
    IdFilter, Subscription, SubscriptionId, SubscriptionRegistry, ID_FILTER_ALL,
};
