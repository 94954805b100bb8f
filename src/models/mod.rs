//! Concrete endpoint item types.
//!
//! Thin specializations of the [`ApiItem`](crate::api::item::ApiItem)
//! contract for individual device endpoints. Everything interesting —
//! merging, change notification, capability tolerance — lives in
//! [`crate::api`]; these types only map raw records to typed fields.

/// Light control items.
pub mod light;
/// I/O port items.
pub mod port;

pub use light::Light;
pub use port::{Port, PortDirection};
