//! Inventory assembly.
//!
//! A [`Snapshot`] freezes the discovered hosts together with their group assignment.
//! The static and the dynamic inventory forms are both rendered from a snapshot and
//! never from each other.
mod dynamic_form;
mod snapshot;
mod static_form;

pub use dynamic_form::DynamicInventory;
pub use snapshot::{HostVars, Snapshot};
pub use static_form::{HostVarsMode, StaticInventory};

/// Serializes `(key, value)` pairs as a map, keeping their order.
#[allow(clippy::ptr_arg)]
fn serialize_ordered<S, K, V>(entries: &Vec<(K, V)>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    K: serde::Serialize,
    V: serde::Serialize,
{
    serializer.collect_map(entries.iter().map(|(k, v)| (k, v)))
}
