//! Canonical host records built from runtime inspect documents.
mod extract;

pub use extract::{ExtractedFields, SSH_PORT, extract};

use crate::container::{ContainerID, HostName};
use crate::runtime::InspectDocument;

/// Address used when the runtime reports none.
pub const LOOPBACK_ADDRESS: &str = "localhost";

/// How to reach one discovered container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    identifier: ContainerID,
    name: HostName,
    address: String,
    port: u16,
}

impl HostRecord {
    /// Resolves the extracted fields of a container into a host record.
    ///
    /// Missing names fall back to the short container id, missing addresses to
    /// [`LOOPBACK_ADDRESS`] and missing SSH mappings to [`SSH_PORT`]. Names that cannot be
    /// used as file names are treated as missing.
    pub fn new(identifier: ContainerID, fields: ExtractedFields) -> Self {
        let name = match fields.name.as_deref().map(HostName::new) {
            Some(Ok(name)) => name,
            Some(Err(err)) => {
                log::warn!(
                    "container `{}` has an unusable name, using its short id: {}",
                    identifier,
                    err
                );
                HostName::fallback_for(&identifier)
            }
            None => HostName::fallback_for(&identifier),
        };

        Self {
            name,
            address: fields
                .address
                .unwrap_or_else(|| LOOPBACK_ADDRESS.to_owned()),
            port: fields.port.unwrap_or(SSH_PORT),
            identifier,
        }
    }

    /// Extracts and resolves a host record from an inspect document in one step.
    pub fn from_inspect(identifier: ContainerID, document: &InspectDocument) -> Self {
        Self::new(identifier, extract(document))
    }

    pub fn identifier(&self) -> &ContainerID {
        &self.identifier
    }

    pub fn name(&self) -> &HostName {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
