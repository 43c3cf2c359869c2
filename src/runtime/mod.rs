//! Runtime query adapter.
//!
//! Talks to the container runtime to list running containers and to fetch the inspect
//! document of a single container.
mod command;
mod error;
mod models;

pub use command::{CommandRuntime, RetryPolicy};
pub use error::{Error, Result};
pub use models::{InspectDocument, NetworkSettings, PortBinding};

use crate::container::ContainerID;

/// A container runtime that can be queried for running containers.
pub trait ContainerRuntime {
    /// Lists the identifiers of all running containers, in the order the runtime reports them.
    fn list_running(&self) -> impl std::future::Future<Output = Result<Vec<ContainerID>>> + Send;

    /// Fetches the inspect document of a single container.
    ///
    /// Returns `Ok(None)` if the runtime answered with an empty document.
    fn inspect(
        &self,
        id: &ContainerID,
    ) -> impl std::future::Future<Output = Result<Option<InspectDocument>>> + Send;
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashMap;

    use super::*;

    /// In-memory runtime used by tests.
    #[derive(Debug, Default)]
    pub(crate) struct FakeRuntime {
        pub(crate) ids: Vec<ContainerID>,
        pub(crate) documents: HashMap<ContainerID, serde_json::Value>,
        pub(crate) list_fails: bool,
    }

    impl FakeRuntime {
        pub(crate) fn with_container(mut self, id: &str, document: serde_json::Value) -> Self {
            let id = ContainerID::new(id).unwrap();
            self.ids.push(id.clone());
            self.documents.insert(id, document);
            self
        }
    }

    impl ContainerRuntime for FakeRuntime {
        async fn list_running(&self) -> Result<Vec<ContainerID>> {
            if self.list_fails {
                return Err(Error::ExitStatus {
                    command: "fake ps -q".to_owned(),
                    status: "exit status: 125".to_owned(),
                    stderr: "cannot connect".to_owned(),
                });
            }
            Ok(self.ids.clone())
        }

        async fn inspect(&self, id: &ContainerID) -> Result<Option<InspectDocument>> {
            match self.documents.get(id) {
                Some(doc) => {
                    let docs: Vec<InspectDocument> =
                        serde_json::from_value(doc.clone()).map_err(|source| Error::Decode {
                            command: format!("fake inspect {id}"),
                            source,
                        })?;
                    Ok(docs.into_iter().next())
                }
                None => Err(Error::ExitStatus {
                    command: format!("fake inspect {id}"),
                    status: "exit status: 125".to_owned(),
                    stderr: "no such container".to_owned(),
                }),
            }
        }
    }
}
