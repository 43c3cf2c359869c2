use crate::container::ContainerID;
use crate::error::ResultOkLogExt;
use crate::host::HostRecord;
use crate::runtime::{ContainerRuntime, InspectDocument};

/// Turns the running containers of a runtime into host records.
///
/// Runtime failures never abort discovery: a failed listing counts as "no containers"
/// and a failed inspect skips that one container.
#[derive(Debug)]
pub struct Discoverer<R> {
    runtime: R,
}

impl<R: ContainerRuntime> Discoverer<R> {
    pub fn new(runtime: R) -> Self {
        Self { runtime }
    }

    /// Identifiers of the running containers, empty if the runtime cannot be queried.
    pub async fn list_running_containers(&self) -> Vec<ContainerID> {
        self.runtime
            .list_running()
            .await
            .ok_log()
            .unwrap_or_default()
    }

    /// Inspect document of `id`, `None` if the container cannot be inspected.
    pub async fn inspect(&self, id: &ContainerID) -> Option<InspectDocument> {
        match self.runtime.inspect(id).await {
            Ok(Some(document)) => Some(document),
            Ok(None) => {
                log::warn!("runtime returned no data for container `{}`, skipping", id);
                None
            }
            Err(err) => {
                log::warn!("failed to inspect container `{}`, skipping: {}", id, err);
                None
            }
        }
    }

    /// Host records of all running containers, in the order the runtime lists them.
    pub async fn discover(&self) -> Vec<HostRecord> {
        let ids = self.list_running_containers().await;
        log::debug!("Found {} running containers", ids.len());

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(document) = self.inspect(&id).await {
                let record = HostRecord::from_inspect(id, &document);
                log::debug!(
                    "Discovered host `{}` at {}:{} (container `{}`)",
                    record.name(),
                    record.address(),
                    record.port(),
                    record.identifier()
                );
                records.push(record);
            }
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::fake::FakeRuntime;

    #[tokio::test]
    async fn test_discover_skips_failed_inspects() {
        let mut runtime = FakeRuntime::default()
            .with_container(
                "aaaaaaaaaaaaaaaa",
                serde_json::json!([{
                    "Name": "/my-app",
                    "NetworkSettings": {
                        "IPAddress": "10.88.0.3",
                        "Ports": {"22/tcp": [{"HostPort": "2222"}]}
                    }
                }]),
            )
            .with_container("bbbbbbbbbbbbbbbb", serde_json::json!([]))
            .with_container("cccccccccccccccc", serde_json::json!({"not": "a list"}))
            .with_container("dddddddddddddddd", serde_json::json!([{"Name": ""}]));
        runtime
            .ids
            .push(ContainerID::new("eeeeeeeeeeeeeeee").unwrap());

        let records = Discoverer::new(runtime).discover().await;
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].name().as_str(), "my-app");
        assert_eq!(records[0].address(), "10.88.0.3");
        assert_eq!(records[0].port(), 2222);

        assert_eq!(records[1].name().as_str(), "dddddddddddd");
        assert_eq!(records[1].address(), "localhost");
        assert_eq!(records[1].port(), 22);
    }

    #[tokio::test]
    async fn test_malformed_fields_use_fallbacks() {
        let runtime = FakeRuntime::default()
            .with_container(
                "aaaaaaaaaaaaaaaa",
                serde_json::json!([{
                    "Name": "/web",
                    "NetworkSettings": {
                        "IPAddress": "10.88.0.7",
                        "Ports": {"22/tcp": [{"HostPort": 2222}]}
                    }
                }]),
            )
            .with_container(
                "bbbbbbbbbbbbbbbb",
                serde_json::json!([{"Name": "/db", "NetworkSettings": {"IPAddress": 5}}]),
            );

        let records = Discoverer::new(runtime).discover().await;
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].name().as_str(), "web");
        assert_eq!(records[0].address(), "10.88.0.7");
        assert_eq!(records[0].port(), 22);

        assert_eq!(records[1].name().as_str(), "db");
        assert_eq!(records[1].address(), "localhost");
        assert_eq!(records[1].port(), 22);
    }

    #[tokio::test]
    async fn test_failed_listing_is_empty() {
        let runtime = FakeRuntime {
            list_fails: true,
            ..FakeRuntime::default()
        };
        assert!(Discoverer::new(runtime).discover().await.is_empty());
    }
}
