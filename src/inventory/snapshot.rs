use std::collections::BTreeMap;

use uuid::Uuid;

use crate::assign::{self, Assignment, SecondaryPolicy};
use crate::container::{ContainerID, HostName};
use crate::host::HostRecord;

/// Per-host variables as consumed by the configuration-management layer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HostVars {
    pub ansible_host: String,
    pub ansible_port: u16,
    pub container_id: ContainerID,
    pub container_name: HostName,
    /// Highest-priority group of the host.
    pub env_assigned: Option<String>,
    /// Every group the host belongs to, in priority order.
    pub env_groups: Vec<String>,
    /// Stable per-container identifier derived from the container id.
    pub instance_id: Uuid,
}

/// The hosts of one run together with their group assignment.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Host names in discovery order.
    order: Vec<HostName>,
    hosts: BTreeMap<HostName, HostRecord>,
    assignment: Assignment,
}

impl Snapshot {
    /// Builds a snapshot from host records in discovery order.
    ///
    /// Host names must be unique. If two containers resolve to the same name the later
    /// one wins: the earlier record is dropped before groups are assigned and the later
    /// one takes its place at the end of the discovery order.
    pub fn new<S: AsRef<str>>(
        records: Vec<HostRecord>,
        groups: &[S],
        policy: SecondaryPolicy,
    ) -> Self {
        let mut order: Vec<HostName> = Vec::with_capacity(records.len());
        let mut hosts = BTreeMap::new();
        for record in records {
            let name = record.name().clone();
            if let Some(previous) = hosts.insert(name.clone(), record) {
                log::warn!(
                    "host name `{}` of container `{}` is also used by container `{}`, keeping the latter",
                    name,
                    previous.identifier(),
                    hosts[&name].identifier()
                );
                order.retain(|n| n != &name);
            }
            order.push(name);
        }

        let assignment = assign::assign(&order, groups, policy);
        Self {
            order,
            hosts,
            assignment,
        }
    }

    /// Host records in discovery order.
    pub fn hosts(&self) -> impl Iterator<Item = &HostRecord> {
        self.order.iter().filter_map(|name| self.hosts.get(name))
    }

    pub fn host(&self, name: &str) -> Option<&HostRecord> {
        self.hosts.get(name)
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Builds the variables of `host`.
    pub fn host_vars(&self, host: &HostRecord) -> HostVars {
        let env_groups: Vec<String> = self
            .assignment
            .groups_of(host.name())
            .map(str::to_owned)
            .collect();

        HostVars {
            ansible_host: host.address().to_owned(),
            ansible_port: host.port(),
            container_id: host.identifier().clone(),
            container_name: host.name().clone(),
            env_assigned: env_groups.first().cloned(),
            env_groups,
            instance_id: Uuid::new_v5(&Uuid::NAMESPACE_OID, host.identifier().as_str().as_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ExtractedFields;

    fn record(id: &str, name: &str) -> HostRecord {
        HostRecord::new(
            ContainerID::new(id).unwrap(),
            ExtractedFields {
                name: Some(name.to_owned()),
                address: None,
                port: None,
            },
        )
    }

    #[test]
    fn test_name_collision_last_write_wins() {
        let snapshot = Snapshot::new(
            vec![
                record("aaa", "web"),
                record("bbb", "db"),
                record("ccc", "web"),
            ],
            &["dev", "staging"],
            SecondaryPolicy::RoundRobin,
        );

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.host("web").unwrap().identifier().as_str(), "ccc");
        let names: Vec<&str> = snapshot.hosts().map(|h| h.name().as_str()).collect();
        assert_eq!(names, vec!["db", "web"]);
        let dev: Vec<&str> = snapshot
            .assignment()
            .members("dev")
            .unwrap()
            .iter()
            .map(HostName::as_str)
            .collect();
        assert_eq!(dev, vec!["db"]);
    }

    #[test]
    fn test_host_vars() {
        let snapshot = Snapshot::new(
            vec![record("0123456789abcdef", "solo")],
            &["dev", "staging", "production"],
            SecondaryPolicy::RoundRobin,
        );
        let host = snapshot.host("solo").unwrap();
        let vars = snapshot.host_vars(host);

        assert_eq!(vars.ansible_host, "localhost");
        assert_eq!(vars.ansible_port, 22);
        assert_eq!(vars.container_id.as_str(), "0123456789abcdef");
        assert_eq!(vars.env_assigned.as_deref(), Some("dev"));
        assert_eq!(vars.env_groups, vec!["dev", "staging", "production"]);
        assert_eq!(vars, snapshot.host_vars(host));
        assert_eq!(vars.instance_id.get_version_num(), 5);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::new(Vec::new(), &["dev"], SecondaryPolicy::RoundRobin);
        assert!(snapshot.is_empty());
        assert!(snapshot.assignment().is_empty());
    }
}
