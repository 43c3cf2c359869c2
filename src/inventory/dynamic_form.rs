use std::collections::BTreeMap;

use serde::ser::SerializeMap;

use crate::container::HostName;

use super::{HostVars, Snapshot};

/// Reserved top-level key holding the per-host variables.
pub const META_KEY: &str = "_meta";

/// Dynamic (`--list`) inventory: one flat group with every host plus the `_meta` table.
///
/// ```json
/// {
///   "containers": { "hosts": ["web", "db"] },
///   "_meta": { "hostvars": { "web": { ... }, "db": { ... } } }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DynamicInventory {
    groups: Vec<(String, DynamicGroup)>,
    meta: Meta,
}

#[derive(Debug, Clone, serde::Serialize)]
struct DynamicGroup {
    hosts: Vec<HostName>,
}

#[derive(Debug, Clone, serde::Serialize)]
struct Meta {
    hostvars: BTreeMap<HostName, HostVars>,
}

impl DynamicInventory {
    /// Renders every host of `snapshot` below `flat_group`.
    ///
    /// An empty snapshot yields a document that only carries an empty `_meta` table.
    pub fn from_snapshot(snapshot: &Snapshot, flat_group: &str) -> Self {
        let hosts: Vec<HostName> = snapshot.hosts().map(|h| h.name().clone()).collect();
        let hostvars = snapshot
            .hosts()
            .map(|h| (h.name().clone(), snapshot.host_vars(h)))
            .collect();

        let groups = if hosts.is_empty() {
            Vec::new()
        } else {
            vec![(flat_group.to_owned(), DynamicGroup { hosts })]
        };

        Self {
            groups,
            meta: Meta { hostvars },
        }
    }

    /// Every host name listed in a group.
    pub fn host_names(&self) -> std::collections::BTreeSet<&HostName> {
        self.groups.iter().flat_map(|(_, g)| g.hosts.iter()).collect()
    }

    pub fn host_vars(&self, name: &str) -> Option<&HostVars> {
        self.meta.hostvars.get(name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl serde::Serialize for DynamicInventory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.groups.len() + 1))?;
        for (name, group) in &self.groups {
            map.serialize_entry(name, group)?;
        }
        map.serialize_entry(META_KEY, &self.meta)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::SecondaryPolicy;
    use crate::container::ContainerID;
    use crate::host::{ExtractedFields, HostRecord};
    use crate::inventory::{HostVarsMode, StaticInventory};

    fn snapshot(names: &[&str]) -> Snapshot {
        let records = names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                HostRecord::new(
                    ContainerID::new(format!("c{idx:011}")).unwrap(),
                    ExtractedFields {
                        name: Some((*name).to_owned()),
                        address: None,
                        port: Some(2222),
                    },
                )
            })
            .collect();
        Snapshot::new(records, &["dev", "staging", "production"], SecondaryPolicy::RoundRobin)
    }

    #[test]
    fn test_list_document_shape() {
        let inventory = DynamicInventory::from_snapshot(&snapshot(&["web", "db"]), "containers");
        let value: serde_json::Value = serde_json::from_str(&inventory.to_json().unwrap()).unwrap();

        assert_eq!(value["containers"]["hosts"], serde_json::json!(["web", "db"]));
        let web = &value["_meta"]["hostvars"]["web"];
        assert_eq!(web["ansible_host"], "localhost");
        assert_eq!(web["ansible_port"], 2222);
        assert_eq!(web["container_id"], "c00000000000");
        assert_eq!(web["container_name"], "web");
        assert_eq!(web["env_assigned"], "dev");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_document() {
        let inventory = DynamicInventory::from_snapshot(&snapshot(&[]), "containers");
        assert_eq!(
            inventory.to_json().unwrap(),
            serde_json::to_string_pretty(&serde_json::json!({"_meta": {"hostvars": {}}})).unwrap()
        );
    }

    #[test]
    fn test_static_and_dynamic_share_host_names() {
        for names in [
            vec!["only"],
            vec!["a", "b", "c"],
            vec!["a", "b", "c", "d", "e", "f", "g"],
        ] {
            let snapshot = snapshot(&names);
            let dynamic = DynamicInventory::from_snapshot(&snapshot, "containers");
            let fixed = StaticInventory::from_snapshot(&snapshot, HostVarsMode::External);
            assert_eq!(dynamic.host_names(), fixed.host_names());
            assert_eq!(dynamic.host_names().len(), names.len());
        }
    }

    #[test]
    fn test_host_vars_lookup() {
        let inventory = DynamicInventory::from_snapshot(&snapshot(&["web"]), "containers");
        assert_eq!(inventory.host_vars("web").unwrap().ansible_port, 2222);
        assert!(inventory.host_vars("nope").is_none());
    }
}
