use std::collections::BTreeMap;

use crate::container::HostName;

use super::{HostVars, Snapshot};

/// Where the per-host variables of the static inventory live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostVarsMode {
    /// Variables are written to `host_vars/<name>.yml`, hosts are listed with empty entries.
    #[default]
    External,
    /// Variables are embedded below each host entry.
    Inline,
}

/// Static inventory: `all -> children -> <group> -> hosts -> <name>`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StaticInventory {
    all: StaticRoot,
}

#[derive(Debug, Clone, serde::Serialize)]
struct StaticRoot {
    #[serde(serialize_with = "super::serialize_ordered")]
    children: Vec<(String, StaticGroup)>,
}

#[derive(Debug, Clone, serde::Serialize)]
struct StaticGroup {
    hosts: BTreeMap<HostName, StaticHostEntry>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(untagged)]
enum StaticHostEntry {
    Inline(HostVars),
    External {},
}

impl StaticInventory {
    /// Renders the groups of `snapshot` in priority order.
    pub fn from_snapshot(snapshot: &Snapshot, mode: HostVarsMode) -> Self {
        let children = snapshot
            .assignment()
            .groups()
            .map(|(group, members)| {
                let hosts = members
                    .iter()
                    .filter_map(|name| snapshot.host(name.as_str()))
                    .map(|host| {
                        let entry = match mode {
                            HostVarsMode::Inline => StaticHostEntry::Inline(snapshot.host_vars(host)),
                            HostVarsMode::External => StaticHostEntry::External {},
                        };
                        (host.name().clone(), entry)
                    })
                    .collect();
                (group.to_owned(), StaticGroup { hosts })
            })
            .collect();

        Self {
            all: StaticRoot { children },
        }
    }

    /// Groups in priority order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.all.children.iter().map(|(name, _)| name.as_str())
    }

    /// Members of `group`.
    pub fn members(&self, group: &str) -> Option<impl Iterator<Item = &HostName>> {
        self.all
            .children
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, g)| g.hosts.keys())
    }

    /// Every host name mentioned anywhere in the inventory.
    pub fn host_names(&self) -> std::collections::BTreeSet<&HostName> {
        self.all
            .children
            .iter()
            .flat_map(|(_, g)| g.hosts.keys())
            .collect()
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
