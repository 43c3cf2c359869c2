//! Group assignment engine.
//!
//! Hosts are handed out to the declared groups so that every group has at least one
//! member whenever at least one host exists:
//!
//! - with at least as many hosts as groups, the first host goes to the first group, the
//!   second host to the second group and so on; every further host is placed by the
//!   [`SecondaryPolicy`].
//! - with fewer hosts than groups, the hosts are repeated in discovery order until every
//!   group is covered, so a host may belong to several groups.
//!
//! The assignment is fully deterministic: the same hosts in the same discovery order
//! always yield the same groups.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::container::HostName;

/// Placement of the hosts that remain once every group has a member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SecondaryPolicy {
    /// Host `i` goes to group `i mod G`.
    #[default]
    RoundRobin,
    /// A host goes to group `crc32(name) mod G`, so it keeps its group while other
    /// containers come and go.
    NameHash,
}

impl SecondaryPolicy {
    fn pick(self, index: usize, name: &HostName, group_count: usize) -> usize {
        match self {
            SecondaryPolicy::RoundRobin => index % group_count,
            SecondaryPolicy::NameHash => {
                crc32fast::hash(name.as_str().as_bytes()) as usize % group_count
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown assignment policy `{0}`, expected `round-robin` or `name-hash`")]
pub struct UnknownPolicy(String);

impl FromStr for SecondaryPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round-robin" => Ok(Self::RoundRobin),
            "name-hash" => Ok(Self::NameHash),
            other => Err(UnknownPolicy(other.to_owned())),
        }
    }
}

impl fmt::Display for SecondaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecondaryPolicy::RoundRobin => f.write_str("round-robin"),
            SecondaryPolicy::NameHash => f.write_str("name-hash"),
        }
    }
}

/// Group memberships of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    /// Declared groups in priority order.
    order: Vec<String>,
    members: BTreeMap<String, BTreeSet<HostName>>,
}

impl Assignment {
    /// Members of `group`, `None` if the group was not part of the assignment.
    pub fn members(&self, group: &str) -> Option<&BTreeSet<HostName>> {
        self.members.get(group)
    }

    /// Groups with their members, in priority order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &BTreeSet<HostName>)> {
        self.order
            .iter()
            .filter_map(|g| self.members.get(g).map(|m| (g.as_str(), m)))
    }

    /// All groups containing `host`, in priority order.
    pub fn groups_of<'a>(&'a self, host: &HostName) -> impl Iterator<Item = &'a str> {
        self.groups()
            .filter(move |(_, members)| members.contains(host))
            .map(|(group, _)| group)
    }

    /// The highest-priority group containing `host`.
    pub fn primary_group<'a>(&'a self, host: &HostName) -> Option<&'a str> {
        self.groups_of(host).next()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Assigns `hosts` (in discovery order) to `groups` (in priority order).
///
/// Returns an empty assignment if there are no hosts or no groups.
pub fn assign<S: AsRef<str>>(
    hosts: &[HostName],
    groups: &[S],
    policy: SecondaryPolicy,
) -> Assignment {
    if hosts.is_empty() || groups.is_empty() {
        return Assignment::default();
    }

    let group_count = groups.len();
    let mut members: Vec<BTreeSet<HostName>> = vec![BTreeSet::new(); group_count];

    if hosts.len() >= group_count {
        for (idx, host) in hosts.iter().enumerate() {
            let group = if idx < group_count {
                idx
            } else {
                policy.pick(idx, host, group_count)
            };
            members[group].insert(host.clone());
        }
    } else {
        for (idx, group) in members.iter_mut().enumerate() {
            group.insert(hosts[idx % hosts.len()].clone());
        }
    }

    let order: Vec<String> = groups.iter().map(|g| g.as_ref().to_owned()).collect();
    for (group, members) in order.iter().zip(&members) {
        log::debug!("Group `{}` has {} members", group, members.len());
    }

    Assignment {
        members: order.iter().cloned().zip(members).collect(),
        order,
    }
}
