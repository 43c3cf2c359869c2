//! Group configuration catalog.
//!
//! Every declared deployment group carries a static bundle of variables. The catalog is
//! also the single place that defines which groups exist and in which priority order
//! hosts are handed out to them.
mod builtin;
mod error;

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

pub use error::{Error, Result};

use crate::container::is_safe_file_stem;
use crate::fsutil;

/// Variables attached verbatim to a group.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GroupConfig {
    pub filesystem_mount: String,
    pub backup_path: String,
    pub log_path: String,
    pub app_environment: String,
    pub debug_mode: bool,
    pub api_endpoint: String,
    pub db_connection: String,
    #[serde(default)]
    pub feature_toggle: BTreeMap<String, bool>,
    pub env_color: String,
    #[serde(default)]
    pub custom_message: String,
    /// Any further keys found in a catalog file.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// A named group together with its variables.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GroupDefinition {
    pub name: String,
    pub vars: GroupConfig,
}

#[derive(Debug, serde::Deserialize)]
struct CatalogFile {
    groups: Vec<GroupDefinition>,
}

/// The ordered set of declared groups.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    groups: Vec<GroupDefinition>,
}

impl Catalog {
    /// Creates a catalog from group definitions given in priority order.
    ///
    /// # Errors
    ///
    /// - [`Error::Empty`] if no group is given.
    /// - [`Error::InvalidGroupName`] if a name cannot be used as a file name.
    /// - [`Error::DuplicateGroup`] if a name appears twice.
    pub fn new(groups: Vec<GroupDefinition>) -> Result<Self> {
        if groups.is_empty() {
            return Err(Error::Empty);
        }

        let mut seen = HashSet::with_capacity(groups.len());
        for group in &groups {
            if !is_safe_file_stem(&group.name) {
                return Err(Error::InvalidGroupName(group.name.clone()));
            }
            if !seen.insert(group.name.as_str()) {
                return Err(Error::DuplicateGroup(group.name.clone()));
            }
        }

        Ok(Self { groups })
    }

    /// The dev / staging / production catalog shipped with the binary.
    pub fn builtin() -> Self {
        Self {
            groups: builtin::definitions(),
        }
    }

    /// Loads a catalog from a YAML file of the form
    ///
    /// ```yaml
    /// groups:
    ///   - name: dev
    ///     vars:
    ///       filesystem_mount: /mnt/dev
    ///       # ...
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileOpen`] or [`Error::Parse`] if the file cannot be read, and the
    /// validation errors of [`Catalog::new`].
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = fsutil::open_file_reader(path)?;
        let file: CatalogFile = serde_yaml::from_reader(reader).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!(
            "Loaded {} groups from `{}`",
            file.groups.len(),
            path.display()
        );

        Self::new(file.groups)
    }

    /// Group names in priority order.
    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&GroupConfig> {
        self.groups.iter().find(|g| g.name == name).map(|g| &g.vars)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupDefinition> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
