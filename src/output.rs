//! Writes the static inventory layout:
//!
//! ```text
//! <root>/inventory.yml
//! <root>/host_vars/<host>.yml
//! <root>/group_vars/<group>.yml
//! ```
//!
//! Every file is replaced atomically. Files from earlier runs that do not correspond to a
//! host of this run are left untouched.
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, GroupConfig};
use crate::fsutil::{self, FileWriteError};
use crate::inventory::{HostVars, HostVarsMode, Snapshot, StaticInventory};

pub const INVENTORY_FILE: &str = "inventory.yml";
pub const HOST_VARS_DIR: &str = "host_vars";
pub const GROUP_VARS_DIR: &str = "group_vars";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Write(#[from] FileWriteError),
    #[error("failed to serialize `{path}`: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Files written by [`write_static`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WrittenFiles {
    pub host_vars: Vec<PathBuf>,
    pub group_vars: Vec<PathBuf>,
    pub inventory: PathBuf,
}

/// Renders the variables of one group.
///
/// The output only depends on the catalog entry, rendering the same entry twice yields
/// identical bytes.
pub fn render_group_vars(config: &GroupConfig) -> std::result::Result<String, serde_yaml::Error> {
    serde_yaml::to_string(config)
}

pub fn render_host_vars(vars: &HostVars) -> std::result::Result<String, serde_yaml::Error> {
    serde_yaml::to_string(vars)
}

fn write_yaml(
    path: PathBuf,
    render: impl FnOnce() -> std::result::Result<String, serde_yaml::Error>,
) -> Result<PathBuf> {
    let contents = render().map_err(|source| Error::Serialize {
        path: path.clone(),
        source,
    })?;
    fsutil::write_atomic(&path, contents.as_bytes())?;
    Ok(path)
}

/// Writes host variables, group variables and the static inventory below `root`.
///
/// With [`HostVarsMode::Inline`] the host variables are embedded in the inventory and no
/// `host_vars/` files are written.
///
/// # Errors
///
/// Returns [`Error::Write`] if a directory or file cannot be written and
/// [`Error::Serialize`] if a document cannot be rendered. Files written before the
/// failure are kept.
pub fn write_static(
    root: &Path,
    snapshot: &Snapshot,
    catalog: &Catalog,
    mode: HostVarsMode,
) -> Result<WrittenFiles> {
    fsutil::ensure_dir(root)?;
    let mut written = WrittenFiles::default();

    if mode == HostVarsMode::External {
        let dir = root.join(HOST_VARS_DIR);
        fsutil::ensure_dir(&dir)?;
        for host in snapshot.hosts() {
            let vars = snapshot.host_vars(host);
            let path = write_yaml(dir.join(format!("{}.yml", host.name())), || {
                render_host_vars(&vars)
            })?;
            log::info!("Created host_vars file: {}", path.display());
            written.host_vars.push(path);
        }
    }

    let dir = root.join(GROUP_VARS_DIR);
    fsutil::ensure_dir(&dir)?;
    for group in catalog.iter() {
        let path = write_yaml(dir.join(format!("{}.yml", group.name)), || {
            render_group_vars(&group.vars)
        })?;
        log::info!("Created group_vars file: {}", path.display());
        written.group_vars.push(path);
    }

    let inventory = StaticInventory::from_snapshot(snapshot, mode);
    written.inventory = write_yaml(root.join(INVENTORY_FILE), || inventory.to_yaml())?;
    log::info!("Generated static inventory {}", written.inventory.display());

    Ok(written)
}
