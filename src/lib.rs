//! Creo Inventory: builds an inventory of the containers running on this host.
//!
//! The running containers are queried from a docker-compatible runtime CLI, turned into
//! host records (name, address, SSH port), spread across the deployment groups of the
//! group catalog and rendered either as a static inventory on disk or as a dynamic
//! `--list` document on stdout.
pub mod assign;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod container;
pub mod discovery;
pub mod error;
pub mod fsutil;
pub mod host;
pub mod inventory;
pub mod output;
pub mod runtime;

use std::io::Write;

pub use config::{Config, Mode};
pub use error::{Error, Result};

use catalog::Catalog;
use discovery::Discoverer;
use inventory::{DynamicInventory, Snapshot};
use runtime::{CommandRuntime, ContainerRuntime};

/// The result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The runtime reported no usable containers, nothing was written.
    NoContainers,
    /// A static inventory was written.
    Written(output::WrittenFiles),
    /// The dynamic inventory of `hosts` hosts was printed.
    Listed { hosts: usize },
    /// The variables of a single host were printed, `found` is `false` for unknown hosts.
    HostVars { found: bool },
}

/// Runs one inventory pass against the configured runtime CLI, printing to stdout.
///
/// # Errors
///
/// Fails if the group catalog cannot be loaded, the static inventory cannot be written
/// or stdout is closed. Runtime failures are logged and treated as "no containers".
pub async fn run(config: Config) -> Result<Outcome> {
    let catalog = match &config.catalog {
        Some(path) => Catalog::from_yaml_file(path)?,
        None => Catalog::builtin(),
    };
    let runtime = CommandRuntime::new(config.runtime.clone(), config.timeout, config.retry);
    log::debug!(
        "Querying `{}` with a timeout of {:?}",
        config.runtime.to_string_lossy(),
        config.timeout
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with(runtime, &catalog, &config, &mut out).await
}

/// Runs one inventory pass against `runtime`, printing `--list`/`--host` output to `out`.
pub async fn run_with<R, W>(
    runtime: R,
    catalog: &Catalog,
    config: &Config,
    out: &mut W,
) -> Result<Outcome>
where
    R: ContainerRuntime,
    W: Write,
{
    let records = Discoverer::new(runtime).discover().await;
    let snapshot = Snapshot::new(records, &catalog.group_names(), config.policy);

    if snapshot.is_empty() {
        log::info!("No running containers found.");
        if config.mode == Mode::List {
            print_json(out, &DynamicInventory::from_snapshot(&snapshot, &config.flat_group))?;
        }
        if let Mode::Host(_) = config.mode {
            print_json(out, &serde_json::json!({}))?;
        }
        return Ok(Outcome::NoContainers);
    }
    log::info!(
        "Assigned {} hosts to {} groups",
        snapshot.len(),
        catalog.len()
    );

    match &config.mode {
        Mode::Static => {
            let written =
                output::write_static(&config.output_dir, &snapshot, catalog, config.host_vars)?;
            Ok(Outcome::Written(written))
        }
        Mode::List => {
            let inventory = DynamicInventory::from_snapshot(&snapshot, &config.flat_group);
            print_json(out, &inventory)?;
            Ok(Outcome::Listed {
                hosts: snapshot.len(),
            })
        }
        Mode::Host(name) => match snapshot.host(name) {
            Some(host) => {
                print_json(out, &snapshot.host_vars(host))?;
                Ok(Outcome::HostVars { found: true })
            }
            None => {
                log::warn!("unknown host `{}`", name);
                print_json(out, &serde_json::json!({}))?;
                Ok(Outcome::HostVars { found: false })
            }
        },
    }
}

fn print_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out).map_err(Error::Stdout)?;
    out.flush().map_err(Error::Stdout)
}
