use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::assign::SecondaryPolicy;
use crate::config::{self, Config, Mode};
use crate::inventory::HostVarsMode;
use crate::runtime::RetryPolicy;

/// Builds an inventory of the running containers of this host.
///
/// Without `--list` or `--host` a static inventory (`inventory.yml`, `host_vars/`,
/// `group_vars/`) is written to the output directory.
#[derive(Debug, Parser)]
#[command(name = "creo-inventory", version)]
pub struct Cli {
    /// Print the dynamic inventory as JSON.
    #[arg(long, conflicts_with = "host")]
    pub list: bool,

    /// Print the variables of a single host as JSON.
    #[arg(long, value_name = "NAME")]
    pub host: Option<String>,

    /// Container runtime CLI to query.
    #[arg(long, env = "CREO_RUNTIME", default_value = config::DEFAULT_RUNTIME)]
    pub runtime: String,

    /// Directory receiving the static inventory.
    #[arg(short, long, env = "CREO_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// YAML file with the group catalog.
    #[arg(short, long, env = "CREO_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Seconds a single runtime call may take.
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = config::DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Additional attempts for failed runtime calls.
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Delay before the first retry, grows linearly.
    #[arg(long, value_name = "MILLIS", default_value_t = 500)]
    pub retry_backoff_ms: u64,

    /// Placement of hosts once every group has a member (`round-robin` or `name-hash`).
    #[arg(long, default_value_t = SecondaryPolicy::RoundRobin)]
    pub secondary_policy: SecondaryPolicy,

    /// Group holding every host in the dynamic inventory.
    #[arg(long, default_value = config::DEFAULT_FLAT_GROUP, value_parser = parse_flat_group)]
    pub flat_group: String,

    /// Embed host variables in `inventory.yml` instead of writing `host_vars/`.
    #[arg(long)]
    pub embed_host_vars: bool,
}

fn parse_flat_group(src: &str) -> Result<String, String> {
    if src.is_empty() || src.starts_with('_') {
        return Err(format!("`{src}` is not a usable group name"));
    }
    Ok(src.to_owned())
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let mode = match (cli.list, cli.host) {
            (_, Some(host)) => Mode::Host(host),
            (true, None) => Mode::List,
            (false, None) => Mode::Static,
        };

        Config {
            runtime: cli.runtime.into(),
            timeout: Duration::from_secs(cli.timeout),
            retry: RetryPolicy::new(cli.retries, Duration::from_millis(cli.retry_backoff_ms)),
            output_dir: cli.output_dir,
            catalog: cli.catalog,
            mode,
            policy: cli.secondary_policy,
            flat_group: cli.flat_group,
            host_vars: if cli.embed_host_vars {
                HostVarsMode::Inline
            } else {
                HostVarsMode::External
            },
        }
    }
}
