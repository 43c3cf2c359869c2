use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::assign::SecondaryPolicy;
use crate::inventory::HostVarsMode;
use crate::runtime::RetryPolicy;

/// Runtime CLI used when none is configured.
pub const DEFAULT_RUNTIME: &str = "podman";
/// Group holding every host in the dynamic inventory.
pub const DEFAULT_FLAT_GROUP: &str = "containers";
/// Upper bound for a single runtime call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// What a run produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    /// Write `inventory.yml`, `host_vars/` and `group_vars/`.
    #[default]
    Static,
    /// Print the dynamic inventory to stdout.
    List,
    /// Print the variables of a single host to stdout.
    Host(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub runtime: OsString,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub output_dir: PathBuf,
    /// YAML group catalog, the built-in catalog if unset.
    pub catalog: Option<PathBuf>,
    pub mode: Mode,
    pub policy: SecondaryPolicy,
    pub flat_group: String,
    pub host_vars: HostVarsMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime: DEFAULT_RUNTIME.into(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            output_dir: PathBuf::from("."),
            catalog: None,
            mode: Mode::default(),
            policy: SecondaryPolicy::default(),
            flat_group: DEFAULT_FLAT_GROUP.to_owned(),
            host_vars: HostVarsMode::default(),
        }
    }
}
