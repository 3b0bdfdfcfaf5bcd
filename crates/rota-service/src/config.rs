//! Layered service configuration.
//!
//! Precedence: defaults < TOML file < `ROTA_*` environment variables.
//!
//! ```no_run
//! use rota_service::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .with_file("rota.toml")
//!     .with_env()
//!     .build()?;
//! # Ok::<(), rota_service::ConfigError>(())
//! ```
//!
//! | Env var                       | Field                       |
//! |-------------------------------|-----------------------------|
//! | `ROTA_PLACE`                  | `place`                     |
//! | `ROTA_NETWORK_NODES`          | `network.nodes`             |
//! | `ROTA_NETWORK_EDGES`          | `network.edges`             |
//! | `ROTA_NETWORK_PBF`            | `network.pbf`               |
//! | `ROTA_RANDOMIZE_EDGES_PROP`   | `disable_proportion`        |
//! | `ROTA_SEED`                   | `seed`                      |
//! | `ROTA_WEIGHT`                 | `weight`                    |
//! | `ROTA_OSRM_URL`               | `osrm.base_url`             |
//! | `ROTA_OSRM_TIMEOUT_SECS`      | `osrm.timeout_secs`         |
//! | `ROTA_OSRM_USER_AGENT`        | `osrm.user_agent`           |
//! | `ROTA_INIT_GRAPH_ON_START`    | `init_graph_on_start`       |

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use rota_network::{NetworkSource, Weight};
use rota_network::randomize::DEFAULT_DISABLE_PROPORTION;
use rota_osrm::OsrmConfig;

use crate::ConfigError;

pub const ENV_PREFIX: &str = "ROTA_";
pub const DEFAULT_PLACE: &str = "Maricá, Rio de Janeiro, Brazil";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Municipality the network covers; reported, not geocoded.
    pub place: String,
    pub network: NetworkConfig,
    /// Share of edges disabled at load time, in `[0, 1]`.
    pub disable_proportion: f64,
    /// Fixed seed for reproducible randomization; entropy when unset.
    pub seed: Option<u64>,
    pub weight: Weight,
    pub osrm: OsrmConfig,
    /// Load the network when the service starts instead of on first use.
    pub init_graph_on_start: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            place: DEFAULT_PLACE.to_string(),
            network: NetworkConfig::default(),
            disable_proportion: DEFAULT_DISABLE_PROPORTION,
            seed: None,
            weight: Weight::Length,
            osrm: OsrmConfig::default(),
            init_graph_on_start: false,
        }
    }
}

/// Local network files.  Either both CSV paths or a PBF path; neither means
/// no local network.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub nodes: Option<PathBuf>,
    pub edges: Option<PathBuf>,
    pub pbf: Option<PathBuf>,
}

impl NetworkConfig {
    pub fn source(&self) -> Result<Option<NetworkSource>, ConfigError> {
        match (&self.nodes, &self.edges, &self.pbf) {
            (None, None, None) => Ok(None),
            (Some(nodes), Some(edges), None) => Ok(Some(NetworkSource::Csv {
                nodes: nodes.clone(),
                edges: edges.clone(),
            })),
            (None, None, Some(pbf)) => Ok(Some(NetworkSource::Pbf(pbf.clone()))),
            (_, _, Some(_)) => Err(ConfigError::Invalid(
                "network.pbf cannot be combined with network.nodes/edges".into(),
            )),
            _ => Err(ConfigError::Invalid(
                "network.nodes and network.edges must be set together".into(),
            )),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.disable_proportion) {
            return Err(ConfigError::Invalid(format!(
                "disable_proportion must be in [0, 1], got {}",
                self.disable_proportion
            )));
        }
        if self.osrm.timeout_secs == 0 {
            return Err(ConfigError::Invalid("osrm.timeout_secs must be > 0".into()));
        }
        if self.osrm.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("osrm.base_url must not be empty".into()));
        }
        self.network.source()?;
        Ok(())
    }

    /// Parse a TOML document; missing fields keep their defaults.
    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Overlay one `ROTA_*` variable.  Unknown names are ignored.
    pub fn apply_env_var(&mut self, var: &str, value: &str) -> Result<(), ConfigError> {
        let Some(key) = var.strip_prefix(ENV_PREFIX) else {
            return Ok(());
        };
        match key {
            "PLACE" => self.place = value.to_string(),
            "NETWORK_NODES" => self.network.nodes = non_empty_path(value),
            "NETWORK_EDGES" => self.network.edges = non_empty_path(value),
            "NETWORK_PBF" => self.network.pbf = non_empty_path(value),
            "RANDOMIZE_EDGES_PROP" => self.disable_proportion = parse(var, value)?,
            "SEED" => {
                self.seed = if value.trim().is_empty() { None } else { Some(parse(var, value)?) }
            }
            "WEIGHT" => self.weight = parse(var, value)?,
            "OSRM_URL" => self.osrm.base_url = value.trim().to_string(),
            "OSRM_TIMEOUT_SECS" => self.osrm.timeout_secs = parse(var, value)?,
            "OSRM_USER_AGENT" => self.osrm.user_agent = value.to_string(),
            "INIT_GRAPH_ON_START" => self.init_graph_on_start = parse_bool(var, value)?,
            _ => tracing::warn!(var, "ignoring unknown configuration variable"),
        }
        Ok(())
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    (!value.is_empty()).then(|| PathBuf::from(value))
}

fn parse<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::EnvVar {
        var: var.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::EnvVar {
            var: var.to_string(),
            value: value.to_string(),
            message: "expected true or false".into(),
        }),
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

enum ConfigSource {
    File(PathBuf),
    Env(Vec<(String, String)>),
}

/// Layered loader.  Sources apply in the order added; later ones win.
#[derive(Default)]
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// TOML file.  The file replaces everything before it, so add it first.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.sources.push(ConfigSource::File(path.as_ref().to_path_buf()));
        self
    }

    /// Overlay the process environment.
    pub fn with_env(self) -> Self {
        self.with_os_env_vars(std::env::vars_os())
    }

    /// Overlay OS-encoded variables.  Entries that are not valid Unicode are
    /// skipped.
    pub fn with_os_env_vars<I>(self, vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let vars = vars.into_iter().filter_map(|(k, v)| match (k.into_string(), v.into_string()) {
            (Ok(k), Ok(v)) => Some((k, v)),
            (Ok(k), Err(_)) if k.starts_with(ENV_PREFIX) => {
                tracing::warn!(var = %k, "ignoring non-Unicode value");
                None
            }
            _ => None,
        });
        self.with_env_vars(vars)
    }

    /// Overlay an explicit set of variables.
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .collect();
        self.sources.push(ConfigSource::Env(vars));
        self
    }

    pub fn build(self) -> Result<ServiceConfig, ConfigError> {
        let mut config = ServiceConfig::default();
        for source in self.sources {
            match source {
                ConfigSource::File(path) => config = ServiceConfig::from_file(&path)?,
                ConfigSource::Env(vars) => {
                    for (k, v) in vars {
                        config.apply_env_var(&k, &v)?;
                    }
                }
            }
        }
        config.validate()?;
        Ok(config)
    }
}
