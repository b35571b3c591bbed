//! Configuration for the tatl tools
//!
//! Bootstrap configuration comes from a TOML file. Provider credentials
//! may also arrive through environment variables, which take priority
//! over the file so deployments can keep secrets out of the config.
//!
//! Every tunable that used to be hard-coded across the original script
//! variants (domestic prefixes, excluded flight patterns, aircraft
//! overrides) lives here with built-in defaults, so a bare config file
//! naming only the airport and data paths is a working deployment.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;
use serde::Deserialize;
use tracing::warn;

use crate::{Error, Result};

/// Environment variable overriding the TOML `api_user`
pub const ENV_API_USER: &str = "TATL_API_USER";
/// Environment variable overriding the TOML `api_key`
pub const ENV_API_KEY: &str = "TATL_API_KEY";

/// Complete run configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// ICAO code of the watched airport
    pub airport: String,

    /// Result-count cap requested per provider call
    #[serde(default = "default_how_many")]
    pub how_many: u32,

    /// Base URL of the flight-data provider
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Provider username; `TATL_API_USER` wins over this
    #[serde(default)]
    pub api_user: Option<String>,

    /// Provider API key; `TATL_API_KEY` wins over this
    #[serde(default)]
    pub api_key: Option<String>,

    /// IANA timezone of the airport, used for calendar dates
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Country code flights are classified against for direction
    #[serde(default = "default_home_country")]
    pub home_country: String,

    /// Reference table and ledger file locations
    pub data: DataConfig,

    /// Filter pipeline tuning
    #[serde(default)]
    pub filters: FilterConfig,

    /// Aircraft-type overrides keyed by resolved airline name. The
    /// provider systematically misreports types for some military
    /// operators; an override wins over the table lookup.
    #[serde(default = "default_aircraft_overrides")]
    pub aircraft_overrides: Vec<AircraftOverride>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Locations of the reference tables and the ledger file.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Airline code → name table (2-column CSV, no header)
    pub airlines: PathBuf,
    /// Aircraft code → name table (2-column CSV, no header)
    pub aircraft: PathBuf,
    /// Airport code → IATA, country table (3-column CSV, no header)
    pub airports: PathBuf,
    /// The persistent flight ledger (CSV with header)
    pub ledger: PathBuf,
}

/// Filter pipeline tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// ICAO prefixes counted as domestic-or-near-domestic. A route is
    /// dropped only when both legs match.
    #[serde(default = "default_domestic_prefixes")]
    pub domestic_prefixes: Vec<String>,

    /// (airline code, flight number) pairs never admitted to the ledger
    #[serde(default = "default_excluded_flights")]
    pub excluded_flights: Vec<ExcludedFlight>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            domestic_prefixes: default_domestic_prefixes(),
            excluded_flights: default_excluded_flights(),
        }
    }
}

/// One excluded calling pattern, matched on the raw parsed ident.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExcludedFlight {
    pub airline: String,
    pub flight: String,
}

/// One aircraft-type override, matched on the resolved airline name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AircraftOverride {
    pub airline: String,
    pub aircraft_type: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_how_many() -> u32 {
    15
}

fn default_base_url() -> String {
    "https://flightxml.flightaware.com/json/FlightXML2".to_string()
}

fn default_timezone() -> String {
    "US/Eastern".to_string()
}

fn default_home_country() -> String {
    "US".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// US, Canada, Mexico, Caribbean, Greenland. One leg outside this set
/// qualifies a route as transatlantic-relevant.
fn default_domestic_prefixes() -> Vec<String> {
    ["K", "C", "M", "T", "BG"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Maine's LifeFlight medical transports call in as N901; they are local
/// operations, not ledger material.
fn default_excluded_flights() -> Vec<ExcludedFlight> {
    vec![ExcludedFlight {
        airline: "N".to_string(),
        flight: "901".to_string(),
    }]
}

fn default_aircraft_overrides() -> Vec<AircraftOverride> {
    vec![
        AircraftOverride {
            airline: "US Navy".to_string(),
            aircraft_type: "Boeing 737-700".to_string(),
        },
        AircraftOverride {
            airline: "US Air Force".to_string(),
            aircraft_type: "Boeing C-17 Globemaster".to_string(),
        },
    ]
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate field shapes that TOML parsing cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.airport.len() != 4 {
            return Err(Error::Config(format!(
                "airport must be a 4-character ICAO code, got {:?}",
                self.airport
            )));
        }
        if self.how_many == 0 {
            return Err(Error::Config("how_many must be at least 1".to_string()));
        }
        self.tz()?;
        Ok(())
    }

    /// Parse the configured airport timezone.
    pub fn tz(&self) -> Result<Tz> {
        Tz::from_str(&self.timezone)
            .map_err(|_| Error::Config(format!("Unknown timezone: {}", self.timezone)))
    }

    /// Resolve provider credentials with environment → TOML priority.
    ///
    /// Warns when both sources are set (potential misconfiguration) and
    /// produces an actionable error when neither is.
    pub fn credentials(&self) -> Result<(String, String)> {
        let user = resolve_secret(ENV_API_USER, self.api_user.as_deref(), "api_user")?;
        let key = resolve_secret(ENV_API_KEY, self.api_key.as_deref(), "api_key")?;
        Ok((user, key))
    }
}

fn resolve_secret(env_var: &str, toml_value: Option<&str>, field: &str) -> Result<String> {
    let env_value = std::env::var(env_var)
        .ok()
        .filter(|v| !v.trim().is_empty());
    let toml_value = toml_value
        .map(str::to_string)
        .filter(|v| !v.trim().is_empty());

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment and TOML config; using environment (highest priority)",
            field
        );
    }

    env_value.or(toml_value).ok_or_else(|| {
        Error::Config(format!(
            "Provider credential `{}` not configured. Set one of:\n\
             1. Environment: {}=your-value-here\n\
             2. TOML config: {} = \"your-value\"",
            field, env_var, field
        ))
    })
}
