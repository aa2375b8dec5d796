//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use crate::aladhan::{AladhanConfig, CalculationParams, DEFAULT_BASE_URL};
use crate::cache::CacheConfig;
use crate::domain::{AdjustmentMap, AdjustmentProfile, DomainError, Location};

/// Error raised for an unusable configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but does not parse
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    /// Adjustment profile or override list is malformed
    #[error("{var}: {source}")]
    Adjustment {
        var: &'static str,
        #[source]
        source: DomainError,
    },

    /// Only one of the home coordinates is set
    #[error("PRAYER_HOME_LAT and PRAYER_HOME_LON must be set together")]
    PartialHome,
}

/// Everything the server needs at start-up.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub aladhan: AladhanConfig,
    pub cache: CacheConfig,
    /// Default calculation parameters for requests that set none.
    pub params: CalculationParams,
    /// Default adjustment profile.
    pub profile: AdjustmentProfile,
    /// Per-key offsets layered over the profile.
    pub overrides: AdjustmentMap,
    /// Where the background monitor tracks prayers, if anywhere.
    pub home: Option<Location>,
}

impl ServerConfig {
    pub fn new() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            aladhan: AladhanConfig::default(),
            cache: CacheConfig::default(),
            params: CalculationParams::default(),
            profile: AdjustmentProfile::default(),
            overrides: AdjustmentMap::new(),
            home: None,
        }
    }

    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup. Unset and blank values take the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::new();

        if let Some(addr) = get("PRAYER_BIND_ADDR") {
            config.bind_addr = parse_var("PRAYER_BIND_ADDR", &addr)?;
        }

        let base_url = get("ALADHAN_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        config.aladhan = config.aladhan.with_base_url(base_url);
        if let Some(secs) = get("ALADHAN_TIMEOUT_SECS") {
            config.aladhan = config
                .aladhan
                .with_timeout(parse_var("ALADHAN_TIMEOUT_SECS", &secs)?);
        }

        config.params = CalculationParams::new(
            get("PRAYER_METHOD")
                .map(|v| parse_var("PRAYER_METHOD", &v))
                .transpose()?,
            get("PRAYER_SCHOOL")
                .map(|v| parse_var("PRAYER_SCHOOL", &v))
                .transpose()?,
        );

        if let Some(profile) = get("PRAYER_PROFILE") {
            config.profile = profile.parse().map_err(|source| ConfigError::Adjustment {
                var: "PRAYER_PROFILE",
                source,
            })?;
        }
        if let Some(list) = get("PRAYER_ADJUSTMENTS") {
            config.overrides =
                AdjustmentMap::parse_list(&list).map_err(|source| ConfigError::Adjustment {
                    var: "PRAYER_ADJUSTMENTS",
                    source,
                })?;
        }

        if let Some(secs) = get("PRAYER_CACHE_TTL_SECS") {
            config.cache.ttl = Duration::from_secs(parse_var("PRAYER_CACHE_TTL_SECS", &secs)?);
        }

        config.home = match (get("PRAYER_HOME_LAT"), get("PRAYER_HOME_LON")) {
            (Some(lat), Some(lon)) => Some(Location::coordinates(
                parse_var("PRAYER_HOME_LAT", &lat)?,
                parse_var("PRAYER_HOME_LON", &lon)?,
            )),
            (None, None) => None,
            _ => return Err(ConfigError::PartialHome),
        };

        Ok(config)
    }

    /// Offsets for `profile` with the configured overrides on top.
    pub fn adjustments_for(&self, profile: AdjustmentProfile) -> AdjustmentMap {
        profile.adjustments().merged(&self.overrides)
    }

    /// Offsets for the default profile.
    pub fn adjustments(&self) -> AdjustmentMap {
        self.adjustments_for(self.profile)
    }

    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_params(mut self, params: CalculationParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_profile(mut self, profile: AdjustmentProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_overrides(mut self, overrides: AdjustmentMap) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_home(mut self, home: Location) -> Self {
        self.home = Some(home);
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        value: value.to_string(),
    })
}
