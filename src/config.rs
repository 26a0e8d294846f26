//! Aggregation configuration.

use serde::de::Error;
use serde::{Deserialize, Serialize};
use tilegrid_types::{DEFAULT_LEVEL, Level, MAX_LEVEL};

/// Tile grid aggregation configuration.
///
/// Serializable so that it can travel with a request or live in a config
/// file. Unknown fields are rejected.
///
/// # Example
///
/// ```rust
/// use tilegrid::Config;
///
/// let config = Config::default().with_level_of_detail(12).with_required_size(50);
/// assert_eq!(config.effective_shard_size(), 50);
///
/// let json = r#"{ "level_of_detail": 8, "shard_size": 500 }"#;
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.required_size, 10_000);
/// assert!(config.validate().is_err());
/// assert!(Config::from_json(json).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Quadtree depth of every tile key (0-31, default: 20)
    #[serde(default = "Config::default_level_of_detail")]
    pub level_of_detail: u8,

    /// Number of buckets in the final result
    #[serde(default = "Config::default_required_size")]
    pub required_size: usize,

    /// Buckets each shard sends for reduction (defaults to `required_size`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard_size: Option<usize>,

    /// Skip documents with unusable locations instead of failing
    #[serde(default)]
    pub ignore_malformed: bool,
}

impl Config {
    const fn default_level_of_detail() -> u8 {
        DEFAULT_LEVEL
    }

    const fn default_required_size() -> usize {
        10_000
    }

    pub fn with_level_of_detail(mut self, level: u8) -> Self {
        self.level_of_detail = level;
        self
    }

    pub fn with_required_size(mut self, size: usize) -> Self {
        self.required_size = size;
        self
    }

    pub fn with_shard_size(mut self, size: usize) -> Self {
        self.shard_size = Some(size);
        self
    }

    pub fn with_ignore_malformed(mut self, ignore: bool) -> Self {
        self.ignore_malformed = ignore;
        self
    }

    /// The configured level, if it is in range.
    pub fn level(&self) -> Option<Level> {
        Level::new(self.level_of_detail)
    }

    pub fn effective_shard_size(&self) -> usize {
        self.shard_size.unwrap_or(self.required_size)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.level_of_detail > MAX_LEVEL {
            return Err(format!(
                "Level of detail must be between 0 and {}, got {}",
                MAX_LEVEL, self.level_of_detail
            ));
        }

        if self.required_size == 0 {
            return Err("Required size must be greater than zero".to_string());
        }

        if let Some(shard_size) = self.shard_size
            && shard_size < self.required_size
        {
            return Err(format!(
                "Shard size ({}) must not be smaller than required size ({})",
                shard_size, self.required_size
            ));
        }

        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level_of_detail: Self::default_level_of_detail(),
            required_size: Self::default_required_size(),
            shard_size: None,
            ignore_malformed: false,
        }
    }
}
