/// Viewer configuration, passed in as JSON by the host page
use crate::chart::BucketUnit;
use crate::error::ConfigError;
use crate::reaction_data::SEED_REACTIONS;
use serde::{Deserialize, Serialize};

/// Which reaction kinds get a count column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindPolicy {
    /// Seed kinds plus every kind found in storage at load time
    #[default]
    Discovered,
    /// Seed kinds only
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub seed_reactions: Vec<String>,
    pub kind_policy: KindPolicy,
    pub bucket_unit: BucketUnit,
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            seed_reactions: SEED_REACTIONS.iter().map(|s| s.to_string()).collect(),
            kind_policy: KindPolicy::default(),
            bucket_unit: BucketUnit::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate; `None` or blank input gives the defaults
    pub fn from_json(json: Option<&str>) -> Result<ViewerConfig, ConfigError> {
        let config = match json.map(str::trim) {
            None | Some("") => ViewerConfig::default(),
            Some(raw) => serde_json::from_str(raw)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seed_reactions.is_empty() {
            return Err(ConfigError::Invalid("seed_reactions must not be empty".to_string()));
        }
        for (i, kind) in self.seed_reactions.iter().enumerate() {
            if kind.is_empty() {
                return Err(ConfigError::Invalid("seed_reactions contains an empty kind".to_string()));
            }
            if self.seed_reactions[..i].contains(kind) {
                return Err(ConfigError::Invalid(format!("duplicate seed reaction {}", kind)));
            }
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<log::LevelFilter, ConfigError> {
        self.log_level
            .parse::<log::LevelFilter>()
            .map_err(|_| ConfigError::Invalid(format!("unknown log level {}", self.log_level)))
    }
}
