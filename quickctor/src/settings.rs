use crate::logger::LogLevel;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime knobs of the global [`crate::FactoryCache`].
///
/// Read from an optional `quickctor.{toml,json,yaml}` file in the working directory,
/// overridden by `QUICKCTOR_*` environment variables, e.g. `QUICKCTOR_LOG_LEVEL=debug`.
#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub log_level: LogLevel,
    /// Build a factory for every registered constructor when the global cache is first touched.
    pub prewarm: bool,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_file("quickctor", false)
    }

    pub fn from_file(path: &str, required: bool) -> Result<Self, ConfigError> {
        Self::from_sources(path, required, Self::environment())
    }

    /// `QUICKCTOR_LOG_LEVEL`, `QUICKCTOR_PREWARM`; `__` only separates nested keys.
    fn environment() -> Environment {
        Environment::with_prefix("QUICKCTOR").prefix_separator("_").try_parsing(true).separator("__")
    }

    fn from_sources(path: &str, required: bool, env: Environment) -> Result<Self, ConfigError> {
        let builder =
            Config::builder()
                .add_source(File::with_name(path).required(required))
                .add_source(env);
        builder.build()?.try_deserialize()
    }
}
