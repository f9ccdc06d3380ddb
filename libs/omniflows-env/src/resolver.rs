use serde::{Serialize, Serializer};
use std::env;
use std::fmt;
use std::sync::OnceLock;

use crate::error::ConfigurationError;

pub const APP_ENV_VAR: &str = "NEXT_PUBLIC_APP_ENV";
pub const API_BASE_URL_VAR: &str = "NEXT_PUBLIC_API_BASE_URL";
pub const APP_VERSION_VAR: &str = "NEXT_PUBLIC_APP_VERSION";
pub const RUNTIME_MODE_VAR: &str = "NODE_ENV";
pub const CUSTOM_KEY_VAR: &str = "CUSTOM_KEY";

const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";
const DEFAULT_APP_VERSION: &str = "dev";
const DEFAULT_RUNTIME_MODE: &str = "development";

const REQUIRED_VARS: [&str; 2] = [APP_ENV_VAR, API_BASE_URL_VAR];

const PRODUCTION_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Deployment tier named by `NEXT_PUBLIC_APP_ENV`.
///
/// Unrecognized names are kept verbatim so they still show up in health
/// reports, but none of the tier flags are set for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppEnvironment {
    #[default]
    Local,
    Development,
    Production,
    Other(String),
}

impl AppEnvironment {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "local" => Self::Local,
            "development" => Self::Development,
            "production" => Self::Production,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Local => "local",
            Self::Development => "development",
            Self::Production => "production",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AppEnvironment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Raw values read from the environment, defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSnapshot {
    pub app_environment: AppEnvironment,
    pub api_base_url: String,
    pub app_version: String,
    pub runtime_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_key: Option<String>,
}

impl EnvironmentSnapshot {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_environment = non_empty(&lookup, APP_ENV_VAR)
            .map(|raw| AppEnvironment::parse(&raw))
            .unwrap_or_default();

        Self {
            app_environment,
            api_base_url: non_empty(&lookup, API_BASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            app_version: non_empty(&lookup, APP_VERSION_VAR)
                .unwrap_or_else(|| DEFAULT_APP_VERSION.to_string()),
            runtime_mode: non_empty(&lookup, RUNTIME_MODE_VAR)
                .unwrap_or_else(|| DEFAULT_RUNTIME_MODE.to_string()),
            custom_key: non_empty(&lookup, CUSTOM_KEY_VAR),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFlags {
    pub is_production: bool,
    pub is_development: bool,
    pub is_local: bool,
}

impl DerivedFlags {
    pub fn for_environment(app_environment: &AppEnvironment) -> Self {
        Self {
            is_production: *app_environment == AppEnvironment::Production,
            is_development: *app_environment == AppEnvironment::Development,
            is_local: *app_environment == AppEnvironment::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Debug => "debug",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    pub analytics: bool,
    pub debug_mode: bool,
    pub mock_api: bool,
}

/// Operational settings derived from the tier flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
    pub features: FeatureFlags,
}

impl RuntimeConfig {
    pub fn derive(snapshot: &EnvironmentSnapshot, flags: DerivedFlags) -> Self {
        Self {
            api: ApiConfig {
                base_url: snapshot.api_base_url.clone(),
                timeout_ms: if flags.is_production {
                    PRODUCTION_TIMEOUT_MS
                } else {
                    DEFAULT_TIMEOUT_MS
                },
            },
            logging: LoggingConfig {
                enabled: !flags.is_production,
                level: if flags.is_production {
                    LogLevel::Error
                } else {
                    LogLevel::Debug
                },
            },
            features: FeatureFlags {
                analytics: flags.is_production,
                debug_mode: flags.is_local || flags.is_development,
                mock_api: flags.is_local,
            },
        }
    }
}

/// Snapshot, flags and runtime config resolved together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEnv {
    pub snapshot: EnvironmentSnapshot,
    pub flags: DerivedFlags,
    pub config: RuntimeConfig,
}

impl ResolvedEnv {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot = EnvironmentSnapshot::from_lookup(lookup);
        let flags = DerivedFlags::for_environment(&snapshot.app_environment);
        let config = RuntimeConfig::derive(&snapshot, flags);

        Self {
            snapshot,
            flags,
            config,
        }
    }

    pub fn from_process() -> Self {
        Self::from_lookup(process_lookup)
    }

    pub fn app_environment(&self) -> &AppEnvironment {
        &self.snapshot.app_environment
    }

    pub fn app_version(&self) -> &str {
        &self.snapshot.app_version
    }
}

static CURRENT: OnceLock<ResolvedEnv> = OnceLock::new();

/// Process-wide resolved environment, computed on first call.
pub fn current() -> &'static ResolvedEnv {
    CURRENT.get_or_init(|| {
        let resolved = ResolvedEnv::from_process();
        tracing::debug!(
            environment = %resolved.snapshot.app_environment,
            runtime_mode = %resolved.snapshot.runtime_mode,
            "Resolved environment configuration"
        );
        resolved
    })
}

/// Fails with every required variable that is absent or empty.
pub fn validate_required_with<F>(lookup: F) -> Result<(), ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    let missing: Vec<String> = REQUIRED_VARS
        .iter()
        .filter(|key| non_empty(&lookup, key).is_none())
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigurationError::MissingVariables(missing))
    }
}

pub fn validate_required() -> Result<(), ConfigurationError> {
    validate_required_with(process_lookup)
}

fn process_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.is_empty())
}
