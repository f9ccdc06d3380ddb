//! Environment-derived configuration for the omniflows web runtime.
//!
//! Everything here is computed from the process environment once and then
//! only read. [`current`] gives the process-wide value; the `from_lookup`
//! constructors exist so callers can resolve against any source.

pub mod deployment;
pub mod error;
pub mod resolver;

pub use deployment::{DeploymentProfile, OutputMode, image_domains, response_headers};
pub use error::ConfigurationError;
pub use resolver::{
    ApiConfig, AppEnvironment, DerivedFlags, EnvironmentSnapshot, FeatureFlags, LogLevel,
    LoggingConfig, ResolvedEnv, RuntimeConfig, current, validate_required,
    validate_required_with,
};
