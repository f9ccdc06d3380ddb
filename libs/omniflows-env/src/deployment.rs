//! Per-environment deployment profile: response headers, image domains and
//! output mode.

use serde::Serialize;

use crate::resolver::DerivedFlags;

const DEVELOPMENT_HEADERS: &[(&str, &str)] = &[("x-environment", "development")];

const PRODUCTION_HEADERS: &[(&str, &str)] = &[
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "origin-when-cross-origin"),
];

const PRODUCTION_IMAGE_DOMAINS: &[&str] = &["images.omniflows.com"];
const DEVELOPMENT_IMAGE_DOMAINS: &[&str] = &["localhost", "dev-images.omniflows.com"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Standalone,
}

/// Headers every response carries in the given tier. Names are lowercase.
pub fn response_headers(flags: DerivedFlags) -> &'static [(&'static str, &'static str)] {
    if flags.is_production {
        PRODUCTION_HEADERS
    } else if flags.is_development {
        DEVELOPMENT_HEADERS
    } else {
        &[]
    }
}

/// Hosts that images may be served from.
pub fn image_domains(flags: DerivedFlags) -> &'static [&'static str] {
    if flags.is_production {
        PRODUCTION_IMAGE_DOMAINS
    } else {
        DEVELOPMENT_IMAGE_DOMAINS
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentProfile {
    pub output: OutputMode,
    pub headers: &'static [(&'static str, &'static str)],
    pub image_domains: &'static [&'static str],
}

impl DeploymentProfile {
    pub fn for_flags(flags: DerivedFlags) -> Self {
        Self {
            output: OutputMode::Standalone,
            headers: response_headers(flags),
            image_domains: image_domains(flags),
        }
    }
}
