use crate::AppState;
use axum::{extract::State, Json};
use omniflows_env::{image_domains, ApiConfig, FeatureFlags, ResolvedEnv};
use serde::Serialize;

/// Settings that are safe to hand to browsers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub environment: String,
    pub version: String,
    pub api: ApiConfig,
    pub features: FeatureFlags,
    pub images: ImageConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageConfig {
    pub domains: Vec<String>,
}

impl PublicConfig {
    pub fn from_env(env: &ResolvedEnv) -> Self {
        Self {
            environment: env.app_environment().to_string(),
            version: env.app_version().to_string(),
            api: env.config.api.clone(),
            features: env.config.features,
            images: ImageConfig {
                domains: image_domains(env.flags)
                    .iter()
                    .map(|domain| domain.to_string())
                    .collect(),
            },
            custom_key: env.snapshot.custom_key.clone(),
        }
    }
}

pub async fn public_config(State(state): State<AppState>) -> Json<PublicConfig> {
    Json(PublicConfig::from_env(&state.env))
}
