use crate::probe::{IntrospectionError, MemoryUsage, ProcessProbe};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use omniflows_env::ResolvedEnv;
use serde::Serialize;

const UNKNOWN_ERROR: &str = "Unknown error";

/// Point-in-time process health. Unhealthy reports carry no version,
/// uptime or memory fields at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthReport {
    Healthy {
        timestamp: String,
        environment: String,
        version: String,
        uptime: f64,
        memory: MemoryUsage,
    },
    Unhealthy {
        timestamp: String,
        environment: String,
        error: String,
    },
}

impl HealthReport {
    pub fn assess(env: &ResolvedEnv, probe: &dyn ProcessProbe, now: DateTime<Utc>) -> Self {
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let environment = env.app_environment().to_string();

        match gather(probe) {
            Ok((uptime, memory)) => Self::Healthy {
                timestamp,
                environment,
                version: env.app_version().to_string(),
                uptime,
                memory,
            },
            Err(err) => Self::Unhealthy {
                timestamp,
                environment,
                error: describe(&err),
            },
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy { .. })
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

impl IntoResponse for HealthReport {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

fn gather(probe: &dyn ProcessProbe) -> Result<(f64, MemoryUsage), IntrospectionError> {
    let uptime = probe.uptime()?;
    let memory = probe.memory()?;
    Ok((uptime, memory))
}

fn describe(err: &IntrospectionError) -> String {
    let message = err.to_string();
    if message.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

pub async fn health_check(State(state): State<AppState>) -> HealthReport {
    let report = HealthReport::assess(&state.env, state.probe.as_ref(), Utc::now());

    match &report {
        HealthReport::Healthy { uptime, .. } => {
            tracing::debug!(uptime, "Health check passed");
        }
        HealthReport::Unhealthy { error, .. } => {
            tracing::warn!("Health check failed: {}", error);
        }
    }

    report
}
