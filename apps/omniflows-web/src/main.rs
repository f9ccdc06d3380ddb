use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod handlers;
mod probe;
mod routes;

use config::ServerConfig;
use omniflows_env::{DeploymentProfile, LoggingConfig, ResolvedEnv};
use probe::{ProcessProbe, SysinfoProbe};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides web.toml and LISTEN_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Refuse to start when required environment variables are missing
    #[arg(long, env = "STRICT_ENV")]
    strict_env: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub env: Arc<ResolvedEnv>,
    pub probe: Arc<dyn ProcessProbe>,
}

impl AppState {
    pub fn new(env: Arc<ResolvedEnv>, probe: Arc<dyn ProcessProbe>) -> Self {
        Self { env, probe }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let started_at = Instant::now();

    dotenvy::dotenv().ok();
    let args = Args::parse();

    let env = omniflows_env::current();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(&env.config.logging).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if args.strict_env {
        omniflows_env::validate_required()?;
    }

    let profile = DeploymentProfile::for_flags(env.flags);
    tracing::info!("omniflows web starting...");
    tracing::info!(
        "Environment: {} (mode: {})",
        env.snapshot.app_environment,
        env.snapshot.runtime_mode
    );
    tracing::info!("Version: {}", env.snapshot.app_version);
    tracing::info!(
        "API base URL: {} (timeout {} ms)",
        env.config.api.base_url,
        env.config.api.timeout_ms
    );
    tracing::info!(
        "Output: {:?}, image domains: {}",
        profile.output,
        profile.image_domains.join(", ")
    );
    tracing::debug!(
        flags = ?env.flags,
        features = ?env.config.features,
        headers = ?profile.headers,
        "Deployment profile resolved"
    );

    let mut server = ServerConfig::load()?;
    if let Some(port) = args.port {
        server.listen_port = port;
    }

    let state = AppState::new(
        Arc::new(env.clone()),
        Arc::new(SysinfoProbe::new(started_at)),
    );
    let app = routes::router(state);

    let addr = server.socket_addr();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn default_filter(logging: &LoggingConfig) -> String {
    if !logging.enabled {
        return "error".to_string();
    }
    let level = logging.level.as_str();
    format!("omniflows_web={level},omniflows_env={level},tower_http={level}")
}
