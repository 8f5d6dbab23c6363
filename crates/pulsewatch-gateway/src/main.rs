//! pulsewatch gateway
//!
//! - Scrape: /metrics (Prometheus text), /metrics/snapshot (JSON)
//! - Health: /health (composite), /healthz (liveness)
//! - Demo API under /api, instrumented by the interceptor
//! - Periodic sample log generation

use std::net::SocketAddr;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use pulsewatch_gateway::{app_state, config, router, scheduler};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let path = config::config_path();
    let cfg = config::load_from_file(&path)?;
    let listen: SocketAddr = cfg.gateway.listen.parse()?;

    let state = app_state::AppState::new(cfg)?;
    let every = Duration::from_millis(state.cfg().samples.interval_ms);
    let generator = scheduler::spawn_sample_generator(every, state.logs().sample_event_callback());
    let app = router::build_router(state);

    tracing::info!(%listen, config = %path, "pulsewatch-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    let served = axum::serve(listener, app).await;
    generator.abort();
    served?;
    Ok(())
}
