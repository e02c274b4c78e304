use mimalloc::MiMalloc;
use std::net::SocketAddr;
use strava_relay::config::Config;
use strava_relay::server::router::{RelayState, cors_layer, relay_router};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        loglevel = %cfg.basic.loglevel,
        client_id = %cfg.strava.client_id,
        redirect_uri = %cfg.strava.redirect_uri,
        proxy = %cfg.strava.proxy.as_ref().map_or("<none>", |u| u.as_str()),
        token_max_attempts = cfg.retry.token_max_attempts,
        data_max_attempts = cfg.retry.data_max_attempts,
        backoff_unit_ms = cfg.retry.backoff_unit_ms,
        activity_window_weeks = ?cfg.activities.default_window_weeks,
        "Starting Strava relay"
    );
    if !cfg.strava.has_credentials() {
        error!("Strava API credentials are missing! Set strava.client_id and client_secret.");
    }

    let state = RelayState::from_config(&cfg)?;
    let app = relay_router(state, cors_layer(&cfg.basic));

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
