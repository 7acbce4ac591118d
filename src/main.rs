use std::net::SocketAddr;
use std::time::Duration;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, error, info};
use vitrina::logging::{init_tracing, shutdown_tracer};
use vitrina::metrics::{init_metrics, metrics_app};
use vitrina::router::init_router;
use vitrina::state::init_app_state;
use vitrina_config::{ServerConfig, env};

const LIMITER_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    match init_metrics() {
        Ok(Some(handle)) => {
            let metrics_port: u16 = env::parsed("METRICS_PORT", 9000);
            let metrics_addr = SocketAddr::from(([0, 0, 0, 0], metrics_port));
            tokio::spawn(async move {
                match TcpListener::bind(metrics_addr).await {
                    Ok(listener) => {
                        info!("Metrics available at http://{}/metrics", metrics_addr);
                        if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                            error!(error = %e, "Metrics server stopped");
                        }
                    }
                    Err(e) => error!(error = %e, "Failed to bind metrics port"),
                }
            });
        }
        Ok(None) => info!("Observability disabled; metrics not exported"),
        Err(e) => error!(error = %e, "Failed to install Prometheus recorder"),
    }

    let server_config = ServerConfig::from_env();
    let state = init_app_state(&server_config)
        .await
        .expect("Failed to initialize application state");

    let limiter = state.api_limiter.clone();
    let login_throttle = state.login_throttle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LIMITER_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            limiter.retain_recent();
            let dropped = login_throttle.retain_recent();
            if dropped > 0 {
                debug!(dropped, "Evicted idle login throttle keys");
            }
        }
    });

    let app = init_router(state);

    let bind_address = server_config.bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .expect("Failed to bind server address");

    info!("🚀 Server running on http://{}", bind_address);
    info!("📚 Swagger UI available at http://{}/swagger-ui", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");

    shutdown_tracer().await;
}
