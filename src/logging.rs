use std::fs;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use opentelemetry::{KeyValue, global, trace::TraceError};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    runtime,
    trace::{RandomIdGenerator, Sampler, Tracer},
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use vitrina_config::env;

use crate::middleware::auth::optional_subject;
use crate::middleware::client_ip::client_ip_from_parts;
use crate::state::AppState;

const DEFAULT_LOG_DIR: &str = "storage/logs";

/// One event per request, levelled by status class.
pub async fn logging_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let (parts, body) = req.into_parts();

    let method = parts.method.clone();
    let path = parts
        .extensions
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());
    let ip = client_ip_from_parts(&parts, &state);
    let subject = optional_subject(&parts, &state)
        .map(|subject| subject.username().to_string())
        .unwrap_or_else(|| "anonymous".to_string());
    let request_id = uuid::Uuid::new_v4().to_string();

    let response = next.run(Request::from_parts(parts, body)).await;
    let latency_ms = start.elapsed().as_millis();
    let status = response.status().as_u16();

    match status {
        500..=599 => error!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            subject = %subject,
            ip = %ip,
            "Server error"
        ),
        400..=499 => warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            subject = %subject,
            ip = %ip,
            "Client error"
        ),
        _ => info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status,
            latency_ms,
            subject = %subject,
            ip = %ip,
            "Request completed"
        ),
    }

    response
}

fn init_tracer(otlp_endpoint: String) -> Result<Tracer, TraceError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = Resource::new(vec![
        KeyValue::new(SERVICE_NAME, env!("CARGO_PKG_NAME")),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        KeyValue::new("environment", env::string("ENVIRONMENT", "development")),
    ]);

    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(otlp_endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .install_batch(runtime::Tokio)
}

/// Installs the global subscriber.
///
/// Layers: compact console output filtered by `RUST_LOG`, a daily error
/// log and a daily JSON log under `LOG_DIR`, and OTLP export when
/// `OTEL_EXPORTER_OTLP_ENDPOINT` is set. File logging is skipped if the
/// log directory cannot be created.
pub fn init_tracing() {
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,vitrina_db=info,vitrina_cache=info,tower_http=warn",
            env!("CARGO_CRATE_NAME")
        ))
    });

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(console_filter);

    let log_dir = env::string("LOG_DIR", DEFAULT_LOG_DIR);
    let dir_error = fs::create_dir_all(&log_dir).err();
    let file_enabled = dir_error.is_none();

    let error_layer = file_enabled.then(|| {
        let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "vitrina.log");
        fmt::layer()
            .with_writer(appender)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_filter(EnvFilter::new("error"))
    });

    // Loki-friendly structured log
    let json_layer = file_enabled.then(|| {
        let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "vitrina.json");
        fmt::layer()
            .json()
            .with_writer(appender)
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(EnvFilter::new("info"))
    });

    let otlp_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();
    let (otel_layer, otel_error) = match otlp_endpoint.map(init_tracer) {
        Some(Ok(tracer)) => (
            Some(tracing_opentelemetry::layer().with_tracer(tracer)),
            None,
        ),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };
    let otel_enabled = otel_layer.is_some();

    tracing_subscriber::registry()
        .with(console_layer)
        .with(error_layer)
        .with(json_layer)
        .with(otel_layer)
        .init();

    if let Some(e) = dir_error {
        warn!(log_dir = %log_dir, error = %e, "Could not create log directory; file logging disabled");
    }
    if let Some(e) = otel_error {
        warn!(error = %e, "Failed to initialize OpenTelemetry; continuing without it");
    }
    info!(otel_enabled, "Tracing initialized");
}

pub async fn shutdown_tracer() {
    info!("Shutting down OpenTelemetry tracer...");
    global::shutdown_tracer_provider();
}
