use crate::app_env;
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{KeyValue, global};
use opentelemetry_http::HeaderExtractor;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{Resource, runtime};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing::{Span, debug, debug_span, error, field};
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer, OpenTelemetrySpanExt};
use tracing_subscriber::{EnvFilter, Layer, prelude::*, registry};

/// The name of the service as it should appear in OpenTelemetry collectors
const SERVICE_NAME: &str = "task-manager";

/// Struct containing OpenTelemetry providers which export data to a tracing server
pub struct OtelExporters {
    tracer_provider: TracerProvider,
    meter_provider: SdkMeterProvider,
}

/// Flushes and shuts down OpenTelemetry exporters when dropped. Hold onto it for the lifetime
/// of the server.
pub struct TelemetryGuard {
    exporters: Option<OtelExporters>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        let Some(exporters) = self.exporters.take() else {
            return;
        };

        // The subscriber may already be unusable here, so report straight to stderr
        if let Err(err) = exporters.tracer_provider.shutdown() {
            eprintln!("Failed to flush spans on shutdown: {err}");
        }
        if let Err(err) = exporters.meter_provider.shutdown() {
            eprintln!("Failed to flush metrics on shutdown: {err}");
        }
    }
}

/// Attaches a tracing middleware layer to the given router.
pub fn attach_tracing_http<T>(router: Router<T>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let req_span = debug_span!(
                        "request",
                        method = &request.method().as_str(),
                        path = request.uri().path(),
                        response_status = field::Empty,
                    );

                    req_span.set_parent(global::get_text_map_propagator(|propagator| {
                        propagator.extract(&HeaderExtractor(request.headers()))
                    }));

                    req_span
                })
                .on_response(
                    |response: &Response<Body>, _latency: Duration, span: &Span| {
                        span.record("response_status", field::display(response.status()));
                        debug!("request processing complete");
                    },
                )
                .on_failure(
                    |failure: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                        error!(%failure, ?latency, "request failed");
                    },
                ),
        ),
    )
}

/// Instantiates OpenTelemetry exporters which run in the background and send tracing/logging/metrics
/// data to an opentelemetry-compatible gRPC endpoint (typically http://localhost:4317 with a standard
/// sidecar setup)
pub fn init_exporters(endpoints: &app_env::OtelEndpoints) -> anyhow::Result<OtelExporters> {
    let span_export = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoints.spans.as_str())
        .build()
        .context("failed to build span exporter")?;
    let meter_export = MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoints.metrics.as_str())
        .build()
        .context("failed to build meter exporter")?;

    let metrics_reader = PeriodicReader::builder(meter_export, runtime::Tokio).build();

    let tracer_provider = TracerProvider::builder()
        .with_batch_exporter(span_export, runtime::Tokio)
        .with_resource(Resource::new([KeyValue::new("service.name", SERVICE_NAME)]))
        .build();
    let meter_provider = SdkMeterProvider::builder()
        .with_reader(metrics_reader)
        .with_resource(Resource::new([KeyValue::new("service.name", SERVICE_NAME)]))
        .build();

    Ok(OtelExporters {
        tracer_provider,
        meter_provider,
    })
}

/// Constructs a filter which uses [app_env::LOG_LEVEL] to configure per-module logging. Filters
/// to the "info" level by default.
pub fn init_env_filter() -> anyhow::Result<EnvFilter> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(app_env::LOG_LEVEL)
        .from_env()
        .context("building the logging filter failed")
}

/// Sets up the global logging and tracing sinks. All logs and metrics at the "debug" level and above
/// will automatically be sent to OpenTelemetry sinks if [otel_exporters] is provided. [env_filter] is
/// applied specifically to the JSON logger printing to stdout.
pub fn setup_logging_and_tracing(
    env_filter: EnvFilter,
    otel_exporters: Option<OtelExporters>,
) -> anyhow::Result<TelemetryGuard> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let otel_layer = otel_exporters.as_ref().map(|exporters| {
        OpenTelemetryLayer::new(exporters.tracer_provider.tracer(SERVICE_NAME))
            .and_then(MetricsLayer::new(exporters.meter_provider.clone()))
    });

    registry()
        .with(LevelFilter::DEBUG)
        .with(otel_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_filter(env_filter),
        )
        .try_init()
        .context("installing the global tracing subscriber")?;

    Ok(TelemetryGuard {
        exporters: otel_exporters,
    })
}
