//! Log and trace output for the biztime binary
//!
//! Console output always goes through one compact fmt layer filtered by
//! `RUST_LOG` (falling back to `info`, or `debug` with `--debug`). With the
//! `telemetry` feature, `--otel` adds an OTLP span exporter on top; its
//! endpoint and service name come from `OTEL_EXPORTER_OTLP_ENDPOINT`
//! (default `http://localhost:4317`) and `OTEL_SERVICE_NAME` (default
//! `biztime`).

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Output switches taken from the global CLI flags
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingConfig {
    pub debug: bool,
    pub otel: bool,
}

impl TracingConfig {
    fn filter(&self) -> EnvFilter {
        let level = if self.debug { "debug" } else { "info" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &TracingConfig) -> Result<()> {
    let console = fmt::layer().with_target(config.debug).compact();
    let subscriber = tracing_subscriber::registry()
        .with(config.filter())
        .with(console);

    #[cfg(feature = "telemetry")]
    if config.otel {
        let exporter = otlp::Exporter::from_env();
        let tracer = exporter.install()?;
        subscriber
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .try_init()
            .context("tracing subscriber already installed")?;

        tracing::info!(
            endpoint = %exporter.endpoint,
            service = %exporter.service_name,
            "Exporting spans over OTLP"
        );
        return Ok(());
    }

    subscriber
        .try_init()
        .context("tracing subscriber already installed")?;

    if config.otel {
        tracing::warn!("--otel ignored: built without the `telemetry` feature");
    }
    Ok(())
}

/// Flush spans still buffered by the OTLP batch exporter.
pub fn shutdown_otel() {
    #[cfg(feature = "telemetry")]
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(feature = "telemetry")]
mod otlp {
    use anyhow::{anyhow, Result};
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::{Tracer, TracerProvider};
    use opentelemetry_sdk::{runtime, Resource};

    pub struct Exporter {
        pub endpoint: String,
        pub service_name: String,
    }

    impl Exporter {
        pub fn from_env() -> Self {
            Self {
                endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                    .unwrap_or_else(|_| "http://localhost:4317".to_owned()),
                service_name: std::env::var("OTEL_SERVICE_NAME")
                    .unwrap_or_else(|_| "biztime".to_owned()),
            }
        }

        /// Register a batch-exporting provider globally and hand back its tracer.
        pub fn install(&self) -> Result<Tracer> {
            let spans = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(&self.endpoint)
                .build()
                .map_err(|e| anyhow!("OTLP exporter for {}: {}", self.endpoint, e))?;

            let provider = TracerProvider::builder()
                .with_batch_exporter(spans, runtime::Tokio)
                .with_resource(Resource::new([KeyValue::new(
                    "service.name",
                    self.service_name.clone(),
                )]))
                .build();

            let tracer = provider.tracer("biztime");
            // The global slot keeps the provider (and its export task) alive
            let _ = opentelemetry::global::set_tracer_provider(provider);
            Ok(tracer)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_raises_default_level() {
        // Only meaningful without RUST_LOG overriding both
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let quiet = TracingConfig::default().filter().to_string();
        let loud = TracingConfig {
            debug: true,
            otel: false,
        }
        .filter()
        .to_string();
        assert_eq!(quiet, "info");
        assert_eq!(loud, "debug");
    }
}
