use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    requests_total: AtomicU64,
    gateway_fallback_total: AtomicU64,
    routes_generated_total: AtomicU64,
    voice_queries_total: AtomicU64,
    total_voice_latency_millis: AtomicU64,
}

/// `requests_total` counts every catalog, route and voice call handled by the
/// agent; the latency average covers voice queries only.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub voice_queries_total: u64,
    pub gateway_fallback_total: u64,
    pub routes_generated_total: u64,
    pub avg_voice_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_fallback(&self) {
        self.gateway_fallback_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_route(&self) {
        self.routes_generated_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.voice_queries_total.fetch_add(1, Ordering::Relaxed);
        self.total_voice_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let voice_queries = self.voice_queries_total.load(Ordering::Relaxed);
        let latency = self.total_voice_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            voice_queries_total: voice_queries,
            gateway_fallback_total: self.gateway_fallback_total.load(Ordering::Relaxed),
            routes_generated_total: self.routes_generated_total.load(Ordering::Relaxed),
            avg_voice_latency_millis: if voice_queries == 0 {
                0.0
            } else {
                latency as f64 / voice_queries as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,tourgid_api=info,tourgid_agents=info,tourgid_gateway=info,tower_http=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
