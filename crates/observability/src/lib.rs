use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    invocations_total: AtomicU64,
    rejected_total: AtomicU64,
    lookups_total: AtomicU64,
    lookup_failures_total: AtomicU64,
    forwards_total: AtomicU64,
    forward_failures_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub invocations_total: u64,
    pub rejected_total: u64,
    pub lookups_total: u64,
    pub lookup_failures_total: u64,
    pub forwards_total: u64,
    pub forward_failures_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_invocation(&self) {
        self.invocations_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rejected(&self) {
        self.rejected_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lookup(&self, succeeded: bool) {
        self.lookups_total.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.lookup_failures_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_forward(&self, succeeded: bool) {
        self.forwards_total.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.forward_failures_total.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let invocations = self.invocations_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            invocations_total: invocations,
            rejected_total: self.rejected_total.load(Ordering::Relaxed),
            lookups_total: self.lookups_total.load(Ordering::Relaxed),
            lookup_failures_total: self.lookup_failures_total.load(Ordering::Relaxed),
            forwards_total: self.forwards_total.load(Ordering::Relaxed),
            forward_failures_total: self.forward_failures_total.load(Ordering::Relaxed),
            avg_latency_millis: if invocations == 0 {
                0.0
            } else {
                latency as f64 / invocations as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,pokeref_agents=info,pokeref_clients=info",
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
