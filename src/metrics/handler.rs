use {
    prometheus::{Counter, Encoder, Histogram, HistogramOpts, Opts, TextEncoder},
    tracing::error,
};

pub fn counter(name: &str, help: &str) -> Counter {
    let counter = Counter::with_opts(Opts::new(name, help)).expect("valid counter definition");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("counter registered once");
    counter
}

fn histogram(name: &str, help: &str, buckets: Vec<f64>) -> Histogram {
    let histogram = Histogram::with_opts(HistogramOpts::new(name, help).buckets(buckets))
        .expect("valid histogram definition");
    prometheus::default_registry()
        .register(Box::new(histogram.clone()))
        .expect("histogram registered once");
    histogram
}

/// Buckets starting at 100ns, for single-account operations.
pub fn histogram_fast_ops(name: &str, help: &str) -> Histogram {
    histogram(
        name,
        help,
        prometheus::exponential_buckets(1e-7, 4.0, 10).expect("valid bucket layout"),
    )
}

/// Buckets starting at 1µs, for operations touching two accounts.
pub fn histogram_slow_ops(name: &str, help: &str) -> Histogram {
    histogram(
        name,
        help,
        prometheus::exponential_buckets(1e-6, 4.0, 10).expect("valid bucket layout"),
    )
}

/// Renders the default registry in the Prometheus text exposition format.
pub fn render_metrics() -> String {
    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&prometheus::gather(), &mut buffer) {
        error!("Failed to encode metrics: {e}");
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}
