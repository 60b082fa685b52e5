use prometheus::{Counter, Histogram, HistogramOpts};

pub fn counter(name: &str, help: &str) -> Counter {
    let counter = Counter::new(name, help).expect("invalid counter definition");
    prometheus::default_registry()
        .register(Box::new(counter.clone()))
        .expect("counter already registered");
    counter
}

/// Buckets for operations expected to finish well under a second.
pub fn histogram_fast_ops(name: &str, help: &str) -> Histogram {
    histogram(name, help, vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0])
}

/// Buckets for operations dominated by network round-trips and backoff.
pub fn histogram_slow_ops(name: &str, help: &str) -> Histogram {
    histogram(name, help, vec![0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 120.0])
}

fn histogram(name: &str, help: &str, buckets: Vec<f64>) -> Histogram {
    let opts = HistogramOpts::new(name, help).buckets(buckets);
    let histogram = Histogram::with_opts(opts).expect("invalid histogram definition");
    prometheus::default_registry()
        .register(Box::new(histogram.clone()))
        .expect("histogram already registered");
    histogram
}
