//! # Metrics collector
//! src/metrics/collector.rs
//!
//! Thread-safe aggregation of server metrics. Workers record each handled
//! connection; embedders and tests read a point-in-time snapshot.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Number of most-recent latencies kept for percentile computation
const LATENCY_WINDOW: usize = 10_000;

/// Thread-safe metrics collector
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

struct MetricsData {
    /// Total requests that produced a response
    total_requests: u64,

    /// Responses per status code
    status_codes: HashMap<u16, u64>,

    /// Connections dropped because the request failed to parse
    parse_failures: u64,

    /// Workers currently processing a connection
    busy_workers: u64,

    /// Recent latencies in microseconds, bounded window
    latencies: Vec<u64>,
}

/// Point-in-time view of the collected metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub total_requests: u64,
    pub parse_failures: u64,
    pub busy_workers: u64,
    pub status_codes: HashMap<u16, u64>,
    pub latency_avg_us: u64,
    pub latency_p50_us: u64,
    pub latency_p95_us: u64,
    pub latency_p99_us: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData {
                total_requests: 0,
                status_codes: HashMap::new(),
                parse_failures: 0,
                busy_workers: 0,
                latencies: Vec::with_capacity(LATENCY_WINDOW),
            })),
            start_time: Instant::now(),
        }
    }

    /// Records one completed request.
    pub fn record_request(&self, status_code: u16, latency: Duration) {
        let mut data = self.inner.lock().unwrap();

        data.total_requests += 1;
        *data.status_codes.entry(status_code).or_insert(0) += 1;

        if data.latencies.len() >= LATENCY_WINDOW {
            data.latencies.remove(0);
        }
        let latency_us = latency.as_micros() as u64;
        data.latencies.push(latency_us);
    }

    /// Records a connection whose request never parsed.
    pub fn record_parse_failure(&self) {
        let mut data = self.inner.lock().unwrap();
        data.parse_failures += 1;
    }

    /// Marks one worker as busy with a connection.
    pub fn worker_started(&self) {
        let mut data = self.inner.lock().unwrap();
        data.busy_workers += 1;
    }

    /// Marks one worker as idle again.
    pub fn worker_finished(&self) {
        let mut data = self.inner.lock().unwrap();
        if data.busy_workers > 0 {
            data.busy_workers -= 1;
        }
    }

    pub fn busy_workers(&self) -> u64 {
        self.inner.lock().unwrap().busy_workers
    }

    pub fn total_requests(&self) -> u64 {
        self.inner.lock().unwrap().total_requests
    }

    /// Takes a point-in-time snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let data = self.inner.lock().unwrap();
        let (avg, p50, p95, p99) = percentiles(&data.latencies);

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            total_requests: data.total_requests,
            parse_failures: data.parse_failures,
            busy_workers: data.busy_workers,
            status_codes: data.status_codes.clone(),
            latency_avg_us: avg,
            latency_p50_us: p50,
            latency_p95_us: p95,
            latency_p99_us: p99,
        }
    }

    /// Snapshot serialized as pretty JSON.
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string_pretty(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Average and p50/p95/p99 over the latency window, in microseconds.
fn percentiles(latencies: &[u64]) -> (u64, u64, u64, u64) {
    if latencies.is_empty() {
        return (0, 0, 0, 0);
    }

    let mut sorted = latencies.to_vec();
    sorted.sort_unstable();

    let avg = sorted.iter().sum::<u64>() / sorted.len() as u64;
    let at = |p: usize| {
        let index = (sorted.len() * p / 100).min(sorted.len() - 1);
        sorted[index]
    };

    (avg, at(50), at(95), at(99))
}
