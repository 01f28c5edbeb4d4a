//! Periodic process and pipeline gauges.

use std::sync::Arc;

use chrono::Utc;

use crate::models::ApplicationStatus;
use crate::monitoring::MonitoringSnapshot;
use crate::repository::{ApplicationRepository, InMemoryStore, StaffRepository};

/// Record resident memory from /proc on Linux
pub fn record_memory_usage() {
    #[cfg(target_os = "linux")]
    {
        if let Ok(statm) = std::fs::read_to_string("/proc/self/statm") {
            if let Some(pages) = statm
                .split_whitespace()
                .nth(1)
                .and_then(|rss| rss.parse::<u64>().ok())
            {
                // 4KB pages
                let memory_mb = (pages * 4) as f64 / 1024.0;
                metrics::gauge!("process_memory_mb").set(memory_mb);
            }
        }
    }
}

/// Publish the application pipeline as gauges
pub fn record_pipeline_gauges(snapshot: &MonitoringSnapshot) {
    for status in ApplicationStatus::ALL {
        metrics::gauge!("applications", "status" => status.code())
            .set(snapshot.count(status) as f64);
    }
    metrics::gauge!("applications_open").set(snapshot.open() as f64);
    metrics::gauge!("applications_urgent_open").set(snapshot.urgent_open as f64);
    metrics::gauge!("applications_stale_open").set(snapshot.stale_open.len() as f64);
    metrics::gauge!("staff_online").set(snapshot.staff_online as f64);
    metrics::gauge!("staff_busy").set(snapshot.staff_busy as f64);
}

/// Start a background task that refreshes the gauges every `period_secs`
pub fn start_system_metrics_recorder(
    store: Arc<InMemoryStore>,
    period_secs: u64,
) -> tokio::task::JoinHandle<()> {
    let started = std::time::Instant::now();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(period_secs));

        loop {
            interval.tick().await;

            record_memory_usage();
            metrics::gauge!("uptime_seconds").set(started.elapsed().as_secs_f64());

            let snapshot = MonitoringSnapshot::collect(
                &store.list_all(),
                &store.all_staff(),
                Utc::now(),
            );
            record_pipeline_gauges(&snapshot);
            metrics::gauge!("orders_created_since_start").set(f64::from(store.created_orders()));
        }
    })
}
