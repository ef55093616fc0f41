use std::future::Future;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{debug, warn};

use crate::monitor::checks::run_check;
use crate::monitor::kind::Monitor;
use crate::monitor::status::{sort_by_type, Status, StatusRecord};
use crate::probe::Probes;

/// Runs every check of a round concurrently and collects one record per monitor.
#[derive(Clone)]
pub struct Dispatcher {
    probes: Probes,
}

impl Dispatcher {
    pub fn new(probes: Probes) -> Self {
        Self { probes }
    }

    /// One dispatch round. Records come back in the order of `monitors`.
    ///
    /// Each check runs as its own task; a check that panics yields an
    /// `Error` record instead of taking the round down with it.
    pub async fn dispatch(&self, monitors: &[Monitor]) -> Vec<StatusRecord> {
        let started = Instant::now();
        debug!(count = monitors.len(), "Starting dispatch round");

        let handles: Vec<_> = monitors
            .iter()
            .cloned()
            .map(|monitor| {
                let probes = self.probes.clone();
                tokio::spawn(async move {
                    let record = run_check(&monitor, &probes).await;
                    debug!(monitor = %monitor.name, status = %record.status, "Check finished");
                    record
                })
            })
            .collect();

        let records: Vec<StatusRecord> = join_all(handles)
            .await
            .into_iter()
            .zip(monitors)
            .map(|(joined, monitor)| match joined {
                Ok(record) => record,
                Err(e) => {
                    warn!(monitor = %monitor.name, error = %e, "Check task failed");
                    StatusRecord::new(
                        monitor.name.as_str(),
                        monitor.display_target(),
                        Status::text(Status::ERROR),
                        format!("Check aborted: {}", e),
                        monitor.monitor_type(),
                    )
                }
            })
            .collect();

        debug!(
            count = records.len(),
            up = records.iter().filter(|r| r.is_up()).count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dispatch round finished"
        );
        records
    }

    /// A dispatch round in display order (stable by `monitor_type`).
    pub async fn dispatch_sorted(&self, monitors: &[Monitor]) -> Vec<StatusRecord> {
        let mut records = self.dispatch(monitors).await;
        sort_by_type(&mut records);
        records
    }

    /// Repeat rounds forever: dispatch, hand the sorted records to `on_round`,
    /// then sleep `interval`. Rounds never overlap.
    pub fn follow<'a, F>(
        &'a self,
        monitors: &'a [Monitor],
        interval: Duration,
        mut on_round: F,
    ) -> impl Future<Output = ()> + 'a
    where
        F: FnMut(Vec<StatusRecord>) + 'a,
    {
        async move {
            loop {
                let records = self.dispatch_sorted(monitors).await;
                on_round(records);
                tokio::time::sleep(interval).await;
            }
        }
    }
}
