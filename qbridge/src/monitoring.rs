//! Usage monitoring for the gateway.
//!
//! [`GatewayMonitoring`] is a passive observer fed submission and
//! status-change events by the gateway. It derives per-job timing
//! (queue/execution/total) and aggregates per-provider and per-algorithm
//! statistics. It performs no I/O and never influences orchestration.

use crate::job::JobId;
use crate::status::JobStatus;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::collections::HashMap;

/// Timing and outcome record for one job.
#[derive(Clone, Debug)]
pub struct JobMetrics {
    /// Internal job identity.
    pub job_id: JobId,
    /// Provider the job was routed to.
    pub provider: String,
    /// Algorithm category from the request.
    pub algorithm_type: String,
    /// When the job was submitted.
    pub submitted_at: DateTime<Utc>,
    /// Seconds from submission until first observed Running.
    pub queue_time_secs: Option<f64>,
    /// Seconds spent executing (total minus queue), once terminal.
    pub execution_time_secs: Option<f64>,
    /// Seconds from submission until a terminal status was observed.
    pub total_time_secs: Option<f64>,
    /// Last observed canonical status.
    pub status: JobStatus,
    /// Number of errors observed while operating on this job.
    pub error_count: u32,
}

/// Aggregate statistics for one provider over a time window.
#[derive(Clone, Debug, Default)]
pub struct ProviderStats {
    /// Jobs submitted to this provider inside the window.
    pub total_jobs: usize,
    /// Jobs whose last observed status is Completed.
    pub completed_jobs: usize,
    /// Jobs whose last observed status is Failed.
    pub failed_jobs: usize,
    /// completed / total (0.0 when no jobs).
    pub success_rate: f64,
    /// Mean queue time over completed jobs that reported one.
    pub avg_queue_time_secs: Option<f64>,
    /// Mean execution time over completed jobs that reported one.
    pub avg_execution_time_secs: Option<f64>,
    /// Mean error count per job.
    pub error_rate: f64,
}

/// Aggregate statistics for one algorithm category.
#[derive(Clone, Debug, Default)]
pub struct AlgorithmStats {
    /// Jobs submitted with this algorithm type.
    pub total_jobs: usize,
    /// Jobs whose last observed status is Completed.
    pub completed_jobs: usize,
    /// How often each provider was chosen for this algorithm.
    pub providers: HashMap<String, usize>,
}

/// Collects job metrics from gateway events.
pub struct GatewayMonitoring {
    jobs: DashMap<JobId, JobMetrics>,
}

impl GatewayMonitoring {
    /// Creates an empty monitor.
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
        }
    }

    /// Records a successful submission.
    pub fn record_submission(
        &self,
        job_id: JobId,
        provider: impl Into<String>,
        algorithm_type: impl Into<String>,
    ) {
        self.jobs.insert(
            job_id,
            JobMetrics {
                job_id,
                provider: provider.into(),
                algorithm_type: algorithm_type.into(),
                submitted_at: Utc::now(),
                queue_time_secs: None,
                execution_time_secs: None,
                total_time_secs: None,
                status: JobStatus::Pending,
                error_count: 0,
            },
        );
    }

    /// Records an observed status change.
    ///
    /// Events for unknown job ids are ignored; the monitor only tracks
    /// jobs it saw submitted.
    pub fn record_status_change(&self, job_id: &JobId, new_status: JobStatus) {
        let Some(mut entry) = self.jobs.get_mut(job_id) else {
            return;
        };
        let metrics = entry.value_mut();
        metrics.status = new_status;

        let elapsed = seconds_since(metrics.submitted_at);
        if new_status == JobStatus::Running && metrics.queue_time_secs.is_none() {
            metrics.queue_time_secs = Some(elapsed);
        }
        if new_status.is_terminal() && metrics.total_time_secs.is_none() {
            metrics.total_time_secs = Some(elapsed);
            if let Some(queue) = metrics.queue_time_secs {
                metrics.execution_time_secs = Some((elapsed - queue).max(0.0));
            }
        }
    }

    /// Records an operation error observed for a job.
    pub fn record_error(&self, job_id: &JobId) {
        if let Some(mut entry) = self.jobs.get_mut(job_id) {
            entry.value_mut().error_count += 1;
        }
    }

    /// Returns the metrics snapshot for one job.
    pub fn job_metrics(&self, job_id: &JobId) -> Option<JobMetrics> {
        self.jobs.get(job_id).map(|entry| entry.value().clone())
    }

    /// Aggregates per-provider statistics over jobs submitted within
    /// `window` of now.
    pub fn provider_statistics(&self, window: Duration) -> HashMap<String, ProviderStats> {
        let cutoff = Utc::now() - window;
        let mut grouped: HashMap<String, Vec<JobMetrics>> = HashMap::new();

        for entry in self.jobs.iter() {
            let metrics = entry.value();
            if metrics.submitted_at >= cutoff {
                grouped
                    .entry(metrics.provider.clone())
                    .or_default()
                    .push(metrics.clone());
            }
        }

        grouped
            .into_iter()
            .map(|(provider, jobs)| {
                let completed: Vec<_> = jobs
                    .iter()
                    .filter(|j| j.status == JobStatus::Completed)
                    .collect();
                let failed = jobs.iter().filter(|j| j.status == JobStatus::Failed).count();

                let stats = ProviderStats {
                    total_jobs: jobs.len(),
                    completed_jobs: completed.len(),
                    failed_jobs: failed,
                    success_rate: completed.len() as f64 / jobs.len() as f64,
                    avg_queue_time_secs: mean(completed.iter().filter_map(|j| j.queue_time_secs)),
                    avg_execution_time_secs: mean(
                        completed.iter().filter_map(|j| j.execution_time_secs),
                    ),
                    error_rate: jobs.iter().map(|j| j.error_count as f64).sum::<f64>()
                        / jobs.len() as f64,
                };
                (provider, stats)
            })
            .collect()
    }

    /// Aggregates per-algorithm statistics over all tracked jobs.
    pub fn algorithm_statistics(&self) -> HashMap<String, AlgorithmStats> {
        let mut stats: HashMap<String, AlgorithmStats> = HashMap::new();

        for entry in self.jobs.iter() {
            let metrics = entry.value();
            let algo = stats.entry(metrics.algorithm_type.clone()).or_default();
            algo.total_jobs += 1;
            if metrics.status == JobStatus::Completed {
                algo.completed_jobs += 1;
            }
            *algo.providers.entry(metrics.provider.clone()).or_default() += 1;
        }

        stats
    }
}

impl Default for GatewayMonitoring {
    fn default() -> Self {
        Self::new()
    }
}

fn seconds_since(start: DateTime<Utc>) -> f64 {
    (Utc::now() - start).num_milliseconds() as f64 / 1000.0
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        None
    } else {
        Some(collected.iter().sum::<f64>() / collected.len() as f64)
    }
}
