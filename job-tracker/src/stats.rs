use chrono::NaiveDate;
use shared_types::{Dashboard, JobPriority, JobRecord, JobStatus, Stats, StatusDistribution};

/// Count applications per status.
///
/// Records with an unrecognized status count towards `total` only.
pub fn compute_stats(records: &[JobRecord]) -> Stats {
    let mut stats = Stats {
        total: records.len(),
        ..Stats::default()
    };

    for record in records {
        match record.status {
            JobStatus::Applied => stats.applied += 1,
            JobStatus::Interview => stats.interview += 1,
            JobStatus::Offer => stats.offer += 1,
            JobStatus::Rejected => stats.rejected += 1,
            JobStatus::Unrecognized(_) => {}
        }
    }

    stats.success_rate = percentage(stats.interview + stats.offer, stats.total);
    stats
}

/// Percentage of the collection in each known status
pub fn status_distribution(stats: &Stats) -> StatusDistribution {
    StatusDistribution {
        applied: percentage(stats.applied, stats.total),
        interview: percentage(stats.interview, stats.total),
        offer: percentage(stats.offer, stats.total),
        rejected: percentage(stats.rejected, stats.total),
    }
}

/// `round(count / total * 100)` with halves rounded up, 0 for no data
fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count * 200 + total) / (total * 2)) as u32
}

/// Most recently applied first
pub fn recent_applications(records: &[JobRecord], limit: usize) -> Vec<JobRecord> {
    let mut recent = records.to_vec();
    recent.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
    recent.truncate(limit);
    recent
}

pub fn high_priority(records: &[JobRecord], limit: usize) -> Vec<JobRecord> {
    records
        .iter()
        .filter(|record| record.priority == Some(JobPriority::High))
        .take(limit)
        .cloned()
        .collect()
}

/// Days left until the deadline, negative once it has passed
pub fn days_until_deadline(record: &JobRecord, today: NaiveDate) -> Option<i64> {
    record
        .deadline
        .map(|deadline| deadline.signed_duration_since(today).num_days())
}

/// How many records each dashboard panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLimits {
    pub recent: usize,
    pub high_priority: usize,
}

impl Default for DashboardLimits {
    fn default() -> Self {
        Self {
            recent: 5,
            high_priority: 3,
        }
    }
}

pub fn build_dashboard(records: &[JobRecord], limits: DashboardLimits) -> Dashboard {
    let stats = compute_stats(records);
    Dashboard {
        stats,
        distribution: status_distribution(&stats),
        recent: recent_applications(records, limits.recent),
        high_priority: high_priority(records, limits.high_priority),
    }
}
