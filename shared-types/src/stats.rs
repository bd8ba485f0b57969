use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::job::JobRecord;

/// Dashboard counters derived from a job collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub applied: usize,
    pub interview: usize,
    pub offer: usize,
    pub rejected: usize,
    /// Share of applications that reached interview or offer, in whole percent
    pub success_rate: u32,
}

/// Share of the collection in each known status, in whole percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StatusDistribution {
    pub applied: u32,
    pub interview: u32,
    pub offer: u32,
    pub rejected: u32,
}

/// Everything the dashboard view renders
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: Stats,
    pub distribution: StatusDistribution,
    pub recent: Vec<JobRecord>,
    pub high_priority: Vec<JobRecord>,
}
