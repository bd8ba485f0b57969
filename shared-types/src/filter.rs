use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::job::{JobPriority, JobStatus, JobType, ParseEnumError};

const ALL: &str = "all";

/// A filter slot that is either off (`"all"`) or pinned to one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl<T> FromStr for Selection<T>
where
    T: FromStr,
{
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            return Ok(Selection::All);
        }
        trimmed.parse().map(Selection::Only)
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::Only(value) => value.fmt(f),
        }
    }
}

impl<T: fmt::Display> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Rolling window on `appliedDate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    Week,
    Month,
    Quarter,
}

impl DateRange {
    /// Window length in days, `None` for no window
    pub fn days(&self) -> Option<i64> {
        match self {
            DateRange::All => None,
            DateRange::Week => Some(7),
            DateRange::Month => Some(30),
            DateRange::Quarter => Some(90),
        }
    }
}

impl FromStr for DateRange {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(DateRange::All),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "quarter" => Ok(DateRange::Quarter),
            _ => Err(ParseEnumError::new("date range", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    AppliedDate,
    Deadline,
    Company,
    Position,
    Status,
    Priority,
}

impl FromStr for SortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "applieddate" => Ok(SortKey::AppliedDate),
            "deadline" => Ok(SortKey::Deadline),
            "company" => Ok(SortKey::Company),
            "position" => Ok(SortKey::Position),
            "status" => Ok(SortKey::Status),
            "priority" => Ok(SortKey::Priority),
            _ => Err(ParseEnumError::new("sort key", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ParseEnumError::new("sort order", s)),
        }
    }
}

/// Search, filter and sort options for the job list.
///
/// `Default` is the cleared state: no filters, newest applications first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub search_term: String,
    #[ts(type = "string")]
    pub status: Selection<JobStatus>,
    #[ts(type = "string")]
    pub location: Selection<String>,
    #[ts(type = "string")]
    pub job_type: Selection<JobType>,
    #[ts(type = "string")]
    pub priority: Selection<JobPriority>,
    pub date_range: DateRange,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl FilterCriteria {
    /// Number of filters that currently narrow the list (sorting excluded)
    pub fn active_filter_count(&self) -> usize {
        [
            !self.search_term.trim().is_empty(),
            !self.status.is_all(),
            !self.location.is_all(),
            !self.job_type.is_all(),
            !self.priority.is_all(),
            self.date_range != DateRange::All,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_cleared_state() {
        let criteria = FilterCriteria::default();
        assert_eq!(criteria.active_filter_count(), 0);
        assert_eq!(criteria.sort_by, SortKey::AppliedDate);
        assert_eq!(criteria.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_criteria_from_json() {
        let json = r#"{
            "searchTerm": "tech",
            "status": "interview",
            "location": "all",
            "jobType": "Full-time",
            "dateRange": "month",
            "sortBy": "company",
            "sortOrder": "asc"
        }"#;
        let criteria: FilterCriteria = serde_json::from_str(json).unwrap();
        assert_eq!(criteria.status, Selection::Only(JobStatus::Interview));
        assert!(criteria.location.is_all());
        assert_eq!(criteria.job_type, Selection::Only(JobType::FullTime));
        assert!(criteria.priority.is_all());
        assert_eq!(criteria.active_filter_count(), 4);

        let back = serde_json::to_value(&criteria).unwrap();
        assert_eq!(back["location"], "all");
        assert_eq!(back["jobType"], "Full-time");
    }

    #[test]
    fn test_invalid_selection_is_rejected() {
        let result: Result<FilterCriteria, _> =
            serde_json::from_str(r#"{ "priority": "urgent" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_status_typo_is_rejected() {
        assert!("intervew".parse::<Selection<JobStatus>>().is_err());
        assert_eq!(
            "Interview".parse::<Selection<JobStatus>>().unwrap(),
            Selection::Only(JobStatus::Interview)
        );
        assert!("all".parse::<Selection<JobStatus>>().unwrap().is_all());

        let result: Result<FilterCriteria, _> =
            serde_json::from_str(r#"{ "status": "intervew" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_sort_order_toggle() {
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
        assert_eq!(SortOrder::Desc.toggled(), SortOrder::Asc);
    }
}
