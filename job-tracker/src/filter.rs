//! Search, filter and sort pipeline over a job collection.
//!
//! Every active option becomes an independent predicate; a record survives
//! when all of them accept it, so the order the predicates run in never
//! changes the result. Survivors are then ordered by a single stable key.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use shared_types::{FilterCriteria, JobRecord, Selection, SortKey, SortOrder};
use std::cmp::Ordering;
use std::collections::HashSet;

pub type Predicate<'a> = Box<dyn Fn(&JobRecord) -> bool + 'a>;

/// Filter and sort `records`, measuring date windows from now
pub fn apply(records: &[JobRecord], criteria: &FilterCriteria) -> Vec<JobRecord> {
    apply_at(records, criteria, Utc::now())
}

/// Filter and sort `records`, measuring date windows from `now`
pub fn apply_at(
    records: &[JobRecord],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> Vec<JobRecord> {
    let mut matched = filter_with(records, &predicates(criteria, now));
    sort_records(&mut matched, criteria.sort_by, criteria.sort_order);
    matched
}

/// One predicate per active filter in `criteria`
pub fn predicates<'a>(criteria: &'a FilterCriteria, now: DateTime<Utc>) -> Vec<Predicate<'a>> {
    let mut active: Vec<Predicate<'a>> = Vec::new();

    let term = criteria.search_term.trim().to_lowercase();
    if !term.is_empty() {
        active.push(Box::new(move |job: &JobRecord| {
            contains_folded(&job.company, &term)
                || contains_folded(&job.position, &term)
                || job
                    .notes
                    .as_deref()
                    .is_some_and(|notes| contains_folded(notes, &term))
        }));
    }

    if let Selection::Only(status) = &criteria.status {
        active.push(Box::new(move |job: &JobRecord| job.status == *status));
    }

    if let Selection::Only(location) = &criteria.location {
        let location = location.trim().to_lowercase();
        active.push(Box::new(move |job: &JobRecord| {
            contains_folded(&job.location, &location)
        }));
    }

    if let Selection::Only(job_type) = &criteria.job_type {
        active.push(Box::new(move |job: &JobRecord| job.job_type == Some(*job_type)));
    }

    if let Selection::Only(priority) = &criteria.priority {
        active.push(Box::new(move |job: &JobRecord| job.priority == Some(*priority)));
    }

    if let Some(days) = criteria.date_range.days() {
        let cutoff = now - Duration::days(days);
        active.push(Box::new(move |job: &JobRecord| start_of_day(job.applied_date) >= cutoff));
    }

    active
}

/// Keep the records every predicate accepts, in input order
pub fn filter_with(records: &[JobRecord], predicates: &[Predicate<'_>]) -> Vec<JobRecord> {
    records
        .iter()
        .filter(|job| predicates.iter().all(|accept| accept(job)))
        .cloned()
        .collect()
}

/// Stable single-key sort. Records with equal keys keep their input order in
/// both directions.
pub fn sort_records(records: &mut [JobRecord], key: SortKey, order: SortOrder) {
    records.sort_by(|a, b| {
        let ordering = compare_by(a, b, key);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare_by(a: &JobRecord, b: &JobRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::AppliedDate => a.applied_date.cmp(&b.applied_date),
        SortKey::Deadline => deadline_or_epoch(a).cmp(&deadline_or_epoch(b)),
        SortKey::Company => compare_folded(&a.company, &b.company),
        SortKey::Position => compare_folded(&a.position, &b.position),
        SortKey::Status => compare_folded(a.status.as_str(), b.status.as_str()),
        SortKey::Priority => compare_folded(
            a.priority.map(|p| p.as_str()).unwrap_or_default(),
            b.priority.map(|p| p.as_str()).unwrap_or_default(),
        ),
    }
}

fn deadline_or_epoch(job: &JobRecord) -> NaiveDate {
    job.deadline
        .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH.date_naive())
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn compare_folded(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    haystack.to_lowercase().contains(folded_needle)
}

/// Distinct non-empty locations, in the order they first appear
pub fn unique_locations(records: &[JobRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|job| job.location.trim())
        .filter(|location| !location.is_empty())
        .filter(|location| seen.insert(location.to_string()))
        .map(str::to_string)
        .collect()
}

/// The "Showing X of Y jobs" line under the filter panel
pub fn filter_summary(shown: usize, total: usize, search_term: &str) -> String {
    let mut summary = format!(
        "Showing {} of {} job{}",
        shown,
        total,
        if total == 1 { "" } else { "s" }
    );
    let term = search_term.trim();
    if !term.is_empty() {
        summary.push_str(&format!(" matching \"{term}\""));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared_types::{DateRange, JobId, JobPriority, JobStatus, JobType};

    fn job(id: &str, company: &str, applied: &str) -> JobRecord {
        JobRecord {
            id: JobId::from(id),
            company: company.to_string(),
            position: "Engineer".to_string(),
            location: "Remote".to_string(),
            status: JobStatus::Applied,
            priority: None,
            applied_date: NaiveDate::parse_from_str(applied, "%Y-%m-%d").unwrap(),
            deadline: None,
            job_type: None,
            salary: None,
            source: None,
            contact_email: None,
            notes: None,
        }
    }

    fn ids(records: &[JobRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    fn sample() -> Vec<JobRecord> {
        let mut a = job("1", "TechNova", "2025-03-10");
        a.status = JobStatus::Interview;
        a.location = "Berlin, Germany".to_string();
        a.priority = Some(JobPriority::High);
        a.job_type = Some(JobType::FullTime);
        a.deadline = NaiveDate::from_ymd_opt(2025, 4, 1);

        let mut b = job("2", "Acme", "2025-01-20");
        b.position = "Technical Writer".to_string();
        b.location = "Remote".to_string();
        b.priority = Some(JobPriority::Low);
        b.job_type = Some(JobType::Contract);

        let mut c = job("3", "globex", "2024-11-01");
        c.status = JobStatus::Rejected;
        c.location = "berlin".to_string();
        c.notes = Some("Referred by a tech lead".to_string());
        c.priority = Some(JobPriority::Medium);
        c.deadline = NaiveDate::from_ymd_opt(2024, 12, 1);

        let mut d = job("4", "Umbrella", "2025-03-14");
        d.status = JobStatus::Offer;
        d.location = "Austin".to_string();

        vec![a, b, c, d]
    }

    #[test]
    fn test_search_example() {
        let records = vec![job("1", "TechNova", "2025-01-01"), job("2", "Acme", "2025-01-01")];
        let criteria = FilterCriteria {
            search_term: "Tech".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_at(&records, &criteria, now())), vec!["1"]);
    }

    #[test]
    fn test_search_covers_company_position_and_notes() {
        let criteria = FilterCriteria {
            search_term: "TECH".to_string(),
            sort_order: SortOrder::Asc,
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_at(&sample(), &criteria, now())), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_sort_applied_date_ascending_example() {
        let records = vec![job("march", "A", "2025-03-01"), job("jan", "B", "2025-01-01")];
        let criteria = FilterCriteria {
            sort_order: SortOrder::Asc,
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_at(&records, &criteria, now())), vec!["jan", "march"]);
    }

    #[test]
    fn test_no_filters_returns_everything_sorted() {
        let criteria = FilterCriteria::default();
        let result = apply_at(&sample(), &criteria, now());
        assert_eq!(ids(&result), vec!["4", "1", "2", "3"]);
    }

    #[test]
    fn test_status_is_exact_and_location_is_substring() {
        let criteria = FilterCriteria {
            location: Selection::Only("BERLIN".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_at(&sample(), &criteria, now())), vec!["1", "3"]);

        let criteria = FilterCriteria {
            location: Selection::Only("berlin".to_string()),
            status: Selection::Only(JobStatus::Rejected),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_at(&sample(), &criteria, now())), vec!["3"]);
    }

    #[test]
    fn test_job_type_and_priority() {
        let criteria = FilterCriteria {
            job_type: Selection::Only(JobType::Contract),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_at(&sample(), &criteria, now())), vec!["2"]);

        let criteria = FilterCriteria {
            priority: Selection::Only(JobPriority::High),
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_at(&sample(), &criteria, now())), vec!["1"]);
    }

    #[test]
    fn test_date_range_is_rolling_from_now() {
        let criteria = FilterCriteria {
            date_range: DateRange::Week,
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_at(&sample(), &criteria, now())), vec!["4", "1"]);

        let criteria = FilterCriteria {
            date_range: DateRange::Month,
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_at(&sample(), &criteria, now())), vec!["4", "1"]);

        let criteria = FilterCriteria {
            date_range: DateRange::Quarter,
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_at(&sample(), &criteria, now())), vec!["4", "1", "2"]);

        // Same criteria, later evaluation instant: the window moves
        let later = now() + Duration::days(60);
        assert_eq!(ids(&apply_at(&sample(), &criteria, later)), vec!["4", "1"]);
    }

    #[test]
    fn test_date_range_boundary_is_inclusive() {
        let records = vec![job("edge", "A", "2025-03-08"), job("out", "B", "2025-03-07")];
        let criteria = FilterCriteria {
            date_range: DateRange::Week,
            ..FilterCriteria::default()
        };
        let at_midnight = Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap();
        assert_eq!(ids(&apply_at(&records, &criteria, at_midnight)), vec!["edge"]);
    }

    #[test]
    fn test_filter_order_does_not_matter() {
        let criteria = FilterCriteria {
            search_term: "e".to_string(),
            location: Selection::Only("r".to_string()),
            date_range: DateRange::Quarter,
            priority: Selection::Only(JobPriority::High),
            ..FilterCriteria::default()
        };
        let records = sample();

        let mut forward = predicates(&criteria, now());
        let expected = filter_with(&records, &forward);
        forward.reverse();
        assert_eq!(filter_with(&records, &forward), expected);

        forward.rotate_left(2);
        assert_eq!(filter_with(&records, &forward), expected);
        assert_eq!(ids(&expected), vec!["1"]);
    }

    #[test]
    fn test_string_sort_is_case_insensitive() {
        let criteria = FilterCriteria {
            sort_by: SortKey::Company,
            sort_order: SortOrder::Asc,
            ..FilterCriteria::default()
        };
        let companies: Vec<String> = apply_at(&sample(), &criteria, now())
            .into_iter()
            .map(|r| r.company)
            .collect();
        assert_eq!(companies, vec!["Acme", "globex", "TechNova", "Umbrella"]);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let records = vec![
            job("a", "Same", "2025-01-01"),
            job("b", "same", "2025-01-02"),
            job("c", "SAME", "2025-01-03"),
        ];
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let criteria = FilterCriteria {
                sort_by: SortKey::Company,
                sort_order: order,
                ..FilterCriteria::default()
            };
            assert_eq!(ids(&apply_at(&records, &criteria, now())), vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn test_missing_deadline_sorts_as_epoch() {
        let criteria = FilterCriteria {
            sort_by: SortKey::Deadline,
            sort_order: SortOrder::Asc,
            ..FilterCriteria::default()
        };
        assert_eq!(ids(&apply_at(&sample(), &criteria, now())), vec!["2", "4", "3", "1"]);
    }

    #[test]
    fn test_missing_priority_sorts_as_empty() {
        let criteria = FilterCriteria {
            sort_by: SortKey::Priority,
            sort_order: SortOrder::Asc,
            ..FilterCriteria::default()
        };
        // "" < "high" < "low" < "medium"
        assert_eq!(ids(&apply_at(&sample(), &criteria, now())), vec!["4", "1", "2", "3"]);
    }

    #[test]
    fn test_sort_by_status() {
        let criteria = FilterCriteria {
            sort_by: SortKey::Status,
            sort_order: SortOrder::Desc,
            ..FilterCriteria::default()
        };
        // rejected > offer > interview > applied
        assert_eq!(ids(&apply_at(&sample(), &criteria, now())), vec!["3", "4", "1", "2"]);
    }

    #[test]
    fn test_unique_locations() {
        let mut records = sample();
        records.push(job("5", "Dup", "2025-01-01"));
        records[4].location = "Austin".to_string();
        records[1].location = "  ".to_string();

        assert_eq!(
            unique_locations(&records),
            vec!["Berlin, Germany", "berlin", "Austin"]
        );
    }

    #[test]
    fn test_filter_summary() {
        assert_eq!(filter_summary(1, 1, ""), "Showing 1 of 1 job");
        assert_eq!(
            filter_summary(2, 5, " tech "),
            "Showing 2 of 5 jobs matching \"tech\""
        );
    }
}
