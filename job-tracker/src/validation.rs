use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use shared_types::{
    JobDraft, JobId, JobPriority, JobRecord, JobStatus, JobType, ValidationErrors,
};
use std::sync::OnceLock;

/// How strictly enumerated fields are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Create/edit input: every enumerated field must be in its domain
    Form,
    /// Snapshot data: an unknown status is kept verbatim
    Snapshot,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"))
}

/// Turn a draft into a record, or report every offending field at once.
///
/// The draft must already carry an id; the store assigns one before calling
/// this for new records.
pub fn validate_draft(
    draft: &JobDraft,
    mode: ValidationMode,
) -> Result<JobRecord, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let id = validate_id(&mut errors, draft.id.as_ref());
    let company = required_text(&mut errors, "company", &draft.company, "Company name is required");
    let position = required_text(&mut errors, "position", &draft.position, "Position is required");
    let location = required_text(&mut errors, "location", &draft.location, "Location is required");

    let status = validate_status(&mut errors, &draft.status, mode);
    let priority = parse_optional::<JobPriority>(&mut errors, "priority", &draft.priority);
    let job_type = parse_optional::<JobType>(&mut errors, "jobType", &draft.job_type);

    let applied_date = match optional_text(&draft.applied_date) {
        None => {
            errors.push("appliedDate", "Application date is required");
            None
        }
        Some(raw) => match parse_date(&raw) {
            Some(date) => Some(date),
            None => {
                errors.push("appliedDate", format!("Invalid application date: {raw}"));
                None
            }
        },
    };

    let deadline = match optional_text(&draft.deadline) {
        None => None,
        Some(raw) => match parse_date(&raw) {
            Some(date) => Some(date),
            None => {
                errors.push("deadline", format!("Invalid deadline: {raw}"));
                None
            }
        },
    };

    if let (Some(applied), Some(deadline)) = (applied_date, deadline) {
        if deadline < applied {
            errors.push("deadline", "Deadline cannot be before application date");
        }
    }

    let contact_email = optional_text(&draft.contact_email);
    if let Some(email) = &contact_email {
        if !email_regex().is_match(email) {
            errors.push("contactEmail", "Please enter a valid email address");
        }
    }

    match (id, company, position, location, applied_date) {
        (Some(id), Some(company), Some(position), Some(location), Some(applied_date))
            if errors.is_empty() =>
        {
            Ok(JobRecord {
                id,
                company,
                position,
                location,
                status,
                priority,
                applied_date,
                deadline,
                job_type,
                salary: optional_text(&draft.salary),
                source: optional_text(&draft.source),
                contact_email,
                notes: optional_text(&draft.notes),
            })
        }
        _ => Err(errors),
    }
}

/// Accepts `YYYY-MM-DD`, or a timestamp whose calendar date is used
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

fn validate_id(errors: &mut ValidationErrors, id: Option<&JobId>) -> Option<JobId> {
    match id {
        Some(id) if !id.is_blank() => Some(id.clone()),
        _ => {
            errors.push("id", "Job id is required");
            None
        }
    }
}

fn validate_status(
    errors: &mut ValidationErrors,
    raw: &Option<String>,
    mode: ValidationMode,
) -> JobStatus {
    let Some(raw) = optional_text(raw) else {
        return JobStatus::default();
    };

    match mode {
        ValidationMode::Snapshot => JobStatus::from(raw),
        ValidationMode::Form => JobStatus::parse_recognized(&raw).unwrap_or_else(|_| {
            let allowed: Vec<&str> = JobStatus::RECOGNIZED.iter().map(|s| s.as_str()).collect();
            errors.push(
                "status",
                format!("Invalid status {raw:?}. Must be one of: {}", allowed.join(", ")),
            );
            JobStatus::default()
        }),
    }
}

fn parse_optional<T>(errors: &mut ValidationErrors, field: &str, raw: &Option<String>) -> Option<T>
where
    T: std::str::FromStr<Err = shared_types::ParseEnumError>,
{
    let raw = optional_text(raw)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(field, e.to_string());
            None
        }
    }
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &str,
    value: &Option<String>,
    message: &str,
) -> Option<String> {
    let text = optional_text(value);
    if text.is_none() {
        errors.push(field, message);
    }
    text
}

/// Trimmed text, with blank values treated as absent
fn optional_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> JobDraft {
        JobDraft {
            id: Some(JobId::from("1")),
            company: Some("  TechNova ".to_string()),
            position: Some("Backend Engineer".to_string()),
            location: Some("Berlin".to_string()),
            applied_date: Some("2025-01-10".to_string()),
            ..JobDraft::default()
        }
    }

    #[test]
    fn test_valid_draft_is_normalized() {
        let mut input = draft();
        input.notes = Some("   ".to_string());
        input.priority = Some("HIGH".to_string());
        input.job_type = Some("full-time".to_string());

        let record = validate_draft(&input, ValidationMode::Form).unwrap();
        assert_eq!(record.company, "TechNova");
        assert_eq!(record.status, JobStatus::Applied);
        assert_eq!(record.priority, Some(JobPriority::High));
        assert_eq!(record.job_type, Some(JobType::FullTime));
        assert!(record.notes.is_none());
    }

    #[test]
    fn test_missing_required_fields_are_itemized() {
        let input = JobDraft {
            id: Some(JobId::from("1")),
            company: Some(" ".to_string()),
            ..JobDraft::default()
        };

        let errors = validate_draft(&input, ValidationMode::Form).unwrap_err();
        assert_eq!(errors.get("company"), Some("Company name is required"));
        assert_eq!(errors.get("position"), Some("Position is required"));
        assert_eq!(errors.get("location"), Some("Location is required"));
        assert_eq!(errors.get("appliedDate"), Some("Application date is required"));
        assert_eq!(errors.errors.len(), 4);
    }

    #[test]
    fn test_deadline_before_applied_date() {
        let mut input = draft();
        input.deadline = Some("2025-01-09".to_string());
        let errors = validate_draft(&input, ValidationMode::Form).unwrap_err();
        assert_eq!(
            errors.get("deadline"),
            Some("Deadline cannot be before application date")
        );

        input.deadline = Some("2025-01-10".to_string());
        assert!(validate_draft(&input, ValidationMode::Form).is_ok());
    }

    #[test]
    fn test_email_shape() {
        let mut input = draft();
        input.contact_email = Some("recruiter@technova".to_string());
        let errors = validate_draft(&input, ValidationMode::Form).unwrap_err();
        assert_eq!(errors.get("contactEmail"), Some("Please enter a valid email address"));

        input.contact_email = Some("recruiter@technova.io".to_string());
        assert!(validate_draft(&input, ValidationMode::Form).is_ok());
    }

    #[test]
    fn test_unknown_status_depends_on_mode() {
        let mut input = draft();
        input.status = Some("ghosted".to_string());

        let errors = validate_draft(&input, ValidationMode::Form).unwrap_err();
        assert!(errors.get("status").is_some());

        let record = validate_draft(&input, ValidationMode::Snapshot).unwrap();
        assert_eq!(record.status, JobStatus::Unrecognized("ghosted".to_string()));
    }

    #[test]
    fn test_invalid_enums_are_rejected() {
        let mut input = draft();
        input.priority = Some("urgent".to_string());
        input.job_type = Some("gig".to_string());

        let errors = validate_draft(&input, ValidationMode::Snapshot).unwrap_err();
        assert!(errors.get("priority").is_some());
        assert!(errors.get("jobType").is_some());
    }

    #[test]
    fn test_missing_id() {
        let mut input = draft();
        input.id = Some(JobId::from("  "));
        let errors = validate_draft(&input, ValidationMode::Form).unwrap_err();
        assert_eq!(errors.get("id"), Some("Job id is required"));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(parse_date("2025-03-01"), Some(expected));
        assert_eq!(parse_date("2025-03-01T15:30:00Z"), Some(expected));
        assert_eq!(parse_date("2025-03-01T15:30:00.000"), Some(expected));
        assert_eq!(parse_date("March 1st"), None);
    }
}
