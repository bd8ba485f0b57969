use chrono::NaiveDate;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Error returned when a string does not name a member of one of the job enums
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Identifier of a job record.
///
/// Snapshots may carry ids as strings or integers; both are held as text so
/// `"7"` and `7` refer to the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[ts(export)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl PartialEq<str> for JobId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.trim()
    }
}

impl Serialize for JobId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct JobIdVisitor;

        impl<'de> Visitor<'de> for JobIdVisitor {
            type Value = JobId;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string or integer job id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<JobId, E> {
                Ok(JobId::new(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<JobId, E> {
                Ok(JobId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<JobId, E> {
                Ok(JobId(v.to_string()))
            }
        }

        deserializer.deserialize_any(JobIdVisitor)
    }
}

/// Application status.
///
/// Snapshot data is not under our control, so a status outside the four known
/// values is kept verbatim as `Unrecognized` instead of failing the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    #[default]
    Applied,
    Interview,
    Offer,
    Rejected,
    Unrecognized(String),
}

impl JobStatus {
    pub const RECOGNIZED: [JobStatus; 4] = [
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Offer,
        JobStatus::Rejected,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Applied => "applied",
            JobStatus::Interview => "interview",
            JobStatus::Offer => "offer",
            JobStatus::Rejected => "rejected",
            JobStatus::Unrecognized(raw) => raw,
        }
    }

    /// Strict parse: only the four known statuses, case-insensitive
    pub fn parse_recognized(value: &str) -> Result<Self, ParseEnumError> {
        match Self::from(value.to_string()) {
            JobStatus::Unrecognized(_) => Err(ParseEnumError::new("status", value)),
            status => Ok(status),
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "applied" => JobStatus::Applied,
            "interview" => JobStatus::Interview,
            "offer" => JobStatus::Offer,
            "rejected" => JobStatus::Rejected,
            _ => JobStatus::Unrecognized(value),
        }
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        match value {
            JobStatus::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Parsing user input accepts only the four known statuses; deserialization
/// goes through `From<String>` and keeps unknown values.
impl FromStr for JobStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_recognized(s)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum JobPriority {
    High,
    Medium,
    Low,
}

impl JobPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPriority::High => "high",
            JobPriority::Medium => "medium",
            JobPriority::Low => "low",
        }
    }
}

impl FromStr for JobPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(JobPriority::High),
            "medium" => Ok(JobPriority::Medium),
            "low" => Ok(JobPriority::Low),
            _ => Err(ParseEnumError::new("priority", s)),
        }
    }
}

impl fmt::Display for JobPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employment type, serialized with the display spelling used by the forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Freelance,
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Freelance => "Freelance",
            JobType::Internship => "Internship",
        }
    }
}

impl FromStr for JobType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match folded.as_str() {
            "fulltime" => Ok(JobType::FullTime),
            "parttime" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "freelance" => Ok(JobType::Freelance),
            "internship" => Ok(JobType::Internship),
            _ => Err(ParseEnumError::new("job type", s)),
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked job application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: JobId,
    pub company: String,
    pub position: String,
    pub location: String,
    #[serde(default)]
    #[ts(type = "string")]
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub priority: Option<JobPriority>,
    pub applied_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub job_type: Option<JobType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub notes: Option<String>,
}

/// Untrusted record input, as submitted by a form or found in a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct JobDraft {
    pub id: Option<JobId>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub applied_date: Option<String>,
    pub deadline: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub source: Option<String>,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
}

impl JobDraft {
    /// Values an empty "add job" form starts with
    pub fn form_defaults(today: NaiveDate) -> Self {
        Self {
            status: Some(JobStatus::Applied.as_str().to_string()),
            applied_date: Some(today.format("%Y-%m-%d").to_string()),
            job_type: Some(JobType::FullTime.as_str().to_string()),
            priority: Some(JobPriority::Medium.as_str().to_string()),
            source: Some("Company Website".to_string()),
            ..Self::default()
        }
    }

    /// Overlay the fields present in `patch`; the id is never touched
    pub fn apply_patch(&mut self, patch: &JobPatch) {
        fn overlay(target: &mut Option<String>, value: &Option<String>) {
            if let Some(value) = value {
                *target = Some(value.clone());
            }
        }

        overlay(&mut self.company, &patch.company);
        overlay(&mut self.position, &patch.position);
        overlay(&mut self.location, &patch.location);
        overlay(&mut self.status, &patch.status);
        overlay(&mut self.priority, &patch.priority);
        overlay(&mut self.applied_date, &patch.applied_date);
        overlay(&mut self.deadline, &patch.deadline);
        overlay(&mut self.job_type, &patch.job_type);
        overlay(&mut self.salary, &patch.salary);
        overlay(&mut self.source, &patch.source);
        overlay(&mut self.contact_email, &patch.contact_email);
        overlay(&mut self.notes, &patch.notes);
    }
}

impl From<&JobRecord> for JobDraft {
    fn from(record: &JobRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            company: Some(record.company.clone()),
            position: Some(record.position.clone()),
            location: Some(record.location.clone()),
            status: Some(record.status.as_str().to_string()),
            priority: record.priority.map(|p| p.as_str().to_string()),
            applied_date: Some(record.applied_date.format("%Y-%m-%d").to_string()),
            deadline: record.deadline.map(|d| d.format("%Y-%m-%d").to_string()),
            job_type: record.job_type.map(|t| t.as_str().to_string()),
            salary: record.salary.clone(),
            source: record.source.clone(),
            contact_email: record.contact_email.clone(),
            notes: record.notes.clone(),
        }
    }
}

/// Partial update of a record. Present fields overwrite, an empty string
/// clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub applied_date: Option<String>,
    pub deadline: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub source: Option<String>,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Itemized validation failure, one entry per offending field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", items.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
