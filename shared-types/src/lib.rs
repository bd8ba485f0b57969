pub mod filter;
pub mod job;
pub mod stats;

pub use filter::{DateRange, FilterCriteria, Selection, SortKey, SortOrder};
pub use job::{
    FieldError, JobDraft, JobId, JobPatch, JobPriority, JobRecord, JobStatus, JobType,
    ParseEnumError, ValidationErrors,
};
pub use stats::{Dashboard, Stats, StatusDistribution};
