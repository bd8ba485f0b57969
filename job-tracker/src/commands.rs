use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use job_tracker::snapshot::FileSnapshotSource;
use job_tracker::stats::{build_dashboard, compute_stats, days_until_deadline};
use job_tracker::{filter, JobStore, LoadOutcome, TrackerConfig, TrackerError, ViewMount, WishlistStore};
use serde::Serialize;
use shared_types::{
    DateRange, FilterCriteria, JobDraft, JobId, JobPatch, JobPriority, JobRecord, JobStatus,
    JobType, Selection, SortKey, SortOrder,
};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the static snapshot, replacing the local collection
    Load {
        /// Snapshot file, defaults to `snapshot.path` from the config
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Application counts and success rate
    Stats,
    /// Stats plus recent and high priority applications
    Dashboard,
    /// Search, filter and sort applications
    List(ListArgs),
    /// Distinct locations, for building a location filter
    Locations,
    /// Show one application
    Show { id: String },
    /// Record a new application
    Add {
        /// Explicit id, generated when omitted
        #[arg(long)]
        id: Option<String>,
        #[command(flatten)]
        fields: RecordArgs,
    },
    /// Change fields of an application
    Update {
        id: String,
        #[command(flatten)]
        fields: RecordArgs,
    },
    /// Delete an application (its wishlist copy is kept)
    Remove { id: String },
    /// Jobs saved for later
    Wishlist {
        #[command(subcommand)]
        action: WishlistCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum WishlistCommand {
    List,
    Save { id: String },
    Remove { id: String },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive match on company, position and notes
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "all")]
    status: Selection<JobStatus>,
    /// Case-insensitive substring of the location
    #[arg(long, default_value = "all")]
    location: Selection<String>,
    #[arg(long, default_value = "all")]
    job_type: Selection<JobType>,
    #[arg(long, default_value = "all")]
    priority: Selection<JobPriority>,
    /// all, week, month or quarter
    #[arg(long, default_value = "all")]
    date_range: DateRange,
    #[arg(long, default_value = "appliedDate")]
    sort_by: SortKey,
    #[arg(long, default_value = "desc")]
    order: SortOrder,
}

impl From<ListArgs> for FilterCriteria {
    fn from(args: ListArgs) -> Self {
        FilterCriteria {
            search_term: args.search,
            status: args.status,
            location: args.location,
            job_type: args.job_type,
            priority: args.priority,
            date_range: args.date_range,
            sort_by: args.sort_by,
            sort_order: args.order,
        }
    }
}

/// Record fields as command-line flags. An empty value clears an optional
/// field on update.
#[derive(Args, Debug, Default)]
pub struct RecordArgs {
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    position: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    priority: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    applied_date: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    deadline: Option<String>,
    #[arg(long)]
    job_type: Option<String>,
    #[arg(long)]
    salary: Option<String>,
    #[arg(long)]
    source: Option<String>,
    #[arg(long)]
    contact_email: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl From<RecordArgs> for JobPatch {
    fn from(args: RecordArgs) -> Self {
        JobPatch {
            company: args.company,
            position: args.position,
            location: args.location,
            status: args.status,
            priority: args.priority,
            applied_date: args.applied_date,
            deadline: args.deadline,
            job_type: args.job_type,
            salary: args.salary,
            source: args.source,
            contact_email: args.contact_email,
            notes: args.notes,
        }
    }
}

/// State shared by every command for one process run
pub struct Session {
    pub config: TrackerConfig,
    pub jobs: JobStore,
    pub wishlist: WishlistStore,
}

impl Session {
    async fn load_from(&mut self, path: PathBuf) -> job_tracker::Result<LoadOutcome> {
        let source = FileSnapshotSource::new(path);
        self.jobs.load(&source, &ViewMount::new()).await
    }

    /// First run: seed the local collection from the configured snapshot.
    /// A failed load is reported and the session continues with no jobs.
    async fn ensure_loaded(&mut self) {
        if !self.jobs.is_empty() {
            return;
        }
        let Some(path) = self.config.snapshot.path.clone() else {
            return;
        };

        if let Err(e) = self.load_from(path).await {
            eprintln!("Could not load job data, showing an empty list: {e}");
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JobDetail<'a> {
    #[serde(flatten)]
    job: &'a JobRecord,
    days_until_deadline: Option<i64>,
    in_wishlist: bool,
}

pub async fn run(session: &mut Session, command: Command) -> Result<()> {
    if !matches!(command, Command::Load { .. }) {
        session.ensure_loaded().await;
    }
    let today = chrono::Local::now().date_naive();

    match command {
        Command::Load { snapshot } => load_snapshot(session, snapshot).await,
        Command::Stats => print_json(&compute_stats(session.jobs.records())),
        Command::Dashboard => {
            let limits = session.config.dashboard_limits();
            print_json(&build_dashboard(session.jobs.records(), limits))
        }
        Command::List(args) => {
            let criteria = FilterCriteria::from(args);
            let matched = filter::apply(session.jobs.records(), &criteria);
            print_json(&matched)?;
            eprintln!(
                "{} ({} active filters)",
                filter::filter_summary(matched.len(), session.jobs.len(), &criteria.search_term),
                criteria.active_filter_count()
            );
            Ok(())
        }
        Command::Locations => {
            for location in filter::unique_locations(session.jobs.records()) {
                println!("{location}");
            }
            Ok(())
        }
        Command::Show { id } => {
            let job = session
                .jobs
                .get(&id)
                .ok_or_else(|| anyhow!("No job with id {id}"))?;
            print_json(&JobDetail {
                job,
                days_until_deadline: days_until_deadline(job, today),
                in_wishlist: session.wishlist.contains(&id),
            })
        }
        Command::Add { id, fields } => {
            let mut draft = JobDraft::form_defaults(today);
            draft.id = id.map(JobId::from);
            draft.apply_patch(&JobPatch::from(fields));

            let record = session.jobs.add(draft).context("Job was not added")?;
            print_json(&record)
        }
        Command::Update { id, fields } => {
            let record = session
                .jobs
                .update(&id, &JobPatch::from(fields))
                .context("Job was not updated")?;
            print_json(&record)
        }
        Command::Remove { id } => match session.jobs.remove(&id) {
            Ok(Some(removed)) => {
                println!("Deleted {} at {}", removed.position, removed.company);
                Ok(())
            }
            Ok(None) => {
                println!("No job with id {id}, nothing deleted");
                Ok(())
            }
            Err(TrackerError::InvalidArgument(message)) => {
                tracing::warn!("Ignoring delete: {}", message);
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
        Command::Wishlist { action } => run_wishlist(session, action),
    }
}

async fn load_snapshot(session: &mut Session, snapshot: Option<PathBuf>) -> Result<()> {
    let path = snapshot
        .or_else(|| session.config.snapshot.path.clone())
        .ok_or_else(|| anyhow!("No snapshot given and snapshot.path is not configured"))?;

    if let LoadOutcome::Loaded(count) = session.load_from(path.clone()).await? {
        println!("Loaded {count} jobs from {}", path.display());
    }
    Ok(())
}

fn run_wishlist(session: &mut Session, action: WishlistCommand) -> Result<()> {
    match action {
        WishlistCommand::List => print_json(&session.wishlist.list()),
        WishlistCommand::Save { id } => {
            let Some(job) = session.jobs.get(&id) else {
                bail!("No job with id {id}");
            };
            let job = job.clone();
            if session.wishlist.save(&job)? {
                println!("Added {} at {} to your wishlist", job.position, job.company);
            } else {
                println!("{} at {} is already in your wishlist", job.position, job.company);
            }
            Ok(())
        }
        WishlistCommand::Remove { id } => {
            if session.wishlist.remove(&id)? {
                println!("Removed {id} from your wishlist");
            } else {
                println!("{id} is not in your wishlist");
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
