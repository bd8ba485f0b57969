//! Job application tracker core
//!
//! Owns the in-memory job collection and everything derived from it. The
//! presentation layer talks to this crate through a small data API:
//!
//! - [`JobStore`]: canonical collection, add/update/remove, snapshot load
//! - [`WishlistStore`]: detached, de-duplicated copies saved for later
//! - [`stats`]: dashboard counters and panels
//! - [`filter`]: search/filter/sort pipeline
//!
//! Record and criteria types live in the `shared-types` crate so a front end
//! can share them.

pub mod config;
pub mod error;
pub mod filter;
pub mod helpers;
pub mod job_store;
pub mod snapshot;
pub mod stats;
pub mod storage;
pub mod validation;
pub mod wishlist;

pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use job_store::JobStore;
pub use snapshot::{FileSnapshotSource, LoadOutcome, SnapshotSource, StaticSnapshotSource, ViewMount};
pub use storage::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use wishlist::WishlistStore;
