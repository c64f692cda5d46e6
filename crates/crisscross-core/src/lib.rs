//! # crisscross-core
//!
//! Workflow logic for crisscross: the criss-cross branch sync protocol, the
//! merge-with-remote check it is built from, and per-author line
//! statistics. Everything here talks to version control only through
//! [`crisscross_git::VcsBackend`].

pub mod branch_name;
pub mod cancel;
pub mod config;
pub mod error;
pub mod merge_check;
pub mod stats;
pub mod status;
pub mod sync;

#[cfg(test)]
mod test_mocks;

pub use branch_name::BranchName;
pub use cancel::CancellationToken;
pub use config::{CONFIG_FILE, Config};
pub use error::{Error, Result, SyncError};
pub use merge_check::{MergeCheck, try_merge_remote};
pub use stats::{AuthorStats, changes_by_author};
pub use status::UpToDateCheck;
pub use sync::{SyncOptions, SyncOrchestrator, SyncReport, SyncStep};
