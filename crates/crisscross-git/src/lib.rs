//! # crisscross-git
//!
//! Version-control backend for crisscross. Defines the [`VcsBackend`]
//! capability the sync and stats engines are written against, and a
//! [`Repository`] implementation that drives the `git` executable with
//! git2-rs for structural queries.

mod error;
mod repository;
mod traits;

pub use error::{Error, Result};
pub use repository::{CommitOutcome, DEFAULT_REMOTE, GIT_PROGRAM_ENV, RemoteDivergence, Repository};
pub use traits::VcsBackend;
