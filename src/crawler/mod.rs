//! Crawl control core
//!
//! This module contains the site-independent crawling logic, including:
//! - The sequential, throttled task runner
//! - The `Outcome` type returned by per-entity extraction
//! - Cursor-based incremental diffing
//! - The whole-run retry envelope
//! - The run context and the task registry

mod context;
mod diff;
mod outcome;
mod retry;
mod runner;
mod task;

pub use context::{RunState, TaskContext};
pub use diff::{diff_from_cursor, exclude_known, filter_by_min_id};
pub use outcome::{Outcome, SkipReason};
pub use retry::retry;
pub use runner::process_items;
pub use task::{Task, UnknownTask};
