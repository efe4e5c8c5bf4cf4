//! Controller orchestration for the owner, bike and revision views
//!
//! A controller keeps the list currently shown to the user and borrows the
//! repository for each call. Every mutating flow is
//! build → validate → persist → refresh; a validation failure returns
//! before the repository is touched.

pub mod bike;
pub mod forms;
pub mod owner;
pub mod revision;

use std::time::Instant;

use crate::errors::Result;
use crate::{log_op_end, log_op_error};

pub use bike::BikeController;
pub use forms::{BikeForm, OwnerForm, RevisionForm};
pub use owner::OwnerController;
pub use revision::RevisionController;

/// Emit the end or end_error event for an operation and pass the result on
fn finish<T>(op: &str, started: Instant, result: Result<T>) -> Result<T> {
    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(_) => {
            log_op_end!(op, duration_ms = duration_ms);
        }
        Err(err) => {
            log_op_error!(op, err, duration_ms = duration_ms);
        }
    }
    result
}

/// `finish` for list loads; the end event carries the number of rows listed
fn finish_load(op: &str, started: Instant, result: Result<usize>) -> Result<()> {
    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(rows) => {
            let row_count = *rows as u64;
            log_op_end!(op, duration_ms = duration_ms, row_count = row_count);
        }
        Err(err) => {
            log_op_error!(op, err, duration_ms = duration_ms);
        }
    }
    result.map(|_| ())
}
