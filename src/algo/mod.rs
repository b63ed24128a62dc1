//! Algorithm implementations for list diffing.
//!
//! - `table`: identity table and per-element records
//! - `matcher`: occurrence pairing and content comparison
//! - `resolve`: offset-based classification into operations
//! - `diff`: public entry points

mod diff;
mod matcher;
mod resolve;
mod table;

pub use diff::{diff, diff_paths, DiffMode};
