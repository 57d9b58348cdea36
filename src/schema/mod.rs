//! Input schema for profiles, health entries and food entries
//!
//! This module validates raw records and prepares the date-ordered history
//! that the aggregation and analysis stages consume.

mod adapter;
mod entry;

pub use adapter::*;
pub use entry::*;
