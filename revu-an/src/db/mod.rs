//! Database access for revu-an
//!
//! Pool and schema initialization live in `revu-common`; this module holds
//! the analytics queries.

pub mod dashboard;
