//! # Revu Common Library
//!
//! Shared code for the revu services:
//! - Error type used across crates
//! - Configuration file loading and value resolution
//! - SQLite pool and schema initialization

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
