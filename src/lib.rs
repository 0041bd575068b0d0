//! coltree: editor for hierarchical table-column definitions.
//!
//! The column forest (`domain::Forest`) is a pure value; every edit produces
//! a new forest. `application::services::ColumnEditor` owns the current value
//! for a session and guards fixed columns.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
