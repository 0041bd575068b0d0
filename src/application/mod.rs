//! Application layer: column form and editor service
//!
//! This layer applies domain operations on behalf of user actions and depends
//! on boundary traits for anything non-deterministic.

pub mod error;
pub mod form;
pub mod services;

pub use error::{ApplicationError, ApplicationResult, FieldError};
pub use form::{ColumnForm, ColumnValues, FormAction};
