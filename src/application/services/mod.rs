//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on boundary traits (IdGenerator) but are themselves
//! concrete structs, not traits.

mod editor;

pub use editor::ColumnEditor;
