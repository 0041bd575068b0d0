//! Column form: the values a user submits for new, edit and new-child actions.

use std::fmt;

use crate::application::error::FieldError;
use crate::domain::{ColumnNode, ColumnType};

/// What submitting a form does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// Append a new root column
    New,
    /// Replace the fields of an existing column
    Edit { id: String },
    /// Append a child under an existing column
    NewChild { parent_id: String },
}

impl FormAction {
    /// Form title.
    pub fn label(&self) -> &'static str {
        match self {
            FormAction::New => "New",
            FormAction::Edit { .. } => "Edit",
            FormAction::NewChild { .. } => "New child",
        }
    }

    /// Id of the column the action operates on, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            FormAction::New => None,
            FormAction::Edit { id } => Some(id),
            FormAction::NewChild { parent_id } => Some(parent_id),
        }
    }
}

impl fmt::Display for FormAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target() {
            Some(id) => write!(f, "{} ({})", self.label(), id),
            None => f.write_str(self.label()),
        }
    }
}

/// Validated form values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnValues {
    pub column_type: ColumnType,
    pub title: String,
}

/// Form state between opening and submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnForm {
    pub action: FormAction,
    pub column_type: Option<ColumnType>,
    pub title: Option<String>,
}

impl ColumnForm {
    /// Empty form with a pre-selected type.
    pub fn blank(action: FormAction, default_type: ColumnType) -> Self {
        Self {
            action,
            column_type: Some(default_type),
            title: None,
        }
    }

    /// Form pre-filled from an existing column.
    pub fn prefilled(action: FormAction, node: &ColumnNode) -> Self {
        Self {
            action,
            column_type: Some(node.column_type),
            title: node.title.clone(),
        }
    }

    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = Some(column_type);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Check required fields, collecting every failure.
    ///
    /// The title is trimmed; a blank title counts as missing.
    pub fn validate(&self) -> Result<ColumnValues, Vec<FieldError>> {
        let mut errors = Vec::new();

        let column_type = match self.column_type {
            None => {
                errors.push(FieldError::new("type", "please select a type"));
                None
            }
            Some(t) if t.is_fixed() => {
                errors.push(FieldError::new("type", "fixed columns cannot be created"));
                None
            }
            Some(t) => Some(t),
        };

        let title = match self.title.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => Some(t.to_string()),
            _ => {
                errors.push(FieldError::new("title", "please enter a title"));
                None
            }
        };

        match (column_type, title) {
            (Some(column_type), Some(title)) if errors.is_empty() => {
                Ok(ColumnValues { column_type, title })
            }
            _ => Err(errors),
        }
    }
}
