//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parent id carried by every root node.
pub const ROOT_PARENT_ID: &str = "-1";

/// Kind of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    /// Built-in system column, never editable
    Fixed,
    /// Column computed by custom logic
    Customize,
    /// Free-text remark column
    Remark,
    /// Column filled in by the user
    UserFill,
}

impl ColumnType {
    /// Human readable label shown in the type column.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Fixed => "System default",
            ColumnType::Customize => "Custom logic",
            ColumnType::Remark => "Remark column",
            ColumnType::UserFill => "User-filled column",
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, ColumnType::Fixed)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error parsing a column type name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown column type '{input}' (expected customize, remark or user-fill)")]
pub struct ColumnTypeParseError {
    pub input: String,
}

impl FromStr for ColumnType {
    type Err = ColumnTypeParseError;

    /// Accepts the short names as well as the serialized upper-case names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "fixed" => Ok(ColumnType::Fixed),
            "customize" | "custom" => Ok(ColumnType::Customize),
            "remark" => Ok(ColumnType::Remark),
            "user-fill" | "userfill" | "fill" => Ok(ColumnType::UserFill),
            _ => Err(ColumnTypeParseError {
                input: s.to_string(),
            }),
        }
    }
}

/// One row of the column forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnNode {
    /// Unique across the whole forest, immutable once created
    pub id: String,
    /// Id of the parent node, `ROOT_PARENT_ID` for roots
    pub parent_id: String,
    /// Nesting level; a child is always one deeper than its parent
    pub level: u32,
    /// Display label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Ordered children, empty for leaves
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ColumnNode>,
}

impl ColumnNode {
    /// Create a detached node. Placement (parent id, level) is decided by the
    /// forest operation or the caller inserting it.
    pub fn new(id: impl Into<String>, column_type: ColumnType, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: ROOT_PARENT_ID.to_string(),
            level: 0,
            title: Some(title.into()),
            column_type,
            children: Vec::new(),
        }
    }

    /// Built-in root column.
    pub fn fixed(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, ColumnType::Fixed, title)
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_children(mut self, children: Vec<ColumnNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_fixed(&self) -> bool {
        self.column_type.is_fixed()
    }

    /// Title for display, empty when unset.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

impl fmt::Display for ColumnNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.display_title(), self.id)
    }
}

/// Field overwrite applied by an edit.
///
/// Only fields that are `Some` replace the node's value; the id can never be
/// changed through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPatch {
    pub title: Option<String>,
    pub column_type: Option<ColumnType>,
    pub parent_id: Option<String>,
    pub level: Option<u32>,
    pub children: Option<Vec<ColumnNode>>,
}

impl ColumnPatch {
    /// Patch carrying the two fields the column form edits.
    pub fn from_form(column_type: ColumnType, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            column_type: Some(column_type),
            ..Self::default()
        }
    }

    /// Shallow-overwrite the fields present in this patch.
    pub fn apply_to(&self, node: &mut ColumnNode) {
        if let Some(title) = &self.title {
            node.title = Some(title.clone());
        }
        if let Some(column_type) = self.column_type {
            node.column_type = column_type;
        }
        if let Some(parent_id) = &self.parent_id {
            node.parent_id = parent_id.clone();
        }
        if let Some(level) = self.level {
            node.level = level;
        }
        if let Some(children) = &self.children {
            node.children = children.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_short_and_serialized_names_when_parsing_type_then_accepts_both() {
        assert_eq!("customize".parse::<ColumnType>().unwrap(), ColumnType::Customize);
        assert_eq!("USER_FILL".parse::<ColumnType>().unwrap(), ColumnType::UserFill);
        assert_eq!("user-fill".parse::<ColumnType>().unwrap(), ColumnType::UserFill);
        assert_eq!("Remark".parse::<ColumnType>().unwrap(), ColumnType::Remark);
    }

    #[test]
    fn given_unknown_name_when_parsing_type_then_error_names_input() {
        let err = "bogus".parse::<ColumnType>().unwrap_err();
        assert_eq!(err, ColumnTypeParseError { input: "bogus".into() });
        assert_eq!(
            err.to_string(),
            "unknown column type 'bogus' (expected customize, remark or user-fill)"
        );
    }

    #[test]
    fn given_patch_with_title_only_when_applied_then_other_fields_kept() {
        let child = ColumnNode::new("c1", ColumnType::Remark, "child").with_level(2);
        let mut node = ColumnNode::new("a", ColumnType::Customize, "old")
            .with_level(1)
            .with_children(vec![child.clone()]);

        let patch = ColumnPatch {
            title: Some("new".into()),
            ..Default::default()
        };
        patch.apply_to(&mut node);

        assert_eq!(node.title.as_deref(), Some("new"));
        assert_eq!(node.id, "a");
        assert_eq!(node.level, 1);
        assert_eq!(node.column_type, ColumnType::Customize);
        assert_eq!(node.children, vec![child]);
    }

    #[test]
    fn test_serialized_type_names() {
        let node = ColumnNode::new("x", ColumnType::UserFill, "X");
        let out = toml::to_string(&node).unwrap();
        assert!(out.contains("type = \"USER_FILL\""), "{}", out);
        assert!(out.contains("parent_id = \"-1\""), "{}", out);
    }
}
