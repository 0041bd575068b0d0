//! Forest rendering: indented table, tree drawing and TOML

use itertools::Itertools;
use termtree::Tree;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{ColumnNode, Forest};

const HEADER: [&str; 4] = ["Title", "Type", "Id", "Actions"];

/// Row actions; fixed columns have none.
pub fn row_actions(node: &ColumnNode) -> &'static str {
    if node.is_fixed() {
        "-"
    } else {
        "child edit delete"
    }
}

/// Table with one row per column, titles indented by depth.
pub fn render_table(forest: &Forest) -> String {
    let rows: Vec<[String; 4]> = forest
        .iter()
        .map(|(node, depth)| {
            [
                format!("{}{}", "  ".repeat(depth), node.display_title()),
                node.column_type.label().to_string(),
                node.id.clone(),
                row_actions(node).to_string(),
            ]
        })
        .collect();

    let mut widths = HEADER.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();

    let mut lines = vec![format_row(&header), format_row(&rule)];
    lines.extend(rows.iter().map(|row| format_row(row)));
    lines.join("\n")
}

fn node_label(node: &ColumnNode) -> String {
    format!(
        "{} ({}) [{}]",
        node.display_title(),
        node.column_type.label(),
        node.id
    )
}

fn to_tree(node: &ColumnNode) -> Tree<String> {
    Tree::new(node_label(node)).with_leaves(node.children.iter().map(to_tree))
}

/// Tree drawing rooted at a synthetic `columns` node.
pub fn render_tree(forest: &Forest) -> String {
    Tree::new("columns".to_string())
        .with_leaves(forest.roots().iter().map(to_tree))
        .to_string()
}

/// TOML document with a `[[columns]]` table per root.
pub fn render_toml(forest: &Forest) -> ApplicationResult<String> {
    toml::to_string_pretty(forest).map_err(|e| ApplicationError::Config {
        message: format!("serialize columns: {e}"),
    })
}
