//! Column forest: ordered roots, each owning an ordered list of children.
//!
//! Every mutating operation takes `&self` and returns a new forest. Operations
//! addressing an id that does not exist return a forest equal to the input.

use std::fmt;

use serde::Serialize;
use tracing::instrument;

use crate::domain::entities::{ColumnNode, ColumnPatch};

/// Ordered forest of column nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Forest {
    #[serde(rename = "columns")]
    roots: Vec<ColumnNode>,
}

impl Forest {
    pub fn new(roots: Vec<ColumnNode>) -> Self {
        Self { roots }
    }

    /// The built-in columns every table starts with.
    pub fn seeded() -> Self {
        Self::new(vec![
            ColumnNode::fixed("code", "Code"),
            ColumnNode::fixed("name", "Name"),
            ColumnNode::fixed("remark", "Remark"),
        ])
    }

    pub fn roots(&self) -> &[ColumnNode] {
        &self.roots
    }

    /// Total number of nodes, nested children included.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Insert `node` as the last root while keeping the current last root
    /// pinned at the end (reserve row).
    #[instrument(level = "debug", skip(self, node), fields(id = %node.id))]
    pub fn append_root(&self, node: ColumnNode) -> Self {
        let mut roots = self.roots.clone();
        match roots.pop() {
            Some(reserved) => {
                roots.push(node);
                roots.push(reserved);
            }
            None => roots.push(node),
        }
        Self { roots }
    }

    /// Insert `node` as the last root, without reserving the trailing row.
    #[instrument(level = "debug", skip(self, node), fields(id = %node.id))]
    pub fn push_root(&self, node: ColumnNode) -> Self {
        let mut roots = self.roots.clone();
        roots.push(node);
        Self { roots }
    }

    /// Append `node` to the children of the node with `parent_id`.
    ///
    /// The child's `parent_id` and `level` are derived from the parent. The
    /// first match in depth-first order receives the child.
    #[instrument(level = "debug", skip(self, node), fields(id = %node.id))]
    pub fn append_child(&self, parent_id: &str, node: ColumnNode) -> Self {
        let mut roots = self.roots.clone();
        let mut pending = Some(node);
        add_child(&mut roots, parent_id, &mut pending);
        Self { roots }
    }

    /// Overwrite the fields present in `patch` on the node with `id`.
    #[instrument(level = "debug", skip(self, patch))]
    pub fn replace_fields(&self, id: &str, patch: &ColumnPatch) -> Self {
        let mut roots = self.roots.clone();
        edit_node(&mut roots, id, patch);
        Self { roots }
    }

    /// Drop the node with `id` together with its subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&self, id: &str) -> Self {
        Self {
            roots: remove_node(&self.roots, id),
        }
    }

    /// First node with `id` in depth-first order.
    pub fn find(&self, id: &str) -> Option<&ColumnNode> {
        self.iter().map(|(node, _)| node).find(|node| node.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// All ids in display order.
    pub fn ids(&self) -> Vec<&str> {
        self.iter().map(|(node, _)| node.id.as_str()).collect()
    }

    /// Pre-order depth-first traversal yielding each node with its tree depth
    /// (roots are depth 0), i.e. the order rows appear in the table.
    pub fn iter(&self) -> ForestIter<'_> {
        ForestIter {
            stack: self.roots.iter().rev().map(|node| (node, 0)).collect(),
        }
    }
}

impl fmt::Display for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (node, depth) in self.iter() {
            writeln!(f, "{}{}", "  ".repeat(depth), node)?;
        }
        Ok(())
    }
}

/// Pre-order iterator over a forest.
pub struct ForestIter<'a> {
    stack: Vec<(&'a ColumnNode, usize)>,
}

impl<'a> Iterator for ForestIter<'a> {
    type Item = (&'a ColumnNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        Some((node, depth))
    }
}

fn add_child(nodes: &mut [ColumnNode], parent_id: &str, pending: &mut Option<ColumnNode>) {
    for item in nodes.iter_mut() {
        if pending.is_none() {
            return;
        }
        if item.id == parent_id {
            if let Some(mut child) = pending.take() {
                child.level = item.level + 1;
                child.parent_id = item.id.clone();
                item.children.push(child);
            }
            return;
        }
        add_child(&mut item.children, parent_id, pending);
    }
}

fn edit_node(nodes: &mut [ColumnNode], id: &str, patch: &ColumnPatch) {
    for item in nodes.iter_mut() {
        if item.id == id {
            patch.apply_to(item);
        } else {
            edit_node(&mut item.children, id, patch);
        }
    }
}

fn remove_node(nodes: &[ColumnNode], id: &str) -> Vec<ColumnNode> {
    nodes
        .iter()
        .filter(|item| item.id != id)
        .map(|item| ColumnNode {
            children: remove_node(&item.children, id),
            ..item.clone()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ColumnType;

    fn sample() -> Forest {
        let grandchild = ColumnNode::new("g", ColumnType::Remark, "grandchild").with_level(3);
        let mut child = ColumnNode::new("c", ColumnType::UserFill, "child").with_level(2);
        child.parent_id = "a".into();
        child.children = vec![ColumnNode {
            parent_id: "c".into(),
            ..grandchild
        }];
        let a = ColumnNode::new("a", ColumnType::Customize, "A")
            .with_level(1)
            .with_children(vec![child]);
        Forest::seeded().append_root(a)
    }

    #[test]
    fn given_seeded_forest_when_iterating_then_yields_three_fixed_roots() {
        let forest = Forest::seeded();
        assert_eq!(forest.ids(), vec!["code", "name", "remark"]);
        assert!(forest.roots().iter().all(|n| n.is_fixed() && n.level == 0));
    }

    #[test]
    fn given_empty_forest_when_append_root_then_node_is_only_root() {
        let forest = Forest::default().append_root(ColumnNode::new("x", ColumnType::Remark, "X"));
        assert_eq!(forest.ids(), vec!["x"]);
    }

    #[test]
    fn given_nested_forest_when_iterating_then_preorder_with_depth() {
        let forest = sample();
        let rows: Vec<(&str, usize)> = forest.iter().map(|(n, d)| (n.id.as_str(), d)).collect();
        assert_eq!(
            rows,
            vec![("code", 0), ("name", 0), ("a", 0), ("c", 1), ("g", 2), ("remark", 0)]
        );
        assert_eq!(forest.node_count(), 6);
    }

    #[test]
    fn given_nested_id_when_find_then_returns_node() {
        let forest = sample();
        assert_eq!(forest.find("g").map(|n| n.display_title()), Some("grandchild"));
        assert!(forest.find("missing").is_none());
    }

    #[test]
    fn given_duplicate_ids_when_append_child_then_first_match_wins() {
        let twin = ColumnNode::new("dup", ColumnType::Customize, "first");
        let other = ColumnNode::new("dup", ColumnType::Customize, "second");
        let forest = Forest::new(vec![twin, other]);

        let result = forest.append_child("dup", ColumnNode::new("k", ColumnType::Remark, "kid"));

        assert_eq!(result.roots()[0].children.len(), 1);
        assert!(result.roots()[1].children.is_empty());
    }

    #[test]
    fn given_forest_when_mutating_then_input_is_untouched() {
        let forest = sample();
        let before = forest.clone();

        let _ = forest.remove_subtree("c");
        let _ = forest.replace_fields("a", &ColumnPatch::from_form(ColumnType::Remark, "z"));
        let _ = forest.append_child("g", ColumnNode::new("n", ColumnType::Remark, "n"));

        assert_eq!(forest, before);
    }

    #[test]
    fn given_forest_when_displayed_then_indents_children() {
        let out = sample().to_string();
        assert!(out.contains("\n    grandchild [g]\n"), "{}", out);
    }
}
