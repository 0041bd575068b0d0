//! Column editor service
//!
//! Owns the column forest for the lifetime of a session and applies user
//! actions to it. Fixed columns are protected here: they cannot be edited,
//! deleted, or given children.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, ColumnForm, FormAction};
use crate::config::Settings;
use crate::domain::{ColumnNode, ColumnPatch, DomainError, Forest, ROOT_PARENT_ID};
use crate::infrastructure::traits::IdGenerator;

/// Regenerate at most this many times on id collisions.
const MAX_ID_ATTEMPTS: usize = 16;

/// Service holding the current forest value.
pub struct ColumnEditor {
    forest: Forest,
    settings: Arc<Settings>,
    ids: Arc<dyn IdGenerator>,
}

impl ColumnEditor {
    /// Create an editor on the seeded forest.
    pub fn new(settings: Arc<Settings>, ids: Arc<dyn IdGenerator>) -> Self {
        Self::with_forest(settings, ids, Forest::seeded())
    }

    /// Create an editor on an existing forest.
    pub fn with_forest(settings: Arc<Settings>, ids: Arc<dyn IdGenerator>, forest: Forest) -> Self {
        Self {
            forest,
            settings,
            ids,
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Look up a column by id.
    pub fn column(&self, id: &str) -> ApplicationResult<&ColumnNode> {
        self.forest
            .find(id)
            .ok_or_else(|| DomainError::ColumnNotFound(id.to_string()).into())
    }

    /// Open the form for `action`.
    ///
    /// New forms pre-select the configured default type. Edit forms are
    /// pre-filled with the column's current type and title, unlike the web
    /// table, whose edit dialog reopened blank with CUSTOMIZE selected. Partial
    /// edits such as `edit <id> -t remark` rely on the pre-fill.
    #[instrument(level = "debug", skip(self))]
    pub fn open(&self, action: FormAction) -> ApplicationResult<ColumnForm> {
        match &action {
            FormAction::New => Ok(ColumnForm::blank(action, self.settings.default_type)),
            FormAction::NewChild { parent_id } => {
                self.editable(parent_id)?;
                Ok(ColumnForm::blank(action, self.settings.default_type))
            }
            FormAction::Edit { id } => {
                let node = self.editable(id)?;
                Ok(ColumnForm::prefilled(action.clone(), node))
            }
        }
    }

    /// Validate and apply a form. Returns the id of the new or edited column.
    #[instrument(level = "debug", skip(self, form), fields(action = %form.action))]
    pub fn submit(&mut self, form: ColumnForm) -> ApplicationResult<String> {
        let values = form.validate().map_err(ApplicationError::Validation)?;

        let id = match &form.action {
            FormAction::New => {
                let id = self.fresh_id()?;
                let node = ColumnNode {
                    parent_id: ROOT_PARENT_ID.to_string(),
                    ..ColumnNode::new(id.clone(), values.column_type, values.title)
                        .with_level(self.settings.new_root_level)
                };
                self.forest = if self.settings.reserve_last_root {
                    self.forest.append_root(node)
                } else {
                    self.forest.push_root(node)
                };
                id
            }
            FormAction::NewChild { parent_id } => {
                self.editable(parent_id)?;
                let id = self.fresh_id()?;
                let node = ColumnNode::new(id.clone(), values.column_type, values.title);
                self.forest = self.forest.append_child(parent_id, node);
                id
            }
            FormAction::Edit { id } => {
                self.editable(id)?;
                let patch = ColumnPatch::from_form(values.column_type, values.title);
                self.forest = self.forest.replace_fields(id, &patch);
                id.clone()
            }
        };

        info!(
            "{}: {} ({} columns)",
            form.action.label(),
            id,
            self.forest.node_count()
        );
        debug!("columns:\n{}", self.forest);
        Ok(id)
    }

    /// Delete a column together with its children. Returns the removed column.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: &str) -> ApplicationResult<ColumnNode> {
        let removed = self.editable(id)?.clone();
        self.forest = self.forest.remove_subtree(id);
        info!("delete: {} ({} columns)", id, self.forest.node_count());
        debug!("columns:\n{}", self.forest);
        Ok(removed)
    }

    /// Restore the seeded forest.
    pub fn reset(&mut self) {
        debug!("reset forest");
        self.forest = Forest::seeded();
    }

    /// Column that exists and is not fixed.
    fn editable(&self, id: &str) -> ApplicationResult<&ColumnNode> {
        let node = self.column(id)?;
        if node.is_fixed() {
            return Err(DomainError::FixedColumn(id.to_string()).into());
        }
        Ok(node)
    }

    fn fresh_id(&self) -> ApplicationResult<String> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !id.is_empty() && id != ROOT_PARENT_ID && !self.forest.contains(&id) {
                return Ok(id);
            }
            debug!("id collision: {}", id);
        }
        Err(ApplicationError::Config {
            message: format!("id generator produced no unique id in {MAX_ID_ATTEMPTS} attempts"),
        })
    }
}
