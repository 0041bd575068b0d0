//! Tests for ColumnEditor
//!
//! The editor applies form submissions to the forest and refuses to touch
//! fixed columns or columns that do not exist.

use std::sync::Arc;

use rstest::{fixture, rstest};

use coltree::application::services::ColumnEditor;
use coltree::application::{ApplicationError, FormAction};
use coltree::config::Settings;
use coltree::domain::{ColumnType, DomainError, Forest, ROOT_PARENT_ID};
use coltree::infrastructure::traits::SequentialIdGenerator;
use coltree::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[fixture]
fn editor() -> ColumnEditor {
    ColumnEditor::new(
        Arc::new(Settings::default()),
        Arc::new(SequentialIdGenerator::default()),
    )
}

/// Submit a new root column, returning its id.
fn add_root(editor: &mut ColumnEditor, title: &str) -> String {
    let form = editor.open(FormAction::New).unwrap().with_title(title);
    editor.submit(form).unwrap()
}

fn add_child(editor: &mut ColumnEditor, parent: &str, title: &str) -> String {
    let form = editor
        .open(FormAction::NewChild {
            parent_id: parent.to_string(),
        })
        .unwrap()
        .with_title(title);
    editor.submit(form).unwrap()
}

// ============================================================
// New
// ============================================================

#[rstest]
fn given_seed_when_new_column_submitted_then_inserted_before_last_with_level_one(
    mut editor: ColumnEditor,
) {
    let id = add_root(&mut editor, "Foo");

    let roots = editor.forest().roots();
    assert_eq!(roots.len(), 4);
    assert_eq!(roots[2].id, id);
    assert_eq!(roots[2].title.as_deref(), Some("Foo"));
    assert_eq!(roots[2].column_type, ColumnType::Customize);
    assert_eq!(roots[2].level, 1);
    assert_eq!(roots[2].parent_id, ROOT_PARENT_ID);
    assert_eq!(roots[3].id, "remark");
}

#[rstest]
fn given_new_form_when_opened_then_default_type_preselected(editor: ColumnEditor) {
    let form = editor.open(FormAction::New).unwrap();
    assert_eq!(form.column_type, Some(ColumnType::Customize));
    assert_eq!(form.title, None);
}

#[rstest]
fn given_configured_default_type_when_opening_then_used() {
    let settings = Settings {
        default_type: ColumnType::Remark,
        ..Default::default()
    };
    let editor = ColumnEditor::new(Arc::new(settings), Arc::new(SequentialIdGenerator::default()));

    let form = editor.open(FormAction::New).unwrap();

    assert_eq!(form.column_type, Some(ColumnType::Remark));
}

#[rstest]
fn given_blank_form_when_submitted_then_validation_error_and_forest_unchanged(
    mut editor: ColumnEditor,
) {
    let mut form = editor.open(FormAction::New).unwrap();
    form.column_type = None;

    let err = editor.submit(form).unwrap_err();

    assert_eq!(err.field_errors().len(), 2);
    assert!(matches!(err, ApplicationError::Validation(_)));
    assert_eq!(editor.forest(), &Forest::seeded());
}

// ============================================================
// New child
// ============================================================

#[rstest]
fn given_custom_column_when_child_added_then_nested_one_level_deeper(mut editor: ColumnEditor) {
    let parent = add_root(&mut editor, "Price");
    let child = add_child(&mut editor, &parent, "Unit");
    let grandchild = add_child(&mut editor, &child, "Currency");

    let parent_node = editor.column(&parent).unwrap();
    assert_eq!(parent_node.children.len(), 1);
    let child_node = editor.column(&child).unwrap();
    assert_eq!(child_node.level, 2);
    assert_eq!(child_node.parent_id, parent);
    let grandchild_node = editor.column(&grandchild).unwrap();
    assert_eq!(grandchild_node.level, 3);
    assert_eq!(grandchild_node.parent_id, child);
}

#[rstest]
#[case("code")]
#[case("name")]
#[case("remark")]
fn given_fixed_column_when_opening_child_form_then_refused(
    editor: ColumnEditor,
    #[case] id: &str,
) {
    let result = editor.open(FormAction::NewChild {
        parent_id: id.to_string(),
    });

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::FixedColumn(ref fixed))) if fixed == id
    ));
}

// ============================================================
// Edit
// ============================================================

#[rstest]
fn given_column_with_children_when_edited_then_children_kept(mut editor: ColumnEditor) {
    let parent = add_root(&mut editor, "Price");
    add_child(&mut editor, &parent, "Unit");

    let form = editor
        .open(FormAction::Edit { id: parent.clone() })
        .unwrap()
        .with_type(ColumnType::UserFill)
        .with_title("Cost");
    let edited = editor.submit(form).unwrap();

    assert_eq!(edited, parent);
    let node = editor.column(&parent).unwrap();
    assert_eq!(node.title.as_deref(), Some("Cost"));
    assert_eq!(node.column_type, ColumnType::UserFill);
    assert_eq!(node.level, 1);
    assert_eq!(node.children.len(), 1);
}

#[rstest]
fn given_fixed_column_when_edit_submitted_directly_then_refused(mut editor: ColumnEditor) {
    let form = coltree::application::ColumnForm::blank(
        FormAction::Edit { id: "code".into() },
        ColumnType::Customize,
    )
    .with_title("hacked");

    let result = editor.submit(form);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::FixedColumn(_)))
    ));
    assert_eq!(editor.forest(), &Forest::seeded());
}

#[rstest]
fn given_missing_column_when_editing_then_not_found(editor: ColumnEditor) {
    let result = editor.open(FormAction::Edit { id: "nope".into() });
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::ColumnNotFound(_)))
    ));
}

// ============================================================
// Delete
// ============================================================

#[rstest]
fn given_column_with_subtree_when_deleted_then_subtree_removed(mut editor: ColumnEditor) {
    let parent = add_root(&mut editor, "Price");
    let child = add_child(&mut editor, &parent, "Unit");
    let other = add_root(&mut editor, "Other");

    let removed = editor.delete(&parent).unwrap();

    assert_eq!(removed.id, parent);
    assert_eq!(removed.children.len(), 1);
    assert!(editor.column(&child).is_err());
    assert!(editor.column(&other).is_ok());
    assert_eq!(editor.forest().roots().last().unwrap().id, "remark");
}

#[rstest]
#[case("code")]
#[case("remark")]
fn given_fixed_column_when_deleted_then_refused(mut editor: ColumnEditor, #[case] id: &str) {
    assert!(editor.delete(id).is_err());
    assert_eq!(editor.forest(), &Forest::seeded());
}

#[rstest]
fn given_missing_column_when_deleted_then_not_found(mut editor: ColumnEditor) {
    let err = editor.delete("ghost").unwrap_err();
    assert_eq!(err.to_string(), "column not found: ghost");
}

// ============================================================
// End-to-end
// ============================================================

#[rstest]
fn given_seed_when_foo_added_and_deleted_then_seed_restored(mut editor: ColumnEditor) {
    let id = add_root(&mut editor, "Foo");
    let roots = editor.forest().roots();
    assert_eq!(roots.len(), 4);
    assert_eq!(roots[roots.len() - 2].title.as_deref(), Some("Foo"));

    editor.delete(&id).unwrap();

    assert_eq!(editor.forest(), &Forest::seeded());
}
