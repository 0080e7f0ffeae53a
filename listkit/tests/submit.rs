mod common;

use common::{Harness, row_ids};
use listkit::prelude::*;
use listkit::store::scope_key;

/// Mount the action dropdown and let it initialize.
fn mount_actions(h: &Harness) -> ElementDropdown {
    let mount = DropdownMount::mount(&h.page, "list-action", DropdownConfig::default(), None)
        .expect("action dropdown mounts");
    h.page.run_pending();
    mount.get().expect("dropdown initialized")
}

fn submit_disabled(h: &Harness) -> bool {
    h.page.element("list-action-submit").unwrap().disabled
}

// ============================================================================
// Submit Enabling
// ============================================================================

#[test]
fn test_submit_disabled_until_action_chosen() {
    let h = Harness::new("/items/", &row_ids(3), None);
    let _controller = h.attach();
    let _actions = mount_actions(&h);
    assert!(submit_disabled(&h));
    assert!(!h.page.click("list-action-submit"));

    h.page.click("list-action-item-1");
    assert!(!submit_disabled(&h));

    h.page.click("list-action-item-1");
    assert!(submit_disabled(&h));
}

#[test]
fn test_several_actions_block_submission() {
    let h = Harness::new("/items/", &row_ids(3), None);
    let _controller = h.attach();
    let actions = mount_actions(&h);

    h.page.click("cb-1");
    h.page.click("list-action-item-1");
    h.page.click("list-action-item-0");
    assert_eq!(actions.value(), vec!["/items/archive/", "/items/delete/"]);
    assert!(submit_disabled(&h));

    // Submitting anyway must not pick one of the actions
    let submission = h.page.submit("list-action-form").unwrap();
    assert_eq!(submission.action, None);
    assert_eq!(submission.values("pk"), vec!["1"]);
    assert_eq!(h.page.location(), "/items/");

    h.page.click("list-action-item-0");
    assert!(!submit_disabled(&h));
    let submission = h.page.submit("list-action-form").unwrap();
    assert_eq!(submission.action.as_deref(), Some("/items/delete/"));
    assert_eq!(h.page.location(), "/items/delete/");
}

// ============================================================================
// Submission Payload
// ============================================================================

#[test]
fn test_submit_partial_selection_sends_ids() {
    let h = Harness::new("/items/", &row_ids(6), Some(60));
    let _controller = h.attach();
    let _actions = mount_actions(&h);

    h.page.click("cb-5");
    h.page.click("cb-2");
    h.page.click("list-action-item-0");

    let submission = h.page.submit("list-action-form").unwrap();
    assert_eq!(submission.values("pk"), vec!["2", "5"]);
    assert!(submission.values("select_all").is_empty());
    assert_eq!(submission.action.as_deref(), Some("/items/archive/"));
    assert_eq!(h.page.location(), "/items/archive/");
    let history = h.page.read(|doc| doc.history().to_vec()).unwrap();
    assert_eq!(history, vec!["/items/", "/items/archive/"]);
}

#[test]
fn test_submit_all_matching_sends_flag_only() {
    let h = Harness::new("/items/", &row_ids(25), Some(437));
    let _controller = h.attach();
    let _actions = mount_actions(&h);

    h.page.click("list-select-all");
    h.page.click("list-action-item-1");

    let submission = h.page.submit("list-action-form").unwrap();
    assert_eq!(submission.values("select_all"), vec!["1"]);
    assert!(submission.values("pk").is_empty());
    assert_eq!(submission.action.as_deref(), Some("/items/delete/"));
}

#[test]
fn test_submit_includes_ids_from_other_pages() {
    let h = Harness::new("/items/?page=2", &row_ids(3), Some(30));
    h.store
        .put(&scope_key("listkit_selection", "/items/"), r#"["21","22"]"#)
        .unwrap();
    let _controller = h.attach();
    let _actions = mount_actions(&h);

    h.page.click("cb-1");
    h.page.click("list-action-item-0");

    let submission = h.page.submit("list-action-form").unwrap();
    assert_eq!(submission.values("pk"), vec!["1", "21", "22"]);
}

#[test]
fn test_resubmit_replaces_injected_fields() {
    let h = Harness::new("/items/", &row_ids(4), None);
    let _controller = h.attach();
    let _actions = mount_actions(&h);

    h.page.click("cb-1");
    h.page.click("cb-2");
    h.page.click("list-action-item-0");
    h.page.submit("list-action-form").unwrap();

    h.page.click("cb-2");
    let submission = h.page.submit("list-action-form").unwrap();
    assert_eq!(submission.values("pk"), vec!["1"]);

    let submitted = h.page.read(|doc| doc.submissions().len()).unwrap();
    assert_eq!(submitted, 2);
}

#[test]
fn test_submit_without_action_keeps_location() {
    let h = Harness::new("/items/", &row_ids(2), None);
    let _controller = h.attach();

    h.page.click("cb-1");
    let submission = h.page.submit("list-action-form").unwrap();
    assert_eq!(submission.values("pk"), vec!["1"]);
    assert_eq!(submission.action, None);
    assert_eq!(h.page.location(), "/items/");
}

#[test]
fn test_submit_with_empty_selection() {
    let h = Harness::new("/items/", &row_ids(2), None);
    let _controller = h.attach();
    let _actions = mount_actions(&h);
    h.page.click("list-action-item-0");

    let submission = h.page.submit("list-action-form").unwrap();
    assert!(submission.fields.is_empty());
    assert_eq!(submission.action.as_deref(), Some("/items/archive/"));
}
