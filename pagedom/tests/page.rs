use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pagedom::element::{ancestor_ids, closest, collect, is_within};
use pagedom::{Element, Event, EventKind, Page};

fn sample_page() -> Page {
    let root = Element::box_()
        .id("root")
        .child(
            Element::box_()
                .id("list")
                .child(
                    Element::box_()
                        .id("row-1")
                        .class("row")
                        .child(Element::checkbox().id("cb-1").data("row-id", "1")),
                )
                .child(
                    Element::box_()
                        .id("row-2")
                        .class("row")
                        .child(Element::checkbox().id("cb-2").data("row-id", "2")),
                ),
        )
        .child(
            Element::form()
                .id("form")
                .child(Element::hidden_input("token", "abc"))
                .child(Element::input("note").id("note"))
                .child(Element::button("Go").id("go")),
        );
    Page::from_root(root, "/items/")
}

// ============================================================================
// Tree Queries
// ============================================================================

#[test]
fn test_ancestor_ids_target_first() {
    let page = sample_page();
    let chain = page
        .read(|doc| ancestor_ids(&doc.root, "cb-2"))
        .flatten()
        .unwrap();
    assert_eq!(chain, vec!["cb-2", "row-2", "list", "root"]);
}

#[test]
fn test_ancestor_ids_missing() {
    let page = sample_page();
    assert_eq!(page.read(|doc| ancestor_ids(&doc.root, "nope")).flatten(), None);
}

#[test]
fn test_closest_and_collect() {
    let page = sample_page();
    page.read(|doc| {
        let row = closest(&doc.root, "cb-1", |el| el.has_class("row")).unwrap();
        assert_eq!(row.id, "row-1");

        let boxes = collect(&doc.root, &|el: &Element| el.get_data("row-id").is_some());
        let ids: Vec<_> = boxes.iter().map(|el| el.id.as_str()).collect();
        assert_eq!(ids, vec!["cb-1", "cb-2"]);

        assert!(is_within(&doc.root, "list", "cb-1"));
        assert!(!is_within(&doc.root, "form", "cb-1"));
    });
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_click_bubbles_to_ancestors() {
    let page = sample_page();
    let seen = Arc::new(Mutex::new(Vec::new()));

    for id in ["cb-1", "row-1", "list", "form"] {
        let seen = Arc::clone(&seen);
        page.add_listener(id, EventKind::Click, move |_, _| {
            seen.lock().unwrap().push(id);
        });
    }

    assert!(page.click("cb-1"));
    assert_eq!(*seen.lock().unwrap(), vec!["cb-1", "row-1", "list"]);
}

#[test]
fn test_click_flips_checkbox_before_listeners() {
    let page = sample_page();
    page.write(|doc| doc.element_mut("cb-1").unwrap().indeterminate = true);

    let observed = Arc::new(Mutex::new(None));
    let observed_clone = Arc::clone(&observed);
    page.add_listener("list", EventKind::Click, move |page, event| {
        let el = page.element(event.target()).unwrap();
        *observed_clone.lock().unwrap() = Some((el.checked, el.indeterminate));
    });

    page.click("cb-1");
    assert_eq!(*observed.lock().unwrap(), Some((true, false)));

    page.click("cb-1");
    assert_eq!(*observed.lock().unwrap(), Some((false, false)));
}

#[test]
fn test_click_disabled_is_ignored() {
    let page = sample_page();
    page.write(|doc| doc.element_mut("go").unwrap().disabled = true);

    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = Arc::clone(&count);
    page.add_listener("form", EventKind::Click, move |_, _| {
        count_clone.fetch_add(1, Ordering::SeqCst);
    });

    assert!(!page.click("go"));
    assert!(!page.click("missing"));
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_listener_only_sees_its_kind() {
    let page = sample_page();
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = Arc::clone(&count);
    page.add_listener("root", EventKind::Change, move |_, _| {
        count_clone.fetch_add(1, Ordering::SeqCst);
    });

    page.click("cb-1");
    assert_eq!(count.load(Ordering::SeqCst), 0);

    let invoked = page.dispatch(Event::Change {
        target: "note".into(),
        indices: vec![0],
        values: vec!["x".into()],
    });
    assert_eq!(invoked, 1);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_remove_listener() {
    let page = sample_page();
    let id = page.add_listener("list", EventKind::Click, |_, _| {});
    assert_eq!(page.listener_count(), 1);
    assert!(page.remove_listener(id));
    assert!(!page.remove_listener(id));
    assert_eq!(page.listener_count(), 0);
}

#[test]
fn test_listener_may_mutate_document() {
    let page = sample_page();
    page.add_listener("list", EventKind::Click, |page, event| {
        let target = event.target().to_string();
        page.write(|doc| {
            if let Some(row) = doc.element_mut("row-1") {
                row.toggle_class("clicked", true);
            }
            if let Some(el) = doc.element_mut(&target) {
                el.set_attr("seen", "yes");
            }
        });
    });

    page.click("cb-1");
    assert!(page.element("row-1").unwrap().has_class("clicked"));
    assert_eq!(
        page.element("cb-1").unwrap().get_attr("seen").map(String::as_str),
        Some("yes")
    );
}

// ============================================================================
// Forms & History
// ============================================================================

#[test]
fn test_submit_collects_named_inputs() {
    let page = sample_page();
    page.add_listener("form", EventKind::Submit, |page, _| {
        page.write(|doc| {
            let form = doc.element_mut("form").unwrap();
            form.action = Some("/items/archive/".into());
            form.push_child(Element::hidden_input("pk", "7"));
            form.push_child(Element::hidden_input("pk", "3"));
        });
    });

    let submission = page.submit("form").unwrap();
    assert_eq!(submission.action.as_deref(), Some("/items/archive/"));
    assert_eq!(submission.values("pk"), vec!["7", "3"]);
    assert_eq!(submission.values("token"), vec!["abc"]);
    // Inputs without a value are not sent
    assert!(submission.values("note").is_empty());
    assert_eq!(page.read(|doc| doc.submissions().len()), Some(1));
}

#[test]
fn test_submit_requires_form() {
    let page = sample_page();
    assert!(page.submit("list").is_none());
}

#[test]
fn test_push_state_and_replace() {
    let page = sample_page();
    page.write(|doc| doc.push_state("/items/archive/"));
    assert_eq!(page.location(), "/items/archive/");
    assert_eq!(
        page.read(|doc| doc.history().to_vec()).unwrap(),
        vec!["/items/", "/items/archive/"]
    );

    let replaced = page
        .write(|doc| doc.replace_element("list", Element::box_().id("list")))
        .unwrap();
    assert!(replaced);
    assert!(page.element("cb-1").is_none());
}

// ============================================================================
// Deferred Tasks
// ============================================================================

#[test]
fn test_deferred_tasks_run_on_next_tick() {
    let page = sample_page();
    let ran = Arc::new(AtomicUsize::new(0));

    let ran_clone = Arc::clone(&ran);
    page.defer(move |page| {
        ran_clone.fetch_add(1, Ordering::SeqCst);
        let ran_inner = Arc::clone(&ran_clone);
        page.defer(move |_| {
            ran_inner.fetch_add(10, Ordering::SeqCst);
        });
    });

    assert_eq!(ran.load(Ordering::SeqCst), 0);
    assert_eq!(page.run_pending(), 1);
    assert_eq!(ran.load(Ordering::SeqCst), 1);
    assert_eq!(page.pending_tasks(), 1);
    assert_eq!(page.run_pending(), 1);
    assert_eq!(ran.load(Ordering::SeqCst), 11);
}
