mod content;
mod node;

pub use content::Content;
pub use node::{Element, Kind};

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    for child in root.child_elements() {
        if let Some(found) = find_element(child, id) {
            return Some(found);
        }
    }

    None
}

/// Find an element by ID in the tree, mutably.
pub fn find_element_mut<'a>(root: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if root.id == id {
        return Some(root);
    }

    for child in root.child_elements_mut() {
        if let Some(found) = find_element_mut(child, id) {
            return Some(found);
        }
    }

    None
}

/// IDs from `id` up to the root, target first.
///
/// Returns None if `id` is not in the tree.
pub fn ancestor_ids(root: &Element, id: &str) -> Option<Vec<String>> {
    fn walk(el: &Element, id: &str, path: &mut Vec<String>) -> bool {
        path.push(el.id.clone());
        if el.id == id {
            return true;
        }
        for child in el.child_elements() {
            if walk(child, id, path) {
                return true;
            }
        }
        path.pop();
        false
    }

    let mut path = Vec::new();
    if walk(root, id, &mut path) {
        path.reverse();
        Some(path)
    } else {
        None
    }
}

/// Nearest element, starting at `id` itself and walking up, that matches the predicate.
pub fn closest<'a>(
    root: &'a Element,
    id: &str,
    pred: impl Fn(&Element) -> bool,
) -> Option<&'a Element> {
    ancestor_ids(root, id)?
        .iter()
        .filter_map(|ancestor| find_element(root, ancestor))
        .find(|el| pred(el))
}

/// All elements in the subtree that match the predicate, in document order.
pub fn collect<'a>(root: &'a Element, pred: &impl Fn(&Element) -> bool) -> Vec<&'a Element> {
    let mut out = Vec::new();
    collect_into(root, pred, &mut out);
    out
}

fn collect_into<'a>(el: &'a Element, pred: &impl Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
    if pred(el) {
        out.push(el);
    }
    for child in el.child_elements() {
        collect_into(child, pred, out);
    }
}

/// Whether `id` is `ancestor_id` or one of its descendants.
pub fn is_within(root: &Element, ancestor_id: &str, id: &str) -> bool {
    ancestor_ids(root, id).is_some_and(|chain| chain.iter().any(|a| a == ancestor_id))
}
