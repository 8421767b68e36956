mod content;
mod node;

pub use content::Content;
pub use node::Element;

/// Find an element by ID in the tree, descending into shadow trees.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    if let Content::Children(children) = &root.content {
        for child in children {
            if let Some(found) = find_element(child, id) {
                return Some(found);
            }
        }
    }

    root.shadow
        .as_deref()
        .and_then(|shadow| find_element(shadow, id))
}

/// Find an element by ID and return a mutable reference to it.
pub(crate) fn find_element_mut<'a>(root: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if root.id == id {
        return Some(root);
    }

    if let Content::Children(children) = &mut root.content {
        for child in children.iter_mut() {
            if let Some(found) = find_element_mut(child, id) {
                return Some(found);
            }
        }
    }

    match root.shadow.as_deref_mut() {
        Some(shadow) => find_element_mut(shadow, id),
        None => None,
    }
}
