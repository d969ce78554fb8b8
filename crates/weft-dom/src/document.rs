//! The document controls mount into

use crate::{ClassList, DomTree, NodeId};

/// A tree that always has `<html>` with a `<head>` and a `<body>`
#[derive(Debug)]
pub struct Document {
    pub tree: DomTree,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let [html, head, body] = ["html", "head", "body"].map(|tag| tree.create_element(tag));
        let root = tree.root();
        for (parent, child) in [(root, html), (html, head), (html, body)] {
            tree.append_child(parent, child);
        }

        Self {
            tree,
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.tree.create_text(text)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.tree.append_child(parent, child);
    }

    /// Detach a node from wherever it is attached
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.tree.detach(id)
    }

    /// Detach `child` if it is currently a child of `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.tree.parent(child) != Some(parent) {
            return false;
        }
        self.tree.detach(child)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent(id)
    }

    /// All child ids, including text and comments
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.children(id).map(|(id, _)| id).collect()
    }

    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.is_connected(id)
    }

    /// Tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.get(id)?.as_element().map(|e| e.tag.as_str())
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.tree.get(id)?.as_element()?.get_attribute(name)
    }

    /// Set an attribute, returning the previous value
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Option<String> {
        self.tree.get_mut(id)?.as_element_mut()?.set_attribute(name, value)
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.tree.get_mut(id)?.as_element_mut()?.remove_attribute(name)
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.tree
            .get(id)
            .and_then(|n| n.as_element())
            .is_some_and(|e| e.has_attribute(name))
    }

    pub fn class_list(&self, id: NodeId) -> Option<&ClassList> {
        self.tree.get(id)?.as_element().map(|e| &e.classes)
    }

    pub fn class_list_mut(&mut self, id: NodeId) -> Option<&mut ClassList> {
        self.tree.get_mut(id)?.as_element_mut().map(|e| &mut e.classes)
    }

    /// Direct element children of a node
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(id, _)| id)
            .collect()
    }

    /// Find the first element in document order with the given tag
    pub fn find_by_tag(&self, start: NodeId, tag: &str) -> Option<NodeId> {
        for (id, node) in self.tree.children(start) {
            if node.as_element().is_some_and(|e| e.tag == tag) {
                return Some(id);
            }
            if let Some(found) = self.find_by_tag(id, tag) {
                return Some(found);
            }
        }
        None
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
