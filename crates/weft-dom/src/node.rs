//! Arena nodes
//!
//! Links between nodes are `NodeId`s into the owning [`DomTree`](crate::DomTree).
//! `NodeId::NONE` marks a missing link.

use crate::{AttributeMap, ClassList, NodeId};

#[derive(Debug)]
pub struct Node {
    pub parent: NodeId,
    pub first_child: NodeId,
    /// Kept so appends don't walk the sibling chain
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
    pub data: NodeData,
}

#[derive(Debug)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(String),
    Comment(String),
}

impl From<NodeData> for Node {
    fn from(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }
}

impl Node {
    pub fn document() -> Self {
        NodeData::Document.into()
    }

    pub fn element(tag: &str) -> Self {
        NodeData::Element(ElementData::new(tag)).into()
    }

    pub fn text(content: &str) -> Self {
        NodeData::Text(content.to_owned()).into()
    }

    pub fn comment(content: &str) -> Self {
        NodeData::Comment(content.to_owned()).into()
    }

    pub fn is_element(&self) -> bool {
        self.as_element().is_some()
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        if let NodeData::Element(element) = &self.data {
            Some(element)
        } else {
            None
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        if let NodeData::Element(element) = &mut self.data {
            Some(element)
        } else {
            None
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        if let NodeData::Text(text) = &self.data {
            Some(text)
        } else {
            None
        }
    }
}

/// An element's tag and attributes.
///
/// `class` is never stored in `attrs`: reads and writes of that name go
/// through `classes`, so the class list and the attribute can't disagree.
#[derive(Debug)]
pub struct ElementData {
    /// Always lowercase
    pub tag: String,
    pub attrs: AttributeMap,
    pub classes: ClassList,
}

const CLASS: &str = "class";

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: AttributeMap::new(),
            classes: ClassList::new(),
        }
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        match name {
            CLASS if self.classes.is_empty() => None,
            CLASS => Some(self.classes.to_string()),
            _ => self.attrs.get(name).map(str::to_owned),
        }
    }

    /// Returns the previous value
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Option<String> {
        if name != CLASS {
            return self.attrs.set(name, value);
        }
        let previous = self.get_attribute(CLASS);
        self.classes = ClassList::parse(value);
        previous
    }

    /// Returns the previous value
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        if name != CLASS {
            return self.attrs.remove(name).map(|attr| attr.value);
        }
        let previous = self.get_attribute(CLASS);
        self.classes = ClassList::new();
        previous
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        match name {
            CLASS => !self.classes.is_empty(),
            _ => self.attrs.contains(name),
        }
    }
}
