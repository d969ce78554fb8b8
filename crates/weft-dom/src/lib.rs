//! Weft DOM
//!
//! Arena-backed document tree that controls render into, plus the
//! custom element registry and the per-instance event listener registry.

mod attributes;
mod classlist;
mod custom_elements;
mod document;
mod dom_events;
mod node;
mod tree;

use std::cell::RefCell;
use std::rc::Rc;

pub use attributes::{Attr, AttributeMap};
pub use classlist::ClassList;
pub use custom_elements::{
    CustomElementDefinition, CustomElementError, CustomElementOptions, CustomElementRegistry,
    LifecycleCallback, LifecycleCallbackInfo,
};
pub use document::Document;
pub use dom_events::{Event, EventHandler, EventRegistry, ListenerId};
pub use node::{ElementData, Node, NodeData};
pub use tree::{Children, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this id points at a node
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NONE
    }

    /// Raw arena index
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Shared handle to the single document of a UI thread.
///
/// Everything in Weft runs on one thread, so the document is shared through
/// `Rc<RefCell<_>>`. Borrows must never be held across listener dispatch.
pub type DocumentHandle = Rc<RefCell<Document>>;

/// Create a fresh document behind a shared handle
pub fn new_document() -> DocumentHandle {
    Rc::new(RefCell::new(Document::new()))
}
