//! Descriptor Collector
//!
//! Walks a control class chain, gathers one descriptor per distinct level and
//! validates id uniqueness. Leaf ids are claimed process-wide; a class is
//! validated once and never re-checked.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::{ClassId, ControlClass, Descriptor, DescriptorError};

/// Claimed leaf ids and validated classes
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    /// Leaf id -> class that declares that descriptor
    claimed: HashMap<String, (ClassId, String)>,
    validated: HashSet<ClassId>,
}

static GLOBAL: OnceLock<Mutex<DescriptorRegistry>> = OnceLock::new();

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by [`get_descriptors`] and `Control::new`
    pub fn global() -> MutexGuard<'static, DescriptorRegistry> {
        GLOBAL
            .get_or_init(|| Mutex::new(DescriptorRegistry::new()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Forget every claim and validation
    pub fn reset(&mut self) {
        self.claimed.clear();
        self.validated.clear();
    }

    pub fn is_validated(&self, class: &ControlClass) -> bool {
        self.validated.contains(&class.id())
    }

    /// Name of the class that claimed `id`, if any
    pub fn claimant(&self, id: &str) -> Option<&str> {
        self.claimed.get(id).map(|(_, name)| name.as_str())
    }

    /// Collect the descriptor chain of `class`, base first.
    ///
    /// Levels that inherit their parent's descriptor are skipped. The root
    /// class is never included.
    pub fn collect(&mut self, class: &ControlClass) -> Result<Vec<Rc<Descriptor>>, DescriptorError> {
        let mut chain: Vec<Rc<Descriptor>> = Vec::new();
        let mut level = Some(class);

        while let Some(current) = level {
            if current.is_root() {
                break;
            }
            let descriptor = current
                .descriptor()
                .ok_or_else(|| DescriptorError::MissingDescriptor {
                    class: current.name().to_string(),
                })?;
            if !chain.last().is_some_and(|last| Rc::ptr_eq(last, &descriptor)) {
                chain.push(descriptor);
            }
            level = current.parent().map(Rc::as_ref);
        }
        chain.reverse();

        if !self.validated.contains(&class.id()) {
            self.validate(class, &chain)?;
            self.validated.insert(class.id());
            tracing::debug!(
                "Validated {} ({} descriptors)",
                class.name(),
                chain.len()
            );
        }

        tracing::trace!("Collected {} descriptors for {}", chain.len(), class.name());
        Ok(chain)
    }

    fn validate(&mut self, class: &ControlClass, chain: &[Rc<Descriptor>]) -> Result<(), DescriptorError> {
        let mut seen = HashSet::new();
        for descriptor in chain {
            if !seen.insert(descriptor.id.as_str()) {
                return Err(DescriptorError::DuplicateDescriptorId {
                    id: descriptor.id.clone(),
                    class: class.name().to_string(),
                });
            }
        }

        let Some(leaf) = chain.last() else {
            return Ok(());
        };
        let owner = declaring_class(class);

        match self.claimed.get(&leaf.id) {
            Some((claimed_by, name)) if *claimed_by != owner.id() => {
                Err(DescriptorError::DuplicateControlId {
                    id: leaf.id.clone(),
                    class: class.name().to_string(),
                    claimed_by: name.clone(),
                })
            }
            Some(_) => Ok(()),
            None => {
                self.claimed
                    .insert(leaf.id.clone(), (owner.id(), owner.name().to_string()));
                Ok(())
            }
        }
    }
}

/// The nearest level, starting at `class`, that declares its own descriptor
fn declaring_class(class: &ControlClass) -> &ControlClass {
    let mut level = class;
    while level.own_descriptor().is_none() {
        match level.parent() {
            Some(parent) => level = parent,
            None => break,
        }
    }
    level
}

/// Collect the descriptor chain of `class` against the global registry
pub fn get_descriptors(class: &ControlClass) -> Result<Vec<Rc<Descriptor>>, DescriptorError> {
    DescriptorRegistry::global().collect(class)
}
