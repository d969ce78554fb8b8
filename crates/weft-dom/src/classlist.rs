//! Element class list

use std::fmt;

/// Ordered, duplicate-free set of class names.
///
/// Controls add their descriptor classes and the style scope class here;
/// the element's `class` attribute is rendered from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    names: Vec<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a `class` attribute value on whitespace
    pub fn parse(value: &str) -> Self {
        value.split_whitespace().fold(Self::new(), |mut list, name| {
            list.add(name);
            list
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Append `name` unless it is empty or already present
    pub fn add(&mut self, name: &str) {
        if name.is_empty() || self.contains(name) {
            return;
        }
        self.names.push(name.to_owned());
    }

    /// Returns whether `name` was present
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.names.remove(index);
                true
            }
            None => false,
        }
    }

    /// Flip `name`, or pin it with `force`. Returns whether it ends up present.
    pub fn toggle(&mut self, name: &str, force: Option<bool>) -> bool {
        let keep = force.unwrap_or_else(|| !self.contains(name));
        if keep {
            self.add(name);
        } else {
            self.remove(name);
        }
        keep
    }

    /// The `class` attribute text
    pub fn value(&self) -> String {
        self.names.join(" ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}
