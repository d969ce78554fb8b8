//! Element attributes other than `class`

/// One `name="value"` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

/// Attributes in the order they were first set.
///
/// Control elements carry a handful of reflected props at most, so lookups
/// scan the list.
#[derive(Debug, Clone, Default)]
pub struct AttributeMap {
    entries: Vec<Attr>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name).map(|attr| attr.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Overwrite in place or append. Returns the replaced value.
    pub fn set(&mut self, name: &str, value: &str) -> Option<String> {
        match self.entries.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => Some(std::mem::replace(&mut attr.value, value.to_owned())),
            None => {
                self.entries.push(Attr {
                    name: name.to_owned(),
                    value: value.to_owned(),
                });
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Attr> {
        let index = self.entries.iter().position(|attr| attr.name == name)?;
        Some(self.entries.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.entries.iter()
    }

    fn find(&self, name: &str) -> Option<&Attr> {
        self.entries.iter().find(|attr| attr.name == name)
    }
}
