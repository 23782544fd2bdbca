//! In-memory document body.

use std::collections::BTreeMap;

use crate::domain::ports::DocumentBody;

/// [`DocumentBody`] backed by an attribute map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryDocumentBody {
    attributes: BTreeMap<String, String>,
}

impl InMemoryDocumentBody {
    /// Attributes currently set, in name order.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}

impl DocumentBody for InMemoryDocumentBody {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_owned(), value.to_owned());
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }
}
