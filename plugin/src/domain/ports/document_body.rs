//! Driven port for the host document body.
//!
//! The theme layer mirrors the resolved colour scheme onto `data-*`
//! attributes of the body element. Hosts implement this over their DOM; tests
//! and the dev harness use an in-memory body.

/// Attribute access on the document body element.
pub trait DocumentBody {
    /// Current value of `name`, if set.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Set `name` to `value`.
    fn set_attribute(&mut self, name: &str, value: &str);

    /// Remove `name`.
    fn remove_attribute(&mut self, name: &str);
}
