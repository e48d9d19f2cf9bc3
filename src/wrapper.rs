//! Fire-and-forget entry points. Failures go to the configured [`Reporter`]
//! and are not returned.

use crate::registry::Registry;
use crate::report::Reporter;
use crate::value::{Payload, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Wrapper {
    pub registry: Registry,
    pub reporter: Reporter,
}

impl Wrapper {
    #[must_use]
    pub const fn new(registry: Registry, reporter: Reporter) -> Self {
        Self { registry, reporter }
    }

    /// Write a text or integer value, creating the key chain as needed.
    pub fn reg_write<P: Payload + ?Sized>(&self, path: &str, name: &str, value: &P, vtype: ValueType) {
        if let Err(e) = self.registry.write_value(path, name, value, vtype) {
            self.reporter.report(&e);
        }
    }

    /// Delete a leaf key.
    pub fn reg_del(&self, path: &str) {
        if let Err(e) = self.registry.delete_key(path) {
            self.reporter.report(&e);
        }
    }

    /// Delete one value inside a key.
    pub fn reg_del_value(&self, path: &str, name: &str) {
        if let Err(e) = self.registry.delete_value(path, name) {
            self.reporter.report(&e);
        }
    }
}
