//! Writer configuration.

use crate::util::Endianness;

/// Options for [`VtkFile`](super::VtkFile).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriterOptions {
    /// Byte order of the appended section (native unless overridden).
    pub byte_order: Endianness,
    /// Start the file with `<?xml version="1.0"?>`.
    pub declaration: bool,
    /// Check at save time that appended blocks match the declared arrays.
    pub verify_ledger: bool,
    /// Add a comment naming the writer library after the root element.
    pub generator_comment: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            byte_order: Endianness::native(),
            declaration: true,
            verify_ledger: true,
            generator_comment: false,
        }
    }
}

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn byte_order(mut self, order: Endianness) -> Self {
        self.byte_order = order;
        self
    }

    pub fn declaration(mut self, enabled: bool) -> Self {
        self.declaration = enabled;
        self
    }

    pub fn verify_ledger(mut self, enabled: bool) -> Self {
        self.verify_ledger = enabled;
        self
    }

    pub fn generator_comment(mut self, enabled: bool) -> Self {
        self.generator_comment = enabled;
        self
    }
}
