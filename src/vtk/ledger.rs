//! Offset ledger for the appended data section.
//!
//! Every `DataArray` header carries the offset its block will have inside the
//! appended section. The ledger hands out those offsets while the header is
//! written and later checks that the appended blocks arrive in the same order
//! with the same sizes.

use super::constants::BLOCK_HEADER_SIZE;
use crate::util::{Error, Result};

/// A data array recorded in the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeclaredBlock {
    pub name: String,
    /// Offset written into the header.
    pub offset: u64,
    /// Payload size without the block prefix.
    pub byte_len: u64,
}

/// Running offset counter plus the declared/appended bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct OffsetLedger {
    offset: u64,
    declared: Vec<DeclaredBlock>,
    appended: usize,
    appended_bytes: u64,
    first_mismatch: Option<String>,
}

impl OffsetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset the next declaration will receive.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Record a declaration and return its offset.
    ///
    /// Fails without recording anything if the appended section would exceed
    /// `u64::MAX` bytes.
    pub fn declare(&mut self, name: &str, byte_len: u64) -> Result<u64> {
        let offset = self.offset;
        let next = byte_len
            .checked_add(BLOCK_HEADER_SIZE)
            .and_then(|block| offset.checked_add(block))
            .ok_or_else(|| {
                Error::InvalidShape(format!(
                    "array {name:?} of {byte_len} bytes at offset {offset} overflows the appended section"
                ))
            })?;
        self.declared.push(DeclaredBlock { name: name.to_string(), offset, byte_len });
        self.offset = next;
        Ok(offset)
    }

    /// Record an appended block of `byte_len` payload bytes.
    pub fn record_append(&mut self, byte_len: u64) {
        if self.first_mismatch.is_none() {
            match self.declared.get(self.appended) {
                Some(block) if block.byte_len != byte_len => {
                    self.first_mismatch = Some(format!(
                        "block {} ({:?}) declared {} bytes, appended {}",
                        self.appended, block.name, block.byte_len, byte_len
                    ));
                }
                None => {
                    self.first_mismatch =
                        Some(format!("block {} appended without a declaration", self.appended));
                }
                Some(_) => {}
            }
        }
        self.appended += 1;
        self.appended_bytes = self.appended_bytes.saturating_add(byte_len.saturating_add(BLOCK_HEADER_SIZE));
    }

    /// Declarations in header order.
    pub fn declared(&self) -> &[DeclaredBlock] {
        &self.declared
    }

    /// Number of blocks appended so far.
    #[inline]
    pub fn appended(&self) -> usize {
        self.appended
    }

    /// Declared blocks not yet appended.
    #[inline]
    pub fn pending(&self) -> usize {
        self.declared.len().saturating_sub(self.appended)
    }

    /// Total size of the appended section the header promises.
    #[inline]
    pub fn declared_bytes(&self) -> u64 {
        self.offset
    }

    /// Total size of the blocks appended so far.
    #[inline]
    pub fn appended_bytes(&self) -> u64 {
        self.appended_bytes
    }

    /// Check that every declared block was appended, in order, with its size.
    pub fn verify(&self) -> Result<()> {
        if self.first_mismatch.is_none()
            && self.appended == self.declared.len()
            && self.appended_bytes == self.offset
        {
            return Ok(());
        }
        Err(Error::LedgerMismatch {
            declared: self.declared.len(),
            appended: self.appended,
            declared_bytes: self.offset,
            appended_bytes: self.appended_bytes,
            detail: self.first_mismatch.clone(),
        })
    }
}
