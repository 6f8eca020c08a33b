//! Output stream shared by the markup and binary writers.
//!
//! Both phases write through the same stream so the running position always
//! reflects every byte in the file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::util::Result;

/// Output stream for writing VTK files.
pub struct OStream<W: Write> {
    writer: W,
    pos: u64,
}

impl OStream<BufWriter<File>> {
    /// Create a new output stream for the given file path.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Ok(Self::new(BufWriter::with_capacity(2 * 1024 * 1024, file))) // 2MB buffer
    }
}

impl<W: Write> OStream<W> {
    /// Wrap an arbitrary sink.
    pub fn new(writer: W) -> Self {
        Self { writer, pos: 0 }
    }

    /// Get the current write position.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.pos
    }

    /// Write bytes and advance position.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.pos += data.len() as u64;
        Ok(())
    }

    /// Write a string as raw bytes.
    #[inline]
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Run a write that bypasses the position counter and account for
    /// `len` bytes afterwards.
    pub(crate) fn write_counted<F>(&mut self, len: u64, f: F) -> Result<()>
    where
        F: FnOnce(&mut W) -> Result<()>,
    {
        f(&mut self.writer)?;
        self.pos += len;
        Ok(())
    }

    /// Flush and return the underlying sink.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Endianness;

    #[test]
    fn test_position_tracking() {
        let mut s = OStream::new(Vec::new());
        s.write_str("<a>").unwrap();
        s.write_counted(8, |w| Ok(Endianness::Little.write_u64(w, 24)?)).unwrap();
        assert_eq!(s.pos(), 11);
        let bytes = s.into_inner().unwrap();
        assert_eq!(&bytes[..3], b"<a>");
        assert_eq!(&bytes[3..], &24u64.to_le_bytes());
    }
}
