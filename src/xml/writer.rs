//! Streaming XML element writer.
//!
//! Elements are written as soon as they are opened; the writer only keeps the
//! stack of open tag names and whether the current start tag is still open
//! (i.e. `>` has not been written yet).

use std::fmt::Display;
use std::io::Write;

use quick_xml::escape::escape;
use smallvec::SmallVec;

use super::stream::OStream;
use crate::util::{Error, Result};

/// Well-formed XML writer over an [`OStream`].
pub struct XmlWriter<W: Write> {
    stream: OStream<W>,
    stack: SmallVec<[String; 8]>,
    open_tag: bool,
}

impl<W: Write> XmlWriter<W> {
    /// Create a writer, optionally starting with `<?xml version="1.0"?>`.
    pub fn new(stream: OStream<W>, declaration: bool) -> Result<Self> {
        let mut xml = Self { stream, stack: SmallVec::new(), open_tag: false };
        if declaration {
            xml.stream.write_str(r#"<?xml version="1.0"?>"#)?;
        }
        Ok(xml)
    }

    /// Names of the currently open elements, outermost first.
    pub fn open_elements(&self) -> &[String] {
        &self.stack
    }

    /// Innermost open element.
    pub fn current(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    /// Bytes written so far.
    #[inline]
    pub fn pos(&self) -> u64 {
        self.stream.pos()
    }

    fn finish_start_tag(&mut self) -> Result<()> {
        if self.open_tag {
            self.stream.write_str(">")?;
            self.open_tag = false;
        }
        Ok(())
    }

    /// Open a new element. Attributes may follow until content is written.
    pub fn open_element(&mut self, tag: &str) -> Result<&mut Self> {
        self.finish_start_tag()?;
        self.stream.write_str("\n<")?;
        self.stream.write_str(tag)?;
        self.open_tag = true;
        self.stack.push(tag.to_string());
        Ok(self)
    }

    /// Attach an attribute to the element opened last.
    pub fn add_attribute(&mut self, key: &str, value: impl Display) -> Result<&mut Self> {
        if !self.open_tag {
            return Err(Error::protocol(format!(
                "attribute {key:?} must directly follow an opening tag"
            )));
        }
        let value = value.to_string();
        self.stream.write_str(" ")?;
        self.stream.write_str(key)?;
        self.stream.write_str("=\"")?;
        self.stream.write_str(&escape(value.as_str()))?;
        self.stream.write_str("\"")?;
        Ok(self)
    }

    /// Attach several attributes in order.
    pub fn add_attributes<K, V>(&mut self, attrs: impl IntoIterator<Item = (K, V)>) -> Result<&mut Self>
    where
        K: AsRef<str>,
        V: Display,
    {
        for (k, v) in attrs {
            self.add_attribute(k.as_ref(), v)?;
        }
        Ok(self)
    }

    /// Close the start tag and write raw text content.
    pub fn add_text(&mut self, text: &str) -> Result<&mut Self> {
        if self.open_tag {
            self.stream.write_str(">\n")?;
            self.open_tag = false;
        }
        self.stream.write_str(text)?;
        Ok(self)
    }

    /// Write `<!-- text -->` between elements.
    pub fn add_comment(&mut self, text: &str) -> Result<&mut Self> {
        if text.contains("--") || text.ends_with('-') {
            return Err(Error::InvalidComment(text.to_string()));
        }
        self.finish_start_tag()?;
        self.stream.write_str("\n<!-- ")?;
        self.stream.write_str(text)?;
        self.stream.write_str(" -->")?;
        Ok(self)
    }

    /// Close the innermost element, which must be `tag`.
    ///
    /// Nothing is written when the names differ.
    pub fn close_element(&mut self, tag: &str) -> Result<&mut Self> {
        match self.stack.last() {
            Some(top) if top == tag => {}
            top => {
                return Err(Error::TagMismatch {
                    expected: tag.to_string(),
                    found: top.cloned(),
                })
            }
        }
        self.stack.pop();
        self.finish_start_tag()?;
        self.stream.write_str("\n</")?;
        self.stream.write_str(tag)?;
        self.stream.write_str(">")?;
        Ok(self)
    }

    /// Close the innermost element as `<tag ... />`.
    ///
    /// Only valid while its start tag is still open.
    pub fn close_empty(&mut self) -> Result<&mut Self> {
        if !self.open_tag || self.stack.is_empty() {
            return Err(Error::protocol("self-closing tag requires an element without content"));
        }
        self.stream.write_str("/>")?;
        self.open_tag = false;
        self.stack.pop();
        Ok(self)
    }

    /// Access the raw stream for binary content, closing a pending start tag first.
    pub fn raw_stream(&mut self) -> Result<&mut OStream<W>> {
        self.finish_start_tag()?;
        Ok(&mut self.stream)
    }

    /// Flush and return the sink. All elements must be closed.
    pub fn into_inner(self) -> Result<W> {
        if !self.stack.is_empty() {
            return Err(Error::UnclosedElements(self.stack.into_vec()));
        }
        self.stream.into_inner()
    }
}
