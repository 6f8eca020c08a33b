//! Low-level markup output.
//!
//! - [`OStream`] - position-tracking byte sink
//! - [`XmlWriter`] - element stack and tag serialization

mod stream;
mod writer;

pub use stream::OStream;
pub use writer::XmlWriter;
