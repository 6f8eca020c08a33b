//! Utility types shared by the writer.
//!
//! This module contains the fixed tables and basic types:
//! - [`DataType`] / [`VtkPod`] - numeric element types
//! - [`CellType`] - cell shape ids
//! - [`Shape`] / [`Extent`] - array shapes and grid extents
//! - [`Error`] / [`Result`] - error handling

mod pod;
mod cell_type;
mod error;
mod dimensions;

pub use pod::*;
pub use cell_type::*;
pub use error::*;
pub use dimensions::*;
