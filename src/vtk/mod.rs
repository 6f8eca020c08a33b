//! VTK XML dataset and collection writers.
//!
//! - [`VtkFile`] - two-phase dataset writer (header, then appended blocks)
//! - [`VtkGroup`] - `.pvd` time-series index
//! - [`DataArray`] / [`Payload`] - typed views handed to the writer
//! - [`OffsetLedger`] - offset bookkeeping between the two phases
//! - [`encoder`] - binary block encoding

mod array;
mod constants;
pub mod encoder;
mod file;
mod grid;
mod group;
mod ledger;
mod options;


use std::path::{Path, PathBuf};

pub use array::{DataArray, Payload};
pub use constants::{BLOCK_HEADER_SIZE, COLLECTION_EXTENSION};
pub use file::{VtkFile, WriterState};
pub use grid::{DataDefaults, GridGeometry, GridType, NodeType, PieceShape};
pub use group::VtkGroup;
pub use ledger::{DeclaredBlock, OffsetLedger};
pub use options::WriterOptions;

/// `path` with `ext` appended verbatim (`out/a.b` + `.vtu` -> `out/a.b.vtu`).
pub(crate) fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(ext);
    PathBuf::from(name)
}
