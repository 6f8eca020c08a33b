//! One-call exporters for common dataset layouts.
//!
//! Each function writes a complete file (header, data sections and appended
//! blocks) and returns the absolute path of the written file. Field data is
//! passed as [`Fields`]: named point and cell payloads, kept sorted by name,
//! plus optional header comments.
//!
//! ```ignore
//! use evtk::hl::{rectilinear_to_vtk, Fields};
//! use evtk::vtk::Payload;
//!
//! let fields = Fields::new().cell("pressure", Payload::scalar(&pressure));
//! let path = rectilinear_to_vtk("out/rect", &x, &y, &z, &fields)?;
//! ```

mod structured;
mod unstructured;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::util::{Error, Result};
use crate::vtk::{DataDefaults, GridType, NodeType, Payload, VtkFile};

pub use structured::{image_to_vtk, rectilinear_to_vtk, structured_to_vtk};
pub use unstructured::{
    cylinder_to_vtk, lines_to_vtk, points_to_vtk, poly_lines_to_vtk, unstructured_grid_to_vtk,
    Cylinder,
};

/// Named arrays of one data section, iterated in name order.
pub type FieldMap<'a> = BTreeMap<String, Payload<'a>>;

/// Point data, cell data and header comments of an export.
#[derive(Clone, Debug, Default)]
pub struct Fields<'a> {
    pub point: FieldMap<'a>,
    pub cell: FieldMap<'a>,
    pub comments: Vec<String>,
}

impl<'a> Fields<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point-centered array.
    pub fn point(mut self, name: impl Into<String>, payload: Payload<'a>) -> Self {
        self.point.insert(name.into(), payload);
        self
    }

    /// Add a cell-centered array.
    pub fn cell(mut self, name: impl Into<String>, payload: Payload<'a>) -> Self {
        self.cell.insert(name.into(), payload);
        self
    }

    /// Add a header comment.
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comments.push(text.into());
        self
    }

    /// Returns true if there is neither point nor cell data.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty() && self.cell.is_empty()
    }
}

/// First scalar and first vector array become the section defaults.
fn section_defaults(map: &FieldMap<'_>) -> DataDefaults {
    let first = |ncomp| {
        map.iter()
            .find(|(_, p)| p.num_components() == ncomp)
            .map(|(name, _)| name.as_str())
    };
    let mut defaults = DataDefaults::new();
    if let Some(name) = first(1) {
        defaults = defaults.scalars(name);
    }
    if let Some(name) = first(3) {
        defaults = defaults.vectors(name);
    }
    defaults
}

/// Every array of a section must hold one tuple per point (or cell).
fn check_section(map: &FieldMap<'_>, node_type: NodeType, expected: usize) -> Result<()> {
    for (name, payload) in map {
        payload.validate()?;
        if payload.num_elements() != expected {
            return Err(Error::shape(format!(
                "{} array {name:?} has {} tuples, expected {expected}",
                node_type.tag(),
                payload.num_elements()
            )));
        }
    }
    Ok(())
}

fn begin(path: &Path, grid_type: GridType, fields: &Fields<'_>) -> Result<VtkFile<BufWriter<File>>> {
    let mut w = VtkFile::create(path, grid_type)?;
    if !fields.comments.is_empty() {
        w.add_comments(&fields.comments)?;
    }
    Ok(w)
}

fn sections<'f, 'a>(fields: &'f Fields<'a>) -> [(NodeType, &'f FieldMap<'a>); 2] {
    [(NodeType::Point, &fields.point), (NodeType::Cell, &fields.cell)]
}

/// Declare the point and cell sections of the open piece.
fn declare_fields<W: Write>(w: &mut VtkFile<W>, fields: &Fields<'_>) -> Result<()> {
    for (node_type, map) in sections(fields) {
        if map.is_empty() {
            continue;
        }
        w.open_data(node_type, &section_defaults(map))?;
        for (name, payload) in map {
            w.add_data(name, payload)?;
        }
        w.close_data(node_type)?;
    }
    Ok(())
}

/// Append the field blocks in the order [`declare_fields`] declared them.
fn append_fields<W: Write>(w: &mut VtkFile<W>, fields: &Fields<'_>) -> Result<()> {
    for (_, map) in sections(fields) {
        for payload in map.values() {
            w.append_data(payload)?;
        }
    }
    Ok(())
}
