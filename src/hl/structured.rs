//! Image, rectilinear and structured grid exporters.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{append_fields, begin, check_section, declare_fields, Fields};
use crate::util::{Error, Extent, Result};
use crate::vtk::{DataArray, GridGeometry, GridType, NodeType, Payload, PieceShape};

/// Geometry arrays written before the field data.
enum Geometry<'a> {
    /// Image data: geometry lives in the grid attributes.
    Implicit,
    /// Per-axis node coordinates.
    Coordinates([DataArray<'a>; 3]),
    /// One point per node.
    Points(Payload<'a>),
}

fn product(v: [usize; 3]) -> usize {
    v[0] * v[1] * v[2]
}

fn write_structured(
    path: &Path,
    grid_type: GridType,
    geometry: GridGeometry,
    extent: Extent,
    nodes: Geometry<'_>,
    fields: &Fields<'_>,
) -> Result<PathBuf> {
    check_section(&fields.point, NodeType::Point, product(extent.points()))?;
    check_section(&fields.cell, NodeType::Cell, product(extent.cells()))?;

    let mut w = begin(path, grid_type, fields)?;
    w.open_grid(&geometry)?;
    w.open_piece(PieceShape::Extent(extent))?;
    match &nodes {
        Geometry::Implicit => {}
        Geometry::Coordinates([x, y, z]) => {
            w.open_element("Coordinates")?;
            w.add_data("x_coordinates", &Payload::Scalar(*x))?;
            w.add_data("y_coordinates", &Payload::Scalar(*y))?;
            w.add_data("z_coordinates", &Payload::Scalar(*z))?;
            w.close_element("Coordinates")?;
        }
        Geometry::Points(points) => {
            w.open_element("Points")?;
            w.add_data("points", points)?;
            w.close_element("Points")?;
        }
    }
    declare_fields(&mut w, fields)?;
    w.close_piece()?;
    w.close_grid()?;

    match nodes {
        Geometry::Implicit => {}
        Geometry::Coordinates(axes) => {
            for axis in axes {
                w.append_data(&Payload::Scalar(axis))?;
            }
        }
        Geometry::Points(points) => {
            w.append_data(&points)?;
        }
    }
    append_fields(&mut w, fields)?;

    debug!(grid = %grid_type, cells = ?extent.cells(), "structured export");
    w.save()
}

/// Export cell and/or point data as a uniform image.
///
/// The grid size comes from the first cell array (cells per axis) or, without
/// cell data, from the first point array (points per axis).
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn image_to_vtk(
    path: impl AsRef<Path>,
    origin: [f64; 3],
    spacing: [f64; 3],
    fields: &Fields<'_>,
) -> Result<PathBuf> {
    let cells = if let Some(first) = fields.cell.values().next() {
        first.shape().dims()
    } else if let Some(first) = fields.point.values().next() {
        let dims = first.shape().dims();
        if dims.contains(&0) {
            return Err(Error::InvalidShape(format!(
                "point data of shape {} cannot size an image",
                first.shape()
            )));
        }
        [dims[0] - 1, dims[1] - 1, dims[2] - 1]
    } else {
        return Err(Error::MissingGeometry { grid: GridType::ImageData.name(), what: "cell or point data" });
    };

    let extent = Extent::from_cells(cells);
    let geometry = GridGeometry::image(extent, origin, spacing);
    write_structured(path.as_ref(), GridType::ImageData, geometry, extent, Geometry::Implicit, fields)
}

/// Export a rectilinear grid from 1D node coordinates along each axis.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn rectilinear_to_vtk<'a>(
    path: impl AsRef<Path>,
    x: impl Into<DataArray<'a>>,
    y: impl Into<DataArray<'a>>,
    z: impl Into<DataArray<'a>>,
    fields: &Fields<'_>,
) -> Result<PathBuf> {
    let axes = [x.into(), y.into(), z.into()];
    let mut cells = [0; 3];
    for (n, axis) in cells.iter_mut().zip(&axes) {
        if axis.shape().rank() != 1 || axis.is_empty() {
            return Err(Error::InvalidShape(format!(
                "rectilinear coordinates must be non-empty 1D arrays, got {}",
                axis.shape()
            )));
        }
        *n = axis.len() - 1;
    }

    let extent = Extent::from_cells(cells);
    write_structured(
        path.as_ref(),
        GridType::RectilinearGrid,
        GridGeometry::extent(extent),
        extent,
        Geometry::Coordinates(axes),
        fields,
    )
}

/// Export a curvilinear grid from 3D arrays of node coordinates.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn structured_to_vtk<'a>(
    path: impl AsRef<Path>,
    x: DataArray<'a>,
    y: DataArray<'a>,
    z: DataArray<'a>,
    fields: &Fields<'_>,
) -> Result<PathBuf> {
    let dims = x.shape().dims();
    if x.shape().rank() != 3 || dims.contains(&0) {
        return Err(Error::InvalidShape(format!(
            "structured coordinates must be non-empty 3D arrays, got {}",
            x.shape()
        )));
    }
    if y.shape().dims() != dims || z.shape().dims() != dims {
        return Err(Error::shape(format!(
            "coordinate arrays differ in shape ({}, {}, {})",
            x.shape(),
            y.shape(),
            z.shape()
        )));
    }
    let points = Payload::vector(x, y, z)?;

    let extent = Extent::from_cells([dims[0] - 1, dims[1] - 1, dims[2] - 1]);
    write_structured(
        path.as_ref(),
        GridType::StructuredGrid,
        GridGeometry::extent(extent),
        extent,
        Geometry::Points(points),
        fields,
    )
}
